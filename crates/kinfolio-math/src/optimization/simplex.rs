//! Euclidean projection onto the probability simplex.

use crate::error::{MathError, MathResult};

/// Projects `v` onto `{x : x_i >= 0, Σ x_i = 1}`.
///
/// Sort-based algorithm (Held, Wolfe & Crowder; Duchi et al.): find the
/// threshold `θ` such that `Σ max(v_i − θ, 0) = 1`, then clip.
pub fn project_onto_simplex(v: &[f64]) -> MathResult<Vec<f64>> {
    if v.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(MathError::non_finite("simplex projection"));
    }

    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (j, u) in sorted.iter().enumerate() {
        cumulative += u;
        let candidate = (cumulative - 1.0) / (j + 1) as f64;
        if u - candidate > 0.0 {
            theta = candidate;
        }
    }

    Ok(v.iter().map(|x| (x - theta).max(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_point_inside_is_fixed() {
        let x = project_onto_simplex(&[0.2, 0.3, 0.5]).unwrap();
        assert_relative_eq!(x[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.3, epsilon = 1e-12);
        assert_relative_eq!(x[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_components_clipped() {
        let x = project_onto_simplex(&[2.0, -1.0]).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_shift() {
        let x = project_onto_simplex(&[1.0, 1.0, 1.0, 1.0]).unwrap();
        for xi in x {
            assert_relative_eq!(xi, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(project_onto_simplex(&[]).is_err());
        assert!(project_onto_simplex(&[f64::NAN, 1.0]).is_err());
    }

    proptest! {
        #[test]
        fn projection_is_feasible(v in prop::collection::vec(-10.0f64..10.0, 1..30)) {
            let x = project_onto_simplex(&v).unwrap();
            let total: f64 = x.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(x.iter().all(|xi| (0.0..=1.0 + 1e-12).contains(xi)));
        }
    }
}
