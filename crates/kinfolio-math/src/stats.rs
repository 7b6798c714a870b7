//! Descriptive statistics over `f64` samples.
//!
//! Conventions follow the usual numerical-library defaults: population
//! moments unless [`Ddof::Sample`] is requested, and linear interpolation
//! between order statistics for percentiles.

use crate::error::{MathError, MathResult};

/// Delta degrees of freedom used by second-moment estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ddof {
    /// Divide by `n`.
    #[default]
    Population,
    /// Divide by `n - 1`.
    Sample,
}

impl Ddof {
    fn offset(self) -> usize {
        match self {
            Self::Population => 0,
            Self::Sample => 1,
        }
    }
}

/// Arithmetic mean. `None` for an empty sample.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Variance with the given degrees-of-freedom convention.
///
/// Returns `None` when the sample is too short for the divisor to be positive.
pub fn variance(xs: &[f64], ddof: Ddof) -> Option<f64> {
    let n = xs.len();
    if n <= ddof.offset() {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some(ss / (n - ddof.offset()) as f64)
}

/// Standard deviation with the given degrees-of-freedom convention.
pub fn std_dev(xs: &[f64], ddof: Ddof) -> Option<f64> {
    variance(xs, ddof).map(f64::sqrt)
}

/// Covariance of two equally long samples.
pub fn covariance(xs: &[f64], ys: &[f64], ddof: Ddof) -> MathResult<f64> {
    if xs.len() != ys.len() {
        return Err(MathError::length_mismatch(xs.len(), ys.len()));
    }
    let required = ddof.offset() + 1;
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }

    let mx = xs.iter().sum::<f64>() / xs.len() as f64;
    let my = ys.iter().sum::<f64>() / ys.len() as f64;
    let cross: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();

    Ok(cross / (xs.len() - ddof.offset()) as f64)
}

/// Pearson correlation of two equally long samples.
///
/// `Ok(None)` when either sample has zero variance; the coefficient is
/// undefined there. Results are clamped to `[-1, 1]` to absorb round-off.
pub fn correlation(xs: &[f64], ys: &[f64]) -> MathResult<Option<f64>> {
    if xs.len() != ys.len() {
        return Err(MathError::length_mismatch(xs.len(), ys.len()));
    }
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }

    let cov = covariance(xs, ys, Ddof::Sample)?;
    let sx = std_dev(xs, Ddof::Sample).unwrap_or(0.0);
    let sy = std_dev(ys, Ddof::Sample).unwrap_or(0.0);

    if sx == 0.0 || sy == 0.0 {
        return Ok(None);
    }

    let r = cov / (sx * sy);
    if !r.is_finite() {
        return Ok(None);
    }
    Ok(Some(r.clamp(-1.0, 1.0)))
}

/// Percentile `q` (in `[0, 100]`) with linear interpolation between ranks.
///
/// `None` for an empty sample or an out-of-range `q`.
pub fn percentile(xs: &[f64], q: f64) -> Option<f64> {
    if xs.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }

    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&xs).unwrap(), 2.5);
        assert_relative_eq!(variance(&xs, Ddof::Population).unwrap(), 1.25);
        assert_relative_eq!(variance(&xs, Ddof::Sample).unwrap(), 5.0 / 3.0);
    }

    #[test]
    fn test_degenerate_samples() {
        assert!(mean(&[]).is_none());
        assert!(variance(&[1.0], Ddof::Sample).is_none());
        assert_relative_eq!(variance(&[1.0], Ddof::Population).unwrap(), 0.0);
    }

    #[test]
    fn test_covariance_length_mismatch() {
        assert!(covariance(&[1.0, 2.0], &[1.0], Ddof::Sample).is_err());
    }

    #[test]
    fn test_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let zs = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(correlation(&xs, &ys).unwrap().unwrap(), 1.0);
        assert_relative_eq!(correlation(&xs, &zs).unwrap().unwrap(), -1.0);

        let flat = [3.0, 3.0, 3.0, 3.0];
        assert!(correlation(&xs, &flat).unwrap().is_none());
    }

    #[test]
    fn test_percentile_interpolates() {
        let xs = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_relative_eq!(percentile(&xs, 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(&xs, 50.0).unwrap(), 3.0);
        assert_relative_eq!(percentile(&xs, 100.0).unwrap(), 5.0);
        // rank 0.2 between 1.0 and 2.0
        assert_relative_eq!(percentile(&xs, 5.0).unwrap(), 1.2);
        assert!(percentile(&[], 5.0).is_none());
    }
}
