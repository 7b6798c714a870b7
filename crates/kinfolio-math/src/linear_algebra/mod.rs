//! Linear algebra utilities.
//!
//! Covariance matrices and quadratic forms needed for mean-variance
//! calculations, built on `nalgebra`.

use crate::error::{MathError, MathResult};
use crate::stats::{covariance, Ddof};
use nalgebra::{DMatrix, DVector};

/// Builds the covariance matrix of a set of equally long columns.
///
/// Column `i` is the observation series of variable `i`; the result is the
/// symmetric `k x k` matrix of pairwise covariances.
///
/// # Arguments
///
/// * `columns` - One observation series per variable
/// * `ddof` - Degrees-of-freedom convention for every entry
pub fn covariance_matrix(columns: &[Vec<f64>], ddof: Ddof) -> MathResult<DMatrix<f64>> {
    let k = columns.len();
    if k == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }

    let n = columns[0].len();
    if let Some(bad) = columns.iter().find(|c| c.len() != n) {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: k,
            rows2: bad.len(),
            cols2: k,
        });
    }

    let mut cov = DMatrix::zeros(k, k);
    for i in 0..k {
        for j in i..k {
            let c = covariance(&columns[i], &columns[j], ddof)?;
            cov[(i, j)] = c;
            cov[(j, i)] = c;
        }
    }

    Ok(cov)
}

/// Evaluates `wᵗ M w`.
pub fn quadratic_form(weights: &[f64], matrix: &DMatrix<f64>) -> MathResult<f64> {
    let w = checked_vector(weights, matrix)?;
    Ok(w.dot(&(matrix * &w)))
}

/// Evaluates `M w`.
pub fn mat_vec(matrix: &DMatrix<f64>, weights: &[f64]) -> MathResult<Vec<f64>> {
    let w = checked_vector(weights, matrix)?;
    Ok((matrix * w).iter().copied().collect())
}

/// Dot product of two equally long slices.
pub fn dot(a: &[f64], b: &[f64]) -> MathResult<f64> {
    if a.len() != b.len() {
        return Err(MathError::length_mismatch(a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

fn checked_vector(weights: &[f64], matrix: &DMatrix<f64>) -> MathResult<DVector<f64>> {
    if !matrix.is_square() || matrix.nrows() != weights.len() {
        return Err(MathError::DimensionMismatch {
            rows1: matrix.nrows(),
            cols1: matrix.ncols(),
            rows2: weights.len(),
            cols2: 1,
        });
    }
    Ok(DVector::from_column_slice(weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_covariance_matrix_symmetric() {
        let columns = vec![vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 1.0, 4.0, 3.0]];
        let cov = covariance_matrix(&columns, Ddof::Sample).unwrap();

        assert_eq!(cov.nrows(), 2);
        assert_relative_eq!(cov[(0, 1)], cov[(1, 0)]);
        assert_relative_eq!(cov[(0, 0)], 5.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_matrix_ragged_columns() {
        let columns = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(covariance_matrix(&columns, Ddof::Sample).is_err());
    }

    #[test]
    fn test_quadratic_form() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        // [1, 1] · [[2, 1], [1, 3]] · [1, 1] = 7
        assert_relative_eq!(quadratic_form(&[1.0, 1.0], &m).unwrap(), 7.0);
        assert_eq!(mat_vec(&m, &[1.0, 0.0]).unwrap(), vec![2.0, 1.0]);
        assert!(quadratic_form(&[1.0], &m).is_err());
    }
}
