//! Dense linear algebra on row-major `f64` slices.
//!
//! All routines delegate to nalgebra's LU decomposition. Singular systems
//! are reported as [`LinalgError::Singular`]; no iterative refinement is done.
use nalgebra::{DMatrix, DVector};

use crate::error::{LinalgError, Result};

fn check_len(values: &[f64], expected: usize) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(LinalgError::Dimension {
            expected,
            actual: values.len(),
        }
        .into())
    }
}

fn to_row_major(m: &DMatrix<f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(m.nrows() * m.ncols());
    for r in 0..m.nrows() {
        for c in 0..m.ncols() {
            out.push(m[(r, c)]);
        }
    }
    out
}

/// Inverts the `n x n` matrix `a`.
///
/// # Errors
///
/// Returns `LinalgError::Dimension` if `a` does not hold `n * n` values and
/// `LinalgError::Singular` if the matrix is not invertible.
pub fn inverse(a: &[f64], n: usize) -> Result<Vec<f64>> {
    check_len(a, n * n)?;
    let m = DMatrix::from_row_slice(n, n, a);
    let inv = m.lu().try_inverse().ok_or(LinalgError::Singular)?;
    Ok(to_row_major(&inv))
}

/// Multiplies the `m0 x n0` matrix `a` by the `n0 x n1` matrix `b`.
///
/// # Errors
///
/// Returns `LinalgError::Dimension` if either slice has the wrong length.
pub fn multiply(a: &[f64], m0: usize, n0: usize, b: &[f64], n1: usize) -> Result<Vec<f64>> {
    check_len(a, m0 * n0)?;
    check_len(b, n0 * n1)?;
    let lhs = DMatrix::from_row_slice(m0, n0, a);
    let rhs = DMatrix::from_row_slice(n0, n1, b);
    Ok(to_row_major(&(lhs * rhs)))
}

/// Solves `A x = b` for the `n x n` matrix `a`.
///
/// # Errors
///
/// Returns `LinalgError::Dimension` on size mismatch and
/// `LinalgError::Singular` if the system has no unique solution.
pub fn solve(a: &[f64], n: usize, b: &[f64]) -> Result<Vec<f64>> {
    check_len(a, n * n)?;
    check_len(b, n)?;
    let m = DMatrix::from_row_slice(n, n, a);
    let rhs = DVector::from_column_slice(b);
    let x = m.lu().solve(&rhs).ok_or(LinalgError::Singular)?;
    Ok(x.iter().copied().collect())
}
