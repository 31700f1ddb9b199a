use crate::algo::matrix::Matrix;
use crate::error::{Result, SymNmfError};

/// Row sums of a square affinity matrix.
pub fn degrees(a: &Matrix) -> Result<Vec<f64>> {
    if a.rows() != a.cols() {
        return Err(SymNmfError::ShapeMismatch {
            op: "degree",
            left: a.shape(),
            right: (a.cols(), a.rows()),
        });
    }
    Ok(a.iter_rows().map(|row| row.iter().sum()).collect())
}

/// Diagonal degree matrix: `D[i][i] = Σⱼ A[i][j]`, zero elsewhere.
///
/// A zero degree is a valid result here; the normalizer reports it.
pub fn build_degree(a: &Matrix) -> Result<Matrix> {
    Matrix::diagonal(&degrees(a)?)
}
