use tracing::debug;

use crate::algo::matrix::Matrix;
use crate::algo::metric::squared_distance;
use crate::error::Result;

/// Build the n×n affinity matrix of a point set.
///
/// `A[i][j] = exp(-‖xᵢ - xⱼ‖² / 2)` for `i != j`; the diagonal is 0 because a
/// point is not its own neighbour in the graph. Rows are computed in parallel.
pub fn build_affinity(points: &Matrix) -> Result<Matrix> {
    let n = points.rows();
    let mut a = Matrix::zeros(n, n)?;
    a.par_fill_rows(|i, row| {
        let xi = points.row(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if i == j {
                0.0
            } else {
                (-squared_distance(xi, points.row(j)) / 2.0).exp()
            };
        }
    });
    debug!(n, d = points.cols(), "built affinity matrix");
    Ok(a)
}
