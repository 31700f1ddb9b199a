use std::ops::{Index, IndexMut};

use rayon::prelude::*;
use serde::Serialize;

use crate::algo::metric;
use crate::error::{Result, SymNmfError};

/// Dense row-major matrix of `f64`.
///
/// Storage is obtained with `try_reserve_exact`, so running out of memory
/// surfaces as [`SymNmfError::AllocationFailure`] instead of aborting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(SymNmfError::AllocationFailure { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(SymNmfError::allocation(rows, cols))?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix cell by cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Result<Self> {
        let mut m = Self::zeros(rows, cols)?;
        for i in 0..rows {
            for j in 0..cols {
                m.data[i * cols + j] = f(i, j);
            }
        }
        Ok(m)
    }

    /// Build a matrix from a list of equal-length rows.
    ///
    /// Rejects an empty list, zero-width rows and ragged rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows.first().ok_or_else(|| SymNmfError::InputFormat {
            line: 0,
            reason: "no rows".into(),
        })?;
        let cols = first.len();
        if cols == 0 {
            return Err(SymNmfError::InputFormat {
                line: 1,
                reason: "row has no values".into(),
            });
        }
        let mut m = Self::zeros(rows.len(), cols)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SymNmfError::InputFormat {
                    line: i + 1,
                    reason: format!("expected {cols} values, found {}", row.len()),
                });
            }
            m.row_mut(i).copy_from_slice(row);
        }
        Ok(m)
    }

    /// Square matrix with `values` on the diagonal and zeros elsewhere.
    pub fn diagonal(values: &[f64]) -> Result<Self> {
        let n = values.len();
        let mut m = Self::zeros(n, n)?;
        for (i, &v) in values.iter().enumerate() {
            m.data[i * n + i] = v;
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Fill every row in parallel. `f` receives the row index and the row buffer.
    pub fn par_fill_rows<F>(&mut self, f: F)
    where
        F: Fn(usize, &mut [f64]) + Sync + Send,
    {
        if self.data.is_empty() {
            return;
        }
        self.data
            .par_chunks_mut(self.cols)
            .enumerate()
            .for_each(|(i, row)| f(i, row));
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Matrix product `self × other`, one output row per rayon task.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(SymNmfError::ShapeMismatch {
                op: "mul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Matrix::zeros(self.rows, other.cols)?;
        if out.data.is_empty() {
            return Ok(out);
        }
        out.data
            .par_chunks_mut(other.cols)
            .enumerate()
            .for_each(|(i, out_row)| {
                for (l, &a) in self.row(i).iter().enumerate() {
                    if a == 0.0 {
                        continue;
                    }
                    for (o, &b) in out_row.iter_mut().zip(other.row(l)) {
                        *o += a * b;
                    }
                }
            });
        Ok(out)
    }

    /// `selfᵀ × other` without materializing the transpose.
    pub fn transpose_mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows {
            return Err(SymNmfError::ShapeMismatch {
                op: "transpose_mul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Matrix::zeros(self.cols, other.cols)?;
        for (a_row, b_row) in self.iter_rows().zip(other.iter_rows()) {
            for (i, &a) in a_row.iter().enumerate() {
                for (o, &b) in out.row_mut(i).iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Result<Matrix> {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.get(j, i))
    }

    /// Squared Frobenius norm of `self - other`.
    pub fn sq_frobenius_distance(&self, other: &Matrix) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(SymNmfError::ShapeMismatch {
                op: "sq_frobenius_distance",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(metric::squared_distance(&self.data, &other.data))
    }

    /// Arithmetic mean of all cells; 0 for an empty matrix.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|i| {
                (i + 1..self.cols).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol)
            })
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    pub fn is_non_negative(&self) -> bool {
        self.data.iter().all(|&v| v >= 0.0)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn zeros_has_shape() {
        let z = Matrix::zeros(3, 2).unwrap();
        assert_eq!(z.shape(), (3, 2));
        assert!(z.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zeros_overflow_is_allocation_failure() {
        let err = Matrix::zeros(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, SymNmfError::AllocationFailure { .. }));
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        match err {
            SymNmfError::InputFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert!(Matrix::from_rows(&[]).is_err());
        assert!(Matrix::from_rows(&[vec![]]).is_err());
    }

    #[test]
    fn mul_matches_hand_computation() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        let c = a.mul(&b).unwrap();
        assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn mul_rectangular() {
        let a = m(&[&[1.0, 0.0, 2.0]]);
        let b = m(&[&[1.0], &[5.0], &[3.0]]);
        let c = a.mul(&b).unwrap();
        assert_eq!(c.shape(), (1, 1));
        assert_eq!(c[(0, 0)], 7.0);
    }

    #[test]
    fn mul_shape_mismatch() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(
            a.mul(&b),
            Err(SymNmfError::ShapeMismatch { op: "mul", .. })
        ));
    }

    #[test]
    fn transpose_mul_equals_explicit_transpose() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let expected = a.transpose().unwrap().mul(&a).unwrap();
        let got = a.transpose_mul(&a).unwrap();
        assert_eq!(got, expected);
        assert!(got.is_symmetric(0.0));
    }

    #[test]
    fn sq_frobenius_distance_sums_squares() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[0.0, 2.0], &[3.0, 2.0]]);
        assert_eq!(a.sq_frobenius_distance(&b).unwrap(), 5.0);
        assert_eq!(a.sq_frobenius_distance(&a).unwrap(), 0.0);
    }

    #[test]
    fn diagonal_is_diagonal() {
        let d = Matrix::diagonal(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(d[(1, 1)], 2.0);
        assert_eq!(d[(0, 1)], 0.0);
        assert!(d.is_symmetric(0.0));
    }

    #[test]
    fn mean_of_cells() {
        let a = m(&[&[1.0, 2.0], &[3.0, 6.0]]);
        assert_eq!(a.mean(), 3.0);
    }
}
