use tracing::debug;

use crate::algo::degree::build_degree;
use crate::algo::matrix::Matrix;
use crate::error::{Result, SymNmfError};

/// Symmetric normalized affinity `W = D^(-1/2) · A · D^(-1/2)`.
///
/// Fails with [`SymNmfError::NumericDegeneracy`] when a point has zero
/// degree, i.e. every similarity it has underflowed to 0, or when a degree
/// is not finite.
pub fn normalize(a: &Matrix) -> Result<Matrix> {
    let d = build_degree(a)?;
    let mut inv_sqrt = Vec::with_capacity(d.rows());
    for i in 0..d.rows() {
        let deg = d[(i, i)];
        if !(deg > 0.0 && deg.is_finite()) {
            return Err(SymNmfError::NumericDegeneracy { index: i });
        }
        inv_sqrt.push(1.0 / deg.sqrt());
    }
    let d_inv_sqrt = Matrix::diagonal(&inv_sqrt)?;
    let w = d_inv_sqrt.mul(a)?.mul(&d_inv_sqrt)?;
    debug!(n = w.rows(), "normalized affinity matrix");
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::similarity::build_affinity;

    #[test]
    fn normalized_is_symmetric_and_scaled() {
        let points = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.5],
            vec![2.0, 2.0],
        ])
        .unwrap();
        let a = build_affinity(&points).unwrap();
        let w = normalize(&a).unwrap();
        assert!(w.is_symmetric(1e-12));
        assert!(w.is_finite());

        let deg: Vec<f64> = a.iter_rows().map(|r| r.iter().sum()).collect();
        for i in 0..4 {
            for j in 0..4 {
                let expected = a[(i, j)] / (deg[i].sqrt() * deg[j].sqrt());
                assert!((w[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn zero_degree_is_degeneracy() {
        // The third point is so far away that exp(-d²/2) underflows to 0.
        let points =
            Matrix::from_rows(&[vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0e3, 1.0e3]]).unwrap();
        let a = build_affinity(&points).unwrap();
        match normalize(&a) {
            Err(SymNmfError::NumericDegeneracy { index }) => assert_eq!(index, 2),
            other => panic!("expected degeneracy, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_degree_is_degeneracy() {
        let a = Matrix::from_rows(&[
            vec![0.0, 0.5, 0.2],
            vec![0.5, 0.0, f64::NAN],
            vec![0.2, f64::NAN, 0.0],
        ])
        .unwrap();
        assert!(matches!(
            normalize(&a),
            Err(SymNmfError::NumericDegeneracy { index: 1 })
        ));

        let a = Matrix::from_rows(&[vec![0.0, f64::INFINITY], vec![f64::INFINITY, 0.0]]).unwrap();
        assert!(matches!(
            normalize(&a),
            Err(SymNmfError::NumericDegeneracy { index: 0 })
        ));
    }

    #[test]
    fn single_point_is_degenerate() {
        let points = Matrix::from_rows(&[vec![5.0]]).unwrap();
        let a = build_affinity(&points).unwrap();
        assert!(matches!(
            normalize(&a),
            Err(SymNmfError::NumericDegeneracy { index: 0 })
        ));
    }
}
