use std::collections::HashMap;

use tracing::debug;

use crate::algo::matrix::Matrix;
use crate::algo::metric::{euclidean_distance, squared_distance};
use crate::error::{Result, SymNmfError};

/// Hard cluster label per row: the column holding the row's largest value.
///
/// Ties go to the lowest column index.
pub fn assignments(h: &Matrix) -> Vec<usize> {
    h.iter_rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (j, &v)| {
                    if v > best.1 {
                        (j, v)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}

/// Result of Lloyd's k-means.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub centroids: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub iterations: usize,
}

/// Lloyd's algorithm seeded with the first `k` points.
///
/// Stops when no centroid moves by `eps` or more (Euclidean), or after
/// `max_iter` rounds. An emptied cluster keeps its previous centroid.
pub fn kmeans(points: &Matrix, k: usize, max_iter: usize, eps: f64) -> Result<KMeans> {
    let n = points.rows();
    if k == 0 || k > n {
        return Err(SymNmfError::InvalidRank { k, n });
    }
    let d = points.cols();
    let mut centroids: Vec<Vec<f64>> = points.iter_rows().take(k).map(<[f64]>::to_vec).collect();
    let mut labels = nearest_labels(points, &centroids);
    let mut iterations = 0;

    while iterations < max_iter {
        iterations += 1;
        let mut sums = vec![vec![0.0; d]; k];
        let mut counts = vec![0usize; k];
        for (row, &label) in points.iter_rows().zip(&labels) {
            counts[label] += 1;
            for (s, &x) in sums[label].iter_mut().zip(row) {
                *s += x;
            }
        }

        let mut max_shift: f64 = 0.0;
        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
            if count == 0 {
                continue;
            }
            let updated: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
            max_shift = max_shift.max(euclidean_distance(centroid, &updated));
            *centroid = updated;
        }

        labels = nearest_labels(points, &centroids);
        if max_shift < eps {
            break;
        }
    }

    debug!(n, k, iterations, "kmeans finished");
    Ok(KMeans {
        centroids,
        labels,
        iterations,
    })
}

fn nearest_labels(points: &Matrix, centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter_rows()
        .map(|row| {
            centroids
                .iter()
                .enumerate()
                .map(|(c, centroid)| (c, squared_distance(row, centroid)))
                .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
                .0
        })
        .collect()
}

/// Mean silhouette coefficient over all points, Euclidean distance.
///
/// A point alone in its cluster scores 0. Needs between 2 and n-1 distinct
/// labels.
pub fn silhouette_score(points: &Matrix, labels: &[usize]) -> Result<f64> {
    let n = points.rows();
    if labels.len() != n {
        return Err(SymNmfError::ShapeMismatch {
            op: "silhouette_score",
            left: points.shape(),
            right: (labels.len(), 1),
        });
    }

    // Dense relabel so cluster ids index a Vec
    let mut ids: HashMap<usize, usize> = HashMap::new();
    let dense: Vec<usize> = labels
        .iter()
        .map(|l| {
            let next = ids.len();
            *ids.entry(*l).or_insert(next)
        })
        .collect();
    let n_clusters = ids.len();
    if n_clusters < 2 || n_clusters >= n {
        return Err(SymNmfError::InvalidArgument(format!(
            "silhouette needs 2..={} distinct labels, got {n_clusters}",
            n.saturating_sub(1)
        )));
    }

    let mut sizes = vec![0usize; n_clusters];
    for &c in &dense {
        sizes[c] += 1;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = dense[i];
        if sizes[own] == 1 {
            continue;
        }
        let mut dist_sums = vec![0.0; n_clusters];
        for j in 0..n {
            if i != j {
                dist_sums[dense[j]] += euclidean_distance(points.row(i), points.row(j));
            }
        }
        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own)
            .map(|c| dist_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    Ok(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Matrix {
        Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.0, 1.0],
            vec![10.0, 11.0],
            vec![1.0, 0.0],
            vec![11.0, 10.0],
        ])
        .unwrap()
    }

    #[test]
    fn assignments_pick_row_argmax() {
        let h = Matrix::from_rows(&[vec![0.1, 0.9], vec![0.8, 0.2], vec![0.5, 0.5]]).unwrap();
        assert_eq!(assignments(&h), vec![1, 0, 0]);
    }

    #[test]
    fn kmeans_separates_blobs() {
        let result = kmeans(&blobs(), 2, 300, 1e-4).unwrap();
        let l = &result.labels;
        assert_eq!(l[0], l[2]);
        assert_eq!(l[0], l[4]);
        assert_eq!(l[1], l[3]);
        assert_eq!(l[1], l[5]);
        assert_ne!(l[0], l[1]);
        assert!(result.iterations < 300);
    }

    #[test]
    fn kmeans_rejects_bad_k() {
        assert!(kmeans(&blobs(), 0, 10, 1e-4).is_err());
        assert!(kmeans(&blobs(), 7, 10, 1e-4).is_err());
    }

    #[test]
    fn silhouette_high_for_separated_blobs() {
        let labels = vec![0, 1, 0, 1, 0, 1];
        let s = silhouette_score(&blobs(), &labels).unwrap();
        assert!(s > 0.9, "s={s}");
    }

    #[test]
    fn silhouette_negative_for_swapped_labels() {
        let labels = vec![0, 0, 1, 1, 0, 1];
        let s = silhouette_score(&blobs(), &labels).unwrap();
        assert!(s < 0.0, "s={s}");
    }

    #[test]
    fn silhouette_label_values_need_not_be_dense() {
        let a = silhouette_score(&blobs(), &[0, 1, 0, 1, 0, 1]).unwrap();
        let b = silhouette_score(&blobs(), &[7, 3, 7, 3, 7, 3]).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn silhouette_rejects_single_cluster() {
        let err = silhouette_score(&blobs(), &[0; 6]).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidArgument(_)));
    }

    #[test]
    fn silhouette_singleton_scores_zero() {
        let points = Matrix::from_rows(&[vec![0.0], vec![0.1], vec![5.0]]).unwrap();
        let s = silhouette_score(&points, &[0, 0, 1]).unwrap();
        // Two clustered points score near 1, the singleton contributes 0.
        assert!(s > 0.6 && s < 2.0 / 3.0 + 1e-9, "s={s}");
    }
}
