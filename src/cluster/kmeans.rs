//! K-Means clustering algorithm.
//!
//! Uses Lloyd's algorithm with k-means++ initialization.

use crate::error::{Result, TabscoutError};
use crate::metrics::{inertia, squared_distance};
use crate::primitives::Matrix;
use crate::traits::{Clusterer, UnsupervisedEstimator};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// K-Means clustering algorithm.
///
/// # Algorithm
///
/// 1. Initialize centroids using k-means++ (D² weighted sampling)
/// 2. Assign each sample to nearest centroid
/// 3. Update centroids as mean of assigned samples
/// 4. Repeat until no centroid moves more than `tol`
///
/// If step 4 is still unmet after `max_iter` rounds, `fit` fails with
/// [`TabscoutError::ConvergenceFailure`].
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     1.0, 2.0,
///     1.5, 1.8,
///     5.0, 8.0,
///     8.0, 8.0,
///     1.0, 0.6,
///     9.0, 11.0,
/// ]).expect("Valid matrix dimensions and data length");
///
/// let mut kmeans = KMeans::new(2).with_random_state(7);
/// kmeans.fit(&data).expect("Fit succeeds with valid data");
///
/// let labels = kmeans.predict(&data);
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[5]);
/// ```
///
/// # Performance
///
/// - Time complexity: O(nkdi) where n=samples, k=clusters, d=features, i=iterations
/// - Space complexity: O(nk)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    /// Number of clusters.
    n_clusters: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on centroid movement.
    tol: f32,
    /// Random seed for initialization.
    random_state: Option<u64>,
    /// Cluster centroids after fitting.
    centroids: Option<Matrix<f32>>,
    /// Labels for training data.
    labels: Option<Vec<usize>>,
    /// Sum of squared distances (inertia).
    inertia: f32,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(8)
    }
}

impl KMeans {
    /// Creates a new K-Means with the specified number of clusters.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            random_state: None,
            centroids: None,
            labels: None,
            inertia: 0.0,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Labels of the training rows, if fitted.
    #[must_use]
    pub fn labels(&self) -> Option<&[usize]> {
        self.labels.as_deref()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.centroids.is_some()
    }

    /// Initializes centroids using k-means++.
    fn kmeans_plusplus_init(&self, x: &Matrix<f32>, rng: &mut StdRng) -> Matrix<f32> {
        let (n_samples, n_features) = x.shape();
        let mut centroids = Matrix::zeros(self.n_clusters, n_features);

        let first = rng.gen_range(0..n_samples);
        let mut min_distances: Vec<f32> = (0..n_samples)
            .map(|i| squared_distance(x.row_slice(i), x.row_slice(first)))
            .collect();
        copy_row(x, first, &mut centroids, 0);

        for k in 1..self.n_clusters {
            // All remaining points coincide with a centroid: pick uniformly.
            let next = match WeightedIndex::new(&min_distances) {
                Ok(weighted) => weighted.sample(rng),
                Err(_) => rng.gen_range(0..n_samples),
            };
            copy_row(x, next, &mut centroids, k);

            for (i, min_dist) in min_distances.iter_mut().enumerate() {
                let dist = squared_distance(x.row_slice(i), x.row_slice(next));
                if dist < *min_dist {
                    *min_dist = dist;
                }
            }
        }

        centroids
    }

    /// Assigns each sample to the nearest centroid (lowest index on ties).
    fn assign_labels(&self, x: &Matrix<f32>, centroids: &Matrix<f32>) -> Vec<usize> {
        (0..x.n_rows())
            .map(|i| {
                let point = x.row_slice(i);
                let mut min_dist = f32::INFINITY;
                let mut min_cluster = 0;
                for k in 0..self.n_clusters {
                    let dist = squared_distance(point, centroids.row_slice(k));
                    if dist < min_dist {
                        min_dist = dist;
                        min_cluster = k;
                    }
                }
                min_cluster
            })
            .collect()
    }

    /// Moves each centroid to the mean of its samples; empty clusters stay put.
    fn update_centroids(
        &self,
        x: &Matrix<f32>,
        labels: &[usize],
        previous: &Matrix<f32>,
    ) -> Matrix<f32> {
        let n_features = x.n_cols();
        let mut sums = vec![0.0f32; self.n_clusters * n_features];
        let mut counts = vec![0usize; self.n_clusters];

        for (i, &label) in labels.iter().enumerate() {
            counts[label] += 1;
            for (j, value) in x.row_slice(i).iter().enumerate() {
                sums[label * n_features + j] += value;
            }
        }

        let mut centroids = previous.clone();
        for (k, &count) in counts.iter().enumerate() {
            if count > 0 {
                for j in 0..n_features {
                    centroids.set(k, j, sums[k * n_features + j] / count as f32);
                }
            }
        }
        centroids
    }

    /// Largest squared centroid movement.
    fn max_shift(old: &Matrix<f32>, new: &Matrix<f32>) -> f32 {
        (0..old.n_rows())
            .map(|k| squared_distance(old.row_slice(k), new.row_slice(k)))
            .fold(0.0, f32::max)
    }
}

fn copy_row(from: &Matrix<f32>, row: usize, to: &mut Matrix<f32>, dest: usize) {
    for (j, &value) in from.row_slice(row).iter().enumerate() {
        to.set(dest, j, value);
    }
}

impl UnsupervisedEstimator for KMeans {
    type Labels = Vec<usize>;

    /// Fits the K-Means model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Data is empty or has fewer samples than clusters
    /// - `n_clusters` is zero
    /// - Centroids still move after `max_iter` rounds
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let n_samples = x.n_rows();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }
        if self.n_clusters == 0 || n_samples < self.n_clusters {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "n_clusters".to_string(),
                value: self.n_clusters.to_string(),
                constraint: format!("1..={n_samples}"),
            });
        }

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut centroids = self.kmeans_plusplus_init(x, &mut rng);
        let mut labels = self.assign_labels(x, &centroids);
        let mut shift = f32::INFINITY;
        let mut converged = false;

        for iter in 0..self.max_iter {
            let new_centroids = self.update_centroids(x, &labels, &centroids);
            shift = Self::max_shift(&centroids, &new_centroids);
            centroids = new_centroids;

            let new_labels = self.assign_labels(x, &centroids);
            let stable = new_labels == labels;
            labels = new_labels;

            if stable || shift <= self.tol * self.tol {
                debug!(k = self.n_clusters, iterations = iter + 1, "k-means converged");
                converged = true;
                break;
            }
        }

        if !converged {
            self.centroids = None;
            self.labels = None;
            return Err(TabscoutError::ConvergenceFailure {
                iterations: self.max_iter,
                final_loss: f64::from(shift.sqrt()),
            });
        }

        self.inertia = inertia(x, &centroids, &labels);
        self.labels = Some(labels);
        self.centroids = Some(centroids);

        Ok(())
    }

    /// Predicts cluster labels for new data.
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        let centroids = self
            .centroids
            .as_ref()
            .expect("Model not fitted. Call fit() first.");

        self.assign_labels(x, centroids)
    }
}

impl Clusterer for KMeans {
    fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    fn inertia(&self) -> f32 {
        self.inertia
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> Matrix<f32> {
        // Two well-separated clusters
        Matrix::from_vec(
            6,
            2,
            vec![1.0, 2.0, 1.5, 1.8, 1.0, 0.6, 8.0, 8.0, 9.0, 11.0, 8.5, 9.0],
        )
        .expect("6x2")
    }

    #[test]
    fn test_new() {
        let kmeans = KMeans::new(3);
        assert_eq!(kmeans.n_clusters(), 3);
        assert!(!kmeans.is_fitted());
    }

    #[test]
    fn test_separates_two_blobs() {
        let data = sample_data();
        let mut kmeans = KMeans::new(2).with_random_state(42);
        kmeans.fit(&data).expect("fit should succeed");

        let labels = kmeans.predict(&data);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert_eq!(kmeans.labels().expect("fitted"), labels.as_slice());
    }

    #[test]
    fn test_same_seed_same_labels() {
        let data = sample_data();
        let mut a = KMeans::new(3).with_random_state(5);
        let mut b = KMeans::new(3).with_random_state(5);
        a.fit(&data).expect("fit should succeed");
        b.fit(&data).expect("fit should succeed");
        assert_eq!(a.predict(&data), b.predict(&data));
        assert_eq!(a.inertia(), b.inertia());
    }

    #[test]
    fn test_inertia_zero_when_k_equals_n() {
        let data = sample_data();
        let mut kmeans = KMeans::new(6).with_random_state(1);
        kmeans.fit(&data).expect("fit should succeed");
        assert!(kmeans.inertia() < 1e-6);
    }

    #[test]
    fn test_duplicate_points_do_not_fail_init() {
        let data = Matrix::from_vec(4, 1, vec![1.0, 1.0, 1.0, 1.0]).expect("4x1");
        let mut kmeans = KMeans::new(3).with_random_state(0);
        kmeans.fit(&data).expect("fit should succeed");
        assert_eq!(kmeans.inertia(), 0.0);
    }

    #[test]
    fn test_too_many_clusters() {
        let data = sample_data();
        let mut kmeans = KMeans::new(7);
        assert!(matches!(
            kmeans.fit(&data),
            Err(TabscoutError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_zero_iterations_is_convergence_failure() {
        let data = sample_data();
        let mut kmeans = KMeans::new(2).with_random_state(3).with_max_iter(0);
        assert!(matches!(
            kmeans.fit(&data),
            Err(TabscoutError::ConvergenceFailure { iterations: 0, .. })
        ));
        assert!(!kmeans.is_fitted());
    }

    #[test]
    #[should_panic(expected = "Model not fitted")]
    fn test_predict_unfitted_panics() {
        let _ = KMeans::new(2).predict(&sample_data());
    }
}
