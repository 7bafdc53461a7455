//! K-Nearest Neighbors regression.
//!
//! # Example
//!
//! ```
//! use tabscout::prelude::*;
//! use tabscout::neighbors::KNeighborsRegressor;
//!
//! let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
//! let y = Vector::from_slice(&[1.0, 3.0, 20.0, 22.0]);
//!
//! let mut knn = KNeighborsRegressor::new(2);
//! knn.fit(&x, &y).expect("Valid training data with 4 samples");
//!
//! let test = Matrix::from_vec(1, 1, vec![0.5]).expect("1x1 test matrix");
//! assert!((knn.predict(&test)[0] - 2.0).abs() < 1e-6);
//! ```

use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Distance metric for nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance: `sqrt(sum((x_i - y_i)^2))`
    Euclidean,
    /// Manhattan distance: `sum(|x_i - y_i|)`
    Manhattan,
}

impl DistanceMetric {
    fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

/// K-Nearest Neighbors regressor.
///
/// Predicts the (optionally inverse-distance weighted) mean target of the k
/// closest training samples. Ties in distance keep training order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNeighborsRegressor {
    /// Number of neighbors to use
    k: usize,
    /// Distance metric
    metric: DistanceMetric,
    /// Whether to weight neighbors by inverse distance
    weights: bool,
    /// Training feature matrix (stored during fit)
    x_train: Option<Matrix<f32>>,
    /// Training targets (stored during fit)
    y_train: Option<Vector<f32>>,
}

impl Default for KNeighborsRegressor {
    fn default() -> Self {
        Self::new(5)
    }
}

impl KNeighborsRegressor {
    /// Creates a new regressor using `k` neighbors.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::Euclidean,
            weights: false,
            x_train: None,
            y_train: None,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables inverse-distance weighting.
    #[must_use]
    pub fn with_weights(mut self, weights: bool) -> Self {
        self.weights = weights;
        self
    }

    /// Number of neighbors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    fn predict_one(&self, x_train: &Matrix<f32>, y_train: &Vector<f32>, sample: &[f32]) -> f32 {
        let mut distances: Vec<(f32, usize)> = (0..x_train.n_rows())
            .map(|j| (self.metric.distance(sample, x_train.row_slice(j)), j))
            .collect();

        let k = self.k.min(distances.len());
        if k < distances.len() {
            distances.select_nth_unstable_by(k - 1, |a, b| {
                a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
            });
        }
        let nearest = &distances[..k];

        if self.weights {
            // An exact match dominates every other neighbor.
            if let Some(&(_, j)) = nearest.iter().find(|(d, _)| *d < 1e-10) {
                return y_train[j];
            }
            let (weighted, total) = nearest
                .iter()
                .fold((0.0, 0.0), |(sum, total), &(d, j)| {
                    (sum + y_train[j] / d, total + 1.0 / d)
                });
            weighted / total
        } else {
            nearest.iter().map(|&(_, j)| y_train[j]).sum::<f32>() / k as f32
        }
    }
}

impl Estimator for KNeighborsRegressor {
    /// Stores the training data; kNN defers all work to prediction.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, misaligned or `k` is out of range.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let n_samples = x.n_rows();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }
        if y.len() != n_samples {
            return Err(TabscoutError::dimension_mismatch(
                "samples",
                n_samples,
                y.len(),
            ));
        }
        if self.k == 0 || self.k > n_samples {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "k".to_string(),
                value: self.k.to_string(),
                constraint: format!("1..={n_samples}"),
            });
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(())
    }

    /// Predicts the neighbor mean for every row.
    ///
    /// # Panics
    ///
    /// Panics if called before fit() or with a different feature count.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let (Some(x_train), Some(y_train)) = (self.x_train.as_ref(), self.y_train.as_ref()) else {
            panic!("Model not fitted. Call fit() first.");
        };
        assert_eq!(
            x.n_cols(),
            x_train.n_cols(),
            "Feature dimension mismatch"
        );

        (0..x.n_rows())
            .map(|i| self.predict_one(x_train, y_train, x.row_slice(i)))
            .collect()
    }
}
