//! Choosing a cluster count from the inertia curve.

use crate::error::{Result, TabscoutError};
use crate::primitives::Matrix;
use crate::traits::Clusterer;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inertia of one fitted model per candidate cluster count.
///
/// Points are ordered by increasing count.
#[derive(Debug, Clone, PartialEq)]
pub struct CostCurve {
    points: Vec<(usize, f64)>,
}

impl CostCurve {
    /// Builds a curve from `(cluster_count, inertia)` points.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is empty or counts are not strictly
    /// increasing.
    pub fn new(points: Vec<(usize, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(TabscoutError::validation("cost curve has no points"));
        }
        if points.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(TabscoutError::validation(
                "cost curve counts must be strictly increasing",
            ));
        }
        Ok(Self { points })
    }

    /// The `(cluster_count, inertia)` points.
    #[must_use]
    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    /// Cluster count right after the steepest single-step inertia drop.
    ///
    /// On equal drops the smaller count wins. A curve that never drops, or
    /// has a single point, yields its smallest count.
    ///
    /// # Example
    ///
    /// ```
    /// use tabscout::cluster::CostCurve;
    ///
    /// let costs = [100.0, 40.0, 35.0, 33.0, 32.0, 31.0];
    /// let curve = CostCurve::new((2..).zip(costs).collect()).expect("non-empty");
    /// assert_eq!(curve.elbow(), 3);
    /// ```
    #[must_use]
    pub fn elbow(&self) -> usize {
        let mut elbow = self.points[0].0;
        let mut steepest = 0.0;
        for pair in self.points.windows(2) {
            let drop = pair[0].1 - pair[1].1;
            if drop > steepest {
                steepest = drop;
                elbow = pair[1].0;
            }
        }
        elbow
    }
}

/// Fits a clusterer for every candidate count and records its inertia.
///
/// A failed fit is retried with a fresh seed up to `max_fit_attempts` times
/// before the whole sizing fails.
#[derive(Debug, Clone)]
pub struct ClusterSizer {
    max_clusters: usize,
    max_fit_attempts: usize,
    random_state: Option<u64>,
}

impl ClusterSizer {
    /// Candidate counts run from 2 to `max_clusters` inclusive.
    #[must_use]
    pub fn new(max_clusters: usize) -> Self {
        Self {
            max_clusters,
            max_fit_attempts: 3,
            random_state: None,
        }
    }

    /// Sets how many seeds each candidate gets before sizing fails.
    #[must_use]
    pub fn with_max_fit_attempts(mut self, attempts: usize) -> Self {
        self.max_fit_attempts = attempts.max(1);
        self
    }

    /// Sets the base seed handed to the factory.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Largest candidate count.
    #[must_use]
    pub fn max_clusters(&self) -> usize {
        self.max_clusters
    }

    /// Candidate counts for `n_samples` rows: `2..=min(max_clusters, n_samples)`.
    #[must_use]
    pub fn candidates(&self, n_samples: usize) -> std::ops::RangeInclusive<usize> {
        2..=self.max_clusters.min(n_samples)
    }

    /// Seed for `attempt` of candidate `k`.
    fn seed(&self, k: usize, attempt: usize) -> u64 {
        let base = self.random_state.unwrap_or_else(rand::random);
        base.wrapping_add((k as u64) << 8)
            .wrapping_add(attempt as u64)
    }

    /// Fits `factory(k, seed)` until one attempt succeeds.
    ///
    /// # Errors
    ///
    /// Returns the last fit error once every attempt has failed.
    pub fn fit_with_retry<C, F>(&self, x: &Matrix<f32>, k: usize, factory: &F) -> Result<C>
    where
        C: Clusterer,
        F: Fn(usize, u64) -> C,
    {
        let mut last_err = None;
        for attempt in 0..self.max_fit_attempts {
            let mut model = factory(k, self.seed(k, attempt));
            match model.fit(x) {
                Ok(()) => return Ok(model),
                Err(err) => {
                    warn!(clusters = k, attempt, %err, "clustering fit failed, retrying");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| TabscoutError::validation("no fit attempts configured")))
    }

    /// Computes the inertia curve over every candidate count.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two samples are given, `max_clusters`
    /// is below 2, or any candidate exhausts its attempts.
    pub fn cost_curve<C, F>(&self, x: &Matrix<f32>, factory: F) -> Result<CostCurve>
    where
        C: Clusterer,
        F: Fn(usize, u64) -> C + Sync,
    {
        if self.max_clusters < 2 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "max_clusters".to_string(),
                value: self.max_clusters.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if x.n_rows() < 2 {
            return Err(TabscoutError::validation(
                "at least two samples are needed to size clusters",
            ));
        }

        let candidate = |k: usize| -> Result<(usize, f64)> {
            let model = self.fit_with_retry(x, k, &factory)?;
            let cost = f64::from(model.inertia());
            debug!(clusters = k, inertia = cost, "cluster candidate fitted");
            Ok((k, cost))
        };

        #[cfg(feature = "parallel")]
        let points: Result<Vec<(usize, f64)>> = self
            .candidates(x.n_rows())
            .into_par_iter()
            .map(candidate)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let points: Result<Vec<(usize, f64)>> =
            self.candidates(x.n_rows()).map(candidate).collect();

        CostCurve::new(points?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::KMeans;

    fn curve(costs: &[f64]) -> CostCurve {
        CostCurve::new((2..).zip(costs.iter().copied()).collect()).expect("non-empty")
    }

    fn blobs() -> Matrix<f32> {
        let mut data = Vec::new();
        for center in [0.0f32, 10.0, 20.0] {
            for offset in [-0.2f32, 0.0, 0.2, 0.1] {
                data.push(center + offset);
                data.push(center - offset);
            }
        }
        Matrix::from_vec(12, 2, data).expect("12x2")
    }

    #[test]
    fn test_elbow_after_largest_drop() {
        assert_eq!(curve(&[100.0, 40.0, 35.0, 33.0, 32.0, 31.0]).elbow(), 3);
    }

    #[test]
    fn test_elbow_later_drop() {
        assert_eq!(curve(&[50.0, 45.0, 10.0, 9.0]).elbow(), 4);
    }

    #[test]
    fn test_elbow_flat_curve_returns_smallest() {
        assert_eq!(curve(&[5.0, 5.0, 5.0]).elbow(), 2);
    }

    #[test]
    fn test_elbow_single_point() {
        assert_eq!(curve(&[7.0]).elbow(), 2);
    }

    #[test]
    fn test_elbow_tie_prefers_smaller_count() {
        assert_eq!(curve(&[30.0, 20.0, 10.0]).elbow(), 3);
    }

    #[test]
    fn test_curve_rejects_unordered_points() {
        assert!(CostCurve::new(vec![(3, 1.0), (2, 2.0)]).is_err());
        assert!(CostCurve::new(vec![]).is_err());
    }

    #[test]
    fn test_cost_curve_finds_three_blobs() {
        let sizer = ClusterSizer::new(6).with_random_state(11);
        let curve = sizer
            .cost_curve(&blobs(), |k, seed| KMeans::new(k).with_random_state(seed))
            .expect("blobs cluster");

        assert_eq!(curve.points().len(), 5);
        assert_eq!(curve.points()[0].0, 2);
        assert_eq!(curve.elbow(), 3);
    }

    #[test]
    fn test_candidates_clamped_to_samples() {
        let sizer = ClusterSizer::new(30);
        assert_eq!(sizer.candidates(4), 2..=4);
    }

    #[test]
    fn test_exhausted_attempts_surface_convergence_failure() {
        let sizer = ClusterSizer::new(3).with_max_fit_attempts(2);
        let result = sizer.cost_curve(&blobs(), |k, seed| {
            KMeans::new(k).with_random_state(seed).with_max_iter(0)
        });
        assert!(matches!(
            result,
            Err(TabscoutError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_max_clusters_below_two_rejected() {
        let sizer = ClusterSizer::new(1);
        let result = sizer.cost_curve(&blobs(), |k, seed| KMeans::new(k).with_random_state(seed));
        assert!(result.is_err());
    }
}
