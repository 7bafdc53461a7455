//! Cluster-based peer recommendations.
//!
//! [`RecommendationSystem::build`] sizes and fits a K-Means model on the
//! chosen feature columns and records each row's cluster in a side table
//! keyed by the identifier column. [`RecommendationSystem::recommend`] then
//! samples other rows from the query row's cluster.
//!
//! # Quick Start
//!
//! ```
//! use tabscout::data::{Column, DataFrame};
//! use tabscout::primitives::Vector;
//! use tabscout::recommend::RecommendationSystem;
//!
//! // Three well separated groups of five rows.
//! let ids: Vec<f32> = (1..=15).map(|i| i as f32).collect();
//! let x: Vec<f32> = (0..15).map(|i| (i / 5) as f32 * 50.0 + (i % 5) as f32 * 0.1).collect();
//! let dataset = DataFrame::new(vec![
//!     ("Rank".to_string(), Column::Numeric(Vector::from_vec(ids))),
//!     ("x".to_string(), Column::Numeric(Vector::from_vec(x))),
//! ]).expect("aligned columns");
//!
//! let mut system = RecommendationSystem::new(dataset, "Rank")
//!     .with_max_clusters(5)
//!     .with_random_state(7);
//! system.build(&["x"]).expect("build succeeds");
//!
//! let peers = system.recommend("2", 3).expect("cluster has 4 peers");
//! assert_eq!(peers.n_rows(), 3);
//! ```

use crate::cluster::{ClusterSizer, CostCurve, KMeans};
use crate::data::{Column, DataFrame};
use crate::error::{Result, TabscoutError};
use crate::preprocessing::DatasetScaler;
use crate::traits::{Clusterer, UnsupervisedEstimator};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Largest magnitude below which every integer has an exact `f32`.
const F32_EXACT_INTEGER_LIMIT: f32 = 16_777_216.0;

/// Output of a successful build.
#[derive(Debug, Clone)]
struct ClusterIndex {
    feature_columns: Vec<String>,
    curve: CostCurve,
    model: KMeans,
    /// Cluster label per row, row-aligned with the dataset.
    labels: Vec<usize>,
    /// Identifier -> row position.
    rows_by_id: HashMap<String, usize>,
}

/// Recommends rows that share a cluster with a query row.
///
/// The dataset is never modified; cluster labels live in a side table that
/// each [`build`](Self::build) replaces.
#[derive(Debug, Clone)]
pub struct RecommendationSystem {
    /// Rows handed back to callers.
    records: DataFrame,
    /// Row-aligned frame the clustering features are read from.
    features: DataFrame,
    id_column: String,
    max_clusters: usize,
    max_fit_attempts: usize,
    random_state: Option<u64>,
    index: Option<ClusterIndex>,
}

impl RecommendationSystem {
    /// Clusters and returns rows of the same `dataset`.
    pub fn new(dataset: DataFrame, id_column: &str) -> Self {
        Self {
            features: dataset.clone(),
            records: dataset,
            id_column: id_column.to_string(),
            max_clusters: 30,
            max_fit_attempts: 3,
            random_state: None,
            index: None,
        }
    }

    /// Clusters on the scaled view but returns rows of the original view.
    pub fn from_scaler(scaler: &DatasetScaler, id_column: &str) -> Self {
        Self {
            features: scaler.scaled().clone(),
            ..Self::new(scaler.original().clone(), id_column)
        }
    }

    /// Sets the largest candidate cluster count (default 30).
    #[must_use]
    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    /// Sets how many seeds each clustering fit gets (default 3).
    #[must_use]
    pub fn with_max_fit_attempts(mut self, attempts: usize) -> Self {
        self.max_fit_attempts = attempts;
        self
    }

    /// Fixes clustering and sampling seeds; without it results vary per run.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// The rows recommendations are drawn from.
    #[must_use]
    pub fn records(&self) -> &DataFrame {
        &self.records
    }

    /// Identifier column name.
    #[must_use]
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Clusters the dataset on `feature_columns`, replacing any prior build.
    ///
    /// # Errors
    ///
    /// Fails before clustering if no feature is given, a column is missing or
    /// categorical, the frames are not row-aligned, or the identifier column
    /// repeats a value. Fails afterwards if a clustering fit exhausts its
    /// attempts.
    pub fn build<S: AsRef<str>>(&mut self, feature_columns: &[S]) -> Result<()> {
        self.index = None;

        if feature_columns.is_empty() {
            return Err(TabscoutError::validation(
                "at least one clustering feature is required",
            ));
        }
        if self.features.n_rows() != self.records.n_rows() {
            return Err(TabscoutError::dimension_mismatch(
                "rows",
                self.records.n_rows(),
                self.features.n_rows(),
            ));
        }
        let rows_by_id = self.index_identifiers()?;
        let x = self.features.select_matrix(feature_columns)?;

        let mut sizer = ClusterSizer::new(self.max_clusters).with_max_fit_attempts(self.max_fit_attempts);
        if let Some(seed) = self.random_state {
            sizer = sizer.with_random_state(seed);
        }
        let factory = |k: usize, seed: u64| KMeans::new(k).with_random_state(seed);

        let curve = sizer.cost_curve(&x, factory)?;
        let n_clusters = curve.elbow();
        debug!(curve = ?curve.points(), "inertia curve");

        let model = sizer.fit_with_retry(&x, n_clusters, &factory)?;
        let labels = model.predict(&x);
        info!(clusters = n_clusters, rows = labels.len(), "recommendation clusters built");

        self.index = Some(ClusterIndex {
            feature_columns: feature_columns
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            curve,
            model,
            labels,
            rows_by_id,
        });
        Ok(())
    }

    fn index_identifiers(&self) -> Result<HashMap<String, usize>> {
        let ids = self.records.column(&self.id_column)?;
        if let Column::Numeric(values) = ids {
            if values.iter().any(|v| v.abs() >= F32_EXACT_INTEGER_LIMIT) {
                warn!(
                    column = %self.id_column,
                    "numeric identifiers exceed f32 precision; load the column as text"
                );
            }
        }
        let mut rows_by_id = HashMap::with_capacity(ids.len());
        for row in 0..ids.len() {
            let id = ids.value(row).to_string();
            if rows_by_id.insert(id.clone(), row).is_some() {
                return Err(TabscoutError::DuplicateIdentifier {
                    column: self.id_column.clone(),
                    id,
                });
            }
        }
        Ok(rows_by_id)
    }

    fn index(&self) -> Result<&ClusterIndex> {
        self.index
            .as_ref()
            .ok_or_else(|| TabscoutError::NotFitted("RecommendationSystem: call build() first".into()))
    }

    /// Row position of identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build and
    /// [`TabscoutError::RecordNotFound`] for unknown identifiers.
    pub fn row_of(&self, id: &str) -> Result<usize> {
        self.index()?
            .rows_by_id
            .get(id)
            .copied()
            .ok_or_else(|| TabscoutError::RecordNotFound(id.to_string()))
    }

    /// Identifier of the row at `row`, as used by [`recommend`](Self::recommend).
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier column is missing or `row` is out
    /// of range.
    pub fn id_of(&self, row: usize) -> Result<String> {
        if row >= self.records.n_rows() {
            return Err(TabscoutError::RecordNotFound(format!("row {row}")));
        }
        Ok(self.records.value(row, &self.id_column)?.to_string())
    }

    /// Cluster label of identifier `id`.
    ///
    /// # Errors
    ///
    /// See [`row_of`](Self::row_of).
    pub fn label_of(&self, id: &str) -> Result<usize> {
        let row = self.row_of(id)?;
        Ok(self.index()?.labels[row])
    }

    /// Query row and the other rows sharing its cluster, in row order.
    fn peers(&self, id: &str) -> Result<(usize, Vec<usize>)> {
        let row = self.row_of(id)?;
        let labels = &self.index()?.labels;
        let label = labels[row];
        let peers = labels
            .iter()
            .enumerate()
            .filter(|&(r, &l)| r != row && l == label)
            .map(|(r, _)| r)
            .collect();
        Ok((row, peers))
    }

    /// Generator for sampling the peers of `row`; a fixed seed is XORed with
    /// the row.
    fn sampling_rng(&self, row: usize) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed ^ row as u64),
            None => StdRng::from_entropy(),
        }
    }

    fn sample(&self, row: usize, mut peers: Vec<usize>, count: usize) -> DataFrame {
        let mut rng = self.sampling_rng(row);
        let (chosen, _) = peers.partial_shuffle(&mut rng, count);
        self.records.take_rows(chosen)
    }

    /// Samples exactly `count` other rows from the cluster of `id`.
    ///
    /// Sampling is without replacement; order is unspecified. With a fixed
    /// random state repeated calls return the same rows.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::RecordNotFound`] for unknown identifiers and
    /// [`TabscoutError::InsufficientPeers`] when the cluster holds fewer than
    /// `count` other rows.
    pub fn recommend(&self, id: &str, count: usize) -> Result<DataFrame> {
        let (row, peers) = self.peers(id)?;
        if peers.len() < count {
            return Err(TabscoutError::InsufficientPeers {
                requested: count,
                available: peers.len(),
            });
        }
        Ok(self.sample(row, peers, count))
    }

    /// Like [`recommend`](Self::recommend) but returns `min(count, peers)`
    /// rows instead of failing on a small cluster.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::RecordNotFound`] for unknown identifiers.
    pub fn recommend_up_to(&self, id: &str, count: usize) -> Result<DataFrame> {
        let (row, peers) = self.peers(id)?;
        let count = count.min(peers.len());
        Ok(self.sample(row, peers, count))
    }

    /// Cluster label of every row.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build.
    pub fn labels(&self) -> Result<&[usize]> {
        Ok(&self.index()?.labels)
    }

    /// Row count of each cluster, indexed by label.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build.
    pub fn cluster_sizes(&self) -> Result<Vec<usize>> {
        let index = self.index()?;
        let mut sizes = vec![0; index.model.n_clusters()];
        for &label in &index.labels {
            sizes[label] += 1;
        }
        Ok(sizes)
    }

    /// The chosen cluster count.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build.
    pub fn n_clusters(&self) -> Result<usize> {
        Ok(self.index()?.model.n_clusters())
    }

    /// The inertia curve the cluster count was chosen from.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build.
    pub fn cost_curve(&self) -> Result<&CostCurve> {
        Ok(&self.index()?.curve)
    }

    /// Feature columns of the current build.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before a build.
    pub fn feature_columns(&self) -> Result<&[String]> {
        Ok(&self.index()?.feature_columns)
    }
}

#[cfg(test)]
#[path = "recommend_tests.rs"]
mod tests;
