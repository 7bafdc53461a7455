//! Run configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use tabscout::config::TabscoutConfig;
//!
//! let config: TabscoutConfig = serde_json::from_str(r#"{
//!     "analysis": { "predictors": ["Year", "Genre"], "test_size": 0.25 },
//!     "recommend": { "count": 5 }
//! }"#).expect("valid json");
//!
//! assert_eq!(config.analysis.targets, vec!["Global_Sales".to_string()]);
//! assert_eq!(config.recommend.max_clusters, 30);
//! config.validate().expect("valid config");
//! ```

use crate::data::{cleanse, DataFrame};
use crate::error::{Result, TabscoutError};
use crate::selection::{RegressionCatalog, RegressorKind, MAX_PREDICTORS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabscoutConfig {
    /// Regression sweep settings.
    pub analysis: AnalysisConfig,
    /// Recommendation settings.
    pub recommend: RecommendConfig,
}

impl TabscoutConfig {
    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks both sections.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.recommend.validate()
    }
}

fn default_targets() -> Vec<String> {
    vec!["Global_Sales".to_string()]
}

fn default_algorithms() -> Vec<RegressorKind> {
    RegressorKind::ALL.to_vec()
}

fn default_test_size() -> f32 {
    0.2
}

fn default_split_seed() -> Option<u64> {
    Some(42)
}

fn default_drop_columns() -> Vec<String> {
    ["Rank", "Name", "NA_Sales", "EU_Sales", "JP_Sales", "Other_Sales"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_mode_columns() -> Vec<String> {
    vec!["Year".to_string()]
}

fn default_sort_column() -> Option<String> {
    Some("Global_Sales".to_string())
}

/// Settings for [`RegressionsAnalyzer`](crate::selection::RegressionsAnalyzer)
/// and the cleansing applied before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Predictor columns. Empty means every column left after dropping,
    /// minus the targets.
    #[serde(default)]
    pub predictors: Vec<String>,
    /// Target columns; the sweep regresses on the first.
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,
    /// Catalog, in evaluation order.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<RegressorKind>,
    /// Holdout fraction, in (0, 1).
    #[serde(default = "default_test_size")]
    pub test_size: f32,
    /// Split seed; `null` draws a fresh one per run.
    #[serde(default = "default_split_seed")]
    pub random_state: Option<u64>,
    /// Columns removed before analysis.
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
    /// Columns whose missing cells get the column mean.
    #[serde(default)]
    pub mean_columns: Vec<String>,
    /// Columns whose missing cells get the most frequent value.
    #[serde(default = "default_mode_columns")]
    pub mode_columns: Vec<String>,
    /// Numeric column to sort rows by, descending.
    #[serde(default = "default_sort_column")]
    pub sort_column: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            predictors: Vec::new(),
            targets: default_targets(),
            algorithms: default_algorithms(),
            test_size: default_test_size(),
            random_state: default_split_seed(),
            drop_columns: default_drop_columns(),
            mean_columns: Vec::new(),
            mode_columns: default_mode_columns(),
            sort_column: default_sort_column(),
        }
    }
}

impl AnalysisConfig {
    /// The configured catalog.
    #[must_use]
    pub fn catalog(&self) -> RegressionCatalog {
        RegressionCatalog::new(self.algorithms.clone())
    }

    /// Configured predictors, or every non-target column of `dataset`.
    #[must_use]
    pub fn resolve_predictors(&self, dataset: &DataFrame) -> Vec<String> {
        if !self.predictors.is_empty() {
            return self.predictors.clone();
        }
        dataset
            .column_names()
            .into_iter()
            .filter(|name| !self.targets.iter().any(|t| t == name))
            .map(str::to_string)
            .collect()
    }

    /// Drops, imputes and sorts `dataset` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a named column is missing, or the sort column is
    /// categorical.
    pub fn cleanse(&self, dataset: &mut DataFrame) -> Result<()> {
        cleanse::drop_columns(dataset, &self.drop_columns)?;
        cleanse::fill_mean(dataset, &self.mean_columns)?;
        cleanse::fill_mode(dataset, &self.mode_columns)?;
        if let Some(column) = &self.sort_column {
            dataset.sort_by(column, true)?;
        }
        Ok(())
    }

    /// Checks the sweep settings.
    ///
    /// # Errors
    ///
    /// Rejects an empty or oversized predictor list, an empty target list or
    /// catalog, and a holdout fraction outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        if self.predictors.is_empty() {
            return Err(TabscoutError::EmptyPredictors);
        }
        if self.predictors.len() > MAX_PREDICTORS {
            return Err(TabscoutError::TooManyPredictors {
                count: self.predictors.len(),
                max: MAX_PREDICTORS,
            });
        }
        if self.targets.is_empty() {
            return Err(TabscoutError::validation("target column list is empty"));
        }
        if self.algorithms.is_empty() {
            return Err(TabscoutError::validation("algorithm catalog is empty"));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "test_size".to_string(),
                value: self.test_size.to_string(),
                constraint: "in (0, 1)".to_string(),
            });
        }
        Ok(())
    }
}

fn default_id_column() -> String {
    "Rank".to_string()
}

fn default_name_column() -> String {
    "Name".to_string()
}

fn default_features() -> Vec<String> {
    ["Platform", "Genre", "Publisher"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_max_clusters() -> usize {
    30
}

fn default_count() -> usize {
    10
}

fn default_fit_attempts() -> usize {
    3
}

/// Settings for [`RecommendationSystem`](crate::recommend::RecommendationSystem).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Unique identifier column.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Column printed alongside the features.
    #[serde(default = "default_name_column")]
    pub name_column: String,
    /// Clustering features.
    #[serde(default = "default_features")]
    pub features: Vec<String>,
    /// Largest candidate cluster count.
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,
    /// Peers returned per query.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Clustering and sampling seed; `null` randomizes sampling.
    #[serde(default)]
    pub random_state: Option<u64>,
    /// Seeds tried per clustering fit.
    #[serde(default = "default_fit_attempts")]
    pub max_fit_attempts: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            name_column: default_name_column(),
            features: default_features(),
            max_clusters: default_max_clusters(),
            count: default_count(),
            random_state: None,
            max_fit_attempts: default_fit_attempts(),
        }
    }
}

impl RecommendConfig {
    /// Checks the recommendation settings.
    ///
    /// # Errors
    ///
    /// Rejects empty features, `max_clusters < 2`, `count == 0` and
    /// `max_fit_attempts == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(TabscoutError::validation("clustering feature list is empty"));
        }
        if self.max_clusters < 2 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "max_clusters".to_string(),
                value: self.max_clusters.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if self.count == 0 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "count".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.max_fit_attempts == 0 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "max_fit_attempts".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }
}
