//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use tabscout::prelude::*;
//! ```

pub use crate::cluster::{ClusterSizer, KMeans};
pub use crate::data::DataFrame;
pub use crate::error::TabscoutError;
pub use crate::linear_model::{Lasso, LinearRegression, Ridge};
pub use crate::metrics::{inertia, mae, mse, r_squared};
pub use crate::neighbors::KNeighborsRegressor;
pub use crate::preprocessing::{DatasetScaler, StandardScaler};
pub use crate::primitives::{Matrix, Vector};
pub use crate::recommend::RecommendationSystem;
pub use crate::selection::{RegressionCatalog, RegressionsAnalyzer, RegressorKind};
pub use crate::traits::{Clusterer, Estimator, Transformer, UnsupervisedEstimator};
pub use crate::tree::DecisionTreeRegressor;
