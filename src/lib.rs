//! Tabscout: exhaustive regression model selection and cluster-based peer
//! recommendation for tabular data.
//!
//! Two engines share one dataset representation:
//!
//! - [`selection::RegressionsAnalyzer`] fits every catalog algorithm on every
//!   non-empty subset of the predictor columns, folds each pair's holdout
//!   error and fitness into one unified score and keeps the best pair.
//! - [`recommend::RecommendationSystem`] clusters rows with K-Means (the
//!   cluster count picked at the elbow of the inertia curve) and samples
//!   peers from a query row's cluster.
//!
//! # Quick Start
//!
//! ```
//! use tabscout::prelude::*;
//!
//! // Create training data (y = 2*x + 1)
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).expect("well-conditioned data");
//!
//! let r2 = model.score(&x, &y);
//! assert!(r2 > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: DataFrame, CSV ingestion and cleansing
//! - [`preprocessing`]: Scalers, label encoding and the dataset scaler
//! - [`linear_model`]: Linear, Ridge and Lasso regression
//! - [`tree`]: Decision tree regression
//! - [`neighbors`]: K-nearest-neighbors regression
//! - [`model_selection`]: Train/test splitting
//! - [`metrics`]: Evaluation metrics
//! - [`selection`]: Regression catalog, evaluator, normalization and analyzer
//! - [`cluster`]: K-Means and cluster-count selection
//! - [`recommend`]: Cluster-based recommendations
//! - [`config`]: JSON run configuration

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod neighbors;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod recommend;
pub mod selection;
pub mod traits;
pub mod tree;

pub use error::{Result, TabscoutError};
pub use primitives::{Matrix, Vector};
pub use traits::{Clusterer, Estimator, Transformer, UnsupervisedEstimator};
