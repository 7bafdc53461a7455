//! Combinatorial regression model selection.
//!
//! - [`RegressionCatalog`] names the algorithms to try.
//! - [`feature_combinations`] enumerates every non-empty predictor subset.
//! - [`evaluate_models`] fits candidates and records holdout error and fitness.
//! - [`unified_scores`] folds both metrics into one comparable number.
//! - [`RegressionsAnalyzer`] runs the whole sweep and keeps the winner.

mod analyzer;
mod catalog;
mod combinations;
mod evaluator;
mod normalize;

pub use analyzer::{BestModel, RegressionsAnalyzer};
pub use catalog::{RegressionCatalog, RegressorKind};
pub use combinations::{combination_count, feature_combinations, MAX_PREDICTORS};
pub use evaluator::{evaluate_model, evaluate_models, EvaluationOutcome, EvaluationRecord};
pub use normalize::{normalize_by_max, unified_scores, BeneficialTransform};
