//! Fits candidates on a training split and scores them on the holdout.

use crate::metrics::{mse, r_squared};
use crate::model_selection::DatasetSplit;
use crate::traits::{BoxedEstimator, Estimator};
use std::fmt;

/// Raw holdout metrics of one fitted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRecord {
    /// Mean squared error (lower is better).
    pub error: f64,
    /// Coefficient of determination (higher is better, may be negative).
    pub fitness: f64,
}

impl EvaluationRecord {
    /// Number of metrics in a record.
    pub const N_METRICS: usize = 2;

    /// Metrics in normalization order: error, then fitness.
    #[must_use]
    pub fn metrics(&self) -> [f64; Self::N_METRICS] {
        [self.error, self.fitness]
    }
}

impl fmt::Display for EvaluationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.error, self.fitness)
    }
}

/// Result of evaluating one (subset, algorithm) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    /// The candidate fitted and produced finite metrics.
    Scored(EvaluationRecord),
    /// Fitting failed or produced non-finite metrics.
    Failed(String),
}

impl EvaluationOutcome {
    /// The record, if the pair was scored.
    #[must_use]
    pub fn record(&self) -> Option<&EvaluationRecord> {
        match self {
            EvaluationOutcome::Scored(record) => Some(record),
            EvaluationOutcome::Failed(_) => None,
        }
    }

    /// True if the pair failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, EvaluationOutcome::Failed(_))
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationOutcome::Scored(record) => record.fmt(f),
            EvaluationOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Fits `model` on the training view and scores it on the holdout view.
///
/// Never returns an error: failures are captured in the outcome so a sweep
/// can continue past them.
pub fn evaluate_model(model: &mut dyn Estimator, split: &DatasetSplit) -> EvaluationOutcome {
    if let Err(err) = model.fit(&split.x_train, &split.y_train) {
        return EvaluationOutcome::Failed(err.to_string());
    }

    let predicted = model.predict(&split.x_test);
    let error = f64::from(mse(&predicted, &split.y_test));
    let fitness = f64::from(r_squared(&predicted, &split.y_test));

    if !error.is_finite() || !fitness.is_finite() {
        return EvaluationOutcome::Failed(format!(
            "non-finite holdout metrics (mse={error}, r2={fitness})"
        ));
    }

    EvaluationOutcome::Scored(EvaluationRecord { error, fitness })
}

/// Evaluates every candidate on the same split, in candidate order.
///
/// Candidates are left fitted; re-instantiate before using another subset.
pub fn evaluate_models(
    models: &mut [BoxedEstimator],
    split: &DatasetSplit,
) -> Vec<EvaluationOutcome> {
    models
        .iter_mut()
        .map(|model| evaluate_model(model.as_mut(), split))
        .collect()
}
