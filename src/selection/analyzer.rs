//! The exhaustive (feature subset × algorithm) sweep.

use super::catalog::{RegressionCatalog, RegressorKind};
use super::combinations::feature_combinations;
use super::evaluator::{evaluate_model, EvaluationOutcome};
use super::normalize::unified_scores;
use crate::data::DataFrame;
use crate::error::{Result, TabscoutError};
use crate::model_selection::TrainTestSplitter;
use crate::preprocessing::DatasetScaler;
use crate::primitives::{Matrix, Vector};
use crate::traits::BoxedEstimator;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The winning pair, refit on its training partition.
pub struct BestModel {
    predictors: Vec<String>,
    kind: RegressorKind,
    score: f64,
    model: BoxedEstimator,
}

impl BestModel {
    /// Columns of the winning subset.
    #[must_use]
    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Algorithm of the winning pair.
    #[must_use]
    pub fn kind(&self) -> RegressorKind {
        self.kind
    }

    /// Unified score of the winning pair.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Predicts with the refit model; `x` must hold the winning columns.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        self.model.predict(x)
    }
}

impl fmt::Debug for BestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestModel")
            .field("predictors", &self.predictors)
            .field("kind", &self.kind)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

/// Everything `run` produces.
#[derive(Debug)]
struct Analysis {
    target: String,
    combinations: Vec<Vec<String>>,
    outcomes: Vec<EvaluationOutcome>,
    scores: Vec<f64>,
    splitter: TrainTestSplitter,
    best: BestModel,
}

/// Exhaustive model selection over feature subsets and algorithms.
///
/// Every non-empty subset of the predictors is paired with every catalog
/// algorithm. Pairs are evaluated independently on one shared row split,
/// their raw metrics folded into unified scores, and the highest score wins
/// (first in subset-then-algorithm order on ties).
///
/// Results are row-major: pair `(subset i, algorithm j)` lives at index
/// `i * catalog.len() + j` of [`raw_tests`](Self::raw_tests).
///
/// # Example
///
/// ```
/// use tabscout::data::{Column, DataFrame};
/// use tabscout::primitives::Vector;
/// use tabscout::selection::{RegressionCatalog, RegressionsAnalyzer, RegressorKind};
///
/// let x: Vec<f32> = (0..20).map(|i| i as f32).collect();
/// let noise: Vec<f32> = (0..20).map(|i| ((i * 7) % 5) as f32).collect();
/// let y: Vec<f32> = x.iter().map(|v| 3.0 * v + 1.0).collect();
/// let dataset = DataFrame::new(vec![
///     ("signal".to_string(), Column::Numeric(Vector::from_vec(x))),
///     ("noise".to_string(), Column::Numeric(Vector::from_vec(noise))),
///     ("target".to_string(), Column::Numeric(Vector::from_vec(y))),
/// ]).expect("aligned columns");
///
/// let mut analyzer = RegressionsAnalyzer::new(
///     dataset,
///     RegressionCatalog::new(vec![RegressorKind::LinearRegression]),
///     &["signal", "noise"],
///     &["target"],
/// );
/// analyzer.run().expect("sweep succeeds");
///
/// let best = analyzer.best_model().expect("run completed");
/// assert!(best.predictors().contains(&"signal".to_string()));
/// ```
#[derive(Debug)]
pub struct RegressionsAnalyzer {
    dataset: DataFrame,
    catalog: RegressionCatalog,
    predictors: Vec<String>,
    targets: Vec<String>,
    test_size: f32,
    random_state: Option<u64>,
    analysis: Option<Analysis>,
}

impl RegressionsAnalyzer {
    /// Creates an analyzer over an already scaled dataset.
    pub fn new<S: AsRef<str>, T: AsRef<str>>(
        dataset: DataFrame,
        catalog: RegressionCatalog,
        predictors: &[S],
        targets: &[T],
    ) -> Self {
        Self {
            dataset,
            catalog,
            predictors: predictors.iter().map(|s| s.as_ref().to_string()).collect(),
            targets: targets.iter().map(|s| s.as_ref().to_string()).collect(),
            test_size: 0.2,
            random_state: Some(42),
            analysis: None,
        }
    }

    /// Creates an analyzer over the scaled view of `scaler`.
    pub fn from_scaler<S: AsRef<str>, T: AsRef<str>>(
        scaler: &DatasetScaler,
        catalog: RegressionCatalog,
        predictors: &[S],
        targets: &[T],
    ) -> Self {
        Self::new(scaler.scaled().clone(), catalog, predictors, targets)
    }

    /// Sets the holdout fraction (default 0.2).
    #[must_use]
    pub fn with_test_size(mut self, test_size: f32) -> Self {
        self.test_size = test_size;
        self
    }

    /// Sets the split seed (default 42). `None` draws one seed per run.
    #[must_use]
    pub fn with_random_state(mut self, random_state: Option<u64>) -> Self {
        self.random_state = random_state;
        self
    }

    /// Runs the sweep, replacing any previous results.
    ///
    /// # Errors
    ///
    /// Fails before any fitting if the predictor list is empty or too long,
    /// no target or algorithm is configured, a column is missing or not
    /// numeric, or the split is invalid. Fails after the sweep with
    /// [`TabscoutError::NoViableModel`] if every pair failed, or with the
    /// refit error if the winner cannot be refit.
    pub fn run(&mut self) -> Result<()> {
        self.analysis = None;

        let combinations = feature_combinations(&self.predictors)?;
        let target = self.validate()?;

        let seed = self.random_state.unwrap_or_else(rand::random);
        let splitter = TrainTestSplitter::new(self.dataset.n_rows(), self.test_size, Some(seed))?;

        let kinds = self.catalog.kinds();
        let n_pairs = combinations.len() * kinds.len();
        info!(
            subsets = combinations.len(),
            algorithms = kinds.len(),
            pairs = n_pairs,
            "evaluating regression pairs"
        );

        let evaluate = |pair: usize| -> EvaluationOutcome {
            let subset = &combinations[pair / kinds.len()];
            let kind = kinds[pair % kinds.len()];
            let outcome = match splitter.split(&self.dataset, subset, target) {
                Ok(split) => evaluate_model(kind.instantiate().as_mut(), &split),
                Err(err) => EvaluationOutcome::Failed(err.to_string()),
            };
            match &outcome {
                EvaluationOutcome::Scored(record) => {
                    debug!(?subset, %kind, mse = record.error, r2 = record.fitness, "pair scored");
                }
                EvaluationOutcome::Failed(reason) => {
                    warn!(?subset, %kind, %reason, "pair failed, excluded from selection");
                }
            }
            outcome
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<EvaluationOutcome> = (0..n_pairs).into_par_iter().map(evaluate).collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<EvaluationOutcome> = (0..n_pairs).map(evaluate).collect();

        let scores = unified_scores(&outcomes);

        let winner = select_winner(&outcomes, &scores)
            .ok_or(TabscoutError::NoViableModel { pairs: n_pairs })?;
        let best_score = scores[winner];

        let predictors = combinations[winner / kinds.len()].clone();
        let kind = kinds[winner % kinds.len()];
        let split = splitter.split(&self.dataset, &predictors, target)?;
        let mut model = kind.instantiate();
        model.fit(&split.x_train, &split.y_train)?;

        info!(?predictors, %kind, score = best_score, "selected best model");

        self.analysis = Some(Analysis {
            target: target.to_string(),
            combinations,
            outcomes,
            scores,
            splitter,
            best: BestModel {
                predictors,
                kind,
                score: best_score,
                model,
            },
        });
        Ok(())
    }

    /// Checks columns and catalog; returns the regression target.
    fn validate(&self) -> Result<&str> {
        if self.catalog.is_empty() {
            return Err(TabscoutError::validation("algorithm catalog is empty"));
        }
        let Some(target) = self.targets.first() else {
            return Err(TabscoutError::validation("target column list is empty"));
        };
        if self.targets.len() > 1 {
            warn!(
                targets = ?self.targets,
                "multiple target columns given, regressing on the first"
            );
        }
        for name in &self.targets {
            self.dataset.numeric(name)?;
        }
        for name in &self.predictors {
            self.dataset.numeric(name)?;
        }
        Ok(target)
    }

    fn analysis(&self) -> Result<&Analysis> {
        self.analysis
            .as_ref()
            .ok_or_else(|| TabscoutError::NotFitted("RegressionsAnalyzer: call run() first".into()))
    }

    /// Feature subsets in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run).
    pub fn combinations(&self) -> Result<&[Vec<String>]> {
        Ok(&self.analysis()?.combinations)
    }

    /// Unified scores, one slice per subset, each indexed by algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run).
    pub fn raw_scores(&self) -> Result<Vec<&[f64]>> {
        let analysis = self.analysis()?;
        Ok(analysis.scores.chunks(self.catalog.len()).collect())
    }

    /// Raw evaluation outcomes, row-major over (subset, algorithm).
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run).
    pub fn raw_tests(&self) -> Result<&[EvaluationOutcome]> {
        Ok(&self.analysis()?.outcomes)
    }

    /// The winning pair and its refit model.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run).
    pub fn best_model(&self) -> Result<&BestModel> {
        Ok(&self.analysis()?.best)
    }

    /// Holdout targets and the best model's predictions for them.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run).
    pub fn holdout_predictions(&self) -> Result<(Vector<f32>, Vector<f32>)> {
        let analysis = self.analysis()?;
        let best = &analysis.best;
        let split = analysis
            .splitter
            .split(&self.dataset, &best.predictors, &analysis.target)?;
        let predicted = best.predict(&split.x_test);
        Ok((split.y_test, predicted))
    }

    /// Writes the per-pair scores report.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run), or an
    /// I/O error.
    pub fn write_scores<W: Write>(&self, mut out: W) -> Result<()> {
        let analysis = self.analysis()?;
        let kinds = self.catalog.kinds();

        for (pair, outcome) in analysis.outcomes.iter().enumerate() {
            let subset = &analysis.combinations[pair / kinds.len()];
            writeln!(out, "Combination: [{}]", subset.join(", "))?;
            writeln!(out, "Regression: {}", kinds[pair % kinds.len()])?;
            writeln!(out, "Score: {}", analysis.scores[pair])?;
            writeln!(out, "Raw scores: {outcome}")?;
            writeln!(out, "***")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the holdout predictions report of the best model.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::NotFitted`] before [`run`](Self::run), or an
    /// I/O error.
    pub fn write_predictions<W: Write>(&self, mut out: W) -> Result<()> {
        let best = self.best_model()?;
        let (actual, predicted) = self.holdout_predictions()?;

        writeln!(
            out,
            "Predictions for {} on [{}]:",
            best.kind,
            best.predictors.join(", ")
        )?;
        for (a, p) in actual.iter().zip(predicted.iter()) {
            writeln!(out, "Actual value: {a}")?;
            writeln!(out, "Predicted value: {p}")?;
            writeln!(out, "***")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the scores report to `path`.
    ///
    /// # Errors
    ///
    /// See [`write_scores`](Self::write_scores); also fails if the file
    /// cannot be created.
    pub fn dump_scores<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.analysis()?;
        self.write_scores(BufWriter::new(File::create(path)?))
    }

    /// Writes the predictions report to `path`.
    ///
    /// # Errors
    ///
    /// See [`write_predictions`](Self::write_predictions); also fails if the
    /// file cannot be created.
    pub fn dump_predictions<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.analysis()?;
        self.write_predictions(BufWriter::new(File::create(path)?))
    }
}

/// Index of the highest-scoring non-failed pair; ties keep the earliest.
pub(crate) fn select_winner(outcomes: &[EvaluationOutcome], scores: &[f64]) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (pair, outcome) in outcomes.iter().enumerate() {
        if outcome.is_failed() {
            continue;
        }
        if winner.map_or(true, |best| scores[pair] > scores[best]) {
            winner = Some(pair);
        }
    }
    winner
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
