//! Folding heterogeneous metrics into one comparable score per pair.
//!
//! Each metric is first mapped onto a non-negative "beneficial" scale where
//! larger is better, then divided by its maximum so it lands in `[0, 1]`.
//! The unified score is the sum over metrics, so it ranges over
//! `[0, EvaluationRecord::N_METRICS]`.

use super::evaluator::{EvaluationOutcome, EvaluationRecord};
use serde::{Deserialize, Serialize};

/// How a raw metric sequence becomes a beneficial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeneficialTransform {
    /// For errors: `max(raw) - raw[i]`. The lowest error gets the largest
    /// value, the highest error gets 0.
    InvertForLowerIsBetter,
    /// For bounded fitness scores that may go negative:
    /// `raw[i] + |min(raw[j] - 1)| - 1`.
    ShiftForBoundedFitness,
}

impl BeneficialTransform {
    /// Transform applied to each metric of an [`EvaluationRecord`], in
    /// [`EvaluationRecord::metrics`] order.
    pub const FOR_RECORD: [BeneficialTransform; EvaluationRecord::N_METRICS] = [
        BeneficialTransform::InvertForLowerIsBetter,
        BeneficialTransform::ShiftForBoundedFitness,
    ];

    /// Maps a raw sequence to its beneficial counterpart.
    ///
    /// An empty input yields an empty output.
    #[must_use]
    pub fn apply(self, raw: &[f64]) -> Vec<f64> {
        match self {
            BeneficialTransform::InvertForLowerIsBetter => {
                let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                raw.iter().map(|&value| max - value).collect()
            }
            BeneficialTransform::ShiftForBoundedFitness => {
                let min_shifted = raw
                    .iter()
                    .map(|&value| value - 1.0)
                    .fold(f64::INFINITY, f64::min);
                let offset = min_shifted.abs();
                raw.iter().map(|&value| value + offset - 1.0).collect()
            }
        }
    }
}

/// Divides every entry by the sequence maximum.
///
/// A sequence whose maximum is not positive cannot rank anything, so every
/// entry maps to 0.
#[must_use]
pub fn normalize_by_max(beneficial: &[f64]) -> Vec<f64> {
    let max = beneficial.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        beneficial.iter().map(|&value| value / max).collect()
    } else {
        vec![0.0; beneficial.len()]
    }
}

/// Computes the unified score of every pair.
///
/// Only scored pairs take part in the per-metric maxima; failed pairs get 0.
/// The output is index-aligned with `outcomes`.
#[must_use]
pub fn unified_scores(outcomes: &[EvaluationOutcome]) -> Vec<f64> {
    let scored: Vec<(usize, &EvaluationRecord)> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, outcome)| outcome.record().map(|record| (i, record)))
        .collect();

    let mut scores = vec![0.0; outcomes.len()];

    for (metric, transform) in BeneficialTransform::FOR_RECORD.iter().enumerate() {
        let raw: Vec<f64> = scored
            .iter()
            .map(|(_, record)| record.metrics()[metric])
            .collect();
        let normalized = normalize_by_max(&transform.apply(&raw));

        for ((i, _), value) in scored.iter().zip(normalized) {
            scores[*i] += value;
        }
    }

    scores
}
