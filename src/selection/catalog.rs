//! The regression catalog: which algorithms a sweep evaluates, in which order.

use crate::linear_model::{Lasso, LinearRegression, Ridge};
use crate::neighbors::KNeighborsRegressor;
use crate::traits::BoxedEstimator;
use crate::tree::DecisionTreeRegressor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A regression algorithm with its default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressorKind {
    /// Ordinary least squares.
    LinearRegression,
    /// L2-regularized least squares, alpha = 1.
    Ridge,
    /// L1-regularized least squares, alpha = 1.
    Lasso,
    /// CART regression tree with unlimited depth.
    DecisionTree,
    /// Mean of the 5 nearest training targets.
    KNeighbors,
}

impl RegressorKind {
    /// Every kind, in catalog order.
    pub const ALL: [RegressorKind; 5] = [
        RegressorKind::LinearRegression,
        RegressorKind::Ridge,
        RegressorKind::Lasso,
        RegressorKind::DecisionTree,
        RegressorKind::KNeighbors,
    ];

    /// Creates a fresh, unfitted estimator of this kind.
    #[must_use]
    pub fn instantiate(self) -> BoxedEstimator {
        match self {
            RegressorKind::LinearRegression => Box::new(LinearRegression::new()),
            RegressorKind::Ridge => Box::new(Ridge::new(1.0)),
            RegressorKind::Lasso => Box::new(Lasso::new(1.0)),
            RegressorKind::DecisionTree => Box::new(DecisionTreeRegressor::new()),
            RegressorKind::KNeighbors => Box::new(KNeighborsRegressor::new(5)),
        }
    }
}

impl fmt::Display for RegressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorKind::LinearRegression => write!(f, "LinearRegression()"),
            RegressorKind::Ridge => write!(f, "Ridge(alpha=1.0)"),
            RegressorKind::Lasso => write!(f, "Lasso(alpha=1.0)"),
            RegressorKind::DecisionTree => write!(f, "DecisionTreeRegressor()"),
            RegressorKind::KNeighbors => write!(f, "KNeighborsRegressor(n_neighbors=5)"),
        }
    }
}

/// Ordered list of algorithms to evaluate for every feature subset.
///
/// # Example
///
/// ```
/// use tabscout::selection::{RegressionCatalog, RegressorKind};
///
/// let catalog = RegressionCatalog::new(vec![RegressorKind::Ridge, RegressorKind::Lasso]);
/// let models = catalog.instantiate();
/// assert_eq!(models.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionCatalog {
    kinds: Vec<RegressorKind>,
}

impl Default for RegressionCatalog {
    fn default() -> Self {
        Self::new(RegressorKind::ALL.to_vec())
    }
}

impl RegressionCatalog {
    /// Creates a catalog evaluating `kinds` in the given order.
    #[must_use]
    pub fn new(kinds: Vec<RegressorKind>) -> Self {
        Self { kinds }
    }

    /// The algorithms, in declared order.
    #[must_use]
    pub fn kinds(&self) -> &[RegressorKind] {
        &self.kinds
    }

    /// Number of algorithms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True if no algorithm is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Fresh unfitted instances, one per kind, in declared order.
    #[must_use]
    pub fn instantiate(&self) -> Vec<BoxedEstimator> {
        self.kinds.iter().map(|kind| kind.instantiate()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_every_kind() {
        let catalog = RegressionCatalog::default();
        assert_eq!(catalog.kinds(), &RegressorKind::ALL);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_serde_names_are_snake_case() {
        let json = serde_json::to_string(&RegressorKind::DecisionTree).expect("serialize");
        assert_eq!(json, "\"decision_tree\"");
        let kind: RegressorKind = serde_json::from_str("\"k_neighbors\"").expect("deserialize");
        assert_eq!(kind, RegressorKind::KNeighbors);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RegressorKind::LinearRegression.to_string(), "LinearRegression()");
        assert!(RegressorKind::Ridge.to_string().starts_with("Ridge"));
    }
}
