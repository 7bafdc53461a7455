//! Error types for tabscout operations.
//!
//! Argument-validation failures, per-algorithm numerical failures and query
//! failures each get their own variant so callers can act on them.

use thiserror::Error;

/// Main error type for tabscout operations.
///
/// # Examples
///
/// ```
/// use tabscout::error::TabscoutError;
///
/// let err = TabscoutError::InsufficientPeers {
///     requested: 10,
///     available: 3,
/// };
/// assert!(err.to_string().contains("only 3 peers"));
/// ```
#[derive(Debug, Error)]
pub enum TabscoutError {
    /// Matrix/vector dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Normal-equation matrix could not be factorized.
    #[error("Singular matrix detected: {reason}")]
    SingularMatrix {
        /// Factorization failure description
        reason: String,
    },

    /// An iterative algorithm did not converge within its iteration cap.
    #[error("Convergence failure after {iterations} iterations, residual = {final_loss}")]
    ConvergenceFailure {
        /// Number of iterations attempted
        iterations: usize,
        /// Final change/loss value when the cap was hit
        final_loss: f64,
    },

    /// Invalid hyperparameter or configuration value.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// No predictor columns were configured.
    #[error("Predictor column list is empty: no feature combinations to evaluate")]
    EmptyPredictors,

    /// Predictor count exceeds the exhaustive-search ceiling.
    #[error("Too many predictors: {count} given, at most {max} supported (2^n - 1 subsets)")]
    TooManyPredictors {
        /// Configured predictor count
        count: usize,
        /// Supported ceiling
        max: usize,
    },

    /// A referenced column does not exist in the dataset.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column was used as numeric input but holds categorical data.
    #[error("Column is not numeric: {0}")]
    NotNumeric(String),

    /// The query identifier is not present in the built dataset.
    #[error("Record not found: no row with identifier {0}")]
    RecordNotFound(String),

    /// The identifier column contains the same value more than once.
    #[error("Duplicate identifier {id} in column {column}")]
    DuplicateIdentifier {
        /// Identifier column name
        column: String,
        /// The repeated identifier
        id: String,
    },

    /// The query's cluster holds fewer peers than requested.
    #[error("Cluster too small: requested {requested} recommendations but only {available} peers share the cluster")]
    InsufficientPeers {
        /// Requested recommendation count
        requested: usize,
        /// Peers available in the cluster
        available: usize,
    },

    /// An accessor was used before the producing step ran.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Every (subset, algorithm) pair failed during the sweep.
    #[error("No viable model: all {pairs} evaluated pairs failed")]
    NoViableModel {
        /// Number of pairs attempted
        pairs: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input failed a validation rule.
    #[error("Validation failed: {message}")]
    ValidationError {
        /// Validation failure message
        message: String,
    },

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for TabscoutError {
    fn from(msg: &str) -> Self {
        TabscoutError::Other(msg.to_string())
    }
}

impl From<String> for TabscoutError {
    fn from(msg: String) -> Self {
        TabscoutError::Other(msg)
    }
}

impl TabscoutError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, TabscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = TabscoutError::DimensionMismatch {
            expected: "100x10".to_string(),
            actual: "100x5".to_string(),
        };
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(err.to_string().contains("100x10"));
        assert!(err.to_string().contains("100x5"));
    }

    #[test]
    fn test_convergence_failure_display() {
        let err = TabscoutError::ConvergenceFailure {
            iterations: 300,
            final_loss: 0.5,
        };
        assert!(err.to_string().contains("Convergence failure"));
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn test_from_str() {
        let err: TabscoutError = "test error".into();
        assert!(matches!(err, TabscoutError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: TabscoutError = "test error".to_string().into();
        assert!(matches!(err, TabscoutError::Other(_)));
    }

    #[test]
    fn test_query_errors_are_distinct() {
        let missing = TabscoutError::RecordNotFound("42".to_string());
        let short = TabscoutError::InsufficientPeers {
            requested: 5,
            available: 2,
        };
        assert!(missing.to_string().contains("42"));
        assert!(short.to_string().contains("requested 5"));
        assert!(!matches!(missing, TabscoutError::InsufficientPeers { .. }));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = TabscoutError::from(io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = TabscoutError::dimension_mismatch("rows", 10, 8);
        let msg = err.to_string();
        assert!(msg.contains("rows=10"));
        assert!(msg.contains('8'));
    }
}
