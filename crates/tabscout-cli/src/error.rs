//! Error types for the tabscout CLI.

use std::path::PathBuf;
use std::process::ExitCode;
use tabscout::TabscoutError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration or argument rejected before any work ran
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Query identifier missing or cluster too small
    #[error("Query failed: {0}")]
    Query(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other library failure
    #[error("tabscout error: {0}")]
    Tabscout(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Tabscout(_) => ExitCode::from(1),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidConfig(_) => ExitCode::from(5),
            Self::Query(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<TabscoutError> for CliError {
    fn from(e: TabscoutError) -> Self {
        match e {
            TabscoutError::Io(io) => Self::Io(io),
            TabscoutError::RecordNotFound(_) | TabscoutError::InsufficientPeers { .. } => {
                Self::Query(e.to_string())
            }
            TabscoutError::EmptyPredictors
            | TabscoutError::TooManyPredictors { .. }
            | TabscoutError::ColumnNotFound(_)
            | TabscoutError::NotNumeric(_)
            | TabscoutError::InvalidHyperparameter { .. }
            | TabscoutError::ValidationError { .. }
            | TabscoutError::Json(_) => Self::InvalidConfig(e.to_string()),
            other => Self::Tabscout(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_errors_map_to_query() {
        let err = CliError::from(TabscoutError::InsufficientPeers {
            requested: 10,
            available: 2,
        });
        assert!(matches!(err, CliError::Query(_)));
        assert_eq!(err.exit_code(), ExitCode::from(6));
    }

    #[test]
    fn test_validation_maps_to_config() {
        let err = CliError::from(TabscoutError::EmptyPredictors);
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn test_io_stays_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CliError::from(TabscoutError::Io(io));
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_other_maps_to_tabscout() {
        let err = CliError::from(TabscoutError::NoViableModel { pairs: 5 });
        assert!(matches!(err, CliError::Tabscout(_)));
        assert!(err.to_string().contains("all 5"));
    }
}
