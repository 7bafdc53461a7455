//! Subcommand implementations.

pub(crate) mod analyze;
pub(crate) mod recommend;

use crate::error::{CliError, Result};
use std::path::Path;
use tabscout::config::TabscoutConfig;
use tabscout::data::{CsvLoader, DataFrame};
use tracing::info;

/// Loads `path`, or the defaults when no config file is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<TabscoutConfig> {
    match path {
        Some(path) if !path.is_file() => Err(CliError::FileNotFound(path.to_path_buf())),
        Some(path) => Ok(TabscoutConfig::from_json_file(path)?),
        None => Ok(TabscoutConfig::default()),
    }
}

/// Reads the input CSV, keeping `text_columns` as raw text.
pub(crate) fn load_dataset(path: &Path, text_columns: &[&str]) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let dataset = CsvLoader::new().with_text_columns(text_columns).read(path)?;
    let (rows, cols) = dataset.shape();
    info!(path = %path.display(), rows, cols, "dataset loaded");
    Ok(dataset)
}
