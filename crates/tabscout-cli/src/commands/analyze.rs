//! `tabscout analyze`: exhaustive regression model selection.

use super::{load_config, load_dataset};
use crate::error::{CliError, Result};
use crate::output;
use std::path::{Path, PathBuf};
use tabscout::preprocessing::DatasetScaler;
use tabscout::selection::RegressionsAnalyzer;
use tracing::info;

/// Command-line overrides for the analysis section of the config.
#[derive(Debug, Default)]
pub(crate) struct AnalyzeArgs {
    pub(crate) config: Option<PathBuf>,
    pub(crate) targets: Vec<String>,
    pub(crate) predictors: Vec<String>,
    pub(crate) test_size: Option<f32>,
    pub(crate) seed: Option<u64>,
    pub(crate) scores_out: PathBuf,
    pub(crate) predictions_out: PathBuf,
    pub(crate) correlation: bool,
    pub(crate) describe: bool,
}

pub(crate) fn run(input: &Path, args: &AnalyzeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.analysis;
    if !args.targets.is_empty() {
        config.targets.clone_from(&args.targets);
    }
    if !args.predictors.is_empty() {
        config.predictors.clone_from(&args.predictors);
    }
    if let Some(test_size) = args.test_size {
        config.test_size = test_size;
    }
    if args.seed.is_some() {
        config.random_state = args.seed;
    }

    let mut dataset = load_dataset(input, &[])?;
    if args.describe {
        output::section("Dataset before cleansing");
        print!("{}", output::describe_table(&dataset.describe()));
    }

    config.cleanse(&mut dataset)?;
    if args.describe {
        output::section("Dataset after cleansing");
        print!("{}", output::describe_table(&dataset.describe()));
    }

    config.predictors = config.resolve_predictors(&dataset);
    config.validate()?;
    info!(
        predictors = config.predictors.len(),
        algorithms = config.algorithms.len(),
        "starting regression sweep"
    );

    let scaler = DatasetScaler::new(dataset, &config.predictors)?;
    let mut analyzer = RegressionsAnalyzer::from_scaler(
        &scaler,
        config.catalog(),
        &config.predictors,
        &config.targets,
    )
    .with_test_size(config.test_size)
    .with_random_state(config.random_state);
    analyzer.run()?;

    analyzer.dump_scores(&args.scores_out)?;
    analyzer.dump_predictions(&args.predictions_out)?;

    let best = analyzer.best_model()?;
    output::section("Best model");
    output::kv("Regression", best.kind());
    output::kv("Combination", format!("[{}]", best.predictors().join(", ")));
    output::kv("Score", best.score());
    output::kv("Scores report", args.scores_out.display());
    output::kv("Predictions report", args.predictions_out.display());

    if args.correlation {
        let scaled = scaler.scaled();
        let numeric: Vec<&str> = scaled
            .iter_columns()
            .filter(|(_, column)| column.is_numeric())
            .map(|(name, _)| name)
            .collect();
        if numeric.is_empty() {
            return Err(CliError::InvalidConfig(
                "no numeric columns for a correlation report".to_string(),
            ));
        }
        let corr = scaled.correlation_matrix(&numeric)?;
        output::section("Correlation matrix");
        print!("{}", output::correlation_table(&numeric, &corr));
    }
    Ok(())
}
