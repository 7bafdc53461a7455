//! tabscout - regression model selection and peer recommendations for CSV data
//!
//! Usage:
//!   tabscout analyze vgsales.csv                       # Sweep every subset x algorithm
//!   tabscout analyze vgsales.csv --correlation         # Also print the correlation matrix
//!   tabscout recommend vgsales.csv --row 100           # Peers of the 101st row
//!   tabscout recommend vgsales.csv --id 42 --count 5   # Peers of the row with Rank 42

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::analyze::{self, AnalyzeArgs};
use commands::recommend::{self, Query, RecommendArgs};

/// tabscout - Tabular model scout
///
/// Finds the best predictor subset and regression algorithm for a target
/// column, and recommends rows similar to a query row.
#[derive(Parser)]
#[command(name = "tabscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every predictor subset with every regression algorithm
    Analyze {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target column(s); the first is regressed on
        #[arg(long = "target", value_delimiter = ',')]
        targets: Vec<String>,

        /// Predictor columns (default: every non-target column left after cleansing)
        #[arg(long, value_delimiter = ',')]
        predictors: Vec<String>,

        /// Holdout fraction
        #[arg(long)]
        test_size: Option<f32>,

        /// Split seed
        #[arg(long)]
        seed: Option<u64>,

        /// Scores report path
        #[arg(long, default_value = "regressions_dump.txt")]
        scores_out: PathBuf,

        /// Predictions report path
        #[arg(long, default_value = "predictions_dump.txt")]
        predictions_out: PathBuf,

        /// Print the correlation matrix of the scaled dataset
        #[arg(long)]
        correlation: bool,

        /// Print column statistics before and after cleansing
        #[arg(long)]
        describe: bool,
    },

    /// Recommend rows from the query row's cluster
    Recommend {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Query by row position after sorting
        #[arg(long, default_value_t = 100, conflicts_with = "id")]
        row: usize,

        /// Query by identifier column value
        #[arg(long)]
        id: Option<String>,

        /// Clustering feature columns
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,

        /// Number of recommendations
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Clustering and sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Return fewer rows instead of failing when the cluster is small
        #[arg(long)]
        up_to: bool,

        /// Also write the report to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Analyze {
            input,
            targets,
            predictors,
            test_size,
            seed,
            scores_out,
            predictions_out,
            correlation,
            describe,
        } => analyze::run(
            &input,
            &AnalyzeArgs {
                config: cli.config,
                targets,
                predictors,
                test_size,
                seed,
                scores_out,
                predictions_out,
                correlation,
                describe,
            },
        ),

        Commands::Recommend {
            input,
            row,
            id,
            features,
            count,
            seed,
            up_to,
            output,
        } => recommend::run(
            &input,
            &RecommendArgs {
                config: cli.config,
                query: id.map_or(Query::Row(row), Query::Id),
                features,
                count,
                seed,
                up_to,
                output,
            },
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "tabscout",
            "analyze",
            "data.csv",
            "--predictors",
            "Year,Genre",
            "--test-size",
            "0.3",
        ]);
        let Commands::Analyze {
            predictors,
            test_size,
            targets,
            ..
        } = cli.command
        else {
            panic!("expected analyze");
        };
        assert_eq!(predictors, vec!["Year", "Genre"]);
        assert_eq!(test_size, Some(0.3));
        assert!(targets.is_empty());
    }

    #[test]
    fn test_parse_recommend_by_id() {
        let cli = Cli::parse_from(["tabscout", "-v", "recommend", "data.csv", "--id", "42", "-n", "5"]);
        assert!(cli.verbose);
        let Commands::Recommend { id, count, row, .. } = cli.command else {
            panic!("expected recommend");
        };
        assert_eq!(id.as_deref(), Some("42"));
        assert_eq!(count, Some(5));
        assert_eq!(row, 100);
    }

    #[test]
    fn test_row_and_id_conflict() {
        let parsed = Cli::try_parse_from([
            "tabscout", "recommend", "data.csv", "--row", "3", "--id", "42",
        ]);
        assert!(parsed.is_err());
    }
}
