//! `tabscout recommend`: peers from the query row's cluster.

use super::{load_config, load_dataset};
use crate::error::Result;
use crate::output;
use std::path::{Path, PathBuf};
use tabscout::data::cleanse;
use tabscout::preprocessing::DatasetScaler;
use tabscout::recommend::RecommendationSystem;
use tracing::info;

/// How the query row is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Query {
    /// Position after cleansing and sorting.
    Row(usize),
    /// Value of the identifier column.
    Id(String),
}

/// Command-line overrides for the recommend section of the config.
#[derive(Debug)]
pub(crate) struct RecommendArgs {
    pub(crate) config: Option<PathBuf>,
    pub(crate) query: Query,
    pub(crate) features: Vec<String>,
    pub(crate) count: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) up_to: bool,
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run(input: &Path, args: &RecommendArgs) -> Result<()> {
    let loaded = load_config(args.config.as_deref())?;
    let mut config = loaded.recommend;
    if !args.features.is_empty() {
        config.features.clone_from(&args.features);
    }
    if let Some(count) = args.count {
        config.count = count;
    }
    if args.seed.is_some() {
        config.random_state = args.seed;
    }
    config.validate()?;

    // Same imputation and ordering as the analysis, but every column kept.
    let mut dataset = load_dataset(input, &[config.id_column.as_str()])?;
    cleanse::fill_mean(&mut dataset, &loaded.analysis.mean_columns)?;
    cleanse::fill_mode(&mut dataset, &loaded.analysis.mode_columns)?;
    if let Some(column) = &loaded.analysis.sort_column {
        dataset.sort_by(column, true)?;
    }

    let scaler = DatasetScaler::new(dataset, &config.features)?;
    let mut system = RecommendationSystem::from_scaler(&scaler, &config.id_column)
        .with_max_clusters(config.max_clusters)
        .with_max_fit_attempts(config.max_fit_attempts);
    if let Some(seed) = config.random_state {
        system = system.with_random_state(seed);
    }
    system.build(&config.features)?;

    let id = match &args.query {
        Query::Row(row) => system.id_of(*row)?,
        Query::Id(id) => id.clone(),
    };
    let query_row = system.row_of(&id)?;
    info!(id = %id, cluster = system.label_of(&id)?, "recommendation query");

    let peers = if args.up_to {
        system.recommend_up_to(&id, config.count)?
    } else {
        system.recommend(&id, config.count)?
    };

    let label_column = if system.records().has_column(&config.name_column) {
        config.name_column.clone()
    } else {
        config.id_column.clone()
    };
    let mut columns = vec![label_column];
    columns.extend(config.features.iter().cloned());

    let query = system.records().take_rows(&[query_row]).render(&columns)?;
    let report = format!("{query}\n{}", peers.render(&columns)?);

    output::section("Query");
    print!("{query}");
    output::section(&format!("Recommendations ({})", peers.n_rows()));
    print!("{}", peers.render(&columns)?);

    if let Some(path) = &args.output {
        std::fs::write(path, report)?;
        output::kv("Written to", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;

    fn write_csv(dir: &Path) -> PathBuf {
        let path = dir.join("games.csv");
        let mut file = std::fs::File::create(&path).expect("create csv");
        writeln!(file, "Rank,Name,Platform,Genre,Global_Sales").expect("header");
        let platforms = ["Wii", "PS2", "GB"];
        for i in 0..18 {
            let platform = platforms[i / 6];
            let genre = if i / 6 == 0 { "Sports" } else { "Puzzle" };
            writeln!(
                file,
                "{},Game {i},{platform},{genre},{}",
                i + 1,
                (18 - i) as f32 * 0.5
            )
            .expect("row");
        }
        path
    }

    // The dataset has no Year column to impute.
    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("tabscout.json");
        std::fs::write(&path, r#"{"analysis": {"mode_columns": []}}"#).expect("write config");
        path
    }

    fn args(dir: &Path, query: Query, count: usize, output: Option<PathBuf>) -> RecommendArgs {
        RecommendArgs {
            config: Some(write_config(dir)),
            query,
            features: vec!["Platform".to_string(), "Genre".to_string()],
            count: Some(count),
            seed: Some(5),
            up_to: false,
            output,
        }
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_csv(dir.path());
        let out = dir.path().join("recommendations.txt");

        run(&input, &args(dir.path(), Query::Id("1".to_string()), 3, Some(out.clone())))
            .expect("recommendation succeeds");

        let report = std::fs::read_to_string(&out).expect("report written");
        assert!(report.contains("Game 0"));
        assert!(report.contains("Platform"));
        // Header + query row, blank line, header + 3 peers.
        assert_eq!(report.lines().filter(|l| l.contains("Game")).count(), 4);
    }

    #[test]
    fn test_run_by_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_csv(dir.path());
        run(&input, &args(dir.path(), Query::Row(7), 2, None)).expect("recommendation succeeds");
    }

    #[test]
    fn test_run_unknown_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_csv(dir.path());
        let err = run(&input, &args(dir.path(), Query::Id("404".to_string()), 1, None))
            .expect_err("unknown id");
        assert!(matches!(err, CliError::Query(_)));
    }

    #[test]
    fn test_run_too_many_requested() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_csv(dir.path());
        let err = run(&input, &args(dir.path(), Query::Id("1".to_string()), 50, None))
            .expect_err("cluster smaller than 50");
        assert!(matches!(err, CliError::Query(_)));

        let mut lenient = args(dir.path(), Query::Id("1".to_string()), 50, None);
        lenient.up_to = true;
        run(&input, &lenient).expect("lenient query succeeds");
    }
}
