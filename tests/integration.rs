//! Integration tests for tabscout.
//!
//! These tests verify end-to-end workflows combining multiple components.

use tabscout::config::TabscoutConfig;
use tabscout::data::{read_csv, read_csv_from, Column};
use tabscout::prelude::*;

/// A small sales table: Global_Sales follows Critic_Score linearly, Year and
/// Platform carry no signal, and Year has two missing cells.
fn sales_csv() -> String {
    let platforms = ["Wii", "PS2", "DS", "X360"];
    let genres = ["Sports", "Racing", "Puzzle"];
    let mut csv = String::from("Rank,Name,Platform,Year,Genre,Critic_Score,Global_Sales\n");
    for i in 0..40usize {
        let year = if i % 17 == 5 {
            String::new()
        } else {
            (2000 + (i * 3) % 9).to_string()
        };
        let score = 40.0 + (i as f32 * 13.0) % 55.0;
        let sales = 0.1 * score + 0.5;
        csv.push_str(&format!(
            "{},Game {i},{},{year},{},{score},{sales}\n",
            i + 1,
            platforms[i % 4],
            genres[(i / 4) % 3],
        ));
    }
    csv
}

fn analysis_config() -> TabscoutConfig {
    let mut config = TabscoutConfig::default();
    config.analysis.drop_columns = vec!["Rank".to_string(), "Name".to_string()];
    config.analysis.predictors = vec![
        "Platform".to_string(),
        "Year".to_string(),
        "Critic_Score".to_string(),
    ];
    config
}

#[test]
fn test_analysis_workflow() {
    let config = analysis_config();
    config.validate().expect("valid config");

    let mut dataset = read_csv_from(sales_csv().as_bytes()).expect("valid csv");
    config
        .analysis
        .cleanse(&mut dataset)
        .expect("cleansing succeeds");
    assert!(!dataset.has_column("Rank"));
    assert!(dataset
        .numeric("Year")
        .expect("numeric year")
        .iter()
        .all(|y| !y.is_nan()));

    let predictors = config.analysis.resolve_predictors(&dataset);
    let scaler = DatasetScaler::new(dataset, &predictors).expect("scalable");
    let mut analyzer = RegressionsAnalyzer::from_scaler(
        &scaler,
        config.analysis.catalog(),
        &predictors,
        &config.analysis.targets,
    );
    analyzer.run().expect("sweep succeeds");

    // 7 subsets x 5 algorithms.
    assert_eq!(analyzer.raw_tests().expect("ran").len(), 35);

    let best = analyzer.best_model().expect("ran");
    assert!(best.predictors().contains(&"Critic_Score".to_string()));
    assert!(best.score() > 1.5, "best score {}", best.score());
}

#[test]
fn test_dump_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = analysis_config();

    let mut dataset = read_csv_from(sales_csv().as_bytes()).expect("valid csv");
    config.analysis.cleanse(&mut dataset).expect("cleansing succeeds");
    let scaler = DatasetScaler::new(dataset, &config.analysis.predictors).expect("scalable");

    let mut analyzer = RegressionsAnalyzer::from_scaler(
        &scaler,
        RegressionCatalog::new(vec![RegressorKind::LinearRegression, RegressorKind::Ridge]),
        &config.analysis.predictors,
        &config.analysis.targets,
    )
    .with_test_size(0.25);
    analyzer.run().expect("sweep succeeds");

    let scores_path = dir.path().join("regressions_dump.txt");
    let predictions_path = dir.path().join("predictions_dump.txt");
    analyzer.dump_scores(&scores_path).expect("scores written");
    analyzer
        .dump_predictions(&predictions_path)
        .expect("predictions written");

    let scores = std::fs::read_to_string(&scores_path).expect("readable");
    assert_eq!(scores.matches("Combination: ").count(), 14);
    assert!(scores.starts_with("Combination: [Platform]\nRegression: LinearRegression()\n"));

    let predictions = std::fs::read_to_string(&predictions_path).expect("readable");
    // 10 holdout rows of 40.
    assert_eq!(predictions.matches("Actual value: ").count(), 10);
    assert_eq!(predictions.matches("Predicted value: ").count(), 10);
}

#[test]
fn test_read_csv_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sales.csv");
    std::fs::write(&path, sales_csv()).expect("write csv");

    let dataset = read_csv(&path).expect("valid csv");
    assert_eq!(dataset.shape(), (40, 7));
    assert!(matches!(
        dataset.column("Genre").expect("genre"),
        Column::Categorical(_)
    ));
}

#[test]
fn test_recommendation_workflow() {
    let config = TabscoutConfig::default();
    let mut dataset = read_csv_from(sales_csv().as_bytes()).expect("valid csv");
    dataset.sort_by("Global_Sales", true).expect("numeric sort");

    let features = ["Platform", "Genre"];
    let scaler = DatasetScaler::new(dataset, &features).expect("scalable");
    let mut system = RecommendationSystem::from_scaler(&scaler, &config.recommend.id_column)
        .with_max_clusters(12)
        .with_random_state(2024);
    system.build(&features).expect("build succeeds");

    let n_clusters = system.n_clusters().expect("built");
    assert!((2..=12).contains(&n_clusters));
    assert_eq!(
        system.cluster_sizes().expect("built").iter().sum::<usize>(),
        40
    );

    let query = system.id_of(0).expect("row 0");
    let label = system.label_of(&query).expect("known id");
    let peers = system.recommend_up_to(&query, 5).expect("known id");

    // Returned rows come from the original, unscaled dataset.
    let Column::Categorical(platforms) = peers.column("Platform").expect("platform") else {
        panic!("Platform stays categorical in the returned rows");
    };
    assert!(platforms.iter().all(|p| ["Wii", "PS2", "DS", "X360"].contains(&p.as_str())));

    let ranks = peers.numeric("Rank").expect("numeric rank");
    for &rank in ranks.as_slice() {
        let id = format!("{rank:.0}");
        assert_ne!(id, query);
        assert_eq!(system.label_of(&id).expect("known id"), label);
    }

    let rendered = peers
        .render(&["Name", "Platform", "Genre"])
        .expect("columns exist");
    assert_eq!(rendered.lines().count(), peers.n_rows() + 1);
}

#[test]
fn test_recommend_rejects_unknown_and_oversized() {
    let dataset = read_csv_from(sales_csv().as_bytes()).expect("valid csv");
    let scaler = DatasetScaler::new(dataset, &["Platform"]).expect("scalable");
    let mut system = RecommendationSystem::from_scaler(&scaler, "Rank").with_random_state(1);
    system.build(&["Platform"]).expect("build succeeds");

    assert!(matches!(
        system.recommend("0", 1),
        Err(TabscoutError::RecordNotFound(_))
    ));
    assert!(matches!(
        system.recommend("1", 40),
        Err(TabscoutError::InsufficientPeers { requested: 40, .. })
    ));
}

#[test]
fn test_estimators_share_the_trait() {
    // y = 3x - 2
    let x = Matrix::from_vec(8, 1, (0..8).map(|i| i as f32).collect()).expect("8x1");
    let y = Vector::from_vec((0..8).map(|i| 3.0 * i as f32 - 2.0).collect());

    for kind in RegressorKind::ALL {
        let mut model = kind.instantiate();
        model.fit(&x, &y).expect("clean linear data");
        assert_eq!(model.predict(&x).len(), 8, "{kind}");
    }
}
