//! Terminal output helpers.

use colored::Colorize;
use tabscout::data::ColumnStats;
use tabscout::Matrix;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// One line per numeric column: count, missing, mean, std, min, median, max.
pub(crate) fn describe_table(stats: &[ColumnStats]) -> String {
    let name_width = stats
        .iter()
        .map(|s| s.name.len())
        .chain(std::iter::once(6))
        .max()
        .unwrap_or(6);

    let mut out = format!(
        "{:name_width$}  {:>8}  {:>8}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}\n",
        "column", "count", "missing", "mean", "std", "min", "median", "max"
    );
    for s in stats {
        out.push_str(&format!(
            "{:name_width$}  {:>8}  {:>8}  {:>10.3}  {:>10.3}  {:>10.3}  {:>10.3}  {:>10.3}\n",
            s.name, s.count, s.missing, s.mean, s.std, s.min, s.median, s.max
        ));
    }
    out
}

/// Square matrix with `names` as both row and column labels.
pub(crate) fn correlation_table<S: AsRef<str>>(names: &[S], corr: &Matrix<f32>) -> String {
    let width = names
        .iter()
        .map(|n| n.as_ref().len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("{:width$}", "");
    for name in names {
        out.push_str(&format!("  {:>width$}", name.as_ref()));
    }
    out.push('\n');
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("{:width$}", name.as_ref()));
        for j in 0..names.len() {
            out.push_str(&format!("  {:>width$.3}", corr.get(i, j)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_table_layout() {
        let corr = Matrix::from_vec(2, 2, vec![1.0, -0.5, -0.5, 1.0]).expect("2x2");
        let table = correlation_table(&["Year", "Global_Sales"], &corr);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Global_Sales"));
        assert!(lines[1].starts_with("Year"));
        assert!(lines[1].contains("-0.500"));
    }

    #[test]
    fn test_describe_table_has_row_per_column() {
        let stats = vec![ColumnStats {
            name: "Year".to_string(),
            count: 3,
            missing: 1,
            mean: 2001.0,
            std: 1.0,
            min: 2000.0,
            median: 2001.0,
            max: 2002.0,
        }];
        let table = describe_table(&stats);
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("2001.000"));
    }
}
