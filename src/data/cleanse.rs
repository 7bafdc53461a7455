//! Dataset cleansing: column removal and missing-value imputation.
//!
//! Mean imputation applies to numeric columns only. Mode imputation works on
//! both kinds; ties resolve to the smallest value (numeric) or the
//! lexicographically first label (categorical).

use super::{Column, DataFrame};
use crate::error::{Result, TabscoutError};
use crate::primitives::Vector;
use std::collections::BTreeMap;
use tracing::debug;

/// Removes the named columns.
///
/// # Errors
///
/// Returns an error if a column doesn't exist.
pub fn drop_columns<S: AsRef<str>>(df: &mut DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        df.drop_column(name.as_ref())?;
    }
    Ok(())
}

/// Replaces missing numeric cells with the column mean.
///
/// # Errors
///
/// Returns an error if a column is missing or categorical.
pub fn fill_mean<S: AsRef<str>>(df: &mut DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        let name = name.as_ref();
        let Column::Numeric(values) = df.column_mut(name)? else {
            return Err(TabscoutError::NotNumeric(name.to_string()));
        };

        let present: Vector<f32> = values.iter().copied().filter(|x| !x.is_nan()).collect();
        let mean = present.mean();
        let missing = values.len() - present.len();
        *values = values
            .iter()
            .map(|&x| if x.is_nan() { mean } else { x })
            .collect();
        debug!(column = name, missing, fill = mean, "mean imputation");
    }
    Ok(())
}

/// Replaces missing cells with the most frequent value of the column.
///
/// # Errors
///
/// Returns an error if a column is missing.
pub fn fill_mode<S: AsRef<str>>(df: &mut DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        let name = name.as_ref();
        match df.column_mut(name)? {
            Column::Numeric(values) => {
                let Some(mode) = numeric_mode(values.as_slice()) else {
                    continue;
                };
                *values = values
                    .iter()
                    .map(|&x| if x.is_nan() { mode } else { x })
                    .collect();
                debug!(column = name, fill = mode, "mode imputation");
            }
            Column::Categorical(values) => {
                let Some(mode) = label_mode(values) else {
                    continue;
                };
                for cell in values.iter_mut().filter(|c| c.is_empty()) {
                    cell.clone_from(&mode);
                }
                debug!(column = name, fill = %mode, "mode imputation");
            }
        }
    }
    Ok(())
}

fn numeric_mode(values: &[f32]) -> Option<f32> {
    // Keyed by bit pattern so equal values share an entry.
    let mut counts: BTreeMap<u32, (f32, usize)> = BTreeMap::new();
    for &x in values.iter().filter(|x| !x.is_nan()) {
        counts.entry(x.to_bits()).or_insert((x, 0)).1 += 1;
    }
    counts
        .into_values()
        .reduce(|best, cur| {
            if cur.1 > best.1 || (cur.1 == best.1 && cur.0 < best.0) {
                cur
            } else {
                best
            }
        })
        .map(|(value, _)| value)
}

fn label_mode(values: &[String]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values.iter().filter(|v| !v.is_empty()) {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    // BTreeMap iterates in label order, so the first maximum is the smallest label.
    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            (
                "Year".to_string(),
                Column::Numeric(Vector::from_slice(&[2000.0, f32::NAN, 2004.0, 2004.0])),
            ),
            (
                "Publisher".to_string(),
                Column::Categorical(vec![
                    "Nintendo".into(),
                    "".into(),
                    "Sega".into(),
                    "Nintendo".into(),
                ]),
            ),
            (
                "Sales".to_string(),
                Column::Numeric(Vector::from_slice(&[1.0, 2.0, f32::NAN, 3.0])),
            ),
        ])
        .expect("valid frame")
    }

    #[test]
    fn test_fill_mean() {
        let mut df = frame();
        fill_mean(&mut df, &["Sales"]).expect("numeric column");
        let sales = df.numeric("Sales").expect("Sales");
        assert!((sales[2] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fill_mean_rejects_categorical() {
        let mut df = frame();
        let err = fill_mean(&mut df, &["Publisher"]).unwrap_err();
        assert!(matches!(err, TabscoutError::NotNumeric(_)));
    }

    #[test]
    fn test_fill_mode_numeric() {
        let mut df = frame();
        fill_mode(&mut df, &["Year"]).expect("Year exists");
        let year = df.numeric("Year").expect("Year");
        assert!((year[1] - 2004.0).abs() < 1e-6);
    }

    #[test]
    fn test_fill_mode_categorical() {
        let mut df = frame();
        fill_mode(&mut df, &["Publisher"]).expect("Publisher exists");
        assert_eq!(df.value(1, "Publisher").expect("cell").to_string(), "Nintendo");
    }

    #[test]
    fn test_numeric_mode_tie_prefers_smallest() {
        assert_eq!(numeric_mode(&[3.0, 1.0, 3.0, 1.0]), Some(1.0));
        assert_eq!(numeric_mode(&[f32::NAN]), None);
    }

    #[test]
    fn test_drop_columns() {
        let mut df = frame();
        drop_columns(&mut df, &["Sales", "Year"]).expect("columns exist");
        assert_eq!(df.column_names(), vec!["Publisher"]);
        assert!(drop_columns(&mut df, &["Missing"]).is_err());
    }
}
