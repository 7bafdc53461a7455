//! CSV ingestion.
//!
//! Column types are inferred: a column is numeric when it has at least one
//! non-empty cell and every non-empty cell parses as a number.

use super::{Column, DataFrame};
use crate::error::Result;
use crate::primitives::Vector;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads a headed CSV file into a [`DataFrame`].
///
/// # Errors
///
/// Returns an error if the file can't be read, a row has the wrong number of
/// fields, or the header is empty/duplicated.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    CsvLoader::new().read(path)
}

/// Reads headed CSV data from any reader into a [`DataFrame`].
///
/// # Errors
///
/// Returns an error on malformed CSV or an invalid header.
pub fn read_csv_from<R: Read>(reader: R) -> Result<DataFrame> {
    CsvLoader::new().read_from(reader)
}

/// CSV reader with per-column type overrides.
///
/// Columns named with [`with_text_columns`](Self::with_text_columns) keep
/// their raw cell text even when every cell parses as a number. Identifier
/// columns need this: `f32` cannot tell `16777216` from `16777217`.
///
/// # Examples
///
/// ```
/// use tabscout::data::CsvLoader;
///
/// let csv = "Rank,Sales\n16777216,1.5\n16777217,2.5\n";
/// let df = CsvLoader::new()
///     .with_text_columns(&["Rank"])
///     .read_from(csv.as_bytes())
///     .expect("valid csv");
/// assert!(!df.column("Rank").expect("Rank").is_numeric());
/// assert!(df.column("Sales").expect("Sales").is_numeric());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    text_columns: Vec<String>,
}

impl CsvLoader {
    /// Infers every column's type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `columns` categorical regardless of their contents.
    #[must_use]
    pub fn with_text_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.text_columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Reads a headed CSV file.
    ///
    /// # Errors
    ///
    /// See [`read_csv`].
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let df = self.read_from(file)?;
        debug!(path = %path.display(), rows = df.n_rows(), cols = df.n_cols(), "loaded dataset");
        Ok(df)
    }

    /// Reads headed CSV data from any reader.
    ///
    /// # Errors
    ///
    /// See [`read_csv_from`].
    pub fn read_from<R: Read>(&self, reader: R) -> Result<DataFrame> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in reader.records() {
            let record = record?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| {
                let column = if self.text_columns.contains(&name) {
                    Column::Categorical(raw)
                } else {
                    infer_column(raw)
                };
                (name, column)
            })
            .collect();

        DataFrame::new(columns)
    }
}

fn infer_column(raw: Vec<String>) -> Column {
    let mut parsed = Vec::with_capacity(raw.len());
    let mut seen_value = false;

    for cell in &raw {
        if cell.is_empty() {
            parsed.push(f32::NAN);
            continue;
        }
        match cell.parse::<f32>() {
            Ok(v) => {
                seen_value = true;
                parsed.push(v);
            }
            Err(_) => return Column::Categorical(raw),
        }
    }

    if seen_value {
        Column::Numeric(Vector::from_vec(parsed))
    } else {
        Column::Categorical(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Rank,Name,Platform,Year,Global_Sales
1,Wii Sports,Wii,2006,82.74
2,Super Mario Bros.,NES,,40.24
3,Mario Kart Wii,Wii,2008,35.82
";

    #[test]
    fn test_infers_column_types() {
        let df = read_csv_from(SAMPLE.as_bytes()).expect("valid csv");
        assert_eq!(df.shape(), (3, 5));
        assert!(df.column("Rank").expect("Rank").is_numeric());
        assert!(!df.column("Name").expect("Name").is_numeric());
        assert!(df.column("Year").expect("Year").is_numeric());
    }

    #[test]
    fn test_empty_numeric_cell_is_nan() {
        let df = read_csv_from(SAMPLE.as_bytes()).expect("valid csv");
        let year = df.numeric("Year").expect("Year is numeric");
        assert!(year[1].is_nan());
        assert!((year[2] - 2008.0).abs() < 1e-3);
    }

    #[test]
    fn test_text_columns_keep_raw_cells() {
        let csv = "Rank,Sales\n16777216,1.5\n16777217,2.5\n";
        let df = CsvLoader::new()
            .with_text_columns(&["Rank"])
            .read_from(csv.as_bytes())
            .expect("valid csv");
        assert_eq!(df.value(0, "Rank").expect("Rank").to_string(), "16777216");
        assert_eq!(df.value(1, "Rank").expect("Rank").to_string(), "16777217");
        assert!(df.column("Sales").expect("Sales").is_numeric());
    }

    #[test]
    fn test_ragged_rows_fail() {
        let ragged = "a,b\n1,2\n3\n";
        assert!(read_csv_from(ragged.as_bytes()).is_err());
    }

    #[test]
    fn test_read_csv_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");
        let df = read_csv(file.path()).expect("readable csv");
        assert_eq!(df.n_rows(), 3);
    }
}
