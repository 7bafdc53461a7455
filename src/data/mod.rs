//! `DataFrame` module for named column containers.
//!
//! Provides a minimal row-aligned table of numeric and categorical columns,
//! plus CSV ingestion and the cleansing steps (column dropping, mean/mode
//! imputation, sorting) applied before analysis.

pub mod cleanse;
mod csv_io;

pub use csv_io::{read_csv, read_csv_from, CsvLoader};

use crate::error::{Result, TabscoutError};
use crate::metrics::pearson;
use crate::primitives::{Matrix, Vector};
use std::cmp::Ordering;
use std::fmt;

/// A single column of a [`DataFrame`].
///
/// Missing numeric cells are stored as `NaN`, missing categorical cells as
/// the empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Floating-point values.
    Numeric(Vector<f32>),
    /// Free-form labels.
    Categorical(Vec<String>),
}

impl Column {
    /// Number of cells in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// Returns true if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for numeric columns.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Returns the cell at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn value(&self, row: usize) -> Value<'_> {
        match self {
            Column::Numeric(v) => Value::Number(v[row]),
            Column::Categorical(v) => Value::Text(&v[row]),
        }
    }

    fn take(&self, indices: &[usize]) -> Self {
        match self {
            Column::Numeric(v) => Column::Numeric(v.select(indices)),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// A borrowed cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Numeric cell.
    Number(f32),
    /// Categorical cell.
    Text(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) if x.is_nan() => write!(f, ""),
            Value::Number(x) if x.fract() == 0.0 && x.abs() < 1e9 => write!(f, "{x:.0}"),
            Value::Number(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A minimal `DataFrame` with named columns.
///
/// Row order is the row's identity: every derived view (row subsets,
/// matrices, splits) refers back to rows by position.
///
/// # Examples
///
/// ```
/// use tabscout::data::{Column, DataFrame};
/// use tabscout::primitives::Vector;
///
/// let df = DataFrame::new(vec![
///     ("Year".to_string(), Column::Numeric(Vector::from_slice(&[2006.0, 1985.0]))),
///     ("Genre".to_string(), Column::Categorical(vec!["Sports".into(), "Platform".into()])),
/// ]).expect("valid columns");
/// assert_eq!(df.shape(), (2, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<(String, Column)>,
    n_rows: usize,
}

impl DataFrame {
    /// Creates a new `DataFrame` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, lengths differ, a name is
    /// empty, or a name repeats.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("DataFrame must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(TabscoutError::DimensionMismatch {
                    expected: format!("{n_rows} rows"),
                    actual: format!("{} rows in column {name}", col.len()),
                });
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(TabscoutError::validation(format!(
                "duplicate column name {}",
                dup[0]
            )));
        }

        Ok(Self { columns, n_rows })
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns true if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`TabscoutError::ColumnNotFound`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| TabscoutError::ColumnNotFound(name.to_string()))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| TabscoutError::ColumnNotFound(name.to_string()))
    }

    /// Returns a numeric column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or categorical.
    pub fn numeric(&self, name: &str) -> Result<&Vector<f32>> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(TabscoutError::NotNumeric(name.to_string())),
        }
    }

    /// Returns the cell at (`row`, `name`).
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or the row is out of bounds.
    pub fn value(&self, row: usize, name: &str) -> Result<Value<'_>> {
        if row >= self.n_rows {
            return Err(TabscoutError::Other(format!(
                "row index {row} out of bounds (len={})",
                self.n_rows
            )));
        }
        Ok(self.column(name)?.value(row))
    }

    /// Builds a feature matrix from numeric columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if no names are given or any column is missing or
    /// categorical.
    pub fn select_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Matrix<f32>> {
        if names.is_empty() {
            return Err("Must select at least one column".into());
        }
        let columns = names
            .iter()
            .map(|n| self.numeric(n.as_ref()).map(Vector::as_slice))
            .collect::<Result<Vec<_>>>()?;
        Ok(Matrix::from_columns(&columns)?)
    }

    /// Returns a new `DataFrame` holding only the named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err("Must select at least one column".into());
        }
        let selected = names
            .iter()
            .map(|n| {
                let name = n.as_ref();
                self.column(name).map(|c| (name.to_string(), c.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(selected)
    }

    /// Returns a new `DataFrame` with the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(indices)))
                .collect(),
            n_rows: indices.len(),
        }
    }

    /// Returns an iterator over columns as (name, column) pairs.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Adds a column, or replaces an existing column of the same name in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the length doesn't match or the name is empty.
    pub fn set_column(&mut self, name: &str, data: Column) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(TabscoutError::dimension_mismatch(
                "column length",
                self.n_rows,
                data.len(),
            ));
        }
        if name.is_empty() {
            return Err("Column name cannot be empty".into());
        }

        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = data,
            None => self.columns.push((name.to_string(), data)),
        }
        Ok(())
    }

    /// Drops a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist or is the last column.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if self.columns.len() == 1 {
            return Err("Cannot drop the last column".into());
        }

        let idx = self
            .columns
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| TabscoutError::ColumnNotFound(name.to_string()))?;

        self.columns.remove(idx);
        Ok(())
    }

    /// Reorders rows by a numeric column; NaN sorts last either way.
    ///
    /// The sort is stable, so rows with equal keys keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or categorical.
    pub fn sort_by(&mut self, name: &str, descending: bool) -> Result<()> {
        let key = self.numeric(name)?;
        let mut order: Vec<usize> = (0..self.n_rows).collect();
        order.sort_by(|&a, &b| {
            let (x, y) = (key[a], key[b]);
            match (x.is_nan(), y.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) if descending => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            }
        });
        *self = self.take_rows(&order);
        Ok(())
    }

    /// Pairwise Pearson correlations between numeric columns.
    ///
    /// Returns a square matrix indexed like `names`.
    ///
    /// # Errors
    ///
    /// Returns an error if any column is missing or categorical.
    pub fn correlation_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Matrix<f32>> {
        let columns = names
            .iter()
            .map(|n| self.numeric(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let n = columns.len();
        let mut corr = Matrix::zeros(n, n);
        for i in 0..n {
            corr.set(i, i, 1.0);
            for j in (i + 1)..n {
                let r = pearson(columns[i], columns[j]);
                corr.set(i, j, r);
                corr.set(j, i, r);
            }
        }
        Ok(corr)
    }

    /// Renders the named columns as an aligned plain-text table, one line per
    /// row, prefixed by the row position.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist.
    pub fn render<S: AsRef<str>>(&self, names: &[S]) -> Result<String> {
        let columns = names
            .iter()
            .map(|n| self.column(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let cells: Vec<Vec<String>> = (0..self.n_rows)
            .map(|row| columns.iter().map(|c| c.value(row).to_string()).collect())
            .collect();

        let index_width = self.n_rows.saturating_sub(1).to_string().len();
        let widths: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(j, n)| {
                cells
                    .iter()
                    .map(|r| r[j].chars().count())
                    .chain(std::iter::once(n.as_ref().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("{:index_width$}", "");
        for (n, w) in names.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", n.as_ref()));
        }
        out.push('\n');
        for (row, line) in cells.iter().enumerate() {
            out.push_str(&format!("{row:>index_width$}"));
            for (cell, w) in line.iter().zip(&widths) {
                out.push_str(&format!("  {cell:>w$}"));
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Returns descriptive statistics for the numeric columns, ignoring NaN.
    #[must_use]
    pub fn describe(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .filter_map(|(name, col)| match col {
                Column::Numeric(v) => Some((name, v)),
                Column::Categorical(_) => None,
            })
            .map(|(name, col)| {
                let present: Vector<f32> = col.iter().copied().filter(|x| !x.is_nan()).collect();
                let mut sorted = present.as_slice().to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

                let median = if sorted.is_empty() {
                    0.0
                } else if sorted.len() % 2 == 0 {
                    (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
                } else {
                    sorted[sorted.len() / 2]
                };

                ColumnStats {
                    name: name.clone(),
                    count: present.len(),
                    missing: col.len() - present.len(),
                    mean: present.mean(),
                    std: present.variance().sqrt(),
                    min: sorted.first().copied().unwrap_or(0.0),
                    median,
                    max: sorted.last().copied().unwrap_or(0.0),
                }
            })
            .collect()
    }
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of non-missing elements.
    pub count: usize,
    /// Number of missing (NaN) elements.
    pub missing: usize,
    /// Mean value.
    pub mean: f32,
    /// Standard deviation.
    pub std: f32,
    /// Minimum value.
    pub min: f32,
    /// Median value.
    pub median: f32,
    /// Maximum value.
    pub max: f32,
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
