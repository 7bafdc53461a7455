//! Train/test splitting.
//!
//! [`train_test_split`] works on an in-memory matrix and vector.
//! [`TrainTestSplitter`] works on a [`DataFrame`]: it draws one row
//! permutation per dataset and reuses it, so every feature subset evaluated
//! against that dataset sees the same held-out rows.

use crate::data::DataFrame;
use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Validates `test_size` and returns `(n_train, n_test)`.
fn split_sizes(n_samples: usize, test_size: f32) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TabscoutError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "strictly between 0 and 1".to_string(),
        });
    }

    let n_test = (n_samples as f32 * test_size).round() as usize;
    let n_train = n_samples - n_test.min(n_samples);

    if n_test == 0 || n_train == 0 {
        return Err(TabscoutError::validation(format!(
            "Split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )));
    }

    Ok((n_train, n_test))
}

/// Shuffles indices with optional random seed.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}

/// Split arrays into random train and test subsets.
///
/// Returns `(x_train, x_test, y_train, y_test)`.
///
/// # Errors
///
/// Returns an error if `test_size` is outside (0, 1), the inputs are
/// misaligned, or either side of the split would be empty.
///
/// # Example
///
/// ```rust
/// use tabscout::model_selection::train_test_split;
/// use tabscout::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(10, 2, (0..20).map(|i| i as f32).collect()).expect("10x2");
/// let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
///
/// let (x_train, x_test, y_train, y_test) =
///     train_test_split(&x, &y, 0.2, Some(42)).expect("valid split");
/// assert_eq!(x_train.shape().0, 8);
/// assert_eq!(x_test.shape().0, 2);
/// assert_eq!(y_train.len() + y_test.len(), 10);
/// ```
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    test_size: f32,
    random_state: Option<u64>,
) -> Result<(Matrix<f32>, Matrix<f32>, Vector<f32>, Vector<f32>)> {
    let n_samples = x.n_rows();
    if n_samples != y.len() {
        return Err(TabscoutError::dimension_mismatch(
            "samples",
            n_samples,
            y.len(),
        ));
    }

    let (n_train, _) = split_sizes(n_samples, test_size)?;
    let indices = shuffle_indices(n_samples, random_state);
    let (train, test) = indices.split_at(n_train);

    Ok((
        x.select_rows(train),
        x.select_rows(test),
        y.select(train),
        y.select(test),
    ))
}

/// The four row-aligned views produced for one feature subset.
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    /// Training predictors.
    pub x_train: Matrix<f32>,
    /// Training target.
    pub y_train: Vector<f32>,
    /// Held-out predictors.
    pub x_test: Matrix<f32>,
    /// Held-out target.
    pub y_test: Vector<f32>,
}

/// Deterministic dataset partitioner.
///
/// The permutation is computed once in [`TrainTestSplitter::new`]; every
/// [`split`](TrainTestSplitter::split) call reuses it. Without a seed the
/// permutation is random but still shared by all calls on this instance.
#[derive(Debug, Clone)]
pub struct TrainTestSplitter {
    train_rows: Vec<usize>,
    test_rows: Vec<usize>,
}

impl TrainTestSplitter {
    /// Partitions `n_samples` row positions.
    ///
    /// # Errors
    ///
    /// Returns an error if `test_size` is outside (0, 1) or a side would be
    /// empty.
    pub fn new(n_samples: usize, test_size: f32, random_state: Option<u64>) -> Result<Self> {
        let (n_train, _) = split_sizes(n_samples, test_size)?;
        let mut indices = shuffle_indices(n_samples, random_state);
        let test_rows = indices.split_off(n_train);
        Ok(Self {
            train_rows: indices,
            test_rows,
        })
    }

    /// Training row positions.
    #[must_use]
    pub fn train_rows(&self) -> &[usize] {
        &self.train_rows
    }

    /// Held-out row positions.
    #[must_use]
    pub fn test_rows(&self) -> &[usize] {
        &self.test_rows
    }

    /// Extracts predictors `x_cols` and target `y_col` for both partitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or not numeric, or the frame
    /// has a different row count than this splitter was built for.
    pub fn split<S: AsRef<str>>(
        &self,
        dataset: &DataFrame,
        x_cols: &[S],
        y_col: &str,
    ) -> Result<DatasetSplit> {
        let expected = self.train_rows.len() + self.test_rows.len();
        if dataset.n_rows() != expected {
            return Err(TabscoutError::dimension_mismatch(
                "rows",
                expected,
                dataset.n_rows(),
            ));
        }

        let x = dataset.select_matrix(x_cols)?;
        let y = dataset.numeric(y_col)?;

        Ok(DatasetSplit {
            x_train: x.select_rows(&self.train_rows),
            y_train: y.select(&self.train_rows),
            x_test: x.select_rows(&self.test_rows),
            y_test: y.select(&self.test_rows),
        })
    }
}
