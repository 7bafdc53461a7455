//! Preprocessing: label encoding, standardization and the dataset scaler.
//!
//! [`DatasetScaler`] turns a cleansed [`DataFrame`] into two row-aligned
//! views: the untouched original and a copy whose feature columns are
//! label-encoded (when categorical) and standardized.
//!
//! # Example
//!
//! ```
//! use tabscout::prelude::*;
//! use tabscout::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//! assert!(scaled.get(0, 0) < 0.0 && scaled.get(3, 0) > 0.0);
//! ```

use crate::data::{Column, DataFrame};
use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std. Constant
/// columns are centered but not divided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
    /// Whether to center the data (subtract mean).
    with_mean: bool,
    /// Whether to scale the data (divide by std).
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new `StandardScaler` with centering and scaling enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            with_mean: true,
            with_std: true,
        }
    }

    /// Sets whether to center the data by subtracting the mean.
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Sets whether to scale the data by dividing by standard deviation.
    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Returns the fitted per-feature means, if fitted.
    #[must_use]
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Returns the fitted per-feature standard deviations, if fitted.
    #[must_use]
    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and population standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let mean: Vec<f32> = (0..n_features).map(|j| x.column(j).mean()).collect();
        let std: Vec<f32> = (0..n_features)
            .map(|j| x.column(j).variance().sqrt())
            .collect();

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (Some(mean), Some(std)) = (self.mean.as_ref(), self.std.as_ref()) else {
            return Err(TabscoutError::NotFitted("StandardScaler".to_string()));
        };

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(TabscoutError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j);
                if self.with_mean {
                    val -= mean[j];
                }
                if self.with_std && std[j] > 1e-10 {
                    val /= std[j];
                }
                result.push(val);
            }
        }

        Ok(Matrix::from_vec(n_samples, n_features, result)?)
    }
}

/// Maps categorical labels to ordinal codes `0..n_classes`.
///
/// Codes follow the sorted order of the distinct labels, so the encoding is
/// independent of row order.
///
/// # Example
///
/// ```
/// use tabscout::preprocessing::LabelEncoder;
///
/// let labels: Vec<String> = ["Wii", "NES", "Wii"].iter().map(|s| s.to_string()).collect();
/// let mut encoder = LabelEncoder::new();
/// let codes = encoder.fit_transform(&labels).expect("non-empty labels");
/// assert_eq!(codes.as_slice(), &[1.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Option<Vec<String>>,
}

impl LabelEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the learned classes in code order.
    #[must_use]
    pub fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    /// Learns the distinct labels.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels` is empty.
    pub fn fit(&mut self, labels: &[String]) -> Result<()> {
        if labels.is_empty() {
            return Err("Cannot fit with zero samples".into());
        }
        let distinct: BTreeSet<&String> = labels.iter().collect();
        self.classes = Some(distinct.into_iter().cloned().collect());
        Ok(())
    }

    /// Encodes labels; unseen labels are an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder is not fitted or a label is unknown.
    pub fn transform(&self, labels: &[String]) -> Result<Vector<f32>> {
        let classes = self
            .classes
            .as_ref()
            .ok_or_else(|| TabscoutError::NotFitted("LabelEncoder".to_string()))?;

        labels
            .iter()
            .map(|label| {
                classes
                    .binary_search(label)
                    .map(|code| code as f32)
                    .map_err(|_| TabscoutError::validation(format!("unknown label {label:?}")))
            })
            .collect::<Result<Vec<f32>>>()
            .map(Vector::from_vec)
    }

    /// Fits and encodes in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels` is empty.
    pub fn fit_transform(&mut self, labels: &[String]) -> Result<Vector<f32>> {
        self.fit(labels)?;
        self.transform(labels)
    }
}

/// Holds an original dataset and its feature-scaled counterpart.
///
/// Only the configured feature columns change in the scaled view; the
/// identifier, name and target columns pass through as-is, so both views can
/// be indexed by the same row positions.
#[derive(Debug, Clone)]
pub struct DatasetScaler {
    original: DataFrame,
    scaled: DataFrame,
    scaler: StandardScaler,
}

impl DatasetScaler {
    /// Encodes and standardizes `features` of `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature column is missing or the dataset is empty.
    pub fn new<S: AsRef<str>>(dataset: DataFrame, features: &[S]) -> Result<Self> {
        let mut scaled = dataset.clone();

        if features.is_empty() {
            return Ok(Self {
                original: dataset,
                scaled,
                scaler: StandardScaler::new(),
            });
        }

        for name in features {
            let name = name.as_ref();
            if let Column::Categorical(labels) = dataset.column(name)? {
                let codes = LabelEncoder::new().fit_transform(labels)?;
                scaled.set_column(name, Column::Numeric(codes))?;
            }
        }

        let mut scaler = StandardScaler::new();
        let standardized = scaler.fit_transform(&scaled.select_matrix(features)?)?;
        for (j, name) in features.iter().enumerate() {
            scaled.set_column(name.as_ref(), Column::Numeric(standardized.column(j)))?;
        }

        Ok(Self {
            original: dataset,
            scaled,
            scaler,
        })
    }

    /// The dataset as given.
    #[must_use]
    pub fn original(&self) -> &DataFrame {
        &self.original
    }

    /// The dataset with encoded, standardized feature columns.
    #[must_use]
    pub fn scaled(&self) -> &DataFrame {
        &self.scaled
    }

    /// The fitted feature scaler.
    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Consumes the scaler, returning (original, scaled).
    #[must_use]
    pub fn into_parts(self) -> (DataFrame, DataFrame) {
        (self.original, self.scaled)
    }
}
