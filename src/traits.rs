//! Core traits for ML estimators and transformers.
//!
//! The regression catalog and the clustering sizer only ever talk to
//! algorithms through these capability interfaces.

use crate::error::Result;
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised regression estimators.
///
/// Estimators implement fit/predict/score following sklearn conventions.
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
///
/// // y = 2x + 1
/// let x_train = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
/// let y_train = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x_train, &y_train).expect("well-conditioned data");
/// let score = model.score(&x_train, &y_train);
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular matrix,
    /// no convergence, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Panics
    ///
    /// Implementations panic if called before a successful `fit`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Computes the R² score on the given data.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let y_pred = self.predict(x);
        r_squared(&y_pred, y)
    }
}

/// Regressor trait object as produced by the catalog.
pub type BoxedEstimator = Box<dyn Estimator + Send + Sync>;

/// Trait for unsupervised learning models.
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0,
///     10.0, 10.0, 10.1, 10.1, 10.0, 10.2,
/// ]).expect("6x2");
///
/// let mut kmeans = KMeans::new(2).with_random_state(42);
/// kmeans.fit(&data).expect("separable data converges");
/// let labels = kmeans.predict(&data);
/// assert_eq!(labels.len(), 6);
/// ```
pub trait UnsupervisedEstimator {
    /// The type of labels/clusters produced.
    type Labels;

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters,
    /// no convergence).
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Predicts cluster assignments or transforms data.
    fn predict(&self, x: &Matrix<f32>) -> Self::Labels;
}

/// A clustering model whose fit quality is measured by inertia.
pub trait Clusterer: UnsupervisedEstimator<Labels = Vec<usize>> {
    /// Number of clusters the model was configured with.
    fn n_clusters(&self) -> usize;

    /// Within-cluster sum of squared distances after fitting.
    fn inertia(&self) -> f32;
}

/// Trait for data transformers (scalers, encoders, etc.).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabscoutError;

    // Predicts the training mean regardless of input.
    struct MeanEstimator {
        mean: Option<f32>,
    }

    impl Estimator for MeanEstimator {
        fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
            if x.n_rows() != y.len() {
                return Err(TabscoutError::dimension_mismatch("rows", x.n_rows(), y.len()));
            }
            self.mean = Some(y.mean());
            Ok(())
        }

        fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
            let mean = self.mean.expect("Model not fitted. Call fit() first.");
            Vector::from_vec(vec![mean; x.n_rows()])
        }
    }

    #[test]
    fn test_default_score_is_r_squared() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
        let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);

        let mut model = MeanEstimator { mean: None };
        model.fit(&x, &y).expect("fit should succeed");

        // Predicting the mean everywhere gives R² = 0.
        assert!(model.score(&x, &y).abs() < 1e-6);
    }

    #[test]
    fn test_fit_dimension_mismatch() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("3x1");
        let y = Vector::from_slice(&[1.0, 2.0]);

        let mut model = MeanEstimator { mean: None };
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_boxed_estimator_dispatch() {
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
        let y = Vector::from_slice(&[4.0, 6.0]);

        let mut model: BoxedEstimator = Box::new(MeanEstimator { mean: None });
        model.fit(&x, &y).expect("fit should succeed");
        assert_eq!(model.predict(&x).as_slice(), &[5.0, 5.0]);
    }
}
