//! Linear models for regression.
//!
//! Includes Ordinary Least Squares ([`LinearRegression`]), L2-regularized
//! [`Ridge`] and L1-regularized [`Lasso`].

mod lasso;

pub use lasso::Lasso;

use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets. The model equation is:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Solver
///
/// Uses normal equations: `β = (X^T X)^-1 X^T y` via Cholesky decomposition.
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).expect("well-conditioned data");
///
/// let r2 = model.score(&x, &y);
/// assert!(r2 > 0.99);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n²p + p³) where n = samples, p = features
/// - Space complexity: O(np)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Estimator for LinearRegression {
    /// Fits the linear regression model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input dimensions don't match
    /// - Not enough samples for the number of features (underdetermined system)
    /// - Matrix is singular (not positive definite)
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        check_training_shape(x, y)?;

        let required_samples = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_samples < required_samples {
            return Err(TabscoutError::validation(
                "Insufficient samples: LinearRegression requires at least as many samples as \
                 features (plus 1 if fitting intercept)",
            ));
        }

        let (coefficients, intercept) = solve_normal_equations(x, y, 0.0, self.fit_intercept)?;
        self.coefficients = Some(coefficients);
        self.intercept = intercept;
        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        linear_predict(self.coefficients.as_ref(), self.intercept, x)
    }
}

/// Ridge regression with L2 regularization.
///
/// ```text
/// minimize ||y - Xβ||² + α||β||²
/// ```
///
/// The intercept is never penalized. Because `α > 0` keeps `X^T X + αI`
/// positive definite, Ridge fits subsets where OLS reports a singular system.
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
///
/// let x = Matrix::from_vec(4, 2, vec![
///     1.0, 2.0,
///     2.0, 4.0,
///     3.0, 6.0,
///     4.0, 8.0,
/// ]).expect("4x2");
/// let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
///
/// // Perfectly collinear columns still fit.
/// let mut model = Ridge::new(1.0);
/// model.fit(&x, &y).expect("regularized system is positive definite");
/// assert!(model.score(&x, &y) > 0.9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ridge {
    /// Regularization strength.
    alpha: f32,
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Ridge {
    /// Creates a new `Ridge` regression with the given regularization strength.
    ///
    /// # Arguments
    ///
    /// * `alpha` - Regularization strength. Must be non-negative; 0.0 is OLS.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Estimator for Ridge {
    /// Fits by solving `(X^T X + αI) β = X^T y`.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match, alpha is negative or the
    /// regularized system is singular.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        check_training_shape(x, y)?;

        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "alpha".to_string(),
                value: self.alpha.to_string(),
                constraint: ">= 0".to_string(),
            });
        }

        let (coefficients, intercept) =
            solve_normal_equations(x, y, self.alpha, self.fit_intercept)?;
        self.coefficients = Some(coefficients);
        self.intercept = intercept;
        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        linear_predict(self.coefficients.as_ref(), self.intercept, x)
    }
}

/// Rejects empty inputs and row-count mismatches.
pub(crate) fn check_training_shape(x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
    let n_samples = x.n_rows();
    if n_samples != y.len() {
        return Err(TabscoutError::dimension_mismatch(
            "samples",
            n_samples,
            y.len(),
        ));
    }
    if n_samples == 0 {
        return Err("Cannot fit with zero samples".into());
    }
    Ok(())
}

/// Adds an intercept column of ones to the design matrix.
fn add_intercept_column(x: &Matrix<f32>) -> Matrix<f32> {
    let (n_rows, n_cols) = x.shape();
    let mut data = Vec::with_capacity(n_rows * (n_cols + 1));

    for i in 0..n_rows {
        data.push(1.0);
        data.extend_from_slice(x.row_slice(i));
    }

    Matrix::from_vec(n_rows, n_cols + 1, data)
        .expect("Internal error: failed to create design matrix")
}

/// Solves the (optionally L2-regularized) normal equations.
///
/// Returns `(coefficients, intercept)`; the intercept is never regularized.
fn solve_normal_equations(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    alpha: f32,
    fit_intercept: bool,
) -> Result<(Vector<f32>, f32)> {
    let n_features = x.n_cols();
    let x_design = if fit_intercept {
        add_intercept_column(x)
    } else {
        x.clone()
    };

    let mut xtx = x_design.gram();

    if alpha > 0.0 {
        let first = usize::from(fit_intercept);
        for i in first..xtx.n_rows() {
            let current = xtx.get(i, i);
            xtx.set(i, i, current + alpha);
        }
    }

    let xty = x_design.transpose_matvec(y)?;
    let beta = xtx
        .cholesky_solve(&xty)
        .map_err(|reason| TabscoutError::SingularMatrix {
            reason: reason.to_string(),
        })?;

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(TabscoutError::SingularMatrix {
            reason: "normal equations produced non-finite coefficients".to_string(),
        });
    }

    if fit_intercept {
        Ok((beta.slice(1, n_features + 1), beta[0]))
    } else {
        Ok((beta, 0.0))
    }
}

/// `X β + intercept`.
pub(crate) fn linear_predict(
    coefficients: Option<&Vector<f32>>,
    intercept: f32,
    x: &Matrix<f32>,
) -> Vector<f32> {
    let coefficients = coefficients.expect("Model not fitted. Call fit() first.");

    x.matvec(coefficients)
        .expect("Matrix dimensions don't match coefficients")
        .add_scalar(intercept)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
