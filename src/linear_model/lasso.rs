use super::{check_training_shape, linear_predict};
use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Lasso regression with L1 regularization.
///
/// ```text
/// minimize (1 / 2n) ||y - Xβ||² + α||β||₁
/// ```
///
/// # Solver
///
/// Cyclic coordinate descent with soft-thresholding on centered data. If the
/// largest coefficient update is still above `tol` after `max_iter` sweeps,
/// `fit` returns [`TabscoutError::ConvergenceFailure`] instead of keeping a
/// half-optimized model.
///
/// # Examples
///
/// ```
/// use tabscout::prelude::*;
/// use tabscout::linear_model::Lasso;
///
/// let x = Matrix::from_vec(5, 2, vec![
///     1.0, 2.0,
///     2.0, 3.0,
///     3.0, 4.0,
///     4.0, 5.0,
///     5.0, 6.0,
/// ]).expect("Valid matrix dimensions");
/// let y = Vector::from_slice(&[5.0, 8.0, 11.0, 14.0, 17.0]);
///
/// let mut model = Lasso::new(0.1);
/// model.fit(&x, &y).expect("Fit should succeed with valid data");
/// assert!(model.score(&x, &y) > 0.9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lasso {
    /// Regularization strength.
    alpha: f32,
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
    /// Maximum number of coordinate descent sweeps.
    max_iter: usize,
    /// Convergence threshold on the largest coefficient change.
    tol: f32,
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Lasso {
    /// Creates a new `Lasso` with the given regularization strength.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
            max_iter: 1000,
            tol: 1e-4,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Soft-thresholding operator: `sign(x) * max(|x| - λ, 0)`.
    #[must_use]
    pub fn soft_threshold(x: f32, lambda: f32) -> f32 {
        if x > lambda {
            x - lambda
        } else if x < -lambda {
            x + lambda
        } else {
            0.0
        }
    }
}

impl Estimator for Lasso {
    /// Fits the Lasso model using coordinate descent.
    ///
    /// # Errors
    ///
    /// Returns an error if input dimensions don't match, alpha is negative or
    /// the solver does not converge within `max_iter` sweeps.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        check_training_shape(x, y)?;

        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(TabscoutError::InvalidHyperparameter {
                param: "alpha".to_string(),
                value: self.alpha.to_string(),
                constraint: ">= 0".to_string(),
            });
        }

        let n = n_samples as f32;
        let (x_mean, y_mean) = if self.fit_intercept {
            let x_mean: Vec<f32> = (0..n_features).map(|j| x.column(j).mean()).collect();
            (x_mean, y.mean())
        } else {
            (vec![0.0; n_features], 0.0)
        };

        // Column-major centered copy keeps the inner loops contiguous.
        let columns: Vec<Vec<f32>> = (0..n_features)
            .map(|j| (0..n_samples).map(|i| x.get(i, j) - x_mean[j]).collect())
            .collect();
        let col_norms_sq: Vec<f32> = columns
            .iter()
            .map(|col| col.iter().map(|v| v * v).sum::<f32>() / n)
            .collect();

        let mut residual: Vec<f32> = y.iter().map(|&v| v - y_mean).collect();
        let mut beta = vec![0.0f32; n_features];
        let mut max_change = f32::INFINITY;
        let mut converged = false;

        for _ in 0..self.max_iter {
            max_change = 0.0;

            for j in 0..n_features {
                if col_norms_sq[j] < 1e-10 {
                    continue;
                }

                let old_beta = beta[j];
                let rho = columns[j]
                    .iter()
                    .zip(&residual)
                    .map(|(xij, r)| xij * r)
                    .sum::<f32>()
                    / n
                    + col_norms_sq[j] * old_beta;

                beta[j] = Self::soft_threshold(rho, self.alpha) / col_norms_sq[j];

                let delta = beta[j] - old_beta;
                if delta != 0.0 {
                    for (r, xij) in residual.iter_mut().zip(&columns[j]) {
                        *r -= xij * delta;
                    }
                }
                max_change = max_change.max(delta.abs());
            }

            if max_change < self.tol {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(TabscoutError::ConvergenceFailure {
                iterations: self.max_iter,
                final_loss: f64::from(max_change),
            });
        }

        self.intercept = if self.fit_intercept {
            y_mean
                - beta
                    .iter()
                    .zip(&x_mean)
                    .map(|(b, m)| b * m)
                    .sum::<f32>()
        } else {
            0.0
        };
        self.coefficients = Some(Vector::from_vec(beta));
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
