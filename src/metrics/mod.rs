//! Evaluation metrics.
//!
//! Regression metrics (R², MSE, MAE) feed the model evaluator, inertia feeds
//! the cluster sizer, and Pearson correlation backs the correlation report.

use crate::primitives::{Matrix, Vector};

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// where `SS_res` is the residual sum of squares and `SS_tot` is the total
/// sum of squares. A constant target (`SS_tot` = 0) scores 0.
///
/// # Examples
///
/// ```
/// use tabscout::metrics::r_squared;
/// use tabscout::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    let n = y_true.len() as f32;
    let ss_res = mse(y_pred, y_true) * n;
    let ss_tot = y_true.variance() * n;

    if ss_tot == 0.0 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Examples
///
/// ```
/// use tabscout::metrics::mse;
/// use tabscout::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// assert!((mse(&y_pred, &y_true) - 0.375).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    mean_residual(y_pred, y_true, |r| r * r)
}

/// Computes the Mean Absolute Error (MAE).
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    mean_residual(y_pred, y_true, f32::abs)
}

/// Mean of `loss(y_true - y_pred)` over all samples.
fn mean_residual(y_pred: &Vector<f32>, y_true: &Vector<f32>, loss: impl Fn(f32) -> f32) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let total: f32 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| loss(t - p))
        .sum();
    total / y_true.len() as f32
}

/// Computes the inertia (within-cluster sum of squares).
///
/// Inertia = Σ ||x - centroid||²
///
/// # Examples
///
/// ```
/// use tabscout::metrics::inertia;
/// use tabscout::primitives::Matrix;
///
/// let data = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,
///     1.0, 0.0,
///     0.0, 1.0,
///     1.0, 1.0,
/// ]).expect("4x2");
/// let centroids = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2");
/// let labels = vec![0, 0, 0, 0];
/// assert!((inertia(&data, &centroids, &labels) - 2.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn inertia(data: &Matrix<f32>, centroids: &Matrix<f32>, labels: &[usize]) -> f32 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| squared_distance(data.row_slice(i), centroids.row_slice(label)))
        .sum()
}

/// Squared Euclidean distance between two equally long points.
#[must_use]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Pearson correlation coefficient between two equally long samples.
///
/// Returns 0.0 when either sample has zero variance.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn pearson(a: &Vector<f32>, b: &Vector<f32>) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let mean_a = a.mean();
    let mean_b = b.mean();

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }

    cov / (var_a.sqrt() * var_b.sqrt())
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
