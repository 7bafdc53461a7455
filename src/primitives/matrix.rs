//! Matrix type for 2D numeric data.

use super::Vector;
use serde::{Deserialize, Serialize};

/// A 2D matrix of floating-point values (row-major storage).
///
/// # Examples
///
/// ```
/// use tabscout::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix from equally long columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length.
    pub fn from_columns(columns: &[&[T]]) -> Result<Self, &'static str> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, |c| c.len());
        if columns.iter().any(|c| c.len() != rows) {
            return Err("All columns must have the same length");
        }

        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for column in columns {
                data.push(column[row]);
            }
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrows a row without copying.
    #[must_use]
    pub fn row_slice(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns a column as a Vector.
    #[must_use]
    pub fn column(&self, col_idx: usize) -> Vector<T> {
        let data: Vec<T> = (0..self.rows)
            .map(|row| self.data[row * self.cols + col_idx])
            .collect();
        Vector::from_vec(data)
    }

    /// Gathers the rows at `indices`, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            data.extend_from_slice(self.row_slice(idx));
        }
        Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f32> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Gram matrix `XᵀX` (`n_cols x n_cols`, symmetric).
    #[must_use]
    pub fn gram(&self) -> Self {
        let p = self.cols;
        let mut gram = Self::zeros(p, p);
        for row in self.data.chunks_exact(p.max(1)) {
            for i in 0..p {
                let xi = row[i];
                for j in i..p {
                    gram.data[i * p + j] += xi * row[j];
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                gram.data[i * p + j] = gram.data[j * p + i];
            }
        }
        gram
    }

    /// `X v`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v.len() != n_cols`.
    pub fn matvec(&self, v: &Vector<f32>) -> Result<Vector<f32>, &'static str> {
        if self.cols != v.len() {
            return Err("Matrix columns must match vector length");
        }
        Ok((0..self.rows)
            .map(|i| {
                self.row_slice(i)
                    .iter()
                    .zip(v.as_slice())
                    .map(|(a, b)| a * b)
                    .sum::<f32>()
            })
            .collect())
    }

    /// `Xᵀ v`, without materializing the transpose.
    ///
    /// # Errors
    ///
    /// Returns an error if `v.len() != n_rows`.
    pub fn transpose_matvec(&self, v: &Vector<f32>) -> Result<Vector<f32>, &'static str> {
        if self.rows != v.len() {
            return Err("Matrix rows must match vector length");
        }
        let mut out = vec![0.0; self.cols];
        for (i, &weight) in v.iter().enumerate() {
            for (acc, &x) in out.iter_mut().zip(self.row_slice(i)) {
                *acc += weight * x;
            }
        }
        Ok(Vector::from_vec(out))
    }

    /// Solves `A x = b` for symmetric positive definite `A` by Cholesky
    /// factorization `A = L Lᵀ`.
    ///
    /// # Errors
    ///
    /// Returns an error if `A` is not square, `b` has the wrong length, or a
    /// pivot is not positive (the matrix is singular or indefinite).
    pub fn cholesky_solve(&self, b: &Vector<f32>) -> Result<Vector<f32>, &'static str> {
        if self.rows != self.cols {
            return Err("Matrix must be square for Cholesky decomposition");
        }
        if self.rows != b.len() {
            return Err("Matrix rows must match vector length");
        }

        let n = self.rows;
        let mut l = Self::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let dot: f32 = (0..j).map(|k| l.get(i, k) * l.get(j, k)).sum();
                if i == j {
                    let pivot = self.get(i, i) - dot;
                    // Relative floor: rounding can leave a tiny positive pivot
                    // on a rank-deficient matrix.
                    if pivot <= self.get(i, i).abs() * 1e-6 {
                        return Err("Matrix is not positive definite");
                    }
                    l.set(i, i, pivot.sqrt());
                } else {
                    l.set(i, j, (self.get(i, j) - dot) / l.get(j, j));
                }
            }
        }

        // Forward substitution: L y = b.
        let mut y = vec![0.0_f32; n];
        for i in 0..n {
            let dot: f32 = (0..i).map(|k| l.get(i, k) * y[k]).sum();
            y[i] = (b[i] - dot) / l.get(i, i);
        }

        // Back substitution: Lᵀ x = y.
        let mut x = vec![0.0_f32; n];
        for i in (0..n).rev() {
            let dot: f32 = ((i + 1)..n).map(|k| l.get(k, i) * x[k]).sum();
            x[i] = (y[i] - dot) / l.get(i, i);
        }

        Ok(Vector::from_vec(x))
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
