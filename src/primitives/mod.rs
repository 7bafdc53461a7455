//! Core compute primitives (Vector, Matrix).
//!
//! Every estimator, metric and clustering routine operates on these two types.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
