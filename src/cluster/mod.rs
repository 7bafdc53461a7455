//! Clustering: K-Means and automatic cluster-count selection.

mod kmeans;
mod sizer;

pub use kmeans::KMeans;
pub use sizer::{ClusterSizer, CostCurve};
