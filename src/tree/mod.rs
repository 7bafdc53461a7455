//! Decision tree regression (CART).
//!
//! Splits minimize the weighted variance of the two children, which is the
//! same as maximizing MSE reduction. Leaves predict the mean target of the
//! training samples that reach them.
//!
//! # Example
//!
//! ```
//! use tabscout::prelude::*;
//! use tabscout::tree::DecisionTreeRegressor;
//!
//! let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).expect("6x1");
//! let y = Vector::from_slice(&[1.0, 1.0, 1.0, 5.0, 5.0, 5.0]);
//!
//! let mut tree = DecisionTreeRegressor::new().with_max_depth(2);
//! tree.fit(&x, &y).expect("fit should succeed");
//! assert!((tree.predict(&x)[4] - 5.0).abs() < 1e-6);
//! ```

use crate::error::{Result, TabscoutError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves below this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 1,
            RegressionTreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }
}

/// Decision tree regressor using the CART algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with unlimited depth.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split (clamped to >= 2).
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets the minimum number of samples per leaf (clamped to >= 1).
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Returns the fitted tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&RegressionTreeNode> {
        self.tree.as_ref()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    fn predict_one(tree: &RegressionTreeNode, sample: &[f32]) -> f32 {
        let mut node = tree;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

impl Estimator for DecisionTreeRegressor {
    /// Grows the tree on the training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, misaligned or contains NaN.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
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
        if x.as_slice().iter().chain(y.iter()).any(|v| v.is_nan()) {
            return Err(TabscoutError::validation(
                "DecisionTreeRegressor cannot split on NaN values",
            ));
        }

        let builder = TreeBuilder {
            x,
            y: y.as_slice(),
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };
        let mut indices: Vec<usize> = (0..n_samples).collect();
        self.tree = Some(builder.build(&mut indices, 0));
        Ok(())
    }

    /// Predicts target values for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before fit()
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let tree = self.tree.as_ref().expect("Model not fitted. Call fit() first.");
        (0..x.n_rows())
            .map(|row| Self::predict_one(tree, x.row_slice(row)))
            .collect()
    }
}

/// Candidate split found while scanning one feature.
struct Split {
    feature_idx: usize,
    threshold: f32,
    /// Sum of squared errors of both children.
    sse: f64,
}

/// Recursive builder over a shared index buffer.
struct TreeBuilder<'a> {
    x: &'a Matrix<f32>,
    y: &'a [f32],
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: &mut [usize], depth: usize) -> RegressionTreeNode {
        let n_samples = indices.len();
        let (mean, sse) = self.mean_and_sse(indices);

        if n_samples < self.min_samples_split
            || self.max_depth.is_some_and(|max_d| depth >= max_d)
            || sse < 1e-10
        {
            return leaf(mean, n_samples);
        }

        let Some(split) = self.best_split(indices, sse) else {
            return leaf(mean, n_samples);
        };

        // Partition in place: rows with feature <= threshold first.
        let mut boundary = 0;
        for i in 0..n_samples {
            if self.x.get(indices[i], split.feature_idx) <= split.threshold {
                indices.swap(i, boundary);
                boundary += 1;
            }
        }
        let (left, right) = indices.split_at_mut(boundary);

        RegressionTreeNode::Node(RegressionNode {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(self.build(left, depth + 1)),
            right: Box::new(self.build(right, depth + 1)),
        })
    }

    fn mean_and_sse(&self, indices: &[usize]) -> (f32, f64) {
        let n = indices.len() as f64;
        let sum: f64 = indices.iter().map(|&i| f64::from(self.y[i])).sum();
        let sum_sq: f64 = indices
            .iter()
            .map(|&i| f64::from(self.y[i]) * f64::from(self.y[i]))
            .sum();
        let mean = sum / n;
        (mean as f32, (sum_sq - sum * mean).max(0.0))
    }

    /// Scans every feature with running sums over the sorted rows.
    ///
    /// Only splits that strictly reduce the parent SSE are returned; on equal
    /// reduction the earlier feature wins.
    fn best_split(&self, indices: &[usize], parent_sse: f64) -> Option<Split> {
        let n_samples = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| f64::from(self.y[i])).sum();
        let total_sq: f64 = indices
            .iter()
            .map(|&i| f64::from(self.y[i]) * f64::from(self.y[i]))
            .sum();

        let mut best: Option<Split> = None;
        let mut order: Vec<usize> = indices.to_vec();

        for feature_idx in 0..self.x.n_cols() {
            order.sort_by(|&a, &b| {
                self.x
                    .get(a, feature_idx)
                    .total_cmp(&self.x.get(b, feature_idx))
            });

            let mut left_sum = 0.0f64;
            let mut left_sq = 0.0f64;

            for pos in 0..n_samples - 1 {
                let yi = f64::from(self.y[order[pos]]);
                left_sum += yi;
                left_sq += yi * yi;

                let here = self.x.get(order[pos], feature_idx);
                let next = self.x.get(order[pos + 1], feature_idx);
                if here == next {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n_samples - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if sse < parent_sse - 1e-12 && best.as_ref().map_or(true, |b| sse < b.sse) {
                    best = Some(Split {
                        feature_idx,
                        threshold: (here + next) / 2.0,
                        sse,
                    });
                }
            }
        }

        best
    }
}

fn leaf(value: f32, n_samples: usize) -> RegressionTreeNode {
    RegressionTreeNode::Leaf(RegressionLeaf { value, n_samples })
}
