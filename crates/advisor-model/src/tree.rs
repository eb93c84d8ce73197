//! # Regression Trees
//!
//! One tree per class per boosting round, grown by exact greedy search over
//! first- and second-order gradient statistics:
//!
//! ```text
//! leaf weight  w   = -G / (H + λ)
//! split gain       = ½ · [ G_L²/(H_L+λ) + G_R²/(H_R+λ) - G²/(H+λ) ]
//! ```
//!
//! Candidate thresholds are midpoints between adjacent distinct values. A row
//! goes left when `x[feature] < threshold`. A split is kept only if both
//! children carry at least `min_child_weight` hessian mass and the gain is
//! positive. Among equal gains the first feature (schema order) and the
//! lowest threshold win, so growth is deterministic.

use serde::{Deserialize, Serialize};

/// Gains at or below this are treated as no improvement.
const MIN_SPLIT_GAIN: f64 = 1e-6;

/// A node of a fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        /// Leaf output, already scaled by the learning rate.
        weight: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        gain: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Margin contribution of this tree for one row.
    ///
    /// The caller guarantees `x` is at least as wide as the largest feature
    /// index in the tree (see [`TreeNode::max_feature`]).
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { weight } => return *weight,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if x[*feature] < *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Largest feature index used by any split, if the tree splits at all.
    pub fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => Some(
                (*feature)
                    .max(left.max_feature().unwrap_or(0))
                    .max(right.max_feature().unwrap_or(0)),
            ),
        }
    }

    /// Add each split's gain to `gains[feature]` and count it.
    pub(crate) fn accumulate_gain(&self, gains: &mut [f64], counts: &mut [usize]) {
        if let TreeNode::Split {
            feature,
            gain,
            left,
            right,
            ..
        } = self
        {
            gains[*feature] += gain;
            counts[*feature] += 1;
            left.accumulate_gain(gains, counts);
            right.accumulate_gain(gains, counts);
        }
    }
}

/// Growth constraints for a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowthParams {
    pub max_depth: usize,
    pub reg_lambda: f64,
    pub min_child_weight: f64,
    pub learning_rate: f64,
}

/// Fit one tree to per-row gradients and hessians.
pub(crate) fn fit_tree(
    rows: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    params: &GrowthParams,
) -> TreeNode {
    let indices: Vec<usize> = (0..rows.len()).collect();
    grow(rows, grad, hess, indices, 0, params)
}

fn grow(
    rows: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    indices: Vec<usize>,
    depth: usize,
    params: &GrowthParams,
) -> TreeNode {
    let g: f64 = indices.iter().map(|&i| grad[i]).sum();
    let h: f64 = indices.iter().map(|&i| hess[i]).sum();
    let leaf = TreeNode::Leaf {
        weight: params.learning_rate * leaf_weight(g, h, params.reg_lambda),
    };
    if depth >= params.max_depth || indices.len() < 2 {
        return leaf;
    }
    let Some(best) = best_split(rows, grad, hess, &indices, g, h, params) else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| rows[i][best.feature] < best.threshold);

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        gain: best.gain,
        left: Box::new(grow(rows, grad, hess, left, depth + 1, params)),
        right: Box::new(grow(rows, grad, hess, right, depth + 1, params)),
    }
}

struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn best_split(
    rows: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    indices: &[usize],
    g: f64,
    h: f64,
    params: &GrowthParams,
) -> Option<Candidate> {
    let lambda = params.reg_lambda;
    let parent = structure_score(g, h, lambda);
    let n_features = rows[indices[0]].len();
    let mut order = indices.to_vec();
    let mut best: Option<Candidate> = None;

    for feature in 0..n_features {
        order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));
        let (mut gl, mut hl) = (0.0, 0.0);
        for pos in 0..order.len() - 1 {
            let i = order[pos];
            gl += grad[i];
            hl += hess[i];
            let value = rows[i][feature];
            let next = rows[order[pos + 1]][feature];
            if value == next {
                continue;
            }
            let (gr, hr) = (g - gl, h - hl);
            if hl < params.min_child_weight || hr < params.min_child_weight {
                continue;
            }
            let gain = 0.5
                * (structure_score(gl, hl, lambda) + structure_score(gr, hr, lambda) - parent);
            if gain > MIN_SPLIT_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(Candidate {
                    feature,
                    threshold: value + (next - value) / 2.0,
                    gain,
                });
            }
        }
    }
    best
}

fn structure_score(g: f64, h: f64, lambda: f64) -> f64 {
    g * g / (h + lambda)
}

fn leaf_weight(g: f64, h: f64, lambda: f64) -> f64 {
    -g / (h + lambda)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_depth: usize) -> GrowthParams {
        GrowthParams {
            max_depth,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            learning_rate: 1.0,
        }
    }

    #[test]
    fn separable_feature_gets_a_midpoint_split() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![0.0, i as f64]).collect();
        // First five rows pull the margin up, last five down.
        let grad: Vec<f64> = (0..10).map(|i| if i < 5 { -1.0 } else { 1.0 }).collect();
        let hess = vec![1.0; 10];
        let tree = fit_tree(&rows, &grad, &hess, &params(1));
        match &tree {
            TreeNode::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 1);
                assert_eq!(*threshold, 4.5);
            }
            TreeNode::Leaf { .. } => panic!("expected a split"),
        }
        // w = -G/(H+λ) = 5/6 on the left.
        assert!((tree.evaluate(&[0.0, 1.0]) - 5.0 / 6.0).abs() < 1e-12);
        assert!((tree.evaluate(&[0.0, 9.0]) + 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn constant_features_produce_a_leaf() {
        let rows = vec![vec![1.0, 1.0]; 6];
        let grad = vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
        let tree = fit_tree(&rows, &grad, &[1.0; 6], &params(6));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.max_feature(), None);
    }

    #[test]
    fn min_child_weight_blocks_tiny_children() {
        let rows: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
        let grad = vec![-1.0, 1.0, 1.0, 1.0];
        // Each row carries 0.4 hessian; a child needs at least 1.0, and no
        // cut of four rows gives both sides three.
        let tree = fit_tree(&rows, &grad, &[0.4; 4], &params(3));
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn depth_is_bounded() {
        let rows: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let grad: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let tree = fit_tree(&rows, &grad, &[1.0; 64], &params(3));
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn gain_is_attributed_to_split_feature() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![0.0, i as f64]).collect();
        let grad: Vec<f64> = (0..10).map(|i| if i < 5 { -1.0 } else { 1.0 }).collect();
        let tree = fit_tree(&rows, &grad, &[1.0; 10], &params(1));
        let mut gains = vec![0.0; 2];
        let mut counts = vec![0; 2];
        tree.accumulate_gain(&mut gains, &mut counts);
        assert_eq!(counts, vec![0, 1]);
        assert!(gains[1] > 0.0);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let tree = TreeNode::Leaf { weight: 0.25 };
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["kind"], "leaf");
    }
}
