//! Regression trees shared by the random forest and gradient boosting
//!
//! Split quality is measured as `S_l²/(n_l+λ) + S_r²/(n_r+λ) - S²/(n+λ)`, where
//! `S` is the target sum of a node. With `λ = 0` this is the variance
//! reduction used by CART; with `λ > 0` it is the second-order gain of
//! squared-error boosting (unit hessians). Leaves predict `S/(n+λ)`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest gain, relative to the parent score, that still counts as an improvement
const MIN_RELATIVE_GAIN: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// L2 regularisation on leaf values (0 for plain CART)
    pub lambda: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            lambda: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted binary regression tree stored as a node arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    params: TreeParams,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
        }
    }

    /// Fit on the rows listed in `sample` (duplicates allowed, for bootstrapping)
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64], sample: &[usize]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::Fitting("cannot fit a tree on zero samples".to_string()));
        }
        if x.len() != y.len() {
            return Err(Error::Fitting(format!(
                "feature rows ({}) and targets ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if let Some(bad) = sample.iter().find(|&&i| i >= x.len()) {
            return Err(Error::Fitting(format!("sample index {} out of range", bad)));
        }
        if sample.iter().any(|&i| !y[i].is_finite()) {
            return Err(Error::Fitting("non-finite target value".to_string()));
        }

        self.nodes.clear();
        self.grow(x, y, sample.to_vec(), 0);
        Ok(())
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = row.get(*feature).copied().unwrap_or(0.0);
                    idx = if v <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Grow the subtree for `sample` and return its node index
    fn grow(&mut self, x: &[Vec<f64>], y: &[f64], sample: Vec<usize>, depth: usize) -> usize {
        let sum: f64 = sample.iter().map(|&i| y[i]).sum();
        let n = sample.len() as f64;
        let leaf_value = sum / (n + self.params.lambda);

        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        let split = if depth_reached || sample.len() < self.params.min_samples_split {
            None
        } else {
            self.best_split(x, y, &sample, sum)
        };

        let idx = self.nodes.len();
        match split {
            None => {
                self.nodes.push(Node::Leaf { value: leaf_value });
            }
            Some(candidate) => {
                // Reserve the slot, children are appended after it
                self.nodes.push(Node::Leaf { value: leaf_value });
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = sample
                    .into_iter()
                    .partition(|&i| x[i][candidate.feature] <= candidate.threshold);
                let left = self.grow(x, y, left_rows, depth + 1);
                let right = self.grow(x, y, right_rows, depth + 1);
                self.nodes[idx] = Node::Split {
                    feature: candidate.feature,
                    threshold: candidate.threshold,
                    left,
                    right,
                };
            }
        }
        idx
    }

    fn best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        sample: &[usize],
        total: f64,
    ) -> Option<SplitCandidate> {
        let lambda = self.params.lambda;
        let n = sample.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let parent_score = total * total / (n as f64 + lambda);
        let min_gain = MIN_RELATIVE_GAIN * parent_score.max(1.0);
        let width = x[sample[0]].len();

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..width {
            column.clear();
            column.extend(sample.iter().map(|&i| (x[i][feature], y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += column[k - 1].1;
                if column[k - 1].0 == column[k].0 {
                    continue;
                }
                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / (k as f64 + lambda)
                    + right_sum * right_sum / ((n - k) as f64 + lambda)
                    - parent_score;
                if gain > min_gain && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (column[k - 1].0 + column[k].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}
