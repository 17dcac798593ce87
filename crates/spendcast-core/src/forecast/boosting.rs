//! Gradient-boosted regression trees (squared error, XGBoost-style gain)

use serde::{Deserialize, Serialize};

use super::model::Regressor;
use super::tree::{RegressionTree, TreeParams};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            lambda: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GradientBoosting {
    params: BoostingParams,
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoosting {
    pub fn new(params: BoostingParams) -> Self {
        Self {
            params,
            base_score: 0.0,
            trees: Vec::new(),
        }
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }
}

impl Regressor for GradientBoosting {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.is_empty() || x.len() != y.len() {
            return Err(Error::Fitting(format!(
                "boosting needs matching non-empty inputs (rows: {}, targets: {})",
                x.len(),
                y.len()
            )));
        }
        let lr = self.params.learning_rate;
        if lr.is_nan() || lr <= 0.0 || self.params.lambda.is_nan() || self.params.lambda < 0.0 {
            return Err(Error::Fitting(
                "learning_rate must be positive and lambda non-negative".to_string(),
            ));
        }

        let n = x.len();
        let base_score = y.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![base_score; n];
        let all: Vec<usize> = (0..n).collect();
        let tree_params = TreeParams {
            max_depth: Some(self.params.max_depth),
            min_samples_split: 2,
            min_samples_leaf: 1,
            lambda: self.params.lambda,
        };

        let mut trees = Vec::with_capacity(self.params.n_estimators);
        for _ in 0..self.params.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&predictions).map(|(t, p)| t - p).collect();
            let mut tree = RegressionTree::new(tree_params);
            tree.fit(x, &residuals, &all)?;
            for (pred, row) in predictions.iter_mut().zip(x) {
                *pred += self.params.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        self.base_score = base_score;
        self.trees = trees;
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|t| self.params.learning_rate * t.predict_row(row))
                .sum::<f64>()
    }
}
