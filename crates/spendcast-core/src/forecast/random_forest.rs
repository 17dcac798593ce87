//! Bagged CART regression trees

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::model::Regressor;
use super::tree::{RegressionTree, TreeParams};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    params: RandomForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn new(params: RandomForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.is_empty() || x.len() != y.len() {
            return Err(Error::Fitting(format!(
                "random forest needs matching non-empty inputs (rows: {}, targets: {})",
                x.len(),
                y.len()
            )));
        }
        if self.params.n_estimators == 0 {
            return Err(Error::Fitting("n_estimators must be at least 1".to_string()));
        }

        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            ..TreeParams::default()
        };

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        for _ in 0..self.params.n_estimators {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut tree = RegressionTree::new(tree_params);
            tree.fit(x, y, &bootstrap)?;
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y: Vec<f64> = (0..40).map(|i| 3.0 * i as f64 + 5.0).collect();
        (x, y)
    }

    #[test]
    fn test_forest_fits_trend() {
        let (x, y) = linear_data();
        let mut forest = RandomForest::new(RandomForestParams::default());
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 100);

        let low = forest.predict_row(&[2.0, 2.0]);
        let high = forest.predict_row(&[37.0, 2.0]);
        assert!(high > low);
        assert!((low - 11.0).abs() < 15.0);
    }

    #[test]
    fn test_forest_is_deterministic() {
        let (x, y) = linear_data();
        let mut a = RandomForest::new(RandomForestParams::default());
        let mut b = RandomForest::new(RandomForestParams::default());
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_forest_rejects_mismatched_input() {
        let mut forest = RandomForest::new(RandomForestParams::default());
        assert!(forest.fit(&[vec![1.0]], &[1.0, 2.0]).is_err());
        assert!(forest.fit(&[], &[]).is_err());
    }
}
