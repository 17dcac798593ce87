//! Regressor seam and the model-family registry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::boosting::{BoostingParams, GradientBoosting};
use super::random_forest::{RandomForest, RandomForestParams};
use super::svr::{Svr, SvrParams};
use crate::error::{Error, Result};

/// A regression model over dense feature rows
pub trait Regressor: Send + Sync + fmt::Debug {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    fn predict_row(&self, row: &[f64]) -> f64;

    fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }
}

/// The supported regressor families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    #[serde(rename = "RandomForest")]
    RandomForest,
    #[serde(rename = "SVM")]
    Svm,
    #[serde(rename = "XGBoost")]
    XgBoost,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 3] = [Self::RandomForest, Self::Svm, Self::XgBoost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "RandomForest",
            Self::Svm => "SVM",
            Self::XgBoost => "XGBoost",
        }
    }

    /// Construct an unfitted regressor for this family
    pub fn build(&self, settings: &ModelSettings) -> Result<Box<dyn Regressor>> {
        REGISTRY
            .iter()
            .find(|(family, _)| family == self)
            .map(|(_, construct)| construct(settings))
            .ok_or_else(invalid_model)
    }
}

fn invalid_model() -> Error {
    Error::InvalidInput("Invalid model type specified.".to_string())
}

impl FromStr for ModelFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "randomforest" | "random_forest" | "rf" => Ok(Self::RandomForest),
            "svm" | "svr" => Ok(Self::Svm),
            "xgboost" | "xgb" | "boosting" => Ok(Self::XgBoost),
            _ => Err(invalid_model()),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

type Constructor = fn(&ModelSettings) -> Box<dyn Regressor>;

const REGISTRY: &[(ModelFamily, Constructor)] = &[
    (ModelFamily::RandomForest, build_random_forest),
    (ModelFamily::Svm, build_svr),
    (ModelFamily::XgBoost, build_boosting),
];

fn build_random_forest(settings: &ModelSettings) -> Box<dyn Regressor> {
    Box::new(RandomForest::new(RandomForestParams {
        seed: settings.seed,
        ..settings.random_forest
    }))
}

fn build_svr(settings: &ModelSettings) -> Box<dyn Regressor> {
    Box::new(Svr::new(settings.svm))
}

fn build_boosting(settings: &ModelSettings) -> Box<dyn Regressor> {
    Box::new(GradientBoosting::new(settings.xgboost))
}

/// Fixed hyperparameters for training (no search is performed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Seeds both the train/test shuffle and the forest bootstrap
    pub seed: u64,
    pub test_fraction: f64,
    pub random_forest: RandomForestParams,
    pub svm: SvrParams,
    pub xgboost: BoostingParams,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            random_forest: RandomForestParams::default(),
            svm: SvrParams::default(),
            xgboost: BoostingParams::default(),
        }
    }
}
