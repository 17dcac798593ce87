//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendcast/config/spendcast.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! An override file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::forecast::{ForecastRequest, ModelFamily, ModelSettings, MAX_HORIZON};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/spendcast.toml");

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub forecast: ForecastConfig,
    pub tax: TaxConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub default_model: ModelFamily,
    pub default_horizon: u32,
    pub max_horizon: u32,
    /// Families run by `forecast --compare` when none are named
    pub compare_models: Vec<ModelFamily>,
    /// Advance calendar features with each forecast day instead of pinning them
    pub advance_calendar: bool,
    pub model: ModelSettings,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_model: ModelFamily::RandomForest,
            default_horizon: 30,
            max_horizon: MAX_HORIZON,
            compare_models: vec![ModelFamily::RandomForest, ModelFamily::Svm],
            advance_calendar: false,
            model: ModelSettings::default(),
        }
    }
}

impl ForecastConfig {
    /// Build a validated request, filling gaps from the configured defaults
    pub fn request(&self, model: Option<ModelFamily>, days: Option<u32>) -> Result<ForecastRequest> {
        let request = ForecastRequest::with_max_horizon(
            model.unwrap_or(self.default_model),
            days.unwrap_or(self.default_horizon),
            self.max_horizon,
        )?;
        Ok(request.with_advance_calendar(self.advance_calendar))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxConfig {
    /// Taxable income above this is flagged
    pub exemption_threshold: f64,
    /// Expense categories reported as potentially deductible
    pub deductible_categories: Vec<String>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            exemption_threshold: 250_000.0,
            deductible_categories: ["Healthcare", "Education", "Insurance", "Charity"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl TaxConfig {
    pub fn is_deductible(&self, category: &str) -> bool {
        self.deductible_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendcast").join("config").join("spendcast.toml"))
}

/// Load configuration (override first, then default)
pub fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    tax: Option<RawTax>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_model: Option<String>,
    default_horizon: Option<u32>,
    max_horizon: Option<u32>,
    compare_models: Option<Vec<String>>,
    seed: Option<u64>,
    test_fraction: Option<f64>,
    advance_calendar: Option<bool>,
    random_forest: Option<RawRandomForest>,
    svm: Option<RawSvm>,
    xgboost: Option<RawXgBoost>,
}

#[derive(Debug, Deserialize)]
struct RawRandomForest {
    n_estimators: Option<usize>,
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawSvm {
    c: Option<f64>,
    epsilon: Option<f64>,
    gamma: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawXgBoost {
    n_estimators: Option<usize>,
    learning_rate: Option<f64>,
    max_depth: Option<usize>,
    lambda: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTax {
    exemption_threshold: Option<f64>,
    deductible_categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
}

fn parse_family(name: &str) -> Result<ModelFamily> {
    name.parse()
        .map_err(|_| Error::Config(format!("Unknown model family '{}'", name)))
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AppConfig::default();

    if let Some(forecast) = raw.forecast {
        let target = &mut config.forecast;
        if let Some(model) = forecast.default_model {
            target.default_model = parse_family(&model)?;
        }
        if let Some(max) = forecast.max_horizon {
            if max == 0 || max > MAX_HORIZON {
                return Err(Error::Config(format!(
                    "max_horizon must be between 1 and {}",
                    MAX_HORIZON
                )));
            }
            target.max_horizon = max;
        }
        if let Some(horizon) = forecast.default_horizon {
            target.default_horizon = horizon;
        }
        if target.default_horizon == 0 || target.default_horizon > target.max_horizon {
            return Err(Error::Config(format!(
                "default_horizon must be between 1 and {}",
                target.max_horizon
            )));
        }
        if let Some(models) = forecast.compare_models {
            target.compare_models = models
                .iter()
                .map(|m| parse_family(m))
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(seed) = forecast.seed {
            target.model.seed = seed;
        }
        if let Some(fraction) = forecast.test_fraction {
            target.model.test_fraction = fraction;
        }
        if let Some(advance) = forecast.advance_calendar {
            target.advance_calendar = advance;
        }

        // Apply per-family hyperparameters
        if let Some(rf) = forecast.random_forest {
            if let Some(n) = rf.n_estimators {
                target.model.random_forest.n_estimators = n;
            }
            if rf.max_depth.is_some() {
                target.model.random_forest.max_depth = rf.max_depth;
            }
        }
        if let Some(svm) = forecast.svm {
            if let Some(c) = svm.c {
                target.model.svm.c = c;
            }
            if let Some(epsilon) = svm.epsilon {
                target.model.svm.epsilon = epsilon;
            }
            if svm.gamma.is_some() {
                target.model.svm.gamma = svm.gamma;
            }
        }
        if let Some(xgb) = forecast.xgboost {
            if let Some(n) = xgb.n_estimators {
                target.model.xgboost.n_estimators = n;
            }
            if let Some(lr) = xgb.learning_rate {
                target.model.xgboost.learning_rate = lr;
            }
            if let Some(depth) = xgb.max_depth {
                target.model.xgboost.max_depth = depth;
            }
            if let Some(lambda) = xgb.lambda {
                target.model.xgboost.lambda = lambda;
            }
        }
    }

    if let Some(tax) = raw.tax {
        if let Some(threshold) = tax.exemption_threshold {
            config.tax.exemption_threshold = threshold;
        }
        if let Some(categories) = tax.deductible_categories {
            config.tax.deductible_categories = categories;
        }
    }

    if let Some(display) = raw.display {
        if let Some(symbol) = display.currency_symbol {
            config.display.currency_symbol = symbol;
        }
    }

    Ok(config)
}
