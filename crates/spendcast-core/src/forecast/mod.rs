//! Expense Forecasting - daily spend prediction from the ledger
//!
//! Turns an irregular transaction ledger into a per-expense-day series with
//! calendar and lag features, trains one of three fixed regressor families,
//! and rolls predictions forward day by day.
//!
//! ## Pipeline
//!
//! - **Feature Builder** ([`features`]) - daily totals, calendar parts, `lag_1..lag_7`
//! - **Model Trainer** ([`trainer`]) - 80/20 split, standard scaling, MAE and R²
//! - **Recursive Forecaster** ([`forecaster`]) - feeds each prediction back as a lag
//!
//! Nothing here is persisted: a model lives for one request.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendcast_core::forecast::{run_forecast, ForecastRequest, ModelFamily, ModelSettings};
//!
//! let ledger = db.load_transactions("alice")?;
//! let request = ForecastRequest::new(ModelFamily::RandomForest, 30)?;
//! let report = run_forecast(&ledger, &request, &ModelSettings::default())?;
//! ```

pub mod boosting;
pub mod features;
pub mod forecaster;
pub mod metrics;
pub mod model;
pub mod random_forest;
pub mod scaler;
pub mod split;
pub mod svr;
pub mod trainer;
pub mod tree;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::Ledger;

pub use features::{DailyExpenseRow, DailyExpenseSeries, FEATURE_NAMES};
pub use forecaster::{forecast, ForecastPoint, LagWindow};
pub use metrics::AccuracyMetrics;
pub use model::{ModelFamily, ModelSettings, Regressor};
pub use trainer::{train_model, TrainedModel, MIN_TRAINING_ROWS};

/// Longest horizon a request may ask for
pub const MAX_HORIZON: u32 = 90;

/// Unique expense days front ends ask for before offering a forecast
pub const MIN_UNIQUE_EXPENSE_DAYS: usize = 10;

/// A validated forecast request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    model: ModelFamily,
    horizon_days: u32,
    advance_calendar: bool,
}

impl ForecastRequest {
    pub fn new(model: ModelFamily, horizon_days: u32) -> Result<Self> {
        Self::with_max_horizon(model, horizon_days, MAX_HORIZON)
    }

    /// Validate against a configured ceiling (itself capped at [`MAX_HORIZON`])
    pub fn with_max_horizon(model: ModelFamily, horizon_days: u32, max_horizon: u32) -> Result<Self> {
        let max = max_horizon.clamp(1, MAX_HORIZON);
        if !(1..=max).contains(&horizon_days) {
            return Err(Error::InvalidInput(format!(
                "Forecast horizon must be between 1 and {} days.",
                max
            )));
        }
        Ok(Self {
            model,
            horizon_days,
            advance_calendar: false,
        })
    }

    pub fn with_advance_calendar(self, advance_calendar: bool) -> Self {
        Self {
            advance_calendar,
            ..self
        }
    }

    pub fn model(&self) -> ModelFamily {
        self.model
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn advance_calendar(&self) -> bool {
        self.advance_calendar
    }
}

/// Result of one train-then-forecast run
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub model: ModelFamily,
    pub metrics: AccuracyMetrics,
    pub points: Vec<ForecastPoint>,
    /// Feature rows the model was trained on
    pub series_rows: usize,
}

impl ForecastReport {
    pub fn total_predicted(&self) -> f64 {
        self.points.iter().map(|p| p.predicted_expense).sum()
    }
}

/// Per-family outcome of a comparison run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Ok { report: ForecastReport },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    pub horizon_days: u32,
    pub results: Vec<(ModelFamily, ComparisonOutcome)>,
}

impl ModelComparison {
    /// Family with the highest R² among those that succeeded
    pub fn best(&self) -> Option<(ModelFamily, &ForecastReport)> {
        self.results
            .iter()
            .filter_map(|(family, outcome)| match outcome {
                ComparisonOutcome::Ok { report } => Some((*family, report)),
                ComparisonOutcome::Failed { .. } => None,
            })
            .max_by(|a, b| a.1.metrics.r2.total_cmp(&b.1.metrics.r2))
    }
}

/// Train the requested family on the ledger and forecast the horizon
pub fn run_forecast(
    ledger: &Ledger,
    request: &ForecastRequest,
    settings: &ModelSettings,
) -> Result<ForecastReport> {
    let series = DailyExpenseSeries::build(ledger);
    let model = train_model(&series, request.model, settings)?;
    let points = forecast(
        &model,
        &series,
        request.horizon_days,
        request.advance_calendar,
    )?;

    Ok(ForecastReport {
        model: request.model,
        metrics: model.metrics,
        points,
        series_rows: series.len(),
    })
}

/// Run several families side by side; one failing never stops the rest
///
/// Every family forecasts the same horizon with the same calendar mode, so
/// each entry matches what `run_forecast` gives for that family alone.
pub fn compare_models(
    ledger: &Ledger,
    families: &[ModelFamily],
    horizon_days: u32,
    advance_calendar: bool,
    settings: &ModelSettings,
) -> ModelComparison {
    let results = families
        .iter()
        .map(|family| {
            let outcome = ForecastRequest::new(*family, horizon_days)
                .map(|request| request.with_advance_calendar(advance_calendar))
                .and_then(|request| run_forecast(ledger, &request, settings));
            let outcome = match outcome {
                Ok(report) => ComparisonOutcome::Ok { report },
                Err(e) => {
                    tracing::debug!(model = %family, error = %e, "Model comparison entry failed");
                    ComparisonOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            (*family, outcome)
        })
        .collect();

    ModelComparison {
        horizon_days,
        results,
    }
}

/// Distinct calendar days carrying at least one expense
pub fn unique_expense_days(ledger: &Ledger) -> usize {
    features::daily_expense_totals(ledger.expenses()).len()
}
