//! Recursive multi-day forecasting
//!
//! Each prediction is pushed into the lag window that feeds the next day,
//! so errors compound over the horizon. Calendar features stay at the last
//! historical date unless `advance_calendar` is set.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::features::{feature_vector, CalendarFeatures, DailyExpenseSeries, LAG_COUNT};
use super::trainer::TrainedModel;
use crate::error::{Error, Result};

/// Series rows needed to seed the lag window
pub const MIN_FORECAST_ROWS: usize = LAG_COUNT;

/// Rolling window of seven lag values, passed by value through the forecast loop
///
/// Stored as a ring: `head` marks the slot read as `lag_1`. A push
/// overwrites the front slot and rotates, so the pushed value is read back
/// as `lag_7` and every other value moves one position toward the front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagWindow {
    values: [f64; LAG_COUNT],
    head: usize,
}

impl LagWindow {
    /// Seed from `[lag_1, .., lag_7]`
    pub fn new(lags: [f64; LAG_COUNT]) -> Self {
        Self {
            values: lags,
            head: 0,
        }
    }

    /// Value at logical position `i` (`lag_{i+1}`)
    pub fn get(&self, i: usize) -> f64 {
        self.values[(self.head + i) % LAG_COUNT]
    }

    pub fn lags(&self) -> [f64; LAG_COUNT] {
        std::array::from_fn(|i| self.get(i))
    }

    /// Drop the front value and append `value` at the back
    pub fn push(mut self, value: f64) -> Self {
        self.values[self.head] = value;
        self.head = (self.head + 1) % LAG_COUNT;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_expense: f64,
}

/// Predict `horizon_days` consecutive days after the last expense day
pub fn forecast(
    model: &TrainedModel,
    series: &DailyExpenseSeries,
    horizon_days: u32,
    advance_calendar: bool,
) -> Result<Vec<ForecastPoint>> {
    if horizon_days == 0 {
        return Err(Error::InvalidInput(
            "Forecast horizon must be at least 1 day.".to_string(),
        ));
    }
    let last = match series.last() {
        Some(row) if series.len() >= MIN_FORECAST_ROWS => row,
        _ => {
            return Err(Error::InsufficientData(
                "Not enough historical data (at least 7 days required) to generate future lags."
                    .to_string(),
            ))
        }
    };

    let frozen = last.calendar;
    let mut window = LagWindow::new(last.lags);
    let mut date = last.date;
    let mut points = Vec::with_capacity(horizon_days as usize);

    for _ in 0..horizon_days {
        date += Duration::days(1);
        let calendar = if advance_calendar {
            CalendarFeatures::from_date(date)
        } else {
            frozen
        };
        let raw = feature_vector(&calendar, &window.lags());
        let predicted = model.predict_raw(&raw);
        let predicted_expense = if predicted.is_finite() {
            predicted.max(0.0)
        } else {
            0.0
        };
        points.push(ForecastPoint {
            date,
            predicted_expense,
        });
        window = window.push(predicted_expense);
    }

    debug!(
        model = %model.family,
        days = horizon_days,
        advance_calendar,
        "Forecast generated"
    );
    Ok(points)
}
