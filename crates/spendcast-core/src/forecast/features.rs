//! Daily expense series and engineered features
//!
//! Lags are taken over *expense days*, not calendar days: a day with no
//! expenses is absent from the series, so `lag_1` is the previous day that
//! had spending, however long ago that was.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Ledger, Transaction, TransactionType};

/// Number of lag columns (`lag_1..lag_7`)
pub const LAG_COUNT: usize = 7;

/// Distinct expense days needed before the first complete row exists
pub const MIN_EXPENSE_DAYS: usize = LAG_COUNT + 1;

/// Columns fed to the scaler and regressor, in order
///
/// The day flags on [`DailyExpenseRow`] are deliberately not listed here.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "year",
    "month",
    "day",
    "day_of_week",
    "day_of_year",
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_4",
    "lag_5",
    "lag_6",
    "lag_7",
];

pub const FEATURE_COUNT: usize = 5 + LAG_COUNT;

/// Calendar parts of a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    /// 1-based ordinal day
    pub day_of_year: u32,
}

impl CalendarFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            day_of_year: date.ordinal(),
        }
    }
}

/// Flags for the days that usually carry recurring spikes (rent, bills, groceries)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    pub is_first_of_month: bool,
    pub is_second_of_month: bool,
    pub is_fifth_of_month: bool,
    pub is_monday: bool,
}

impl DayFlags {
    pub fn from_calendar(cal: &CalendarFeatures) -> Self {
        Self {
            is_first_of_month: cal.day == 1,
            is_second_of_month: cal.day == 2,
            is_fifth_of_month: cal.day == 5,
            is_monday: cal.day_of_week == 0,
        }
    }
}

/// One expense day with its features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenseRow {
    pub date: NaiveDate,
    pub daily_expense: f64,
    pub calendar: CalendarFeatures,
    pub flags: DayFlags,
    /// `lags[k - 1]` is `lag_k`
    pub lags: [f64; LAG_COUNT],
}

impl DailyExpenseRow {
    /// `lag_k` for k in 1..=7
    pub fn lag(&self, k: usize) -> Option<f64> {
        k.checked_sub(1).and_then(|i| self.lags.get(i).copied())
    }

    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        feature_vector(&self.calendar, &self.lags)
    }
}

/// Assemble a feature row in [`FEATURE_NAMES`] order
pub fn feature_vector(cal: &CalendarFeatures, lags: &[f64; LAG_COUNT]) -> [f64; FEATURE_COUNT] {
    let mut row = [0.0; FEATURE_COUNT];
    row[0] = cal.year as f64;
    row[1] = cal.month as f64;
    row[2] = cal.day as f64;
    row[3] = cal.day_of_week as f64;
    row[4] = cal.day_of_year as f64;
    row[5..].copy_from_slice(lags);
    row
}

/// Sum expense amounts per calendar day
pub fn daily_expense_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions {
        if tx.transaction_type == TransactionType::Expense {
            *totals.entry(tx.date).or_insert(0.0) += tx.amount;
        }
    }
    totals
}

/// The feature table the trainer and forecaster consume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenseSeries {
    rows: Vec<DailyExpenseRow>,
}

impl DailyExpenseSeries {
    /// Build from a loaded ledger
    ///
    /// Any malformed stored date empties the whole series rather than
    /// silently training on a partial history.
    pub fn build(ledger: &Ledger) -> Self {
        if ledger.malformed_dates > 0 {
            tracing::warn!(
                user = %ledger.username,
                malformed = ledger.malformed_dates,
                "Ledger has unparseable dates, skipping feature building"
            );
            return Self::default();
        }
        Self::from_transactions(&ledger.transactions)
    }

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self::from_daily_totals(&daily_expense_totals(transactions))
    }

    /// Build from per-day totals (keys are already in ascending date order)
    pub fn from_daily_totals(totals: &BTreeMap<NaiveDate, f64>) -> Self {
        let days: Vec<(NaiveDate, f64)> = totals.iter().map(|(d, a)| (*d, *a)).collect();
        if days.len() < MIN_EXPENSE_DAYS {
            return Self::default();
        }

        let rows = (LAG_COUNT..days.len())
            .map(|i| {
                let (date, daily_expense) = days[i];
                let mut lags = [0.0; LAG_COUNT];
                for (k, lag) in lags.iter_mut().enumerate() {
                    *lag = days[i - (k + 1)].1;
                }
                let calendar = CalendarFeatures::from_date(date);
                DailyExpenseRow {
                    date,
                    daily_expense,
                    calendar,
                    flags: DayFlags::from_calendar(&calendar),
                    lags,
                }
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[DailyExpenseRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&DailyExpenseRow> {
        self.rows.last()
    }

    /// Feature matrix, one row per day
    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|r| r.feature_vector().to_vec())
            .collect()
    }

    /// Target column (`daily_expense`)
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.daily_expense).collect()
    }
}
