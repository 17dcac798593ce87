//! Model training on the daily expense series

use tracing::debug;

use super::features::{DailyExpenseSeries, FEATURE_NAMES};
use super::metrics::AccuracyMetrics;
use super::model::{ModelFamily, ModelSettings, Regressor};
use super::scaler::StandardScaler;
use super::split::{select, train_test_split};
use crate::error::{Error, Result};

/// Series rows required before a model is trained
pub const MIN_TRAINING_ROWS: usize = 10;

/// A fitted regressor plus everything needed to feed it new rows
///
/// Lives only for the request that trained it.
#[derive(Debug)]
pub struct TrainedModel {
    pub family: ModelFamily,
    pub regressor: Box<dyn Regressor>,
    pub scaler: StandardScaler,
    pub features: Vec<&'static str>,
    pub metrics: AccuracyMetrics,
    /// Rows in the series the model was trained from
    pub series_rows: usize,
}

impl TrainedModel {
    /// Predict from an unscaled feature row in `features` order
    pub fn predict_raw(&self, row: &[f64]) -> f64 {
        self.regressor.predict_row(&self.scaler.transform_row(row))
    }
}

/// Fit `family` on the series and score it on a held-out split
pub fn train_model(
    series: &DailyExpenseSeries,
    family: ModelFamily,
    settings: &ModelSettings,
) -> Result<TrainedModel> {
    if series.len() < MIN_TRAINING_ROWS {
        return Err(Error::InsufficientData(
            "Not enough historical data (at least 10 entries required) to train the model."
                .to_string(),
        ));
    }

    let x = series.features();
    let y = series.targets();
    let split = train_test_split(x.len(), settings.test_fraction, settings.seed)?;

    let x_train = select(&x, &split.train);
    let y_train = select(&y, &split.train);
    let x_test = select(&x, &split.test);
    let y_test = select(&y, &split.test);

    let mut regressor = family.build(settings)?;

    let fitted = (|| -> Result<(StandardScaler, Vec<f64>)> {
        let scaler = StandardScaler::fit(&x_train)?;
        regressor.fit(&scaler.transform(&x_train), &y_train)?;
        let predicted = regressor.predict(&scaler.transform(&x_test));
        if predicted.iter().any(|p| !p.is_finite()) {
            return Err(Error::Fitting("model produced non-finite predictions".to_string()));
        }
        Ok((scaler, predicted))
    })();

    let (scaler, predicted) =
        fitted.map_err(|e| Error::Fitting(format!("Error during model training: {}", e)))?;

    let metrics = AccuracyMetrics::evaluate(&y_test, &predicted);
    debug!(
        model = %family,
        rows = series.len(),
        train = split.train.len(),
        test = split.test.len(),
        mae = metrics.mae,
        r2 = metrics.r2,
        "Model trained"
    );

    Ok(TrainedModel {
        family,
        regressor,
        scaler,
        features: FEATURE_NAMES.to_vec(),
        metrics,
        series_rows: series.len(),
    })
}
