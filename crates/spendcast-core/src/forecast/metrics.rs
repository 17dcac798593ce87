//! Held-out accuracy metrics

use serde::{Deserialize, Serialize};

/// Accuracy of a trained model on its test split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Coefficient of determination (can be negative)
    pub r2: f64,
}

impl AccuracyMetrics {
    pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Self {
        Self {
            mae: mean_absolute_error(actual, predicted),
            r2: r2_score(actual, predicted),
        }
    }

    /// R² as a 0-100 percentage, floored at zero
    pub fn accuracy_pct(&self) -> f64 {
        (self.r2 * 100.0).max(0.0)
    }

    /// A negative R² means the model does worse than predicting the mean
    pub fn is_unreliable(&self) -> bool {
        self.r2 < 0.0
    }
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// `1 - SS_res / SS_tot`; a constant target scores 1.0 if matched exactly, else 0.0
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mae() {
        assert_eq!(mean_absolute_error(&[1.0, 2.0, 3.0], &[2.0, 2.0, 1.0]), 1.0);
        assert_eq!(mean_absolute_error(&[], &[]), 0.0);
    }

    #[test]
    fn test_r2() {
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]), 0.0);
        assert!(r2_score(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) < 0.0);
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[5.0, 5.0], &[5.0, 5.0]), 1.0);
        assert_eq!(r2_score(&[5.0, 5.0], &[5.0, 6.0]), 0.0);
    }

    #[test]
    fn test_accuracy_pct_floors_at_zero() {
        let good = AccuracyMetrics { mae: 1.0, r2: 0.87 };
        assert!((good.accuracy_pct() - 87.0).abs() < 1e-9);
        assert!(!good.is_unreliable());

        let bad = AccuracyMetrics { mae: 1.0, r2: -0.4 };
        assert_eq!(bad.accuracy_pct(), 0.0);
        assert!(bad.is_unreliable());
    }
}
