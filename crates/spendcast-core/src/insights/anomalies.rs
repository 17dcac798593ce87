//! Outlier expenses and overspend recommendations

use std::collections::BTreeMap;

use chrono::Months;

use super::types::{Anomaly, Recommendation};
use crate::models::{Ledger, Transaction};

/// Recent mean must exceed the overall mean by this factor to be flagged
const OVERSPEND_FACTOR: f64 = 1.3;

/// Months of history counted as "recent"
const RECENT_MONTHS: u32 = 3;

fn by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<&'a str, Vec<&'a Transaction>> {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        groups.entry(tx.category.as_str()).or_default().push(tx);
    }
    groups
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; `None` below two values
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Expenses above `mean + 2 * std` of their category, largest first
pub fn find_anomalies(ledger: &Ledger) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for (category, txs) in by_category(ledger.expenses()) {
        let amounts: Vec<f64> = txs.iter().map(|t| t.amount).collect();
        let Some(std) = sample_std(&amounts) else {
            continue;
        };
        let threshold = mean(&amounts) + 2.0 * std;

        anomalies.extend(txs.iter().filter(|t| t.amount > threshold).map(|t| Anomaly {
            transaction_id: t.id,
            date: t.date,
            category: category.to_string(),
            amount: t.amount,
            description: t.description.clone(),
            threshold,
        }));
    }

    anomalies.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    anomalies
}

/// Categories whose last three months run 30% above their all-time per-transaction mean
pub fn recommendations(ledger: &Ledger) -> Vec<Recommendation> {
    let Some(latest) = ledger.expenses().map(|t| t.date).max() else {
        return Vec::new();
    };
    let cutoff = latest
        .checked_sub_months(Months::new(RECENT_MONTHS))
        .unwrap_or(latest);

    let overall = by_category(ledger.expenses());
    let recent = by_category(ledger.expenses().filter(|t| t.date >= cutoff));

    recent
        .into_iter()
        .filter_map(|(category, txs)| {
            let overall_amounts: Vec<f64> = overall.get(category)?.iter().map(|t| t.amount).collect();
            let overall_mean = mean(&overall_amounts);
            let recent_amounts: Vec<f64> = txs.iter().map(|t| t.amount).collect();
            let recent_mean = mean(&recent_amounts);

            (overall_mean > 0.0 && recent_mean > overall_mean * OVERSPEND_FACTOR).then(|| {
                Recommendation {
                    category: category.to_string(),
                    recent_mean,
                    overall_mean,
                }
            })
        })
        .collect()
}
