//! Anomaly - Revenue outlier detection
//!
//! Each revenue record is scored with the modified z-score
//! `0.6745 * (x - median) / MAD`. When the MAD is zero the mean absolute
//! deviation is used instead: `(x - median) / (1.253314 * MeanAD)`.

use crate::store::DataStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum number of revenue records required for detection
pub const MIN_DATA_POINTS: usize = 5;

/// Score above which a record is reported
pub const DEFAULT_THRESHOLD: f64 = 3.5;

/// A revenue record flagged as unusual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAnomaly {
    /// Revenue record id
    pub revenue_id: String,
    /// Related order
    pub order_id: String,
    /// Payment date
    pub date: NaiveDate,
    /// Amount paid
    pub amount: f64,
    /// Absolute robust z-score
    pub score: f64,
}

/// Outcome of an anomaly scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnomalyReport {
    /// Fewer than [`MIN_DATA_POINTS`] records
    Insufficient {
        /// Records available
        points: usize,
    },
    /// No record exceeded the threshold
    Clear {
        /// Records scored
        checked: usize,
    },
    /// At least one record exceeded the threshold
    Detected {
        /// Records scored
        checked: usize,
        /// Flagged records, in file order
        anomalies: Vec<RevenueAnomaly>,
    },
}

impl AnomalyReport {
    /// Most recent flagged record in file order
    #[must_use]
    pub fn latest(&self) -> Option<&RevenueAnomaly> {
        match self {
            Self::Detected { anomalies, .. } => anomalies.last(),
            _ => None,
        }
    }

    /// One-line status for the audit board
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Insufficient { .. } => {
                "Not enough data points to run anomaly detection.".to_string()
            }
            Self::Clear { .. } => "No significant revenue anomalies detected.".to_string(),
            Self::Detected { anomalies, .. } => match anomalies.last() {
                Some(a) => format!(
                    "Critical revenue anomaly: unusual amount on {} - ${:.2} (order {}). {} record(s) flagged.",
                    a.date.format("%Y-%m-%d"),
                    a.amount,
                    a.order_id,
                    anomalies.len()
                ),
                None => "No significant revenue anomalies detected.".to_string(),
            },
        }
    }
}

impl DataStore {
    /// Scan revenue amounts with the default threshold
    #[must_use]
    pub fn revenue_anomalies(&self) -> AnomalyReport {
        self.revenue_anomalies_with_threshold(DEFAULT_THRESHOLD)
    }

    /// Scan revenue amounts, flagging scores above `threshold`
    #[must_use]
    pub fn revenue_anomalies_with_threshold(&self, threshold: f64) -> AnomalyReport {
        let records = self.revenue();
        if records.len() < MIN_DATA_POINTS {
            return AnomalyReport::Insufficient {
                points: records.len(),
            };
        }

        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        let scores = robust_scores(&amounts);

        let anomalies: Vec<RevenueAnomaly> = records
            .iter()
            .zip(scores)
            .filter(|(_, score)| *score > threshold)
            .map(|(r, score)| RevenueAnomaly {
                revenue_id: r.revenue_id.clone(),
                order_id: r.order_id.clone(),
                date: r.date,
                amount: r.amount,
                score,
            })
            .collect();

        if anomalies.is_empty() {
            AnomalyReport::Clear {
                checked: records.len(),
            }
        } else {
            AnomalyReport::Detected {
                checked: records.len(),
                anomalies,
            }
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Absolute robust z-score of every value
fn robust_scores(values: &[f64]) -> Vec<f64> {
    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations);

    if mad > 0.0 {
        return deviations.iter().map(|d| 0.6745 * d / mad).collect();
    }

    let mean_ad = deviations.iter().sum::<f64>() / deviations.len() as f64;
    if mean_ad > 0.0 {
        deviations.iter().map(|d| d / (1.253_314 * mean_ad)).collect()
    } else {
        vec![0.0; values.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RevenueRecord;

    fn store_with_amounts(amounts: &[f64]) -> DataStore {
        let revenue = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| RevenueRecord {
                revenue_id: format!("REV_{i}"),
                order_id: format!("ORD_{i}"),
                amount,
                date: NaiveDate::from_ymd_opt(2025, 1, 1 + i as u32).unwrap(),
                payment_method: "Credit Card".to_string(),
            })
            .collect();
        DataStore::from_tables(vec![], vec![], vec![], revenue).unwrap()
    }

    #[test]
    fn test_insufficient_points() {
        let report = store_with_amounts(&[10.0, 12.0, 11.0, 13.0]).revenue_anomalies();
        assert_eq!(report, AnomalyReport::Insufficient { points: 4 });
        assert!(report.summary().starts_with("Not enough data points"));
    }

    #[test]
    fn test_clear() {
        let report = store_with_amounts(&[100.0, 102.0, 98.0, 101.0, 99.0, 103.0]).revenue_anomalies();
        assert_eq!(report, AnomalyReport::Clear { checked: 6 });
        assert!(report.latest().is_none());
    }

    #[test]
    fn test_detected_outlier() {
        let report =
            store_with_amounts(&[100.0, 102.0, 98.0, 5000.0, 101.0, 99.0]).revenue_anomalies();
        let latest = report.latest().expect("anomaly expected");
        assert_eq!(latest.order_id, "ORD_3");
        assert!((latest.amount - 5000.0).abs() < f64::EPSILON);
        assert!(report.summary().contains("ORD_3"));
    }

    #[test]
    fn test_zero_mad_falls_back() {
        let report =
            store_with_amounts(&[100.0, 100.0, 100.0, 100.0, 100.0, 900.0]).revenue_anomalies();
        assert!(matches!(report, AnomalyReport::Detected { ref anomalies, .. } if anomalies.len() == 1));
    }

    #[test]
    fn test_median() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < f64::EPSILON);
        assert!((median(&[4.0, 1.0, 2.0, 3.0]) - 2.5).abs() < f64::EPSILON);
    }
}
