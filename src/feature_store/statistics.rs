//! Descriptive statistics over a feature group

use crate::transform::{EnergyConsumption, Feature};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of equal-width bins per histogram
pub const HISTOGRAM_BINS: usize = 10;

/// Which statistics are computed for a feature group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub histograms: bool,
    #[serde(default)]
    pub correlations: bool,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            histograms: false,
            correlations: false,
        }
    }
}

impl StatisticsConfig {
    pub fn all() -> Self {
        Self {
            enabled: true,
            histograms: true,
            correlations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    pub feature: Feature,
    pub count: usize,
    pub distinct: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation, undefined below two values
    pub stddev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Vec<HistogramBin>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub left: Feature,
    pub right: Feature,
    /// Pearson coefficient, undefined when either column is constant
    pub pearson: Option<f64>,
}

/// Contents of `statistics.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub row_count: usize,
    pub computed_at: DateTime<Utc>,
    pub features: Vec<FeatureStatistics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correlations: Vec<Correlation>,
}

impl Statistics {
    pub fn compute(rows: &[EnergyConsumption], config: &StatisticsConfig) -> Self {
        let columns: Vec<(Feature, Vec<f64>)> = Feature::ALL
            .into_iter()
            .map(|feature| (feature, rows.iter().map(|r| feature.value(r)).collect()))
            .collect();

        let features = columns
            .iter()
            .map(|(feature, values)| describe(*feature, values, config.histograms))
            .collect();

        let mut correlations = Vec::new();
        if config.correlations {
            for (i, (left, left_values)) in columns.iter().enumerate() {
                for (right, right_values) in &columns[i + 1..] {
                    correlations.push(Correlation {
                        left: *left,
                        right: *right,
                        pearson: pearson(left_values, right_values),
                    });
                }
            }
        }

        Self {
            row_count: rows.len(),
            computed_at: Utc::now(),
            features,
            correlations,
        }
    }

    pub fn feature(&self, feature: Feature) -> Option<&FeatureStatistics> {
        self.features.iter().find(|s| s.feature == feature)
    }
}

fn describe(feature: Feature, values: &[f64], with_histogram: bool) -> FeatureStatistics {
    let distinct = values
        .iter()
        .map(|v| v.to_bits())
        .collect::<BTreeSet<_>>()
        .len();
    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);
    let mean = mean(values);
    let stddev = mean.and_then(|m| {
        if values.len() < 2 {
            return None;
        }
        let variance =
            values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        Some(variance.sqrt())
    });

    let histogram = match (with_histogram, min, max) {
        (true, Some(min), Some(max)) => Some(histogram(values, min, max)),
        _ => None,
    };

    FeatureStatistics {
        feature,
        count: values.len(),
        distinct,
        min,
        max,
        mean,
        stddev,
        histogram,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn histogram(values: &[f64], min: f64, max: f64) -> Vec<HistogramBin> {
    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == HISTOGRAM_BINS {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = if width > 0.0 {
            (((value - min) / width) as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        bins[index].count += 1;
    }
    bins
}

fn pearson(left: &[f64], right: &[f64]) -> Option<f64> {
    let (left_mean, right_mean) = (mean(left)?, mean(right)?);
    let mut covariance = 0.0;
    let mut left_var = 0.0;
    let mut right_var = 0.0;
    for (l, r) in left.iter().zip(right) {
        covariance += (l - left_mean) * (r - right_mean);
        left_var += (l - left_mean).powi(2);
        right_var += (r - right_mean).powi(2);
    }

    let denominator = (left_var * right_var).sqrt();
    (denominator > 0.0).then(|| covariance / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rows() -> Vec<EnergyConsumption> {
        (0..4)
            .map(|hour| EnergyConsumption {
                datetime_utc: Utc.with_ymd_and_hms(2023, 6, 1, hour, 0, 0).unwrap(),
                area: 1,
                consumer_type: 111,
                energy_consumption: 10.0 * f64::from(hour + 1),
            })
            .collect()
    }

    #[test]
    fn test_describe_columns() {
        let stats = Statistics::compute(&rows(), &StatisticsConfig::default());
        assert_eq!(stats.row_count, 4);
        assert!(stats.correlations.is_empty());

        let consumption = stats.feature(Feature::EnergyConsumption).unwrap();
        assert_eq!(consumption.count, 4);
        assert_eq!(consumption.distinct, 4);
        assert_eq!(consumption.min, Some(10.0));
        assert_eq!(consumption.max, Some(40.0));
        assert_eq!(consumption.mean, Some(25.0));
        let stddev = consumption.stddev.unwrap();
        assert!((stddev - 12.909944).abs() < 1e-5);
        assert!(consumption.histogram.is_none());

        let area = stats.feature(Feature::Area).unwrap();
        assert_eq!(area.distinct, 1);
        assert_eq!(area.stddev, Some(0.0));
    }

    #[test]
    fn test_histograms_cover_every_value() {
        let stats = Statistics::compute(&rows(), &StatisticsConfig::all());
        for feature in &stats.features {
            let bins = feature.histogram.as_ref().unwrap();
            assert_eq!(bins.len(), HISTOGRAM_BINS);
            assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        }

        let consumption = stats.feature(Feature::EnergyConsumption).unwrap();
        let bins = consumption.histogram.as_ref().unwrap();
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[HISTOGRAM_BINS - 1].count, 1);
        assert_eq!(bins[HISTOGRAM_BINS - 1].upper, 40.0);
    }

    #[test]
    fn test_correlations() {
        let stats = Statistics::compute(&rows(), &StatisticsConfig::all());
        // 4 features -> 6 pairs
        assert_eq!(stats.correlations.len(), 6);

        let time_vs_consumption = stats
            .correlations
            .iter()
            .find(|c| c.left == Feature::DatetimeUtc && c.right == Feature::EnergyConsumption)
            .unwrap();
        assert!((time_vs_consumption.pearson.unwrap() - 1.0).abs() < 1e-9);

        // area is constant
        let with_area = stats
            .correlations
            .iter()
            .find(|c| c.right == Feature::Area || c.left == Feature::Area)
            .unwrap();
        assert_eq!(with_area.pearson, None);
    }

    #[test]
    fn test_empty_rows() {
        let stats = Statistics::compute(&[], &StatisticsConfig::all());
        let area = stats.feature(Feature::Area).unwrap();
        assert_eq!(area.count, 0);
        assert_eq!(area.min, None);
        assert_eq!(area.mean, None);
        assert_eq!(area.stddev, None);
        assert!(area.histogram.is_none());
    }
}
