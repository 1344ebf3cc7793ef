//! Typed feature rows produced by the cleaning transformers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cleaned sample of the energy consumption feature group
///
/// Keyed by `(area, consumer_type)` with `datetime_utc` as event time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConsumption {
    pub datetime_utc: DateTime<Utc>,
    /// 0 = DK, 1 = DK1, 2 = DK2
    pub area: u8,
    pub consumer_type: u32,
    /// kWh
    pub energy_consumption: f64,
}

/// Columns of [`EnergyConsumption`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    DatetimeUtc,
    Area,
    ConsumerType,
    EnergyConsumption,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::DatetimeUtc,
        Feature::Area,
        Feature::ConsumerType,
        Feature::EnergyConsumption,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DatetimeUtc => "datetime_utc",
            Self::Area => "area",
            Self::ConsumerType => "consumer_type",
            Self::EnergyConsumption => "energy_consumption",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Numeric view of the column; `datetime_utc` is seconds since the epoch
    pub fn value(&self, row: &EnergyConsumption) -> f64 {
        match self {
            Self::DatetimeUtc => row.datetime_utc.timestamp() as f64,
            Self::Area => f64::from(row.area),
            Self::ConsumerType => f64::from(row.consumer_type),
            Self::EnergyConsumption => row.energy_consumption,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
