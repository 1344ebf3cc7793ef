//! Loads cleaned rows into the energy consumption feature group

use super::{FeatureGroupSpec, FeatureStore, StatisticsConfig};
use crate::etl::Loader;
use crate::transform::{EnergyConsumption, Feature};
use crate::validation::ExpectationSuite;
use eyre::Result;

pub const FEATURE_GROUP_NAME: &str = "energy_consumption_denmark";
pub const FEATURE_GROUP_DESCRIPTION: &str =
    "Denmark hourly energy consumption data. Data is uploaded with an 15 days delay";

/// `(name, description, validation rules)` per feature
pub const FEATURE_DESCRIPTIONS: [(&str, &str, &str); 4] = [
    (
        "datetime_utc",
        "Datetime interval in UTC when the data was observed.",
        "Always full hours, i.e. minutes are 00",
    ),
    (
        "area",
        "Denmark is divided in two price areas, divided by the Great Belt: DK1 and DK2. \
         If price area is “DK”, the data covers all Denmark.",
        "0 (DK), 1 (DK1) or 2 (Dk2) (int)",
    ),
    (
        "consumer_type",
        "The consumer type is the Industry Code DE35 which is owned by Danish Energy. \
         The code is used by Danish energy companies.",
        ">0 (int)",
    ),
    (
        "energy_consumption",
        "Total electricity consumption in kWh.",
        ">=0 (float)",
    ),
];

/// [`Loader`] writing into `energy_consumption_denmark` v`version`
///
/// Each load validates against the suite, upserts the rows, refreshes the
/// feature descriptions and recomputes statistics with histograms and
/// correlations.
pub struct FeatureGroupLoader {
    store: FeatureStore,
    version: u32,
    suite: ExpectationSuite,
}

impl FeatureGroupLoader {
    pub fn new(store: FeatureStore, version: u32, suite: ExpectationSuite) -> Self {
        Self {
            store,
            version,
            suite,
        }
    }

    pub fn spec(&self) -> FeatureGroupSpec {
        FeatureGroupSpec {
            name: FEATURE_GROUP_NAME.to_string(),
            version: self.version,
            description: FEATURE_GROUP_DESCRIPTION.to_string(),
            primary_key: vec![Feature::Area, Feature::ConsumerType],
            event_time: Feature::DatetimeUtc,
            online_enabled: false,
            expectation_suite: Some(self.suite.clone()),
        }
    }
}

impl Loader for FeatureGroupLoader {
    type Item = EnergyConsumption;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let mut group = self.store.get_or_create_feature_group(self.spec())?;
        let inserted = group.insert(&items, false)?;

        for (name, description, rules) in FEATURE_DESCRIPTIONS {
            group.update_feature_description(name, description, Some(rules))?;
        }

        group.update_statistics_config(StatisticsConfig::all())?;
        group.compute_statistics()?;

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::build_expectation_suite;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn row(hour: u32, consumption: f64) -> EnergyConsumption {
        EnergyConsumption {
            datetime_utc: Utc.with_ymd_and_hms(2023, 6, 1, hour, 0, 0).unwrap(),
            area: 2,
            consumer_type: 122,
            energy_consumption: consumption,
        }
    }

    #[tokio::test]
    async fn test_load_populates_group() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let loader = FeatureGroupLoader::new(store.clone(), 3, build_expectation_suite());

        let loaded = loader.load(vec![row(0, 1.5), row(1, 2.5)]).await.unwrap();
        assert_eq!(loaded, 2);

        let group = store.get_feature_group(FEATURE_GROUP_NAME, 3).unwrap().unwrap();
        assert_eq!(group.read_all().unwrap().len(), 2);
        assert_eq!(group.descriptor().statistics_config, StatisticsConfig::all());
        assert!(group.descriptor().features.iter().all(|f| f.description.is_some()));
        assert!(group.statistics_path().exists());
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_rows() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let loader = FeatureGroupLoader::new(store.clone(), 1, build_expectation_suite());

        let result = loader.load(vec![row(0, -1.0)]).await;
        assert!(result.is_err());

        let group = store.get_feature_group(FEATURE_GROUP_NAME, 1).unwrap().unwrap();
        assert!(group.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_descriptions_cover_every_feature() {
        for feature in Feature::ALL {
            assert!(FEATURE_DESCRIPTIONS.iter().any(|(name, _, _)| *name == feature.name()));
        }
    }
}
