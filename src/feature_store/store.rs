//! Local feature store rooted at a directory

use super::group::DESCRIPTOR_FILE_NAME;
use super::{FeatureGroup, FeatureGroupDescriptor, FeatureGroupSpec};
use eyre::{Context, Result, bail};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Directory of versioned feature groups, one `<name>_v<version>` per group
#[derive(Debug, Clone)]
pub struct FeatureStore {
    root: PathBuf,
}

impl FeatureStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create feature store: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn feature_group_dir(&self, name: &str, version: u32) -> PathBuf {
        self.root.join(format!("{}_v{}", name, version))
    }

    pub fn get_feature_group(&self, name: &str, version: u32) -> Result<Option<FeatureGroup>> {
        let dir = self.feature_group_dir(name, version);
        if !dir.join(DESCRIPTOR_FILE_NAME).exists() {
            return Ok(None);
        }
        FeatureGroup::open(dir).map(Some)
    }

    /// Open the group named by `spec`, creating it when absent
    ///
    /// An existing group must agree on primary key and event time. A
    /// different expectation suite replaces the stored one.
    pub fn get_or_create_feature_group(&self, spec: FeatureGroupSpec) -> Result<FeatureGroup> {
        let Some(mut group) = self.get_feature_group(&spec.name, spec.version)? else {
            let dir = self.feature_group_dir(&spec.name, spec.version);
            log::info!(
                "Creating feature group {} v{} at {}",
                spec.name.cyan(),
                spec.version,
                dir.display().bright_black()
            );
            return FeatureGroup::create(dir, FeatureGroupDescriptor::from(spec));
        };

        let existing = group.descriptor();
        if existing.primary_key != spec.primary_key || existing.event_time != spec.event_time {
            bail!(
                "Feature group {} v{} already exists with primary key {:?} and event time {}",
                spec.name,
                spec.version,
                existing.primary_key,
                existing.event_time
            );
        }

        log::debug!("Using existing feature group {} v{}", spec.name, spec.version);
        if let Some(suite) = spec.expectation_suite {
            group.attach_expectation_suite(suite)?;
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_store::StatisticsConfig;
    use crate::transform::{EnergyConsumption, Feature};
    use crate::validation::build_expectation_suite;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn spec(version: u32) -> FeatureGroupSpec {
        FeatureGroupSpec {
            name: "energy_consumption_denmark".to_string(),
            version,
            description: "test group".to_string(),
            primary_key: vec![Feature::Area, Feature::ConsumerType],
            event_time: Feature::DatetimeUtc,
            online_enabled: false,
            expectation_suite: Some(build_expectation_suite()),
        }
    }

    fn row(hour: u32, area: u8, consumption: f64) -> EnergyConsumption {
        EnergyConsumption {
            datetime_utc: Utc.with_ymd_and_hms(2023, 6, 1, hour, 0, 0).unwrap(),
            area,
            consumer_type: 111,
            energy_consumption: consumption,
        }
    }

    #[test]
    fn test_create_writes_descriptor() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path().join("store")).unwrap();

        let group = store.get_or_create_feature_group(spec(1)).unwrap();
        assert_eq!(
            group.path(),
            temp.path().join("store/energy_consumption_denmark_v1")
        );

        let yaml = std::fs::read_to_string(group.path().join(DESCRIPTOR_FILE_NAME)).unwrap();
        assert!(yaml.contains("name: energy_consumption_denmark"));
        assert!(yaml.contains("event_time: datetime_utc"));
        assert!(yaml.contains("name: energy_consumption_suite"));
        assert_eq!(group.descriptor().features.len(), 4);
    }

    #[test]
    fn test_reopen_and_conflict() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        store.get_or_create_feature_group(spec(1)).unwrap();

        let reopened = store.get_or_create_feature_group(spec(1)).unwrap();
        assert_eq!(reopened.version(), 1);

        let mut conflicting = spec(1);
        conflicting.primary_key = vec![Feature::Area];
        assert!(store.get_or_create_feature_group(conflicting).is_err());

        // other versions are independent
        let mut other = spec(2);
        other.primary_key = vec![Feature::Area];
        assert!(store.get_or_create_feature_group(other).is_ok());
        assert!(store.get_feature_group("missing", 1).unwrap().is_none());
    }

    #[test]
    fn test_insert_upserts_by_key() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let group = store.get_or_create_feature_group(spec(1)).unwrap();

        group.insert(&[row(0, 1, 1.0), row(1, 1, 2.0)], false).unwrap();
        group.insert(&[row(1, 1, 5.0), row(1, 2, 3.0)], false).unwrap();

        let rows = group.read_all().unwrap();
        assert_eq!(rows, vec![row(0, 1, 1.0), row(1, 1, 5.0), row(1, 2, 3.0)]);

        group.insert(&[row(3, 0, 9.0)], true).unwrap();
        assert_eq!(group.read_all().unwrap(), vec![row(3, 0, 9.0)]);
    }

    #[test]
    fn test_insert_rejects_invalid_rows() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let group = store.get_or_create_feature_group(spec(1)).unwrap();
        group.insert(&[row(0, 1, 1.0)], false).unwrap();

        let err = group.insert(&[row(1, 7, 1.0)], false).unwrap_err();
        assert!(err.to_string().contains("energy_consumption_suite"));
        assert_eq!(group.read_all().unwrap(), vec![row(0, 1, 1.0)]);
    }

    #[test]
    fn test_feature_descriptions_persist() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let mut group = store.get_or_create_feature_group(spec(1)).unwrap();

        group
            .update_feature_description("energy_consumption", "Total kWh.", Some(">=0 (float)"))
            .unwrap();
        assert!(
            group
                .update_feature_description("HourDK", "unknown", None)
                .is_err()
        );

        let reopened = store.get_feature_group("energy_consumption_denmark", 1).unwrap().unwrap();
        let description = reopened
            .descriptor()
            .features
            .iter()
            .find(|f| f.name == Feature::EnergyConsumption)
            .unwrap();
        assert_eq!(description.description.as_deref(), Some("Total kWh."));
        assert_eq!(description.validation_rules.as_deref(), Some(">=0 (float)"));
    }

    #[test]
    fn test_statistics_follow_config() {
        let temp = TempDir::new().unwrap();
        let store = FeatureStore::open(temp.path()).unwrap();
        let mut group = store.get_or_create_feature_group(spec(1)).unwrap();
        group.insert(&[row(0, 1, 1.0), row(1, 2, 3.0)], false).unwrap();

        group
            .update_statistics_config(StatisticsConfig {
                enabled: false,
                histograms: false,
                correlations: false,
            })
            .unwrap();
        assert!(group.compute_statistics().unwrap().is_none());
        assert!(!group.statistics_path().exists());

        group.update_statistics_config(StatisticsConfig::all()).unwrap();
        let statistics = group.compute_statistics().unwrap().unwrap();
        assert_eq!(statistics.row_count, 2);
        assert!(!statistics.correlations.is_empty());
        assert!(group.statistics_path().exists());
    }
}
