//! Versioned feature groups stored as a directory

use super::{Statistics, StatisticsConfig};
use crate::storage::{NdjsonReader, NdjsonWriter, save_json};
use crate::transform::{EnergyConsumption, Feature};
use crate::validation::ExpectationSuite;
use eyre::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DESCRIPTOR_FILE_NAME: &str = "feature_group.yml";
pub const DATA_FILE_NAME: &str = "data.ndjson";
pub const STATISTICS_FILE_NAME: &str = "statistics.json";

/// Requested shape of a feature group, see
/// [`FeatureStore::get_or_create_feature_group`](super::FeatureStore::get_or_create_feature_group)
#[derive(Debug, Clone)]
pub struct FeatureGroupSpec {
    pub name: String,
    pub version: u32,
    pub description: String,
    pub primary_key: Vec<Feature>,
    pub event_time: Feature,
    pub online_enabled: bool,
    pub expectation_suite: Option<ExpectationSuite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescription {
    pub name: Feature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<String>,
}

/// Contents of `feature_group.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroupDescriptor {
    pub name: String,
    pub version: u32,
    pub description: String,
    pub primary_key: Vec<Feature>,
    pub event_time: Feature,
    #[serde(default)]
    pub online_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expectation_suite: Option<ExpectationSuite>,
    pub features: Vec<FeatureDescription>,
    #[serde(default)]
    pub statistics_config: StatisticsConfig,
}

impl From<FeatureGroupSpec> for FeatureGroupDescriptor {
    fn from(spec: FeatureGroupSpec) -> Self {
        Self {
            name: spec.name,
            version: spec.version,
            description: spec.description,
            primary_key: spec.primary_key,
            event_time: spec.event_time,
            online_enabled: spec.online_enabled,
            expectation_suite: spec.expectation_suite,
            features: Feature::ALL
                .into_iter()
                .map(|name| FeatureDescription {
                    name,
                    description: None,
                    validation_rules: None,
                })
                .collect(),
            statistics_config: StatisticsConfig::default(),
        }
    }
}

/// Handle on one feature group directory
#[derive(Debug)]
pub struct FeatureGroup {
    dir: PathBuf,
    descriptor: FeatureGroupDescriptor,
}

impl FeatureGroup {
    pub(super) fn create(dir: PathBuf, descriptor: FeatureGroupDescriptor) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create feature group directory: {}", dir.display()))?;
        let group = Self { dir, descriptor };
        group.save()?;
        Ok(group)
    }

    pub(super) fn open(dir: PathBuf) -> Result<Self> {
        let path = dir.join(DESCRIPTOR_FILE_NAME);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read feature group descriptor: {}", path.display()))?;
        let descriptor = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse feature group descriptor: {}", path.display()))?;
        Ok(Self { dir, descriptor })
    }

    fn save(&self) -> Result<()> {
        let path = self.dir.join(DESCRIPTOR_FILE_NAME);
        let yaml = serde_yaml::to_string(&self.descriptor)?;
        std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write feature group descriptor: {}", path.display()))
    }

    pub fn descriptor(&self) -> &FeatureGroupDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn version(&self) -> u32 {
        self.descriptor.version
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE_NAME)
    }

    pub fn statistics_path(&self) -> PathBuf {
        self.dir.join(STATISTICS_FILE_NAME)
    }

    pub(super) fn attach_expectation_suite(&mut self, suite: ExpectationSuite) -> Result<()> {
        if self.descriptor.expectation_suite.as_ref() != Some(&suite) {
            log::debug!("Attaching expectation suite '{}' to {}", suite.name, self.name());
            self.descriptor.expectation_suite = Some(suite);
            self.save()?;
        }
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<EnergyConsumption>> {
        NdjsonReader::new(self.data_path()).read()
    }

    /// Upsert `rows` keyed by primary key plus event time
    ///
    /// Rows are validated against the attached expectation suite first; a
    /// failed validation rejects the whole insert. With `overwrite` the
    /// existing rows are discarded.
    pub fn insert(&self, rows: &[EnergyConsumption], overwrite: bool) -> Result<usize> {
        if let Some(suite) = &self.descriptor.expectation_suite {
            let report = suite.validate(rows);
            if !report.success() {
                let failures: Vec<String> = report
                    .failures()
                    .map(|r| format!("{} ({} unexpected)", r.expectation, r.unexpected_count))
                    .collect();
                bail!(
                    "Validation with suite '{}' failed for {}: {}",
                    report.suite,
                    self.name(),
                    failures.join(", ")
                );
            }
            log::info!(
                "Validated {} rows against '{}'",
                report.evaluated_rows.cyan(),
                report.suite
            );
        }

        let mut stored = if overwrite {
            Vec::new()
        } else {
            self.read_all()?
        };

        let mut index: HashMap<Vec<u64>, usize> = stored
            .iter()
            .enumerate()
            .map(|(i, row)| (self.key(row), i))
            .collect();

        for row in rows {
            let key = self.key(row);
            match index.get(&key).copied() {
                Some(i) => stored[i] = row.clone(),
                None => {
                    index.insert(key, stored.len());
                    stored.push(row.clone());
                }
            }
        }

        stored.sort_by(|a, b| {
            a.datetime_utc
                .cmp(&b.datetime_utc)
                .then(a.area.cmp(&b.area))
                .then(a.consumer_type.cmp(&b.consumer_type))
        });

        NdjsonWriter::new(self.data_path()).write(&stored)?;
        log::info!(
            "Inserted {} rows into {} v{} ({} total)",
            rows.len().cyan(),
            self.name(),
            self.version(),
            stored.len()
        );
        Ok(rows.len())
    }

    fn key(&self, row: &EnergyConsumption) -> Vec<u64> {
        self.descriptor
            .primary_key
            .iter()
            .chain(std::iter::once(&self.descriptor.event_time))
            .map(|feature| feature.value(row).to_bits())
            .collect()
    }

    pub fn update_feature_description(
        &mut self,
        name: &str,
        description: &str,
        validation_rules: Option<&str>,
    ) -> Result<()> {
        let Some(feature) = self
            .descriptor
            .features
            .iter_mut()
            .find(|f| f.name.name() == name)
        else {
            bail!("Feature '{}' does not exist in {}", name, self.descriptor.name);
        };

        feature.description = Some(description.to_string());
        feature.validation_rules = validation_rules.map(str::to_string);
        self.save()
    }

    pub fn update_statistics_config(&mut self, config: StatisticsConfig) -> Result<()> {
        self.descriptor.statistics_config = config;
        self.save()
    }

    /// Compute statistics over every stored row and write `statistics.json`
    ///
    /// Returns `None` when statistics are disabled for the group.
    pub fn compute_statistics(&self) -> Result<Option<Statistics>> {
        let config = self.descriptor.statistics_config;
        if !config.enabled {
            log::warn!("Statistics are disabled for {}", self.name());
            return Ok(None);
        }

        let rows = self.read_all()?;
        let statistics = Statistics::compute(&rows, &config);
        save_json(&statistics, self.statistics_path())?;
        log::info!(
            "Computed statistics over {} rows: {}",
            statistics.row_count.cyan(),
            self.statistics_path().display().bright_black()
        );
        Ok(Some(statistics))
    }
}
