//! Local, file-backed feature store
//!
//! Each feature group lives in `<root>/<name>_v<version>/`:
//! - `feature_group.yml` - schema, descriptions, expectation suite and
//!   statistics settings
//! - `data.ndjson` - the rows, one JSON object per line
//! - `statistics.json` - the last computed statistics

mod group;
mod loader;
mod statistics;
mod store;

pub use group::{
    DATA_FILE_NAME, DESCRIPTOR_FILE_NAME, FeatureDescription, FeatureGroup,
    FeatureGroupDescriptor, FeatureGroupSpec, STATISTICS_FILE_NAME,
};
pub use loader::{
    FEATURE_DESCRIPTIONS, FEATURE_GROUP_DESCRIPTION, FEATURE_GROUP_NAME, FeatureGroupLoader,
};
pub use statistics::{
    Correlation, FeatureStatistics, HISTOGRAM_BINS, HistogramBin, Statistics, StatisticsConfig,
};
pub use store::FeatureStore;
