//! Column renamer transformer
//!
//! Maps the source's column names onto feature names and drops columns that
//! are not part of the feature group.

use crate::etl::Transformer;
use crate::extract::RawRecord;
use eyre::Result;

/// Source column to feature column, for the energy consumption dataset
pub const ENERGY_CONSUMPTION_COLUMNS: [(&str, &str); 4] = [
    ("HourUTC", "datetime_utc"),
    ("PriceArea", "area"),
    ("ConsumerType_DE35", "consumer_type"),
    ("TotalCon", "energy_consumption"),
];

/// Source columns with no feature counterpart
pub const DROPPED_COLUMNS: [&str; 1] = ["HourDK"];

/// Transformer that renames and drops columns of raw records
///
/// # Example
/// ```
/// use energy_feature_pipeline::etl::Transformer;
/// use energy_feature_pipeline::extract::RawRecord;
/// use energy_feature_pipeline::transform::ColumnRenamer;
///
/// let renamer = ColumnRenamer::energy_consumption();
/// let input = RawRecord::from_iter([("HourUTC", "2023-06-01 00:00"), ("HourDK", "2023-06-01 02:00")]);
///
/// let output = renamer.transform(input).unwrap();
/// assert_eq!(output.get("datetime_utc"), Some("2023-06-01 00:00"));
/// assert_eq!(output.get("HourDK"), None);
/// ```
pub struct ColumnRenamer {
    mapping: Vec<(String, String)>,
    dropped: Vec<String>,
}

impl ColumnRenamer {
    pub fn new(mapping: Vec<(&str, &str)>, dropped: Vec<&str>) -> Self {
        Self {
            mapping: mapping
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            dropped: dropped.into_iter().map(str::to_string).collect(),
        }
    }

    /// Renamer for the `ConsumptionDE35Hour` dataset
    pub fn energy_consumption() -> Self {
        Self::new(ENERGY_CONSUMPTION_COLUMNS.to_vec(), DROPPED_COLUMNS.to_vec())
    }
}

impl Transformer for ColumnRenamer {
    type Input = RawRecord;
    type Output = RawRecord;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for column in &self.dropped {
            input.remove(column);
        }
        for (from, to) in &self.mapping {
            input.rename(from, to);
        }
        Ok(input)
    }
}
