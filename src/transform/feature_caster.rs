//! Feature caster transformer
//!
//! Turns a renamed, encoded raw record into a typed [`EnergyConsumption`].

use super::{EnergyConsumption, Feature};
use crate::etl::Transformer;
use crate::extract::{DatetimeFormat, RawRecord, parse_reference_datetime};
use eyre::{OptionExt, Result};
use std::str::FromStr;

/// Transformer that casts string columns to typed features
pub struct FeatureCaster {
    datetime_format: DatetimeFormat,
}

impl FeatureCaster {
    /// `datetime_format` is the format the source writes `datetime_utc` in.
    /// Values not matching it are still accepted as ISO 8601, which is what
    /// the JSON API returns.
    pub fn new(datetime_format: DatetimeFormat) -> Self {
        Self { datetime_format }
    }
}

fn column<'a>(record: &'a RawRecord, feature: Feature) -> Result<&'a str> {
    record
        .get(feature.name())
        .ok_or_eyre(format!("Record has no '{}' column", feature))
}

fn cast<T>(record: &RawRecord, feature: Feature) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = column(record, feature)?;
    raw.parse()
        .map_err(|e| eyre::eyre!("Invalid {} '{}': {}", feature, raw, e))
}

/// A missing reading (empty, as the API sends `null`) becomes NaN so that
/// validation reports it instead of the cast
fn consumption(record: &RawRecord) -> Result<f64> {
    if column(record, Feature::EnergyConsumption)?.trim().is_empty() {
        return Ok(f64::NAN);
    }
    cast(record, Feature::EnergyConsumption)
}

impl Transformer for FeatureCaster {
    type Input = RawRecord;
    type Output = EnergyConsumption;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let raw_datetime = column(&input, Feature::DatetimeUtc)?;
        let datetime_utc = self
            .datetime_format
            .parse(raw_datetime)
            .or_else(|| parse_reference_datetime(raw_datetime).ok())
            .ok_or_else(|| {
                eyre::eyre!(
                    "Invalid {} '{}': expected format '{}' or ISO 8601",
                    Feature::DatetimeUtc,
                    raw_datetime,
                    self.datetime_format
                )
            })?;

        Ok(EnergyConsumption {
            datetime_utc,
            area: cast(&input, Feature::Area)?,
            consumer_type: cast(&input, Feature::ConsumerType)?,
            energy_consumption: consumption(&input)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(consumption: &str) -> RawRecord {
        RawRecord::from_iter([
            ("datetime_utc", "2023-06-01 21:00"),
            ("area", "1"),
            ("consumer_type", "111"),
            ("energy_consumption", consumption),
        ])
    }

    #[test]
    fn test_cast_record() {
        let caster = FeatureCaster::new(DatetimeFormat::file_default());
        let row = caster.transform(record("4523.5")).unwrap();

        assert_eq!(
            row,
            EnergyConsumption {
                datetime_utc: Utc.with_ymd_and_hms(2023, 6, 1, 21, 0, 0).unwrap(),
                area: 1,
                consumer_type: 111,
                energy_consumption: 4523.5,
            }
        );
    }

    #[test]
    fn test_invalid_number_names_the_column() {
        let caster = FeatureCaster::new(DatetimeFormat::file_default());
        let err = caster.transform(record("n/a")).unwrap_err();
        assert!(err.to_string().contains("energy_consumption"));
    }

    #[test]
    fn test_missing_consumption_is_nan() {
        let caster = FeatureCaster::new(DatetimeFormat::file_default());
        let row = caster.transform(record("")).unwrap();
        assert!(row.energy_consumption.is_nan());

        let mut missing_area = record("");
        missing_area.insert("area", "");
        assert!(caster.transform(missing_area).is_err());
    }

    #[test]
    fn test_api_timestamps_without_suffix() {
        let caster = FeatureCaster::new(DatetimeFormat::api_default());
        let mut input = record("1.0");
        input.insert("datetime_utc", "2023-06-01T21:00:00");

        let row = caster.transform(input).unwrap();
        assert_eq!(row.datetime_utc, Utc.with_ymd_and_hms(2023, 6, 1, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_datetime() {
        let caster = FeatureCaster::new(DatetimeFormat::api_default());
        let mut input = record("1.0");
        input.insert("datetime_utc", "yesterday");

        let err = caster.transform(input).unwrap_err();
        assert!(err.to_string().contains("%Y-%m-%dT%H:%M:%SZ"));
    }
}
