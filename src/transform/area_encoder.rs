//! Area encoder transformer
//!
//! Replaces the textual price area with its integer code.

use crate::etl::Transformer;
use crate::extract::RawRecord;
use eyre::{OptionExt, Result};

/// Danish price areas: the whole country and the two areas split by the Great Belt
pub const DANISH_PRICE_AREAS: [(&str, u8); 3] = [("DK", 0), ("DK1", 1), ("DK2", 2)];

/// Transformer that encodes a categorical column as integer codes
pub struct AreaEncoder {
    column: String,
    codes: Vec<(String, u8)>,
}

impl AreaEncoder {
    pub fn new(column: &str, codes: &[(&str, u8)]) -> Self {
        Self {
            column: column.to_string(),
            codes: codes
                .iter()
                .map(|(area, code)| (area.to_string(), *code))
                .collect(),
        }
    }

    /// Encoder for the renamed `area` column: DK → 0, DK1 → 1, DK2 → 2
    pub fn danish_price_areas() -> Self {
        Self::new("area", &DANISH_PRICE_AREAS)
    }

    fn code(&self, area: &str) -> Option<u8> {
        self.codes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(area))
            .map(|(_, code)| *code)
    }
}

impl Transformer for AreaEncoder {
    type Input = RawRecord;
    type Output = RawRecord;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        let area = input
            .get(&self.column)
            .ok_or_eyre(format!("Record has no '{}' column", self.column))?;
        let code = self.code(area).ok_or_else(|| {
            eyre::eyre!(
                "Unknown {} '{}', expected one of: {}",
                self.column,
                area,
                self.codes
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        input.insert(self.column.clone(), code.to_string());
        Ok(input)
    }
}
