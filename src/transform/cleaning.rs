//! The full cleaning step applied between extraction and loading

use super::{AreaEncoder, ColumnRenamer, EnergyConsumption, FeatureCaster};
use crate::etl::{Chain, Transformer};
use crate::extract::{DatetimeFormat, RawRecord};
use eyre::Result;

/// Rename columns, encode the price area, then cast to typed features
pub struct CleaningTransformer {
    steps: Chain<Chain<ColumnRenamer, AreaEncoder>, FeatureCaster>,
}

impl CleaningTransformer {
    pub fn new(datetime_format: DatetimeFormat) -> Self {
        Self {
            steps: ColumnRenamer::energy_consumption()
                .then(AreaEncoder::danish_price_areas())
                .then(FeatureCaster::new(datetime_format)),
        }
    }
}

impl Transformer for CleaningTransformer {
    type Input = RawRecord;
    type Output = EnergyConsumption;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.steps.transform(input)
    }
}
