//! Transform implementations for energy consumption records
//!
//! This module turns raw source rows into typed feature rows:
//! rename columns, encode the price area, cast values.

mod area_encoder;
mod cleaning;
mod column_renamer;
mod feature_caster;
mod features;

pub use area_encoder::{AreaEncoder, DANISH_PRICE_AREAS};
pub use cleaning::CleaningTransformer;
pub use column_renamer::{ColumnRenamer, DROPPED_COLUMNS, ENERGY_CONSUMPTION_COLUMNS};
pub use feature_caster::FeatureCaster;
pub use features::{EnergyConsumption, Feature};
