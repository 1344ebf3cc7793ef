//! Energy Feature Pipeline
//!
//! A batch ETL tool that extracts hourly energy consumption for Denmark,
//! cleans and validates it, and loads it into a local, versioned feature store.

pub mod client;
pub mod etl;
pub mod extract;
pub mod feature_store;
pub mod pipeline;
pub mod settings;
pub mod storage;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use client::SourceClient;
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use extract::{
    ApiSource, DatetimeFormat, EnergyConsumptionExtractor, ExtractionConfig, ExtractionMetadata,
    ExtractionWindow, FileSource, RawRecord, RawRecordSet, RecordSource, SourceKind,
    compute_window,
};
pub use feature_store::{FeatureGroup, FeatureGroupLoader, FeatureStore};
pub use pipeline::{PipelineOptions, RunMetadata};
pub use settings::Settings;
pub use storage::{NdjsonReader, NdjsonWriter};
pub use transform::{CleaningTransformer, EnergyConsumption, Feature};
pub use validation::{ExpectationSuite, build_expectation_suite};
