//! End-to-end feature pipeline run
//!
//! Pipeline: EnergyConsumptionExtractor → CleaningTransformer → FeatureGroupLoader,
//! followed by writing the run metadata next to the other outputs.

use crate::client::SourceClient;
use crate::etl::{Pipeline, PipelineReport};
use crate::extract::{
    ApiSource, EnergyConsumptionExtractor, ExtractionConfig, ExtractionMetadata, FileSource,
    RecordSource, SourceKind,
};
use crate::feature_store::{FeatureGroupLoader, FeatureStore};
use crate::settings::Settings;
use crate::storage::save_json;
use crate::transform::CleaningTransformer;
use crate::validation::build_expectation_suite;
use eyre::Result;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

pub const METADATA_FILE_NAME: &str = "feature_pipeline_metadata.json";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub extraction: ExtractionConfig,
    pub feature_group_version: u32,
}

/// Contents of `feature_pipeline_metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(flatten)]
    pub extraction: ExtractionMetadata,
    pub feature_group_version: u32,
    pub records_loaded: usize,
}

/// Run extraction, cleaning, validation and loading once
///
/// Returns `Ok(None)` when the source could not be reached; nothing is
/// loaded or written in that case.
pub async fn run(settings: &Settings, options: &PipelineOptions) -> Result<Option<RunMetadata>> {
    let config = &options.extraction;
    let client = SourceClient::try_new(config.timeout)?;

    log::info!("Starting data extraction from {}", config.url.bright_black());
    let report = match config.source {
        SourceKind::File => {
            let cache_dir = config
                .cache_dir
                .clone()
                .unwrap_or_else(|| settings.cache_dir());
            let source = FileSource::new(client, config.url.clone(), config.datetime_format.clone())
                .with_cache_dir(cache_dir)
                .with_comparison(config.comparison);
            run_with_source(source, settings, options).await?
        }
        SourceKind::Api => {
            let source = ApiSource::new(client, config.url.clone(), config.datetime_format.clone())
                .with_comparison(config.comparison);
            run_with_source(source, settings, options).await?
        }
    };

    let Some(report) = report else {
        log::warn!("Could not extract data, nothing was loaded");
        return Ok(None);
    };

    log::info!("Wrapping up the pipeline");
    let metadata = RunMetadata {
        extraction: report.metadata,
        feature_group_version: options.feature_group_version,
        records_loaded: report.loaded,
    };
    let path = settings.output_dir.join(METADATA_FILE_NAME);
    save_json(&metadata, &path)?;
    log::info!("Saved run metadata to {}", path.display().bright_black());
    log::info!("Done!");

    Ok(Some(metadata))
}

async fn run_with_source<S: RecordSource>(
    source: S,
    settings: &Settings,
    options: &PipelineOptions,
) -> Result<Option<PipelineReport>> {
    let extractor = EnergyConsumptionExtractor::new(source, &options.extraction);
    let transformer = CleaningTransformer::new(options.extraction.datetime_format.clone());

    let store = FeatureStore::open(settings.feature_store_dir())?;
    let loader = FeatureGroupLoader::new(
        store,
        options.feature_group_version,
        build_expectation_suite(),
    );

    Pipeline::new(extractor, transformer, loader).run().await
}
