//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use crate::extract::ExtractionMetadata;
use eyre::Result;

/// Summary of a completed pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Records returned by the extractor (after window filtering)
    pub extracted: usize,
    /// Records accepted by the loader
    pub loaded: usize,
    /// Metadata describing the extraction
    pub metadata: ExtractionMetadata,
}

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use energy_feature_pipeline::etl::{IdentityTransformer, Pipeline};
/// # use energy_feature_pipeline::etl::{Extraction, Extractor, Loader};
/// # use eyre::Result;
/// # struct MyExtractor;
/// # impl Extractor for MyExtractor {
/// #     type Item = i32;
/// #     async fn extract(&self) -> Result<Option<Extraction<Self::Item>>> { Ok(None) }
/// # }
/// # struct MyLoader;
/// # impl Loader for MyLoader {
/// #     type Item = i32;
/// #     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> { Ok(items.len()) }
/// # }
///
/// # async fn example() -> Result<()> {
/// let pipeline = Pipeline::new(MyExtractor, IdentityTransformer::new(), MyLoader);
///
/// match pipeline.run().await? {
///     Some(report) => println!("Loaded {} records", report.loaded),
///     None => println!("Source unavailable, nothing loaded"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract records from source
    /// 2. Transform each record
    /// 3. Load records to destination
    ///
    /// Returns `Ok(None)` when the extractor reports a recoverable failure;
    /// nothing is transformed or loaded in that case.
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub async fn run(&self) -> Result<Option<PipelineReport>> {
        log::info!("Starting ETL pipeline");

        // Extract
        log::debug!("Extracting from source...");
        let Some(extraction) = self.extractor.extract().await? else {
            log::warn!("Extraction produced no result, aborting pipeline");
            return Ok(None);
        };
        let extracted = extraction.records.len();
        log::info!("Extracted {} records", extracted);

        if extraction.records.is_empty() {
            log::warn!("No records extracted, pipeline complete");
            return Ok(Some(PipelineReport {
                extracted,
                loaded: 0,
                metadata: extraction.metadata,
            }));
        }

        // Transform
        log::debug!("Transforming records...");
        let transformed = self.transformer.transform_many(extraction.records)?;
        log::info!("Transformed {} records", transformed.len());

        // Load
        log::debug!("Loading to destination...");
        let loaded = self.loader.load(transformed).await?;
        log::info!("Loaded {} records", loaded);

        Ok(Some(PipelineReport {
            extracted,
            loaded,
            metadata: extraction.metadata,
        }))
    }
}
