//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides trait definitions for building the batch pipeline
//! that extracts records from a source, transforms them, and loads them to a
//! destination.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::{Extraction, Extractor};
pub use load::Loader;
pub use pipeline::{Pipeline, PipelineReport};
pub use transform::{Chain, IdentityTransformer, Transformer};
