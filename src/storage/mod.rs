//! File system storage operations
//!
//! This module handles the on-disk formats used by the feature store and
//! the pipeline run metadata:
//! - NDJSON row files
//! - Pretty JSON documents

mod json;
mod ndjson;

pub use json::{load_json, save_json};
pub use ndjson::{NdjsonReader, NdjsonWriter};
