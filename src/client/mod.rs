//! HTTP client for the upstream energy data source.
//!
//! This module provides the [`SourceClient`], a thin wrapper over `reqwest`
//! that encodes the fetch contract: one best-effort GET, strict `200 OK`,
//! and a split between recoverable and fatal failures.

mod source;

pub use source::{DEFAULT_TIMEOUT, SourceClient};
