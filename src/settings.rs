//! Process-wide settings resolved from the environment
//!
//! Expected environment variables:
//! - ML_PIPELINE_ROOT_DIR: Project root (optional, defaults to `.`)
//! - FS_PROJECT_NAME: Feature store project (optional, defaults to `energy_consumption`)
//!
//! `<root>/.env.default` is loaded first without overriding the process
//! environment, then `<root>/.env` overrides both.

use crate::extract::DEFAULT_CACHE_DIR;
use eyre::{Context, Result};
use std::path::{Path, PathBuf};

pub const ROOT_DIR_VAR: &str = "ML_PIPELINE_ROOT_DIR";
pub const PROJECT_NAME_VAR: &str = "FS_PROJECT_NAME";
pub const DEFAULT_PROJECT_NAME: &str = "energy_consumption";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub project_name: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let root = std::env::var(ROOT_DIR_VAR).unwrap_or_else(|_| ".".to_string());
        Self::load_from(root)
    }

    pub fn load_from(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root_dir = if root.exists() {
            root.canonicalize()
                .with_context(|| format!("Invalid root directory: {}", root.display()))?
        } else {
            root.to_path_buf()
        };

        let defaults = root_dir.join(".env.default");
        if defaults.exists() {
            dotenvy::from_path(&defaults)
                .with_context(|| format!("Failed to load {}", defaults.display()))?;
        }
        let overrides = root_dir.join(".env");
        if overrides.exists() {
            dotenvy::from_path_override(&overrides)
                .with_context(|| format!("Failed to load {}", overrides.display()))?;
        }

        let output_dir = root_dir.join("output");
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        let project_name =
            std::env::var(PROJECT_NAME_VAR).unwrap_or_else(|_| DEFAULT_PROJECT_NAME.to_string());

        log::debug!("Root directory: {}", root_dir.display());
        Ok(Self {
            root_dir,
            output_dir,
            project_name,
        })
    }

    /// Where downloaded source files are cached
    pub fn cache_dir(&self) -> PathBuf {
        self.root_dir.join(DEFAULT_CACHE_DIR)
    }

    pub fn feature_store_dir(&self) -> PathBuf {
        self.output_dir.join("feature_store").join(&self.project_name)
    }
}
