//! Pretty JSON documents on disk

use eyre::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Serialize `value` as pretty JSON to `path`, creating parent directories
pub fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    log::debug!("Wrote {}", path.display());
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn test_save_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/meta.json");

        save_json(&json!({"days_delay": 15}), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"days_delay\": 15\n"));
        let loaded: Value = load_json(&path).unwrap();
        assert_eq!(loaded["days_delay"], 15);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_json::<Value>(dir.path().join("missing.json")).is_err());
    }
}
