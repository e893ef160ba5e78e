use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for the reset tool, read from a JSON file. Missing fields fall
/// back to their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    /// Number of undo steps kept, 0 disables checkpointing.
    pub undo_depth: usize,
    /// Largest child drift, in world units, accepted silently after a reset.
    pub drift_tolerance: f32,
    /// env_logger filter used when RUST_LOG is not set.
    pub log_filter: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            undo_depth: 64,
            drift_tolerance: 1e-4,
            log_filter: "info".to_string(),
        }
    }
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("could not open config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("could not parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ToolConfig::from_json(r#"{ "undo_depth": 3 }"#).unwrap();
        assert_eq!(config.undo_depth, 3);
        assert_eq!(config.drift_tolerance, ToolConfig::default().drift_tolerance);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ToolConfig::from_json("{ undo_depth: }").is_err());
        assert!(ToolConfig::from_json(r#"{ "undo_depth": -1 }"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let error = ToolConfig::load(Path::new("/nonexistent/reset-tool.json")).unwrap_err();
        assert!(error.to_string().contains("could not open config"));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join("reset-without-children-config-test.json");
        std::fs::write(&path, r#"{ "log_filter": "debug", "drift_tolerance": 0.01 }"#).unwrap();

        let config = ToolConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.drift_tolerance, 0.01);
        assert_eq!(config.undo_depth, 64);

        let _ = std::fs::remove_file(&path);
    }
}
