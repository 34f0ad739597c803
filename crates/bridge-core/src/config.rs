//! Bridge configuration.
//!
//! The allowlist is supplied once at process start and never reloaded.
//! Supports JSON and TOML files based on extension; a missing file yields
//! the default configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allowlist::Allowlist;

/// Domains reachable with the default configuration.
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 5] =
    ["apex-demo.hvs", "*.hvs", "localhost", "127.0.0.1", "*.local"];

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: String,
        source: serde_json::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: String,
        source: toml::de::Error,
    },
}

/// Static bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Hostname patterns admitted by the allowlist (exact or `*`/`?` glob).
    pub allowed_domains: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a file, chosen by extension (`.toml` is TOML,
    /// anything else JSON). Returns the default config if the file does not
    /// exist.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            }),
            _ => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Compile the configured domains into an [`Allowlist`].
    pub fn allowlist(&self) -> Allowlist {
        Allowlist::from_patterns(&self.allowed_domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bridge.json");
        fs::write(
            &config_path,
            r#"{"allowed_domains": ["api.internal", "*.corp"]}"#,
        )
        .unwrap();

        let config = BridgeConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.allowed_domains, vec!["api.internal", "*.corp"]);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bridge.toml");
        fs::write(&config_path, r#"allowed_domains = ["localhost"]"#).unwrap();

        let config = BridgeConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.allowed_domains, vec!["localhost"]);
    }

    #[test]
    fn test_load_from_nonexistent_file_yields_defaults() {
        let config =
            BridgeConfig::load_from_file(Path::new("/nonexistent/bridge.json")).unwrap();
        assert!(config.allowed_domains.iter().any(|d| d == "*.hvs"));
        assert_eq!(config.allowed_domains.len(), DEFAULT_ALLOWED_DOMAINS.len());
    }

    #[test]
    fn test_load_from_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.json");
        fs::write(&config_path, "{ invalid json }").unwrap();

        let result = BridgeConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::ParseJson { .. })));
    }

    #[test]
    fn test_empty_json_object_uses_default_domains() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("empty.json");
        fs::write(&config_path, "{}").unwrap();

        let config = BridgeConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.allowed_domains.len(), DEFAULT_ALLOWED_DOMAINS.len());
    }

    #[test]
    fn test_allowlist_compilation() {
        let config = BridgeConfig::default();
        let allowlist = config.allowlist();
        assert!(allowlist.permits("localhost"));
        assert!(allowlist.permits("api.hvs"));
        assert!(!allowlist.permits("example.com"));
    }
}
