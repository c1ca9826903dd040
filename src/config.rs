//! Configuration Management
//!
//! Loads the exporter configuration from a JSON or YAML file, falling back
//! to defaults when no file exists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// In-cluster Pushgateway service
pub const DEFAULT_PUSHGATEWAY_URL: &str = "http://prometheus.monitoring:9091";
pub const DEFAULT_PUSHGATEWAY_JOB: &str = "pushgateway";

/// Root URLs of the GCP REST services the plugins call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub compute: String,
    pub container: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            compute: "https://compute.googleapis.com/compute/v1".to_string(),
            container: "https://container.googleapis.com/v1".to_string(),
        }
    }
}

/// Metrics push settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub enabled: bool,
    pub url: String,
    pub job: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: DEFAULT_PUSHGATEWAY_URL.to_string(),
            job: DEFAULT_PUSHGATEWAY_JOB.to_string(),
        }
    }
}

/// Exporter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind_address: String,
    pub endpoints: Endpoints,
    pub emitter: EmitterConfig,
    /// Static bearer token; skips Application Default Credentials when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            endpoints: Endpoints::default(),
            emitter: EmitterConfig::default(),
            access_token: None,
        }
    }
}

impl Config {
    /// Candidate config file paths, in lookup order
    fn default_paths() -> Vec<PathBuf> {
        let Some(dir) = dirs::config_dir().map(|p| p.join("gcp-exporter")) else {
            return Vec::new();
        };
        ["config.json", "config.yaml", "config.yml"]
            .iter()
            .map(|name| dir.join(name))
            .collect()
    }

    /// Load configuration from an explicit path, or the first default path
    /// that exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))?,
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check that every configured URL parses
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("endpoints.compute", &self.endpoints.compute),
            ("endpoints.container", &self.endpoints.container),
            ("emitter.url", &self.emitter.url),
        ] {
            url::Url::parse(value).with_context(|| format!("Invalid URL for {}: {}", name, value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gcp-exporter-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(!config.emitter.enabled);
        assert_eq!(config.emitter.url, DEFAULT_PUSHGATEWAY_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial_config_keeps_defaults() {
        let path = write_temp(
            "config.json",
            r#"{"bind_address": "127.0.0.1:9000", "emitter": {"enabled": true}}"#,
        );
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert!(config.emitter.enabled);
        assert_eq!(config.emitter.job, DEFAULT_PUSHGATEWAY_JOB);
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_yaml_config() {
        let path = write_temp(
            "config.yaml",
            "endpoints:\n  compute: http://localhost:8081/compute/v1\naccess_token: abc\n",
        );
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.endpoints.compute, "http://localhost:8081/compute/v1");
        assert_eq!(config.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let path = write_temp("config.json", r#"{"emitter": {"url": "not a url"}}"#);
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("emitter.url"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/gcp-exporter.json"))).is_err());
    }
}
