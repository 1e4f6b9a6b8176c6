//! Run configuration
//!
//! Settings come from an optional TOML file, then environment variables
//! (a `.env` file is loaded by the binary), then CLI flags. Everything is
//! validated before the first store call.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_STORE_URL: &str = "CONTENT_STORE_URL";
pub const ENV_STORE_DATASET: &str = "CONTENT_STORE_DATASET";
pub const ENV_STORE_API_VERSION: &str = "CONTENT_STORE_API_VERSION";
pub const ENV_STORE_TOKEN: &str = "CONTENT_STORE_TOKEN";
pub const ENV_DELAY_MS: &str = "FIXER_DELAY_MS";
pub const ENV_REPORT_DIR: &str = "FIXER_REPORT_DIR";

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

/// Content store connection, as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub dataset: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Usually supplied through the environment rather than the file
    pub token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            dataset: None,
            api_version: default_api_version(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Document type to process (default: blogPost)
    #[serde(default = "default_document_type")]
    pub document_type: String,
    /// Rich-text field holding the body (default: body)
    #[serde(default = "default_body_field")]
    pub body_field: String,
    /// Pause between documents in milliseconds (default: 150)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Where reports are written (default: reports)
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Restrict the run to these slugs; empty means every document
    #[serde(default)]
    pub slugs: Vec<String>,
    /// Markdown pages used when a slug is missing from the store
    #[serde(default)]
    pub markdown_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            document_type: default_document_type(),
            body_field: default_body_field(),
            delay_ms: default_delay_ms(),
            report_dir: default_report_dir(),
            slugs: Vec::new(),
            markdown_dir: None,
        }
    }
}

impl RunConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Keywords added to the built-in allow-list
    #[serde(default)]
    pub allow_list: Vec<String>,
}

fn default_api_version() -> String {
    "2024-01-01".to_string()
}

fn default_document_type() -> String {
    "blogPost".to_string()
}

fn default_body_field() -> String {
    "body".to_string()
}

fn default_delay_ms() -> u64 {
    150
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

/// Validated store connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub url: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
}

impl FixerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// File (if any) overlaid with the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from `lookup`; blank values are ignored
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(dataset) = get(ENV_STORE_DATASET) {
            self.store.dataset = Some(dataset);
        }
        if let Some(version) = get(ENV_STORE_API_VERSION) {
            self.store.api_version = version;
        }
        if let Some(token) = get(ENV_STORE_TOKEN) {
            self.store.token = Some(token);
        }
        if let Some(delay) = get(ENV_DELAY_MS) {
            self.run.delay_ms = delay.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_DELAY_MS,
                message: format!("expected milliseconds, got {:?}", delay),
            })?;
        }
        if let Some(dir) = get(ENV_REPORT_DIR) {
            self.run.report_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Check the store settings. A write run without a token fails here,
    /// before any document is fetched.
    pub fn store_settings(&self, needs_write: bool) -> Result<StoreSettings, ConfigError> {
        let url = non_blank(&self.store.url).ok_or(ConfigError::Missing(ENV_STORE_URL))?;
        let dataset =
            non_blank(&self.store.dataset).ok_or(ConfigError::Missing(ENV_STORE_DATASET))?;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: ENV_STORE_URL,
                message: format!("expected an http(s) URL, got {:?}", url),
            });
        }
        let token = non_blank(&self.store.token);
        if needs_write && token.is_none() {
            return Err(ConfigError::MissingCredential(ENV_STORE_TOKEN));
        }

        Ok(StoreSettings {
            url: url.trim_end_matches('/').to_string(),
            dataset,
            api_version: self.store.api_version.trim_start_matches('v').to_string(),
            token,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FixerConfig::from_str("").unwrap();
        assert_eq!(config.run.document_type, "blogPost");
        assert_eq!(config.run.body_field, "body");
        assert_eq!(config.run.delay_ms, 150);
        assert_eq!(config.run.report_dir, PathBuf::from("reports"));
        assert_eq!(config.store.api_version, "2024-01-01");
    }

    #[test]
    fn test_parse_file_sections() {
        let toml = r#"
            [store]
            url = "https://abc123.api.example.io"
            dataset = "production"

            [run]
            document_type = "page"
            slugs = ["quiz-nights", "sunday-roasts"]

            [compliance]
            allow_list = ["the tap room"]
        "#;
        let config = FixerConfig::from_str(toml).unwrap();
        assert_eq!(config.store.dataset.as_deref(), Some("production"));
        assert_eq!(config.run.document_type, "page");
        assert_eq!(config.run.slugs.len(), 2);
        assert_eq!(config.compliance.allow_list, vec!["the tap room".to_string()]);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = FixerConfig::from_str("[store]\ndataset = \"staging\"\n").unwrap();
        config
            .apply_env(env(&[
                (ENV_STORE_DATASET, "production"),
                (ENV_DELAY_MS, "0"),
                (ENV_STORE_TOKEN, "  "),
            ]))
            .unwrap();
        assert_eq!(config.store.dataset.as_deref(), Some("production"));
        assert_eq!(config.run.delay_ms, 0);
        assert_eq!(config.store.token, None);
    }

    #[test]
    fn test_bad_delay_is_rejected() {
        let mut config = FixerConfig::default();
        let err = config.apply_env(env(&[(ENV_DELAY_MS, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_DELAY_MS, .. }));
    }

    #[test]
    fn test_missing_endpoint() {
        let config = FixerConfig::default();
        let err = config.store_settings(false).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_STORE_URL)));
    }

    #[test]
    fn test_write_requires_token() {
        let mut config = FixerConfig::default();
        config
            .apply_env(env(&[
                (ENV_STORE_URL, "https://store.example.com/"),
                (ENV_STORE_DATASET, "production"),
            ]))
            .unwrap();

        let read = config.store_settings(false).unwrap();
        assert_eq!(read.url, "https://store.example.com");
        assert_eq!(read.token, None);

        let err = config.store_settings(true).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_STORE_TOKEN)));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = FixerConfig::default();
        config.store.url = Some("ftp://store".to_string());
        config.store.dataset = Some("production".to_string());
        assert!(matches!(
            config.store_settings(false),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
