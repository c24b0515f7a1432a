use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::domain::invoice::DraftServiceConfig;

// Default value functions
fn default_storage_dir() -> String {
  "./data".to_string()
}

fn default_storage_key() -> String {
  "genai-invoice-draft".to_string()
}

fn default_model() -> String {
  "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
  "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
  60
}

fn default_status_display_seconds() -> u64 {
  2
}

fn default_true() -> bool {
  true
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub extraction: ExtractionConfig,
  #[serde(default)]
  pub split: SplitConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
  #[default]
  File,
  Memory,
}

/// Draft snapshot storage
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: StorageBackend,
  #[serde(default = "default_storage_dir")]
  pub dir: String,
  #[serde(default = "default_storage_key")]
  pub key: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: StorageBackend::default(),
      dir: default_storage_dir(),
      key: default_storage_key(),
    }
  }
}

/// Smart fill (Gemini) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
  /// Smart fill is disabled when no key is configured
  #[serde(default)]
  pub api_key: Option<String>,
  #[serde(default = "default_model")]
  pub model: String,
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,
  #[serde(default = "default_status_display_seconds")]
  pub status_display_seconds: u64,
}

impl Default for ExtractionConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      model: default_model(),
      base_url: default_base_url(),
      timeout_seconds: default_timeout_seconds(),
      status_display_seconds: default_status_display_seconds(),
    }
  }
}

impl ExtractionConfig {
  /// The configured key, ignoring blank values.
  pub fn api_key(&self) -> Option<&str> {
    self
      .api_key
      .as_deref()
      .map(str::trim)
      .filter(|key| !key.is_empty())
  }
}

/// Invoice split policy
#[derive(Debug, Clone, Deserialize)]
pub struct SplitConfig {
  #[serde(default = "default_true")]
  pub hide_item_dates: bool,
}

impl Default for SplitConfig {
  fn default() -> Self {
    Self {
      hide_item_dates: true,
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with GENVOICE_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the GENVOICE_ prefix and are separated by double underscores:
  /// - `GENVOICE_SERVER__PORT=8080`
  /// - `GENVOICE_STORAGE__BACKEND=memory`
  /// - `GENVOICE_EXTRACTION__API_KEY=...`
  /// - `GENVOICE_SPLIT__HIDE_ITEM_DATES=false`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      // GENVOICE_SERVER__PORT=8080
      .add_source(
        Environment::with_prefix("GENVOICE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }

  pub fn draft_service(&self) -> DraftServiceConfig {
    DraftServiceConfig {
      hide_item_dates: self.split.hide_item_dates,
      status_display: Duration::from_secs(self.extraction.status_display_seconds),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_structure() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [storage]
            backend = "memory"

            [extraction]
            api_key = "secret"
            timeout_seconds = 30

            [split]
            hide_item_dates = false
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.key, "genai-invoice-draft"); // default
    assert_eq!(config.extraction.api_key(), Some("secret"));
    assert_eq!(config.extraction.model, "gemini-2.5-flash"); // default
    assert_eq!(config.extraction.timeout_seconds, 30);
    assert_eq!(config.extraction.status_display_seconds, 2); // default
    assert!(!config.split.hide_item_dates);
    assert!(!config.draft_service().hide_item_dates);
  }

  #[test]
  fn test_config_defaults() {
    let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 3000
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.dir, "./data");
    assert_eq!(config.extraction.api_key(), None);
    assert!(config.split.hide_item_dates);
    assert_eq!(config.draft_service().status_display, Duration::from_secs(2));
  }

  #[test]
  fn test_blank_api_key_is_ignored() {
    let extraction = ExtractionConfig {
      api_key: Some("  ".to_string()),
      ..Default::default()
    };
    assert_eq!(extraction.api_key(), None);
  }
}
