//! Configuration for cro-auditor.
//!
//! Loaded from `~/.cro-auditor/config.json`. Every section is optional and
//! falls back to its `Default`. A small set of environment variables can
//! override provider settings at runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuditError, Result};

/// Default OpenAI-compatible API base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat completion provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL; `/chat/completions` is appended.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Request `response_format: {"type": "json_object"}`.
    pub json_mode: bool,
    /// HTTP client timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            json_mode: true,
            timeout_secs: 120,
        }
    }
}

/// Expiry and capacity policy for the audit caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a global cache entry.
    pub global_ttl_secs: u64,
    /// Lifetime of a per-user history entry.
    pub history_ttl_secs: u64,
    /// Maximum entries kept in a user's history.
    pub history_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            global_ttl_secs: 24 * 60 * 60,
            history_ttl_secs: 7 * 24 * 60 * 60,
            history_limit: 10,
        }
    }
}

/// Location and size limit of the persistent key-value file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the storage file; `None` uses `~/.cro-auditor/storage.json`.
    pub path: Option<PathBuf>,
    /// Total serialized size limit in bytes.
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: 5 * 1024 * 1024,
        }
    }
}

impl StorageConfig {
    /// Resolved storage file path.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| Config::dir().join("storage.json"))
    }
}

/// Demo-mode behaviour when no credential is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Sleep between progress steps so the demo looks like a real run.
    pub pacing: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { pacing: true }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
    pub demo: DemoConfig,
}

impl Config {
    /// Base directory: `~/.cro-auditor`.
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cro-auditor")
    }

    /// Default config file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                AuditError::Config(format!("Failed to parse {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(AuditError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Apply `CRO_AUDITOR_API_BASE` and `CRO_AUDITOR_MODEL`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("CRO_AUDITOR_API_BASE").ok(),
            std::env::var("CRO_AUDITOR_MODEL").ok(),
        );
    }

    fn apply_overrides(&mut self, api_base: Option<String>, model: Option<String>) {
        if let Some(base) = api_base.filter(|s| !s.trim().is_empty()) {
            self.provider.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = model.filter(|s| !s.trim().is_empty()) {
            self.provider.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.provider.model, "gpt-4o-mini");
        assert_eq!(cfg.provider.max_tokens, 4000);
        assert!((cfg.provider.temperature - 0.7).abs() < f32::EPSILON);
        assert!(cfg.provider.json_mode);
        assert_eq!(cfg.cache.global_ttl_secs, 86_400);
        assert_eq!(cfg.cache.history_ttl_secs, 604_800);
        assert_eq!(cfg.cache.history_limit, 10);
        assert!(cfg.demo.pacing);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{"provider": {"model": "gpt-4o"}, "cache": {"history_limit": 3}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.provider.model, "gpt-4o");
        assert_eq!(cfg.provider.api_base, DEFAULT_API_BASE); // default
        assert_eq!(cfg.cache.history_limit, 3);
        assert_eq!(cfg.cache.global_ttl_secs, 86_400); // default
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load_from_path(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_overrides_trim_trailing_slash_and_skip_blank() {
        let mut cfg = Config::default();
        cfg.apply_overrides(Some("http://localhost:8080/v1/".into()), Some("  ".into()));
        assert_eq!(cfg.provider.api_base, "http://localhost:8080/v1");
        assert_eq!(cfg.provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_storage_path_override() {
        let cfg = StorageConfig {
            path: Some(PathBuf::from("/tmp/custom.json")),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_path(), PathBuf::from("/tmp/custom.json"));
    }
}
