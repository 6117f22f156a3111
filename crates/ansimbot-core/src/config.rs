//! Ansimbot configuration system.
//!
//! TOML file with per-field defaults, plus the environment overrides the
//! deployment relies on: `LLM_API_URL`, `LLM_MODEL`, `CORS_ALLOW_ORIGINS`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnsimError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsimConfig {
    /// Model name sent to the completion backend.
    #[serde(default = "default_model")]
    pub model: String,
    /// Candidate chat-completions endpoints, tried in order per request.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    /// Per-endpoint request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Path to the `text,intent` corpus CSV.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    /// Path the unanswered-question sink appends to.
    #[serde(default = "default_unanswered_path")]
    pub unanswered_path: String,
}

fn default_model() -> String { "gpt-oss-20b".into() }
fn default_endpoints() -> Vec<String> {
    vec![
        "http://127.0.0.1:1234/v1/chat/completions".into(),
        "http://localhost:1234/v1/chat/completions".into(),
    ]
}
fn default_timeout_secs() -> u64 { 120 }
fn default_corpus_path() -> String { "fds_docs.csv".into() }
fn default_unanswered_path() -> String { "unanswered_questions.txt".into() }

impl Default for AnsimConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoints: default_endpoints(),
            request_timeout_secs: default_timeout_secs(),
            retrieval: RetrievalConfig::default(),
            gateway: GatewayConfig::default(),
            corpus_path: default_corpus_path(),
            unanswered_path: default_unanswered_path(),
        }
    }
}

impl AnsimConfig {
    /// Load from the default path (~/.ansimbot/config.toml), falling back to
    /// defaults when the file does not exist. Environment overrides are
    /// applied either way.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a specific path (no env overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnsimError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| AnsimError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ansimbot")
            .join("config.toml")
    }

    /// Apply process-environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (testable form of
    /// [`apply_env_overrides`]).
    ///
    /// `LLM_API_URL` replaces the whole endpoint candidate list — a single
    /// explicit endpoint wins over the local defaults.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("LLM_API_URL") {
            if !url.trim().is_empty() {
                self.endpoints = vec![url.trim().to_string()];
            }
        }
        if let Some(model) = get("LLM_MODEL") {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
            }
        }
        if let Some(origins) = get("CORS_ALLOW_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !parsed.is_empty() {
                self.gateway.allowed_origins = parsed;
            }
        }
    }
}

/// Retrieval tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum cosine similarity for a hit to count as valid context.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_top_k() -> usize { 5 }
fn default_min_score() -> f32 { 0.05 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: default_top_k(), min_score: default_min_score() }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by the CORS layer.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5001 }
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8088".into(),
        "http://127.0.0.1:8088".into(),
    ]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnsimConfig::default();
        assert_eq!(config.model, "gpt-oss-20b");
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.retrieval.top_k, 5);
        assert!((config.retrieval.min_score - 0.05).abs() < 1e-6);
        assert_eq!(config.gateway.port, 5001);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            model = "qwen2.5-7b-instruct"
            endpoints = ["http://10.0.0.5:8000/v1/chat/completions"]

            [retrieval]
            top_k = 3
            min_score = 0.1

            [gateway]
            port = 8088
        "#;

        let config: AnsimConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "qwen2.5-7b-instruct");
        assert_eq!(config.endpoints, vec!["http://10.0.0.5:8000/v1/chat/completions"]);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.gateway.port, 8088);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: AnsimConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, "gpt-oss-20b");
        assert_eq!(config.corpus_path, "fds_docs.csv");
        assert_eq!(config.gateway.allowed_origins.len(), 2);
    }

    #[test]
    fn test_env_override_replaces_endpoint_list() {
        let mut config = AnsimConfig::default();
        config.apply_overrides(|key| match key {
            "LLM_API_URL" => Some("http://gpu-box:1234/v1/chat/completions".into()),
            "LLM_MODEL" => Some("exaone-3.5".into()),
            _ => None,
        });
        assert_eq!(config.endpoints, vec!["http://gpu-box:1234/v1/chat/completions"]);
        assert_eq!(config.model, "exaone-3.5");
    }

    #[test]
    fn test_cors_override_splits_and_trims() {
        let mut config = AnsimConfig::default();
        config.apply_overrides(|key| match key {
            "CORS_ALLOW_ORIGINS" => Some("http://a.example , http://b.example,".into()),
            _ => None,
        });
        assert_eq!(
            config.gateway.allowed_origins,
            vec!["http://a.example", "http://b.example"]
        );
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = AnsimConfig::default();
        config.apply_overrides(|key| match key {
            "LLM_API_URL" => Some("   ".into()),
            _ => None,
        });
        assert_eq!(config.endpoints, AnsimConfig::default().endpoints);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"test-model\"\n").unwrap();
        let config = AnsimConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "test-model");
    }

    #[test]
    fn test_load_from_bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [broken").unwrap();
        let err = AnsimConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AnsimError::Config(_)));
    }
}
