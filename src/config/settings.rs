// Configuration settings

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, EngineProfile};
use crate::keywords::KeywordSets;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which engine variant to run: general support or trauma-informed.
    #[serde(default)]
    pub profile: EngineProfile,
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory for the JSONL metrics log. Defaults to ~/.safemind/metrics.
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: PathBuf,
    /// Directory where rendered reports are written.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Optional JSON file overriding the built-in keyword sets.
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: u64,
}

impl Config {
    /// Engine configuration for this profile, with any keyword-file
    /// overrides applied. Every front-end (REPL, query, server) builds
    /// its engines through this so overrides apply uniformly.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut engine_config = match self.profile {
            EngineProfile::Support => EngineConfig::support(),
            EngineProfile::Trauma => EngineConfig::trauma(),
        };

        if let Some(path) = &self.keywords_path {
            engine_config.keywords = KeywordSets::load_from_file(path)?;
            tracing::info!(path = %path.display(), "Loaded keyword overrides");
        }

        Ok(engine_config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: EngineProfile::default(),
            server: ServerConfig::default(),
            metrics_dir: default_metrics_dir(),
            report_dir: default_report_dir(),
            keywords_path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_sessions: default_max_sessions(),
            session_timeout_minutes: default_session_timeout(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8095".to_string()
}

fn default_max_sessions() -> usize {
    256
}

fn default_session_timeout() -> u64 {
    60
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".safemind")
}

fn default_metrics_dir() -> PathBuf {
    app_dir().join("metrics")
}

fn default_report_dir() -> PathBuf {
    app_dir().join("reports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.profile, EngineProfile::Support);
        assert_eq!(config.server.bind_address, "127.0.0.1:8095");
        assert_eq!(config.server.session_timeout_minutes, 60);
        assert!(config.keywords_path.is_none());
    }

    #[test]
    fn test_keyword_overrides_apply_to_engine_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        let json = serde_json::json!({
            "crisis": {"tag": "crisis", "phrases": ["widened phrase"]},
            "trauma": {"tag": "trauma", "phrases": []},
            "ptsd": {"tag": "ptsd", "phrases": []}
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let mut config = Config::default();
        config.keywords_path = Some(path);

        let engine_config = config.engine_config().unwrap();
        assert!(engine_config.keywords.detect_crisis("a widened phrase here"));
        assert!(!engine_config.keywords.detect_crisis("suicide"));

        // Without an override the built-in list applies.
        let default_config = Config::default().engine_config().unwrap();
        assert!(default_config.keywords.detect_crisis("suicide"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            profile = "trauma"

            [server]
            bind_address = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.profile, EngineProfile::Trauma);
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.server.max_sessions, 256);
    }
}
