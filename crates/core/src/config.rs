// crates/core/src/config.rs
//! Single table-of-values configuration file (§6 Configuration).
//!
//! Loaded once at process startup and threaded through as a value —
//! no hidden globals (§9 Design Notes "Global singletons").

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub db_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            db_url: "postgres://localhost/mnemo".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub max_context_tokens: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { max_context_tokens: 1500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    pub auto_generate: bool,
    pub min_quality_score: f64,
    /// Tokens signalling user satisfaction in a final turn (§4.J, §9
    /// Open Questions — locale-dependent, kept as configuration).
    pub confirmation_keywords: Vec<String>,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            auto_generate: true,
            min_quality_score: 0.6,
            confirmation_keywords: vec![
                "thanks".into(),
                "works".into(),
                "perfect".into(),
                "lgtm".into(),
                "great".into(),
                "awesome".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub parallelism: u32,
    pub lease_seconds: u64,
    /// Ceiling for the exponential backoff applied on job retry (§4.B,
    /// SPEC_FULL §3 "backoff(attempts)").
    pub backoff_ceiling_seconds: u64,
    pub backoff_base_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            parallelism: 2,
            lease_seconds: 60,
            backoff_ceiling_seconds: 300,
            backoff_base_seconds: 1,
        }
    }
}

/// Hot-path latency budgets (§4.F step 6, §4.G, §6 Prompt hook).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotPathConfig {
    pub classify_budget_ms: u64,
    pub retrieve_budget_ms: u64,
    pub hook_budget_ms: u64,
}

impl Default for HotPathConfig {
    fn default() -> Self {
        Self {
            classify_budget_ms: 500,
            retrieve_budget_ms: 1500,
            hook_budget_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "claude-haiku-4-5-20251001".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub context: ContextConfig,
    pub skills: SkillsConfig,
    pub worker: WorkerConfig,
    pub hot_path: HotPathConfig,
    pub llm: LlmConfig,
}

impl HotPathConfig {
    pub fn classify_budget(&self) -> Duration {
        Duration::from_millis(self.classify_budget_ms)
    }

    pub fn retrieve_budget(&self) -> Duration {
        Duration::from_millis(self.retrieve_budget_ms)
    }
}

impl Config {
    /// Load from a TOML file, then apply environment overrides for
    /// `db_url` and the model API key (§6 Configuration).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.to_owned() }
            } else {
                ConfigError::Io { path: path.to_owned(), source: e }
            }
        })?;
        let mut config: Config = toml::from_str(&text)
            .map_err(|e| ConfigError::Malformed { path: path.to_owned(), source: e })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load defaults and apply environment overrides, without
    /// requiring a config file to exist on disk.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(_) => {
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MNEMO_DB_URL") {
            self.general.db_url = url;
        }
        if let Ok(key) = std::env::var("MNEMO_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(config.context.max_context_tokens, 1500);
        assert_eq!(config.skills.min_quality_score, 0.6);
        assert_eq!(config.hot_path.hook_budget_ms, 2000);
        assert_eq!(config.hot_path.retrieve_budget_ms, 1500);
        assert_eq!(config.hot_path.classify_budget_ms, 500);
    }

    #[test]
    fn load_parses_partial_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ndb_url = \"postgres://x/y\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.db_url, "postgres://x/y");
        assert_eq!(config.context.max_context_tokens, 1500);
    }

    #[test]
    #[serial_test::serial]
    fn env_override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ndb_url = \"postgres://file/db\"\n").unwrap();

        std::env::set_var("MNEMO_DB_URL", "postgres://env/db");
        let config = Config::load(&path).unwrap();
        std::env::remove_var("MNEMO_DB_URL");

        assert_eq!(config.general.db_url, "postgres://env/db");
    }

    #[test]
    fn load_or_default_survives_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/mnemo/config.toml"));
        assert_eq!(config.context.max_context_tokens, 1500);
    }
}
