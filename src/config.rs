//! Configuration loading.
//!
//! The credential and endpoint are resolved once here, before any client is
//! built; nothing reads the environment at call time.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Default endpoint: GitHub Models speaks the OpenAI chat-completions API.
pub const GITHUB_MODELS_BASE_URL: &str = "https://models.github.ai/inference";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            organization: None,
        }
    }
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "openai/gpt-5".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| AgentError::Config(format!("failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(model) = env::var("WEATHER_AGENT_MODEL") {
            self.model.model = model;
        }
        if let Ok(base_url) = env::var("WEATHER_AGENT_BASE_URL") {
            self.model.base_url = Some(base_url);
        }
        if let Ok(org) = env::var("WEATHER_AGENT_ORG") {
            self.model.organization = Some(org);
        }
        // An explicit key wins; GITHUB_TOKEN is the fallback credential.
        if let Ok(key) = env::var("WEATHER_AGENT_API_KEY") {
            self.model.api_key = Some(key);
        } else if self.model.api_key.is_none() {
            if let Ok(token) = env::var("GITHUB_TOKEN") {
                self.model.api_key = Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Env vars are process-global; tests touching them take this lock so they
    // never observe each other's overrides.
    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn loads_file_and_applies_env_overrides() {
        let _guard = ENV_GUARD.lock().unwrap_or_else(|e| e.into_inner());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[model]\nprovider='openai'\nmodel='openai/gpt-4o-mini'\nbase_url='https://example.test/v1'"
        )
        .unwrap();

        env::set_var("WEATHER_AGENT_MODEL", "openai/gpt-5");
        let cfg = AppConfig::from_env_or_file(file.path()).unwrap();
        env::remove_var("WEATHER_AGENT_MODEL");

        assert_eq!(cfg.model.model, "openai/gpt-5");
        assert_eq!(cfg.model.base_url.as_deref(), Some("https://example.test/v1"));
        assert_eq!(cfg.model.provider, "openai");
    }

    #[test]
    fn credential_resolution_prefers_explicit_key_over_token() {
        let _guard = ENV_GUARD.lock().unwrap_or_else(|e| e.into_inner());

        env::set_var("GITHUB_TOKEN", "gh-token");
        env::set_var("WEATHER_AGENT_API_KEY", "explicit-key");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.model.api_key.as_deref(), Some("explicit-key"));

        env::remove_var("WEATHER_AGENT_API_KEY");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.model.api_key.as_deref(), Some("gh-token"));

        env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model\nnot toml").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn missing_file_surfaces_an_io_error() {
        let err = AppConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, AgentError::Io(_)));
    }
}
