//! Configuration management for the acceptance suite

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default SweetManager backend
pub const DEFAULT_API_URL: &str = "https://sweetmanager-backend-emergents.onrender.com/api/v1";

/// Default local chatbot server
pub const DEFAULT_CHATBOT_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "SWEETMANAGER_API_URL";
pub const ENV_API_TOKEN: &str = "SWEETMANAGER_API_TOKEN";
pub const ENV_CHATBOT_URL: &str = "SWEETMANAGER_CHATBOT_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chatbot: ChatbotConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token for authenticated scenarios
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig {
    pub base_url: String,
    pub username: String,
    pub income: i64,
    pub expenses: i64,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHATBOT_URL.to_string(),
            username: "Manager".to_string(),
            income: 5000,
            expenses: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for conversation snapshots (defaults to the data dir)
    pub snapshot_dir: Option<String>,
}

impl Config {
    /// Load configuration from default location or create default,
    /// then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
        if let Some(url) = lookup(ENV_CHATBOT_URL).filter(|v| !v.trim().is_empty()) {
            self.chatbot.base_url = url;
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "sweetmanager-bdd") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Directory where the file snapshot store keeps conversations
    pub fn snapshot_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.snapshot_dir {
            return PathBuf::from(dir);
        }
        directories::ProjectDirs::from("", "", "sweetmanager-bdd")
            .map(|dirs| dirs.data_dir().join("snapshots"))
            .unwrap_or_else(|| PathBuf::from(".sweetmanager/snapshots"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_point_at_public_backend() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.chatbot.username, "Manager");
        assert_eq!(config.chatbot.income, 5000);
        assert_eq!(config.chatbot.expenses, 3000);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [chatbot]
            username = "Ana"
            "#,
        )
        .unwrap();
        assert_eq!(config.chatbot.username, "Ana");
        assert_eq!(config.chatbot.base_url, DEFAULT_CHATBOT_URL);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_env_overrides_ignore_blank_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:9000/api/v1"),
            (ENV_API_TOKEN, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api/v1");
        assert!(config.api.token.is_none());
        assert_eq!(config.chatbot.base_url, DEFAULT_CHATBOT_URL);
    }

    #[test]
    fn test_snapshot_dir_prefers_configured_path() {
        let mut config = Config::default();
        config.storage.snapshot_dir = Some("/tmp/snapshots".to_string());
        assert_eq!(config.snapshot_dir(), PathBuf::from("/tmp/snapshots"));
    }
}
