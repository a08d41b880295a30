use crate::streaming::client::{RequestOptions, DEFAULT_BASE_URL, NO_TOKEN_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// How a finished response is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Printed to the terminal only
    #[default]
    Text,
    /// Printed and handed to the speech engine
    Voice,
}

/// Persisted settings
///
/// Every field carries its own serde default so files written by older
/// versions merge field-by-field with current defaults on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Completion endpoint base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seed forwarded to the backend for reproducibility
    #[serde(default = "default_seed")]
    pub seed: i64,

    /// Dark terminal theme
    #[serde(default)]
    pub dark_theme: bool,

    /// System prompt prepended to every request; empty disables it
    #[serde(default)]
    pub system_prompt: String,

    /// Text or voice delivery
    #[serde(default)]
    pub response_mode: ResponseMode,

    /// Generation length bound; -1 lets the backend decide
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_seed() -> i64 {
    1234
}

fn default_max_tokens() -> i64 {
    NO_TOKEN_LIMIT
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".chatline").join("config.toml"))
    }

    /// Request knobs derived from the current settings
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            seed: self.seed,
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            seed: default_seed(),
            dark_theme: false,
            system_prompt: String::new(),
            response_mode: ResponseMode::Text,
            max_tokens: default_max_tokens(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.seed, 1234);
        assert!(!config.dark_theme);
        assert!(config.system_prompt.is_empty());
        assert_eq!(config.response_mode, ResponseMode::Text);
        assert_eq!(config.max_tokens, NO_TOKEN_LIMIT);
    }

    #[test]
    fn test_sparse_file_merges_with_defaults() {
        // A file written before response_mode/max_tokens existed
        let stale = r#"
            api_base_url = "http://10.0.0.5:8080"
            seed = 7
        "#;

        let config: Config = toml::from_str(stale).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:8080");
        assert_eq!(config.seed, 7);
        // Missing fields pick up current defaults
        assert_eq!(config.response_mode, ResponseMode::Text);
        assert_eq!(config.max_tokens, NO_TOKEN_LIMIT);
        assert!(config.system_prompt.is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.system_prompt = "answer in haiku".to_string();
        config.response_mode = ResponseMode::Voice;
        config.dark_theme = true;

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("answer in haiku"));
        assert!(toml_string.contains("voice"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_request_options_carry_settings() {
        let mut config = Config::default();
        config.seed = 42;
        config.system_prompt = "be brief".to_string();
        config.max_tokens = 128;

        let opts = config.request_options();
        assert_eq!(opts.seed, 42);
        assert_eq!(opts.system_prompt, "be brief");
        assert_eq!(opts.max_tokens, 128);
    }
}
