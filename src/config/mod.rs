//! Configuration loading and validation.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and `SSPORT__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Prefix of environment overrides, e.g. `SSPORT__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "SSPORT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Sports-data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Value of the `x-rapidapi-host` header
    #[serde(default = "default_provider_host")]
    pub host: String,

    /// Environment variable holding the provider key
    #[serde(default = "default_provider_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,

    /// Season used when a league has no season flagged current
    #[serde(default = "default_season")]
    pub default_season: i32,
}

fn default_provider_base_url() -> String {
    "https://v3.football.api-sports.io".to_string()
}

fn default_provider_host() -> String {
    "v3.football.api-sports.io".to_string()
}

fn default_provider_key_env() -> String {
    "FOOTBALL_API_KEY".to_string()
}

fn default_provider_timeout() -> u64 {
    30
}

fn default_season() -> i32 {
    2024
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            host: default_provider_host(),
            api_key_env: default_provider_key_env(),
            timeout_seconds: default_provider_timeout(),
            default_season: default_season(),
        }
    }
}

impl ProviderConfig {
    /// The provider key from the environment, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        read_secret(&self.api_key_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Chat-completion backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Base URL; requests go to `{base_url}/chat/completions`
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the AI key
    #[serde(default = "default_ai_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u64,
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_ai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_ai_timeout() -> u64 {
    60
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            model: default_model(),
            api_key_env: default_ai_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_ai_timeout(),
        }
    }
}

impl AiConfig {
    pub fn api_key(&self) -> Option<String> {
        read_secret(&self.api_key_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn read_secret(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the favorites file lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            ai: AiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the file at `path` (skipped when absent) and apply environment
    /// overrides from the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppConfig::load`], reading overrides from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        if self.ai.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "AI timeout must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "AI temperature must be between 0 and 2, got {}",
                self.ai.temperature
            )));
        }

        if self.ai.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "AI max_tokens must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("provider.base_url", &self.provider.base_url),
            ("ai.base_url", &self.ai.base_url),
        ] {
            if url::Url::parse(url).is_err() {
                return Err(ConfigError::ValidationError(format!(
                    "{} is not a valid URL: {}",
                    name, url
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.provider.host, "v3.football.api-sports.io");
        assert_eq!(config.provider.default_season, 2024);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_ai_config_default() {
        let ai = AiConfig::default();

        assert_eq!(ai.base_url, "https://api.openai.com/v1");
        assert_eq!(ai.model, "gpt-3.5-turbo");
        assert_eq!(ai.temperature, 0.7);
        assert_eq!(ai.max_tokens, 1000);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.provider.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_temperature() {
        let mut config = AppConfig::default();
        config.ai.temperature = 3.5;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = AppConfig::default();
        config.provider.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.ai.model, parsed.ai.model);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = AppConfig::load_with_env(&path, Some(HashMap::new())).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_file_then_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "log_level = \"debug\"\n\n[server]\nport = 9000\n\n[provider]\ndefault_season = 2023\n",
        )
        .unwrap();

        let mut env = HashMap::new();
        env.insert("SSPORT__SERVER__PORT".to_string(), "9100".to_string());

        let config = AppConfig::load_with_env(&path, Some(env)).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.provider.default_season, 2023);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\ntimeout_seconds = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load_with_env(&path, Some(HashMap::new())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
