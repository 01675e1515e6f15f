//! Configuration management
//!
//! Settings are loaded from environment variables with defaults; CLI flags
//! override individual fields afterwards.
//!
//! # Environment Variables
//!
//! - `QAFEAS_PROVIDER`: genai provider (ollama|openai|anthropic|gemini|xai|groq) - default: "ollama"
//! - `QAFEAS_MODEL`: model identifier - default: "mistral"
//! - `QAFEAS_API_BASE_URL`: endpoint overriding the provider default - default: unset
//! - `QAFEAS_POOL_SIZE`: concurrent model requests per test case - default: "2"
//! - `QAFEAS_REQUEST_TIMEOUT`: per-request timeout in seconds - default: "120"
//! - `QAFEAS_SHEET`: worksheet to read from workbook inputs - default: "Sheet1"
//! - `QAFEAS_STRICT_VOCABULARY`: reject out-of-vocabulary model values (true|false) - default: "false"
//! - `QAFEAS_CACHE_ENABLED`: cache analysis results (true|false) - default: "true"
//! - `QAFEAS_CACHE_DIR`: cache directory - default: platform cache dir + "qa-feasibility"
//! - `QAFEAS_LOG_LEVEL`: logging level - default: "info"
//! - `QAFEAS_LOG_JSON`: JSON log lines on stderr (true|false) - default: "false"
//!
//! Provider credentials and hosts (`OLLAMA_HOST`, `OPENAI_API_KEY`, ...) are
//! read by genai directly.

use crate::analysis::executor::DEFAULT_POOL_SIZE;
use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::sheet::DEFAULT_SHEET;
use crate::util::logging::parse_level;
use genai::adapter::AdapterKind;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_MODEL: &str = "mistral";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CACHE_ENABLED: bool = true;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_POOL_SIZE: usize = 64;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Client initialization failed: {0}")]
    ClientInitError(#[from] BackendError),
}

/// Parses a provider name the way the CLI and environment accept it.
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&name.to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(name.to_string()))
}

#[derive(Debug, Clone)]
pub struct FeasibilityConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub api_base_url: Option<String>,
    pub pool_size: usize,
    pub request_timeout_secs: u64,
    pub sheet: String,
    pub strict_vocabulary: bool,
    pub cache_enabled: bool,
    pub cache_dir: Option<PathBuf>,
    pub log_level: String,
    pub log_json: bool,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Default for FeasibilityConfig {
    /// Loads the configuration from `QAFEAS_*` environment variables,
    /// falling back to defaults for missing or unparsable values.
    fn default() -> Self {
        let provider = env::var("QAFEAS_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::Ollama);

        let model = env::var("QAFEAS_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base_url = env::var("QAFEAS_API_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let cache_enabled = env_parse("QAFEAS_CACHE_ENABLED").unwrap_or(DEFAULT_CACHE_ENABLED);
        let cache_dir = env::var("QAFEAS_CACHE_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                if cache_enabled {
                    Some(
                        dirs::cache_dir()
                            .unwrap_or_else(env::temp_dir)
                            .join("qa-feasibility"),
                    )
                } else {
                    None
                }
            });

        Self {
            provider,
            model,
            api_base_url,
            pool_size: env_parse("QAFEAS_POOL_SIZE").unwrap_or(DEFAULT_POOL_SIZE),
            request_timeout_secs: env_parse("QAFEAS_REQUEST_TIMEOUT")
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            sheet: env::var("QAFEAS_SHEET").unwrap_or_else(|_| DEFAULT_SHEET.to_string()),
            strict_vocabulary: env_parse("QAFEAS_STRICT_VOCABULARY").unwrap_or(false),
            cache_enabled,
            cache_dir,
            log_level: env::var("QAFEAS_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            log_json: env_parse("QAFEAS_LOG_JSON").unwrap_or(false),
        }
    }
}

impl FeasibilityConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if the pool size, timeout, sheet
    /// name or log level is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(ConfigError::ValidationFailed(format!(
                "Pool size must be between 1 and {}",
                MAX_POOL_SIZE
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.sheet.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Sheet name cannot be empty".to_string(),
            ));
        }

        self.tracing_level()?;

        Ok(())
    }

    /// Log level as a `tracing` level
    ///
    /// `log_level` already carries any `--log-level`, `--verbose` or `--quiet`
    /// override, so this is the only place the level is interpreted.
    pub fn tracing_level(&self) -> Result<Level, ConfigError> {
        parse_level(&self.log_level).ok_or_else(|| {
            ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            ))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the model client for one run.
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let client = GenAIClient::new(
            self.provider,
            self.model.clone(),
            self.request_timeout(),
            self.api_base_url.clone(),
        )?;
        Ok(Arc::new(client))
    }

    /// Cache directory when caching is enabled
    pub fn active_cache_dir(&self) -> Option<&PathBuf> {
        if self.cache_enabled {
            self.cache_dir.as_ref()
        } else {
            None
        }
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("provider".to_string(), self.provider.as_str().to_string());
        map.insert("model".to_string(), self.model.clone());
        if let Some(ref url) = self.api_base_url {
            map.insert("api_base_url".to_string(), url.clone());
        }
        map.insert("pool_size".to_string(), self.pool_size.to_string());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("sheet".to_string(), self.sheet.clone());
        map.insert(
            "strict_vocabulary".to_string(),
            self.strict_vocabulary.to_string(),
        );
        map.insert("cache_enabled".to_string(), self.cache_enabled.to_string());
        if let Some(ref dir) = self.cache_dir {
            map.insert("cache_dir".to_string(), dir.display().to_string());
        }
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());

        map
    }
}

impl fmt::Display for FeasibilityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qa-feasibility Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Pool Size: {}", self.pool_size)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Sheet: {}", self.sheet)?;
        writeln!(f, "  Strict Vocabulary: {}", self.strict_vocabulary)?;
        writeln!(f, "  Cache Enabled: {}", self.cache_enabled)?;
        if let Some(ref dir) = self.cache_dir {
            writeln!(f, "  Cache Dir: {}", dir.display())?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: [&str; 11] = [
        "QAFEAS_PROVIDER",
        "QAFEAS_MODEL",
        "QAFEAS_API_BASE_URL",
        "QAFEAS_POOL_SIZE",
        "QAFEAS_REQUEST_TIMEOUT",
        "QAFEAS_SHEET",
        "QAFEAS_STRICT_VOCABULARY",
        "QAFEAS_CACHE_ENABLED",
        "QAFEAS_CACHE_DIR",
        "QAFEAS_LOG_LEVEL",
        "QAFEAS_LOG_JSON",
    ];

    /// Sets environment variables for the duration of a test and restores them afterwards
    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn set(vars: &[(&str, &str)]) -> Self {
            let saved = ENV_KEYS
                .iter()
                .map(|key| (key.to_string(), env::var(key).ok()))
                .collect();
            for key in ENV_KEYS {
                env::remove_var(key);
            }
            for (key, value) in vars {
                env::set_var(key, value);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    fn valid_config() -> FeasibilityConfig {
        FeasibilityConfig {
            provider: AdapterKind::Ollama,
            model: "mistral".to_string(),
            api_base_url: None,
            pool_size: 2,
            request_timeout_secs: 30,
            sheet: "Sheet1".to_string(),
            strict_vocabulary: false,
            cache_enabled: true,
            cache_dir: Some(PathBuf::from("/tmp/cache")),
            log_level: "info".to_string(),
            log_json: false,
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guard = EnvGuard::set(&[]);

        let config = FeasibilityConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_base_url.is_none());
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.sheet, "Sheet1");
        assert!(!config.strict_vocabulary);
        assert!(config.cache_enabled);
        assert!(config.cache_dir.is_some());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guard = EnvGuard::set(&[
            ("QAFEAS_PROVIDER", "OpenAI"),
            ("QAFEAS_MODEL", "gpt-4o-mini"),
            ("QAFEAS_API_BASE_URL", "http://localhost:8080/v1/"),
            ("QAFEAS_POOL_SIZE", "8"),
            ("QAFEAS_REQUEST_TIMEOUT", "45"),
            ("QAFEAS_SHEET", "Regression"),
            ("QAFEAS_STRICT_VOCABULARY", "true"),
            ("QAFEAS_CACHE_ENABLED", "false"),
            ("QAFEAS_LOG_LEVEL", "DEBUG"),
            ("QAFEAS_LOG_JSON", "true"),
        ]);

        let config = FeasibilityConfig::default();

        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://localhost:8080/v1/")
        );
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.sheet, "Regression");
        assert!(config.strict_vocabulary);
        assert!(!config.cache_enabled);
        assert!(config.cache_dir.is_none());
        assert!(config.active_cache_dir().is_none());
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
        assert_eq!(config.tracing_level().unwrap(), Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_unparsable_values_fall_back_to_defaults() {
        let _guard = EnvGuard::set(&[
            ("QAFEAS_PROVIDER", "not-a-provider"),
            ("QAFEAS_POOL_SIZE", "many"),
            ("QAFEAS_REQUEST_TIMEOUT", "-3"),
        ]);

        let config = FeasibilityConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_validation_rejects_zero_pool_size() {
        let mut config = valid_config();
        config.pool_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));

        config.pool_size = MAX_POOL_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_timeouts_out_of_range() {
        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = MAX_REQUEST_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());

        config.request_timeout_secs = MAX_REQUEST_TIMEOUT_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_invalid_log_level() {
        let mut config = valid_config();
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.tracing_level(),
            Err(ConfigError::ValidationFailed(_))
        ));
        assert!(config.validate().is_err());

        config.log_level = "warn".to_string();
        assert_eq!(config.tracing_level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("Ollama").unwrap(), AdapterKind::Ollama);
        assert!(matches!(
            parse_provider("mainframe"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_create_client() {
        let client = valid_config().create_client().unwrap();
        assert_eq!(client.model_info(), Some("mistral".to_string()));
    }

    #[test]
    fn test_display_map_and_display() {
        let config = valid_config();
        let map = config.to_display_map();
        assert_eq!(map.get("model").map(String::as_str), Some("mistral"));
        assert_eq!(map.get("pool_size").map(String::as_str), Some("2"));
        assert!(!map.contains_key("api_base_url"));

        let display = config.to_string();
        assert!(display.contains("qa-feasibility Configuration:"));
        assert!(display.contains("Pool Size: 2"));
    }
}
