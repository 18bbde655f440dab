//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Every section has defaults so a missing file still yields a working core; environment
//! variables are applied on top of the parsed file.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::paths;
use crate::strings::logs;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub debug: bool,
}

/// Result of [`AppConfig::load`].
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File that was read, `None` when running on defaults
    pub path: Option<PathBuf>,
    /// Environment overrides that were present but unparsable, as `(key, value)`
    pub ignored_overrides: Vec<(String, String)>,
}

/// Configuration for the connected services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub matrix: Option<MatrixConfig>,
    #[serde(default)]
    pub coingecko: CoinGeckoConfig,
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoinGeckoConfig {
    #[serde(default = "default_coingecko_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_coingecko_key_env")]
    pub api_key_env: String,
    /// Timeout in seconds for a single request
    #[serde(default = "default_service_timeout")]
    pub timeout: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_coingecko_url(),
            api_key: None,
            api_key_env: default_coingecko_key_env(),
            timeout: default_service_timeout(),
        }
    }
}

impl CoinGeckoConfig {
    /// The demo API works without a key, so a missing one resolves to an empty string.
    pub fn resolve_api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HuggingFaceConfig {
    #[serde(default = "default_huggingface_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_huggingface_key_env")]
    pub api_key_env: String,
    /// Timeout in seconds for a single completion
    #[serde(default = "default_service_timeout")]
    pub timeout: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_huggingface_endpoint(),
            model: String::new(),
            api_key: None,
            api_key_env: default_huggingface_key_env(),
            timeout: default_service_timeout(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

impl HuggingFaceConfig {
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .with_context(|| {
                format!(
                    "No Hugging Face API key - set services.huggingface.api_key or {}",
                    self.api_key_env
                )
            })
    }

    /// Chat-completions URL for the configured model.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Core pipeline limits. Durations are in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_rate_limit_period")]
    pub rate_limit_period: u64,
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            rate_limit: default_rate_limit(),
            rate_limit_period: default_rate_limit_period(),
            command_timeout: default_command_timeout(),
        }
    }
}

impl LimitsConfig {
    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_secs(self.rate_limit_period)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_log_dir")]
    pub directory: String,
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            directory: default_log_dir(),
            file: default_log_file(),
        }
    }
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}
fn default_coingecko_key_env() -> String {
    "COINGECKO_API_KEY".to_string()
}
fn default_huggingface_endpoint() -> String {
    "https://router.huggingface.co/hf-inference/models".to_string()
}
fn default_huggingface_key_env() -> String {
    "HUGGINGFACE_API_KEY".to_string()
}
fn default_service_timeout() -> u64 {
    20
}
fn default_max_tokens() -> u32 {
    250
}
fn default_rate_limit() -> u32 {
    5
}
fn default_rate_limit_period() -> u64 {
    60
}
fn default_command_timeout() -> u64 {
    25
}
fn default_log_dir() -> String {
    paths::DATA_DIR.to_string()
}
fn default_log_file() -> String {
    paths::SESSION_LOG_FILE.to_string()
}

impl AppConfig {
    /// Load the configuration from `explicit` if given, otherwise from the first existing
    /// candidate path, otherwise fall back to defaults.
    ///
    /// Runs before logging is installed, so ignored environment overrides are returned in
    /// [`LoadedConfig`] for the caller to report.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => paths::config_candidates().into_iter().find(|p| p.exists()),
        };

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let ignored_overrides = config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(LoadedConfig {
            config,
            path,
            ignored_overrides,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("{}: {}", logs::CONFIG_READ_ERROR, path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context(logs::CONFIG_PARSE_ERROR)
    }

    /// Apply the environment-variable overrides. `lookup` is injected so tests do not touch the
    /// process environment. Returns the `(key, value)` pairs that could not be parsed.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<(String, String)> {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            ignored: &mut Vec<(String, String)>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    ignored.push((key.to_string(), raw));
                    None
                }
            }
        }

        let mut ignored = Vec::new();

        if let Some(v) = parsed(&lookup, &mut ignored, "RATE_LIMIT") {
            self.limits.rate_limit = v;
        }
        if let Some(v) = parsed(&lookup, &mut ignored, "RATE_LIMIT_PERIOD") {
            self.limits.rate_limit_period = v;
        }
        if let Some(v) = parsed(&lookup, &mut ignored, "COMMAND_TIMEOUT") {
            self.limits.command_timeout = v;
        }
        if let Some(v) = parsed(&lookup, &mut ignored, "AI_TIMEOUT") {
            self.services.huggingface.timeout = v;
            self.services.coingecko.timeout = v;
        }
        if let Some(v) = parsed(&lookup, &mut ignored, "AI_MAX_TOKENS") {
            self.services.huggingface.max_tokens = v;
        }
        if let Some(v) = parsed(&lookup, &mut ignored, "AI_TEMPERATURE") {
            self.services.huggingface.temperature = v;
        }
        if let Some(model) = lookup("HUGGINGFACE_MODEL").filter(|m| !m.is_empty()) {
            self.services.huggingface.model = model;
        }
        if lookup("DEBUG").as_deref() == Some("true") {
            self.debug = true;
        }

        ignored
    }

    /// Ensures the values the question-answering path depends on are present.
    pub fn validate(&self) -> Result<()> {
        if self.services.huggingface.model.is_empty() {
            bail!("Missing Hugging Face model - set services.huggingface.model or HUGGINGFACE_MODEL");
        }
        self.services.huggingface.resolve_api_key()?;
        if self.limits.command_timeout == 0 {
            bail!("limits.command_timeout must be at least one second");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.limits.rate_limit, 5);
        assert_eq!(config.limits.rate_limit_period(), Duration::from_secs(60));
        assert_eq!(config.limits.command_timeout(), Duration::from_secs(25));
        assert_eq!(config.services.huggingface.max_tokens, 250);
        assert_eq!(config.services.huggingface.timeout(), Duration::from_secs(20));
        assert!(config.services.matrix.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "limits:\n  rate_limit: 3\nservices:\n  huggingface:\n    model: mistral\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.limits.rate_limit, 3);
        assert_eq!(config.limits.command_timeout, 25);
        assert_eq!(config.services.huggingface.model, "mistral");
        assert_eq!(
            config.services.huggingface.completions_url(),
            "https://router.huggingface.co/hf-inference/models/mistral/v1/chat/completions"
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RATE_LIMIT", "10"),
            ("RATE_LIMIT_PERIOD", "30"),
            ("COMMAND_TIMEOUT", "abc"),
            ("AI_TEMPERATURE", "0.5"),
            ("HUGGINGFACE_MODEL", "qwen"),
            ("DEBUG", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let ignored = config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.limits.rate_limit, 10);
        assert_eq!(config.limits.rate_limit_period, 30);
        // Unparsable values leave the default in place and are reported
        assert_eq!(config.limits.command_timeout, 25);
        assert_eq!(ignored, vec![("COMMAND_TIMEOUT".to_string(), "abc".to_string())]);
        assert_eq!(config.services.huggingface.temperature, 0.5);
        assert_eq!(config.services.huggingface.model, "qwen");
        assert!(config.debug);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "services:\n  matrix:\n    username: bot\n    password: secret\n    homeserver: https://matrix.org\nlimits:\n  command_timeout: 5"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        let matrix = config.services.matrix.unwrap();
        assert_eq!(matrix.username, "bot");
        assert_eq!(config.limits.command_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_clean_environment_reports_nothing() {
        let mut config = AppConfig::default();
        assert!(config.apply_env_overrides(|_| None).is_empty());
    }

    #[test]
    fn test_load_reports_the_file_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  rate_limit: 7").unwrap();

        let loaded = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("limits: [not, a, map]").is_err());
    }

    #[test]
    fn test_validate_requires_model_and_key() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.services.huggingface.model = "mistral".to_string();
        config.services.huggingface.api_key = Some("hf_test".to_string());
        assert!(config.validate().is_ok());
    }
}
