//! Configuration management.
//!
//! Settings come from an optional TOML file overlaid with environment
//! variables prefixed `PUBMED_FETCHER_`, using `__` between nested keys:
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! max_results = 50
//! api_key = "your-ncbi-key"
//! email = "you@example.org"
//! tool = "pubmed-fetcher"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [retry]
//! max_attempts = 1
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//!
//! [pipeline]
//! concurrency = 1
//! ```
//!
//! e.g. `PUBMED_FETCHER_PIPELINE__CONCURRENCY=4`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::PUBMED_EUTILS_BASE_URL;
use crate::utils::RetryConfig;

pub use config::ConfigError;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PUBMED_FETCHER";

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pubmed-fetcher.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pubmed: PubMedConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// E-utilities settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Base URL the `esearch.fcgi` / `efetch.fcgi` paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size requested from esearch
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// NCBI API key (raises the rate limit from 3 to 10 requests per second)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Contact email NCBI asks E-utilities clients to send
    #[serde(default)]
    pub email: Option<String>,

    /// Tool name NCBI asks E-utilities clients to send
    #[serde(default)]
    pub tool: Option<String>,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_results: default_max_results(),
            api_key: None,
            email: None,
            tool: None,
        }
    }
}

fn default_base_url() -> String {
    PUBMED_EUTILS_BASE_URL.to_string()
}

fn default_max_results() -> usize {
    50
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Retry settings for transport calls. One attempt means no retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig::default()
            .max_attempts(settings.max_attempts)
            .initial_delay(Duration::from_millis(settings.initial_delay_ms))
            .max_delay(Duration::from_millis(settings.max_delay_ms))
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Records fetched at once; 1 keeps the run strictly sequential
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10_000).contains(&self.pubmed.max_results) {
            return Err(ConfigError::Message(format!(
                "pubmed.max_results must be between 1 and 10000, got {}",
                self.pubmed.max_results
            )));
        }
        if self.pipeline.concurrency == 0 {
            return Err(ConfigError::Message(
                "pipeline.concurrency must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Message(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill unset values from well-known environment variables.
    fn apply_env_fallbacks(&mut self) {
        if self.pubmed.api_key.is_none() {
            self.pubmed.api_key = std::env::var("NCBI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty());
        }
    }
}

/// Load configuration from an optional file plus `PUBMED_FETCHER_*` env vars
///
/// The result is not validated; apply any command-line overrides first and
/// then call [`Config::validate`].
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.apply_env_fallbacks();
    Ok(config)
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("pubmed-fetcher").join("config.toml"))
        .filter(|path| path.is_file())
}
