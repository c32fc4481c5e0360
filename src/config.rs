//! Configuration types for lokalise-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, time::Duration};

/// Default Lokalise API root
pub const DEFAULT_API_URL: &str = "https://api.lokalise.com/api2";

/// Wildcard accepted in `language_codes` to request every project language
pub const ALL_LANGUAGES: &str = "*";

/// How the requested languages are turned into export requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    /// One export request and one archive for all languages
    #[default]
    Batch,
    /// One export request and one archive per language, in order
    PerLanguage,
}

impl std::str::FromStr for FetchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(FetchMode::Batch),
            "per-language" | "per_language" => Ok(FetchMode::PerLanguage),
            other => Err(Error::config(
                "fetch_mode",
                format!("unknown fetch mode '{}', expected 'batch' or 'per-language'", other),
            )),
        }
    }
}

/// Export options sent with every bundle request
///
/// The output format, filename handling and bundle layout are fixed because the
/// extractor relies on them. These are the knobs that only change the file
/// contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Include keys from all platforms, not just the "other" platform (default: true)
    #[serde(default = "default_true")]
    pub all_platforms: bool,

    /// Plural form encoding (default: "json_string")
    #[serde(default = "default_plural_format")]
    pub plural_format: String,

    /// Placeholder syntax (default: "printf")
    #[serde(default = "default_placeholder_format")]
    pub placeholder_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            all_platforms: true,
            plural_format: default_plural_format(),
            placeholder_format: default_placeholder_format(),
        }
    }
}

/// Main configuration for a translation download
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lokalise API token, sent as `X-Api-Token`
    pub api_token: String,

    /// Lokalise project identifier
    pub project_id: String,

    /// Comma-separated language codes; `None`, blank or `*` downloads all
    #[serde(default)]
    pub language_codes: Option<String>,

    /// Prepended to every output file name (default: "")
    #[serde(default)]
    pub file_prefix: String,

    /// Directory receiving the `.properties` files (default: "src/main/resources/i18n")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Batch or per-language requests (default: batch)
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// API root, overridable for testing or proxies
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (None = transport default)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// Export options forwarded to Lokalise
    #[serde(default)]
    pub export: ExportOptions,
}

impl Config {
    /// Create a configuration with defaults for everything but the credentials
    pub fn new(api_token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            project_id: project_id.into(),
            language_codes: None,
            file_prefix: String::new(),
            output_dir: default_output_dir(),
            fetch_mode: FetchMode::default(),
            api_url: default_api_url(),
            request_timeout: None,
            export: ExportOptions::default(),
        }
    }

    /// Load configuration from `LOKALISE_*` environment variables.
    ///
    /// `LOKALISE_API_TOKEN` and `LOKALISE_PROJECT_ID` are required. Optional:
    /// `LOKALISE_LANGUAGE_CODES`, `LOKALISE_FILE_PREFIX`, `LOKALISE_OUTPUT_DIR`,
    /// `LOKALISE_FETCH_MODE`, `LOKALISE_API_URL`, `LOKALISE_REQUEST_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str, key: &str| {
            lookup(var).ok_or_else(|| Error::config(key, format!("{} not set in environment", var)))
        };

        let mut config = Self::new(
            require("LOKALISE_API_TOKEN", "api_token")?,
            require("LOKALISE_PROJECT_ID", "project_id")?,
        );

        config.language_codes = lookup("LOKALISE_LANGUAGE_CODES");
        if let Some(prefix) = lookup("LOKALISE_FILE_PREFIX") {
            config.file_prefix = prefix;
        }
        if let Some(dir) = lookup("LOKALISE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("LOKALISE_FETCH_MODE") {
            config.fetch_mode = mode.parse()?;
        }
        if let Some(url) = lookup("LOKALISE_API_URL") {
            config.api_url = url;
        }
        if let Some(secs) = lookup("LOKALISE_REQUEST_TIMEOUT") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(
                    "request_timeout",
                    format!("LOKALISE_REQUEST_TIMEOUT must be a number of seconds, got '{}'", secs),
                )
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the required settings are present and well-formed
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config("api_token", "api_token must not be empty"));
        }
        if self.project_id.trim().is_empty() {
            return Err(Error::config("project_id", "project_id must not be empty"));
        }
        let api_url = url::Url::parse(&self.api_url).map_err(|e| {
            Error::config("api_url", format!("invalid api_url '{}': {}", self.api_url, e))
        })?;
        if api_url.cannot_be_a_base() {
            return Err(Error::config(
                "api_url",
                format!("api_url '{}' cannot be used as a base URL", self.api_url),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("language_codes", &self.language_codes)
            .field("file_prefix", &self.file_prefix)
            .field("output_dir", &self.output_dir)
            .field("fetch_mode", &self.fetch_mode)
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("export", &self.export)
            .finish()
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("src/main/resources/i18n")
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_plural_format() -> String {
    "json_string".to_string()
}

fn default_placeholder_format() -> String {
    "printf".to_string()
}

fn default_true() -> bool {
    true
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
