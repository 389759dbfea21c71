//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSHELF_API_URL` - Base URL of the REST API (default: `http://localhost:8000/api/`)
//! - `BOOKSHELF_DATA_DIR` - Directory holding the token and cart files (default: `.bookshelf`)
//! - `BOOKSHELF_PAGE_SIZE` - Page size of list requests, 1-1000 (default: 100)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_DATA_DIR: &str = ".bookshelf";
const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint is joined onto; always ends with `/`
    pub api_url: Url,
    /// Directory of the durable key files
    pub data_dir: PathBuf,
    /// `page_size` query parameter of list requests
    pub page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("BOOKSHELF_API_URL", DEFAULT_API_URL))?;
        let data_dir = PathBuf::from(get_env_or_default("BOOKSHELF_DATA_DIR", DEFAULT_DATA_DIR));
        let page_size = parse_page_size(&get_env_or_default(
            "BOOKSHELF_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;

        Ok(Self {
            api_url,
            data_dir,
            page_size,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Default configuration pointed at a specific API.
    #[must_use]
    pub fn for_api(api_url: Url) -> Self {
        Self {
            api_url: with_trailing_slash(api_url),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("BOOKSHELF_API_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BOOKSHELF_API_URL".to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    Ok(with_trailing_slash(url))
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("BOOKSHELF_PAGE_SIZE".to_string(), reason);

    let size = value.trim().parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")))
    }
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
