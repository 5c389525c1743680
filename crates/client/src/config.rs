//! # Client Configuration Module
//!
//! Loads settings for the MediMeet client from environment variables,
//! falling back to defaults that match a locally running backend.
//!
//! ## Environment Variables
//!
//! - `MEDIMEET_API_URL`: Base URL of the backend API (default: "http://localhost:8095/api")
//! - `MEDIMEET_SESSION_FILE`: Where the signed-in session is persisted (default: ".medimeet/session.json")
//! - `MEDIMEET_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 15)
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::{env, path::PathBuf, time::Duration};

use eyre::{Result, WrapErr};
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:8095/api";
pub const DEFAULT_SESSION_FILE: &str = ".medimeet/session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 15;

/// Configuration for talking to the MediMeet backend
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use medimeet_client::config::ClientConfig;
///
/// fn example() -> Result<()> {
///     let config = ClientConfig::from_env()?;
///     println!("Using backend at {}", config.api_base_url);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: String,

    /// JSON file holding the persisted session
    pub session_file: PathBuf,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Log level for the application
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            log_level: Level::INFO,
        }
    }
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `MEDIMEET_REQUEST_TIMEOUT_SECONDS` is set but is not
    /// a positive integer.
    pub fn from_env() -> Result<Self> {
        let api_base_url =
            env::var("MEDIMEET_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_file = env::var("MEDIMEET_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        let request_timeout = match env::var("MEDIMEET_REQUEST_TIMEOUT_SECONDS") {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        let log_level =
            parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        Ok(Self {
            api_base_url,
            session_file,
            request_timeout,
            log_level,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Joins `path` onto the base URL, tolerating a trailing slash on either side.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Unknown names fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_timeout(value: &str) -> Result<u64> {
    let seconds: u64 = value
        .trim()
        .parse()
        .wrap_err("Invalid MEDIMEET_REQUEST_TIMEOUT_SECONDS value")?;
    if seconds == 0 {
        eyre::bail!("MEDIMEET_REQUEST_TIMEOUT_SECONDS must be greater than zero");
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_must_be_positive_integer() {
        assert_eq!(parse_timeout("30").expect("valid"), 30);
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
