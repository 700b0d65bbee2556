//! Runtime configuration.
//!
//! Everything comes from environment variables, read once at startup after
//! the binary has loaded any `.env` file:
//!
//! - `ACCOUNT_USERNAME` / `ACCOUNT_PASSWORD`: login credentials
//! - `SESSION_FILEPATH`: where the session is cached (default `session.json`)
//! - `PLATFORM_API_URL`: base URL of the platform API

use std::path::{Path, PathBuf};

use crate::api::client::DEFAULT_API_URL;
use crate::auth::Credentials;

/// Session file used when `SESSION_FILEPATH` is unset
pub const DEFAULT_SESSION_FILEPATH: &str = "session.json";

pub const ENV_USERNAME: &str = "ACCOUNT_USERNAME";
pub const ENV_PASSWORD: &str = "ACCOUNT_PASSWORD";
pub const ENV_SESSION_FILEPATH: &str = "SESSION_FILEPATH";
pub const ENV_API_URL: &str = "PLATFORM_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub session_filepath: PathBuf,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset
    /// for the path and URL, but are passed through for credentials.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            credentials: Credentials::new(
                lookup(ENV_USERNAME).unwrap_or_default(),
                lookup(ENV_PASSWORD).unwrap_or_default(),
            ),
            session_filepath: non_empty(ENV_SESSION_FILEPATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILEPATH)),
            api_url: non_empty(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    pub fn session_path(&self) -> &Path {
        &self.session_filepath
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.session_path(), Path::new(DEFAULT_SESSION_FILEPATH));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.credentials, Credentials::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from(&[
            (ENV_USERNAME, "alice"),
            (ENV_PASSWORD, "secret"),
            (ENV_SESSION_FILEPATH, "/var/lib/relaybot/alice.json"),
            (ENV_API_URL, "http://localhost:8080/api/v1"),
        ]);
        assert_eq!(config.credentials, Credentials::new("alice", "secret"));
        assert_eq!(config.session_path(), Path::new("/var/lib/relaybot/alice.json"));
        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_empty_session_filepath_uses_default() {
        let config = config_from(&[(ENV_SESSION_FILEPATH, "  ")]);
        assert_eq!(config.session_path(), Path::new(DEFAULT_SESSION_FILEPATH));
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let config = config_from(&[(ENV_USERNAME, "alice"), (ENV_PASSWORD, "hunter2")]);
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
