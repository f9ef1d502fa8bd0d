//! Client configuration loaded via OrthoConfig.
//!
//! Settings come from `INHOUSE_*` environment variables, configuration files
//! and command-line flags, layered by OrthoConfig.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEVELOPMENT_API_URL: &str = "http://localhost:8000";
const PRODUCTION_API_URL: &str = "https://league-in-houses.herokuapp.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local API server.
    #[default]
    Development,
    /// Hosted API.
    Production,
}

impl Environment {
    /// API root used when no explicit URL is configured.
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_API_URL,
            Self::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_owned(),
            }),
        }
    }
}

/// Settings that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `environment` is not a known deployment.
    #[error("unknown environment '{value}' (expected development or production)")]
    InvalidEnvironment {
        /// Configured value.
        value: String,
    },
    /// The API base URL cannot be parsed or cannot carry paths.
    #[error("invalid api url '{value}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser complaint.
        message: String,
    },
}

/// Configuration values for the API client and session bootstrap.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INHOUSE")]
pub struct ClientSettings {
    /// `development` or `production`.
    pub environment: Option<String>,
    /// Explicit API root, overriding the environment default.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: Option<u64>,
    /// Directory holding persisted tokens; tokens live in memory when unset.
    pub token_dir: Option<PathBuf>,
}

impl ClientSettings {
    /// Configured environment, defaulting to development.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] for unknown names.
    pub fn environment(&self) -> Result<Environment, ConfigError> {
        self.environment
            .as_deref()
            .map_or(Ok(Environment::default()), str::parse)
    }

    /// API root with a trailing slash, so relative paths resolve beneath it.
    ///
    /// # Examples
    /// ```
    /// use inhouse_client::config::ClientSettings;
    ///
    /// let settings = ClientSettings {
    ///     environment: Some("production".to_owned()),
    ///     ..ClientSettings::default()
    /// };
    /// let url = settings.api_base_url().unwrap();
    /// assert_eq!(url.as_str(), "https://league-in-houses.herokuapp.com/");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the environment is unknown or the URL is
    /// invalid.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_owned(),
            _ => self.environment()?.default_api_url().to_owned(),
        };
        let with_slash = if raw.ends_with('/') {
            raw.clone()
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&with_slash).map_err(|error| ConfigError::InvalidBaseUrl {
            value: raw.clone(),
            message: error.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: raw,
                message: "url cannot carry a path".to_owned(),
            });
        }
        Ok(url)
    }

    /// Per-request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .max(1);
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "INHOUSE_ENVIRONMENT",
        "INHOUSE_API_URL",
        "INHOUSE_REQUEST_TIMEOUT_SECS",
        "INHOUSE_TOKEN_DIR",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("session-probe")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_target_the_local_api() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.request_timeout_secs, Some(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(settings.environment(), Ok(Environment::Development));
        assert_eq!(
            settings.api_base_url().expect("valid url").as_str(),
            "http://localhost:8000/"
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert!(settings.token_dir.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("INHOUSE_ENVIRONMENT", Some("production".to_owned())),
            ("INHOUSE_API_URL", None::<String>),
            ("INHOUSE_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("INHOUSE_TOKEN_DIR", Some("/tmp/inhouse-tokens".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.environment(), Ok(Environment::Production));
        assert_eq!(
            settings.api_base_url().expect("valid url").as_str(),
            "https://league-in-houses.herokuapp.com/"
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.token_dir,
            Some(PathBuf::from("/tmp/inhouse-tokens"))
        );
    }

    #[rstest]
    #[case::bare_host("http://api.test", "http://api.test/")]
    #[case::nested_path("http://api.test/api/v1", "http://api.test/api/v1/")]
    #[case::trailing_slash("http://api.test/api/", "http://api.test/api/")]
    fn explicit_urls_gain_a_trailing_slash(#[case] configured: &str, #[case] expected: &str) {
        let settings = ClientSettings {
            api_url: Some(configured.to_owned()),
            ..ClientSettings::default()
        };
        assert_eq!(
            settings.api_base_url().expect("valid url").as_str(),
            expected
        );
    }

    #[rstest]
    #[case::unknown_environment(Some("staging"), None)]
    #[case::relative_url(None, Some("api.test"))]
    #[case::opaque_url(None, Some("mailto:ops@example.com"))]
    fn invalid_settings_are_rejected(
        #[case] environment: Option<&str>,
        #[case] api_url: Option<&str>,
    ) {
        let settings = ClientSettings {
            environment: environment.map(str::to_owned),
            api_url: api_url.map(str::to_owned),
            ..ClientSettings::default()
        };
        assert!(settings.api_base_url().is_err());
    }

    #[rstest]
    fn timeouts_are_at_least_one_second() {
        let settings = ClientSettings {
            request_timeout_secs: Some(0),
            ..ClientSettings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
