//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::upstream::UpstreamConfig;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (local defaults, no client certificate required)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the inbound bearer-token secret
    ///
    /// # Panics
    ///
    /// Panics if `API_KEY` is not set outside development
    #[must_use]
    pub fn api_key(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("API_KEY").expect("API_KEY environment variable is not set")
            }
            Self::Development => {
                env::var("API_KEY").unwrap_or_else(|_| "dev-api-key".to_string())
            }
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Builds the upstream client configuration from environment variables.
    ///
    /// Constructed once at startup and handed to the client; nothing reads
    /// these variables after this point.
    ///
    /// # Panics
    ///
    /// Panics if the client certificate or key path is not set outside
    /// development
    #[must_use]
    pub fn upstream_config(&self) -> UpstreamConfig {
        let client_cert_path = self.required_path("UPSTREAM_CLIENT_CERT_PATH");
        let client_key_path = self.required_path("UPSTREAM_CLIENT_KEY_PATH");

        UpstreamConfig {
            base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://uat-api.thisisme.com".to_string()),
            verification_path: env::var("UPSTREAM_VERIFICATION_PATH")
                .unwrap_or_else(|_| "dhadatapro".to_string()),
            trace_path: env::var("UPSTREAM_TRACE_PATH").unwrap_or_else(|_| "v4/trace".to_string()),
            client_cert_path,
            client_key_path,
            // The upstream's server certificate is trusted by configuration,
            // not by chain verification. Kept as an explicit flag so the
            // weakening stays visible and overridable.
            accept_invalid_upstream_certs: env_bool("UPSTREAM_ACCEPT_INVALID_CERTS", true),
            poll_interval: Duration::from_secs(env_u64("UPSTREAM_POLL_INTERVAL_SECS", 3)),
            submit_grace: Duration::from_secs(env_u64("UPSTREAM_SUBMIT_GRACE_SECS", 2)),
            max_poll_attempts: u32::try_from(env_u64("UPSTREAM_MAX_POLL_ATTEMPTS", 10))
                .unwrap_or(10),
        }
    }

    fn required_path(&self, var: &str) -> Option<PathBuf> {
        let value = env::var(var).ok().map(PathBuf::from);
        match self {
            Self::Production | Self::Staging => Some(
                value.unwrap_or_else(|| panic!("{var} environment variable is not set")),
            ),
            Self::Development => value,
        }
    }
}

fn env_bool(var: &str, default: bool) -> bool {
    env::var(var)
        .ok()
        .and_then(|val| val.trim().parse::<bool>().ok())
        .unwrap_or(default)
}

fn env_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
