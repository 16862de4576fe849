// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the activities backend (serves `/activities`)
    pub activities_api_url: String,
    /// Server port
    pub port: u16,
    /// Timeout for a single backend batch request
    pub fetch_timeout_secs: u64,
    /// Sessions untouched for this long are purged
    pub session_idle_ttl_secs: u64,
    /// Mark the session cookie `Secure` (set when served over HTTPS)
    pub secure_cookies: bool,
}

impl Default for Config {
    /// Default config for local development and tests.
    fn default() -> Self {
        Self {
            activities_api_url: "http://localhost:8000".to_string(),
            port: 3000,
            fetch_timeout_secs: 10,
            session_idle_ttl_secs: 60 * 60,
            secure_cookies: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset variables take the defaults above.
    /// A variable that is set but unparsable is an error rather than being
    /// silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let activities_api_url = match lookup("ACTIVITIES_API_URL") {
            Some(raw) => {
                let trimmed = raw.trim().trim_end_matches('/').to_string();
                reqwest::Url::parse(&trimmed).map_err(|_| ConfigError::Invalid {
                    var: "ACTIVITIES_API_URL",
                    value: raw.clone(),
                })?;
                trimmed
            }
            None => defaults.activities_api_url,
        };

        Ok(Self {
            activities_api_url,
            port: parse_var(&lookup, "PORT", defaults.port)?,
            fetch_timeout_secs: parse_var(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            )?,
            session_idle_ttl_secs: parse_var(
                &lookup,
                "SESSION_IDLE_TTL_SECS",
                defaults.session_idle_ttl_secs,
            )?,
            secure_cookies: parse_var(&lookup, "SECURE_COOKIES", defaults.secure_cookies)?,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
