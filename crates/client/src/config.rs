//! Environment-driven configuration.
//!
//! Every loader has a `from_env` entry point and a `from_lookup` variant
//! that takes the variable source as a closure, so tests never touch the
//! process environment.

use std::str::FromStr;

use brewnote_core::types::DbId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} environment variable is required")]
    Missing { key: &'static str },

    #[error("{key} must be a valid {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse<T: FromStr>(
    key: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid {
            key,
            value,
            expected,
        })
}

fn optional<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse(key, v, expected))
        .transpose()
}

fn required<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    optional(lookup, key, expected)?.ok_or(ConfigError::Missing { key })
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Connection settings for the notes server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash (default: `http://localhost:5555`).
    pub api_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `BREWNOTE_API_URL`              | `http://localhost:5555` |
    /// | `BREWNOTE_REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("BREWNOTE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "http://localhost:5555".into());

        let request_timeout_secs =
            optional(&lookup, "BREWNOTE_REQUEST_TIMEOUT_SECS", "u64")?.unwrap_or(30);

        Ok(Self {
            api_url,
            request_timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// LoginSettings
// ---------------------------------------------------------------------------

/// Credentials the `brewnote` binary types into the auth screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSettings {
    pub username: String,
    pub password: String,
    /// Use the sign-up path instead of sign-in.
    pub sign_up: bool,
}

impl LoginSettings {
    /// `None` unless both `BREWNOTE_USERNAME` and `BREWNOTE_PASSWORD` are set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let (Some(username), Some(password)) =
            (lookup("BREWNOTE_USERNAME"), lookup("BREWNOTE_PASSWORD"))
        else {
            return Ok(None);
        };
        let sign_up = optional(&lookup, "BREWNOTE_SIGNUP", "bool")?.unwrap_or(false);
        Ok(Some(Self {
            username,
            password,
            sign_up,
        }))
    }
}

// ---------------------------------------------------------------------------
// NoteSettings
// ---------------------------------------------------------------------------

/// A note the `brewnote` binary authors through the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSettings {
    /// Edit this existing note instead of creating one.
    pub note_id: Option<DbId>,
    pub cafe_id: DbId,
    pub coffee_id: DbId,
    pub rating: i32,
    pub comment: String,
}

impl NoteSettings {
    /// `None` unless `BREWNOTE_NOTE_COMMENT` is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(comment) = lookup("BREWNOTE_NOTE_COMMENT") else {
            return Ok(None);
        };
        Ok(Some(Self {
            note_id: optional(&lookup, "BREWNOTE_NOTE_ID", "integer")?,
            cafe_id: required(&lookup, "BREWNOTE_NOTE_CAFE_ID", "integer")?,
            coffee_id: required(&lookup, "BREWNOTE_NOTE_COFFEE_ID", "integer")?,
            rating: required(&lookup, "BREWNOTE_NOTE_RATING", "integer")?,
            comment,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
