//! Runtime settings loaded via OrthoConfig.
//!
//! Every value is optional; accessors fall back to the defaults below, so an
//! empty environment yields a working development configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Access token lifetime when unset: 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 900;
/// Refresh token lifetime when unset: 7 days.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 604_800;
/// Reset token lifetime when unset: 1 hour.
pub const DEFAULT_RESET_TOKEN_TTL_SECS: u64 = 3_600;
/// Signing secret used when none is configured. Development only.
pub const DEFAULT_JWT_SECRET: &str = "auth-backend-development-secret";

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Error returned when a log format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format `{0}`; expected `json` or `pretty`")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(value.to_owned())),
        }
    }
}

/// Configuration for the authentication backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTH")]
pub struct AuthSettings {
    /// JSON file of users to seed into the in-memory store.
    pub fixtures_path: Option<PathBuf>,
    /// `json` (default) or `pretty`.
    pub log_format: Option<String>,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: Option<u64>,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: Option<u64>,
    /// Password reset token lifetime in seconds.
    pub reset_token_ttl_secs: Option<u64>,
    /// HS256 signing secret for issued tokens.
    pub jwt_secret: Option<String>,
}

impl AuthSettings {
    /// Configured log format, defaulting to JSON.
    pub fn log_format(&self) -> Result<LogFormat, UnknownLogFormat> {
        self.log_format
            .as_deref()
            .map_or(Ok(LogFormat::default()), LogFormat::from_str)
    }

    /// Token signing secret, falling back to [`DEFAULT_JWT_SECRET`] when
    /// unset or blank.
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or(DEFAULT_JWT_SECRET)
    }

    /// Whether tokens are signed with the built-in development secret.
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret() == DEFAULT_JWT_SECRET
    }

    /// Access token lifetime.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(
            self.access_token_ttl_secs
                .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_SECS),
        )
    }

    /// Refresh token lifetime.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(
            self.refresh_token_ttl_secs
                .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        )
    }

    /// Reset token lifetime.
    pub fn reset_token_ttl(&self) -> Duration {
        Duration::from_secs(
            self.reset_token_ttl_secs
                .unwrap_or(DEFAULT_RESET_TOKEN_TTL_SECS),
        )
    }
}
