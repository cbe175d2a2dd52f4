use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an adapter failure, surfaced in a [`crate::Report`]'s
/// errors map and in [`crate::SourceResult`] (temperature-core).
///
/// Mirrors the classification table every adapter failure is routed through:
/// `source` for a deliberately-raised [`TemperatureError::Source`], the HTTP
/// status buckets for transport failures, `timeout`/`parse` for the
/// corresponding low-level failures, and `unknown` as the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The adapter raised [`TemperatureError::Source`]; never retried.
    Source,
    /// HTTP 429.
    RateLimit,
    /// HTTP 401 or 403.
    Auth,
    /// Any other HTTP error status.
    Http,
    /// Socket timeout, or the per-source/global executor timeout.
    Timeout,
    /// JSON decode or missing-field failure.
    Parse,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// The string form used in `Report::errors` and `SourceResult::error_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::RateLimit => "rate_limit",
            Self::Auth => "auth",
            Self::Http => "http",
            Self::Timeout => "timeout",
            Self::Parse => "parse",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the temperature workspace.
///
/// `Source` is the one genus an adapter raises deliberately, for a request it
/// knows is broken (bad schema, a rate limit the caller must not retry).
/// Everything else an adapter's `search()` can fail with — transport, parse,
/// or opaque — is wrapped here too so `?` works end to end; the executor is
/// what turns any of these into an [`ErrorKind`] for reporting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemperatureError {
    /// The provider is broken for this request. Never retried by the executor.
    #[error("{source}: {message}")]
    Source {
        /// The adapter's `SOURCE_NAME`.
        source: String,
        /// Human-readable explanation.
        message: String,
    },

    /// An HTTP request failed with a status code the transport surfaces as an error.
    #[error("http {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or response snippet.
        message: String,
    },

    /// The per-source or global executor timeout elapsed.
    #[error("timeout: {0}")]
    Timeout(String),

    /// A JSON decode or required-field lookup failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Opaque transport-level failure (DNS, connection reset, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything not covered above.
    #[error("{0}")]
    Other(String),
}

impl TemperatureError {
    /// Build a [`TemperatureError::Source`] error.
    pub fn source(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Classify this error per the executor's error-classification table.
    #[must_use]
    pub fn classify(&self) -> ErrorKind {
        match self {
            Self::Source { .. } => ErrorKind::Source,
            Self::Http { status, .. } => match *status {
                429 => ErrorKind::RateLimit,
                401 | 403 => ErrorKind::Auth,
                _ => ErrorKind::Http,
            },
            Self::Timeout(_) | Self::Transport(_) => ErrorKind::Timeout,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Other(_) => ErrorKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for TemperatureError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TemperatureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::env::VarError> for TemperatureError {
    fn from(err: std::env::VarError) -> Self {
        Self::Other(err.to_string())
    }
}
