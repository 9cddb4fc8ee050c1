use thiserror::Error;

/// Top-level error type for the `hue-api` crate.
///
/// Non-success HTTP statuses are *not* errors by default: the Hue API
/// reports most operational failures as JSON bodies (often with a 200
/// status), so the decoded body is handed back to the caller. Only a client
/// built with strict status checking turns them into [`Error::HttpStatus`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// A parameter required by the selected connection mode is missing
    /// (remote mode without a bridge id or access token, etc.).
    #[error("Invalid client configuration: {message}")]
    Config { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not valid JSON (or not the expected shape),
    /// with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// Non-success status with strict status checking enabled.
    #[error("Hue API returned HTTP {status}")]
    HttpStatus {
        status: u16,
        body: serde_json::Value,
    },

    // ── Mode ────────────────────────────────────────────────────────
    /// Operation not available in the client's connection mode.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` for configuration errors raised before any request.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_not_transient() {
        let err = Error::config("bridge id required");
        assert!(err.is_config());
        assert!(!err.is_transient());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::HttpStatus {
            status: 503,
            body: serde_json::Value::Null,
        };
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(503));

        let err = Error::HttpStatus {
            status: 404,
            body: serde_json::Value::Null,
        };
        assert!(!err.is_transient());
    }
}
