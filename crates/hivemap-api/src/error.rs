use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `hivemap-api` crate.
///
/// Covers everything that can go wrong between "we have a source" and
/// "we have a list of wire records". Per-record problems are not errors;
/// they land in [`FixturePayload::malformed`](crate::FixturePayload).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Non-2xx response from the fixture server.
    #[error("HTTP {status}: {preview}")]
    Status { status: u16, preview: String },

    // ── Local files ─────────────────────────────────────────────────
    /// Reading a local fixture file failed.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not a JSON array, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Loaders in this workspace never retry on their own; callers that
    /// wrap the client can use this to decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the fixture itself could not be found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let missing = Error::Status {
            status: 404,
            preview: String::new(),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_transient());

        let flaky = Error::Status {
            status: 503,
            preview: "busy".into(),
        };
        assert!(flaky.is_transient());
        assert!(!flaky.is_not_found());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Error::Io {
            path: PathBuf::from("nope.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("nope.json"));
    }
}
