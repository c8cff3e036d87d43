// ── Core error types ──
//
// User-facing errors from hivemap-core. Consumers never see raw HTTP or
// JSON failures; `From<hivemap_api::Error>` folds them into load failures.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Load errors ──────────────────────────────────────────────────
    #[error("Cannot load facilities from {source_name}: {reason}")]
    LoadFailed { source_name: String, reason: String },

    #[error("Fixture not found: {source_name}")]
    FixtureNotFound { source_name: String },

    #[error("Loading facilities timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Facilities have not been loaded yet")]
    NotLoaded,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Facility not found: {identifier}")]
    FacilityNotFound { identifier: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Export errors ────────────────────────────────────────────────
    #[error("Export failed: {message}")]
    Export { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hivemap_api::Error> for CoreError {
    fn from(err: hivemap_api::Error) -> Self {
        if err.is_not_found() {
            return match err {
                hivemap_api::Error::Io { path, .. } => CoreError::FixtureNotFound {
                    source_name: path.display().to_string(),
                },
                other => CoreError::FixtureNotFound {
                    source_name: other.to_string(),
                },
            };
        }

        match err {
            hivemap_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            hivemap_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid fixture URL: {e}"),
            },
            hivemap_api::Error::ClientBuild(message) => CoreError::Internal(message),
            hivemap_api::Error::Transport(ref e) => CoreError::LoadFailed {
                source_name: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            hivemap_api::Error::Status { status, preview } => CoreError::LoadFailed {
                source_name: "fixture server".into(),
                reason: format!("HTTP {status}: {preview}"),
            },
            hivemap_api::Error::Io { path, source } => CoreError::LoadFailed {
                source_name: path.display().to_string(),
                reason: source.to_string(),
            },
            hivemap_api::Error::Deserialization { message, body: _ } => CoreError::LoadFailed {
                source_name: "fixture".into(),
                reason: format!("malformed JSON: {message}"),
            },
        }
    }
}
