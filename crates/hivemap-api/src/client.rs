// Fixture client
//
// Wraps `reqwest::Client` for remote fixtures and `tokio::fs` for local ones.
// Both paths end in the same parser, so callers only ever see a
// `FixturePayload` or an `Error`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::FixturePayload;
use crate::transport::TransportConfig;

const PREVIEW_LEN: usize = 200;

// ── Source ───────────────────────────────────────────────────────────

/// Where the facility fixture lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
    /// Fetched with a single HTTP GET.
    Remote(Url),
    /// Read from disk.
    Local(PathBuf),
}

impl FixtureSource {
    /// Interpret a user-supplied string: `http://` and `https://` prefixes
    /// mean a URL, anything else is a filesystem path.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(Self::Remote(Url::parse(trimmed)?))
        } else {
            Ok(Self::Local(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for FixtureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Loads the facility fixture from its configured source.
pub struct FixtureClient {
    http: reqwest::Client,
    source: FixtureSource,
    timeout_secs: u64,
}

impl FixtureClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(source: FixtureSource, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            source,
            timeout_secs: transport.timeout.map_or(0, |t| t.as_secs()),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, source: FixtureSource) -> Self {
        Self {
            http,
            source,
            timeout_secs: 0,
        }
    }

    pub fn source(&self) -> &FixtureSource {
        &self.source
    }

    /// Fetch and parse the fixture once.
    pub async fn fetch(&self) -> Result<FixturePayload, Error> {
        let body = match &self.source {
            FixtureSource::Remote(url) => self.get(url.clone()).await?,
            FixtureSource::Local(path) => read_local(path).await?,
        };
        let payload = parse_payload(&body)?;
        trace!(
            records = payload.records.len(),
            malformed = payload.malformed.len(),
            "fixture parsed"
        );
        Ok(payload)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get(&self, url: Url) -> Result<String, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                preview: preview(&body).to_owned(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

async fn read_local(path: &Path) -> Result<String, Error> {
    debug!("READ {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse a fixture body. The top level must be a JSON array; its elements
/// are read individually so one bad object does not sink the whole load.
pub fn parse_payload(body: &str) -> Result<FixturePayload, Error> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })?;
    Ok(FixturePayload::from_values(values))
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_distinguishes_urls_from_paths() {
        assert!(matches!(
            FixtureSource::parse("https://example.org/facilities.json"),
            Ok(FixtureSource::Remote(_))
        ));
        assert_eq!(
            FixtureSource::parse(" data/facilities.json ").ok(),
            Some(FixtureSource::Local(PathBuf::from("data/facilities.json")))
        );
        assert!(matches!(
            FixtureSource::parse("http://"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn parse_payload_rejects_non_array_bodies() {
        let err = parse_payload(r#"{"facilities": []}"#).expect_err("object body");
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "ü".repeat(300);
        assert_eq!(preview(&body).chars().count(), PREVIEW_LEN);
        assert_eq!(preview("short"), "short");
    }
}
