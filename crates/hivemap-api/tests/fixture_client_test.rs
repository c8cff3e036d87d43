#![allow(clippy::unwrap_used)]
// Integration tests for `FixtureClient` using wiremock and temp files.

use std::io::Write;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hivemap_api::{Error, FixtureClient, FixtureSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(route: &str) -> (MockServer, FixtureClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}{route}", server.uri())).unwrap();
    let client = FixtureClient::with_client(reqwest::Client::new(), FixtureSource::Remote(url));
    (server, client)
}

fn sample() -> serde_json::Value {
    json!([
        {
            "id": "power-1",
            "name": "Kraftwerk Nord",
            "type": "power",
            "status": "active",
            "country": "DE",
            "position": [53.55, 9.99],
            "history": [{ "timestamp": "2025-01-01T00:00:00Z", "status": "active" }]
        },
        {
            "id": "airport-1",
            "name": "Schiphol",
            "type": "airport",
            "status": "critical",
            "country": "NL",
            "position": [52.31, 4.76],
            "description": "Main hub"
        }
    ])
}

// ── Remote fixtures ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_remote_fixture() {
    let (server, client) = setup("/api/locations").await;

    Mock::given(method("GET"))
        .and(path("/api/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.fetch().await.unwrap();

    assert_eq!(payload.records.len(), 2);
    assert!(payload.malformed.is_empty());
    assert_eq!(payload.records[0].id.as_deref(), Some("power-1"));
    assert_eq!(payload.records[1].description.as_deref(), Some("Main hub"));
    assert_eq!(payload.records[0].history.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_fetch_not_found() {
    let (server, client) = setup("/api/locations").await;

    Mock::given(method("GET"))
        .and(path("/api/locations"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such fixture"))
        .mount(&server)
        .await;

    let err = client.fetch().await.unwrap_err();
    assert!(err.is_not_found());

    match err {
        Error::Status { status, preview } => {
            assert_eq!(status, 404);
            assert_eq!(preview, "no such fixture");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_malformed_json() {
    let (server, client) = setup("/api/locations").await;

    Mock::given(method("GET"))
        .and(path("/api/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{ this is not json"))
        .mount(&server)
        .await;

    let result = client.fetch().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_keeps_good_records_next_to_malformed_ones() {
    let (server, client) = setup("/locations.json").await;

    Mock::given(method("GET"))
        .and(path("/locations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "a", "type": "power" },
            42,
            { "id": "b", "type": "port" }
        ])))
        .mount(&server)
        .await;

    let payload = client.fetch().await.unwrap();

    assert_eq!(payload.records.len(), 2);
    assert_eq!(payload.malformed.len(), 1);
    assert_eq!(payload.malformed[0].index, 1);
}

// ── Local fixtures ──────────────────────────────────────────────────

#[tokio::test]
async fn test_read_local_fixture() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", sample()).unwrap();

    let client = FixtureClient::with_client(
        reqwest::Client::new(),
        FixtureSource::Local(file.path().to_path_buf()),
    );
    let payload = client.fetch().await.unwrap();

    assert_eq!(payload.records.len(), 2);
    assert_eq!(payload.records[1].kind.as_deref(), Some("airport"));
}

#[tokio::test]
async fn test_read_missing_local_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let client = FixtureClient::with_client(
        reqwest::Client::new(),
        FixtureSource::Local(dir.path().join("missing.json")),
    );

    let err = client.fetch().await.unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
    assert!(err.is_not_found());
}
