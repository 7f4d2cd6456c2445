//! Integration tests for the Firestore REST store using wiremock.

#![cfg(feature = "firestore")]

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citysuggest::CitySuggestError;
use citysuggest::store::{CityStore, FirestoreConfig, FirestoreStore, WriteBatch};
use citysuggest::types::CityRecord;

const DOCUMENTS: &str = "/v1/projects/demo/databases/(default)/documents";

fn store(server: &MockServer, token: Option<&str>) -> FirestoreStore {
    let config = FirestoreConfig::new("demo").base_url(server.uri());
    FirestoreStore::new(config, token.map(str::to_string)).unwrap()
}

fn city_document(name: &str, country: &str) -> serde_json::Value {
    json!({
        "document": {
            "name": format!("projects/demo/databases/(default)/documents/cities/{}", name.to_lowercase()),
            "fields": {
                "name": { "stringValue": name },
                "name_lowercase": { "stringValue": name.to_lowercase() },
                "country": { "stringValue": country },
                "is_approved": { "booleanValue": true }
            },
            "createTime": "2024-05-01T12:00:00Z",
            "updateTime": "2024-05-01T12:00:00Z"
        },
        "readTime": "2024-05-01T12:00:00Z"
    })
}

// ============================================================================
// Prefix search
// ============================================================================

#[tokio::test]
async fn search_prefix_decodes_documents() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:runQuery")))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            city_document("Los Alamos", "United States"),
            city_document("Los Angeles", "United States"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cities = store(&mock_server, Some("ya29.token"))
        .search_prefix("los", 5)
        .await
        .unwrap();

    assert_eq!(
        cities,
        vec![
            CityRecord::approved("Los Alamos", "United States"),
            CityRecord::approved("Los Angeles", "United States"),
        ]
    );
}

#[tokio::test]
async fn search_prefix_sends_range_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:runQuery")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "readTime": "2024-05-01T12:00:00Z" }])),
        )
        .mount(&mock_server)
        .await;

    let cities = store(&mock_server, None)
        .search_prefix("los", 5)
        .await
        .unwrap();
    assert!(cities.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());

    let body: serde_json::Value = requests[0].body_json().unwrap();
    let query = &body["structuredQuery"];
    assert_eq!(query["from"][0]["collectionId"], "cities");
    assert_eq!(query["where"]["fieldFilter"]["field"]["fieldPath"], "is_approved");
    assert_eq!(query["where"]["fieldFilter"]["value"]["booleanValue"], true);
    assert_eq!(query["orderBy"][0]["field"]["fieldPath"], "name_lowercase");
    assert_eq!(query["startAt"]["values"][0]["stringValue"], "los");
    assert_eq!(query["endAt"]["values"][0]["stringValue"], "los\u{f8ff}");
    assert_eq!(query["limit"], 5);
}

#[tokio::test]
async fn search_prefix_rejects_incomplete_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "document": {
                "name": "projects/demo/databases/(default)/documents/cities/x",
                "fields": { "name": { "stringValue": "X" } }
            }
        }])))
        .mount(&mock_server)
        .await;

    let err = store(&mock_server, None)
        .search_prefix("x", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CitySuggestError::Store(_)));
}

#[tokio::test]
async fn forbidden_is_authentication_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:runQuery")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let err = store(&mock_server, None)
        .search_prefix("los", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CitySuggestError::AuthenticationFailed));
}

// ============================================================================
// Rate-limit marker
// ============================================================================

#[tokio::test]
async fn missing_marker_document_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS}/meta/fallback")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "status": "NOT_FOUND" }
        })))
        .mount(&mock_server)
        .await;

    let marker = store(&mock_server, None).last_fetched().await.unwrap();
    assert_eq!(marker, None);
}

#[tokio::test]
async fn marker_timestamp_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS}/meta/fallback")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/meta/fallback",
            "fields": {
                "last_fetched": { "timestampValue": "2024-05-01T12:30:00Z" }
            }
        })))
        .mount(&mock_server)
        .await;

    let marker = store(&mock_server, None).last_fetched().await.unwrap();
    assert_eq!(
        marker,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
    );
}

#[tokio::test]
async fn marker_without_field_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS}/meta/fallback")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/meta/fallback",
            "fields": {}
        })))
        .mount(&mock_server)
        .await;

    let marker = store(&mock_server, None).last_fetched().await.unwrap();
    assert_eq!(marker, None);
}

#[tokio::test]
async fn marker_server_error_is_store_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS}/meta/fallback")))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&mock_server)
        .await;

    let err = store(&mock_server, None).last_fetched().await.unwrap_err();
    match err {
        CitySuggestError::Store(message) => assert!(message.contains("backend unavailable")),
        other => panic!("expected Store error, got {other:?}"),
    }
}

// ============================================================================
// Commit
// ============================================================================

#[tokio::test]
async fn commit_sends_city_writes_and_marker_transform() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:commit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}, {}],
            "commitTime": "2024-05-01T12:30:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let batch = WriteBatch::new()
        .set_city(CityRecord::approved("Biel/Bienne", "Switzerland"))
        .touch_last_fetched();
    store(&mock_server, None).commit(batch).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let writes = body["writes"].as_array().unwrap();
    assert_eq!(writes.len(), 2);

    let city = &writes[0]["update"];
    assert_eq!(
        city["name"],
        "projects/demo/databases/(default)/documents/cities/biel-bienne"
    );
    assert_eq!(city["fields"]["name"]["stringValue"], "Biel/Bienne");
    assert_eq!(city["fields"]["name_lowercase"]["stringValue"], "biel/bienne");
    assert_eq!(city["fields"]["country"]["stringValue"], "Switzerland");
    assert_eq!(city["fields"]["is_approved"]["booleanValue"], true);

    let marker = &writes[1];
    assert_eq!(
        marker["update"]["name"],
        "projects/demo/databases/(default)/documents/meta/fallback"
    );
    assert_eq!(marker["updateTransforms"][0]["fieldPath"], "last_fetched");
    assert_eq!(
        marker["updateTransforms"][0]["setToServerValue"],
        "REQUEST_TIME"
    );
}

#[tokio::test]
async fn rejected_commit_is_store_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}:commit")))
        .respond_with(ResponseTemplate::new(409).set_body_string("ABORTED"))
        .mount(&mock_server)
        .await;

    let err = store(&mock_server, None)
        .commit(WriteBatch::new().touch_last_fetched())
        .await
        .unwrap_err();
    assert!(matches!(err, CitySuggestError::Store(_)));
}
