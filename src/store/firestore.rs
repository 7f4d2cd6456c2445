//! Firestore REST API store.
//!
//! Talks to the Firestore v1 REST surface directly:
//! - `documents:runQuery` for prefix search
//! - `GET documents/{collection}/{id}` for the rate-limit marker
//! - `documents:commit` for atomic batches, with a `REQUEST_TIME` transform
//!   so the marker carries server time
//!
//! See: <https://firebase.google.com/docs/firestore/reference/rest>

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{BatchWrite, CityStore, WriteBatch, prefix_bounds};
use crate::types::CityRecord;
use crate::{CitySuggestError, Result};

/// Default base URL for the Firestore REST API
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

/// Field holding the marker timestamp.
const LAST_FETCHED_FIELD: &str = "last_fetched";

/// Connection and layout settings for [`FirestoreStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cities_collection")]
    pub cities_collection: String,
    #[serde(default = "default_meta_collection")]
    pub meta_collection: String,
    #[serde(default = "default_meta_document")]
    pub meta_document: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl FirestoreConfig {
    /// Defaults for everything but the project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: default_database(),
            base_url: default_base_url(),
            cities_collection: default_cities_collection(),
            meta_collection: default_meta_collection(),
            meta_document: default_meta_document(),
            timeout_secs: default_timeout(),
        }
    }

    /// Point at a different host (emulator, wiremock).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cities_collection() -> String {
    "cities".to_string()
}

fn default_meta_collection() -> String {
    "meta".to_string()
}

fn default_meta_document() -> String {
    "fallback".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// City store backed by Cloud Firestore (or the Firestore emulator).
#[derive(Clone)]
pub struct FirestoreStore {
    config: FirestoreConfig,
    token: Option<String>,
    http: Client,
}

impl FirestoreStore {
    /// Create a store. `token` is an OAuth2 bearer token; the emulator
    /// accepts requests without one.
    pub fn new(config: FirestoreConfig, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CitySuggestError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            token,
            http,
        })
    }

    /// `projects/{p}/databases/{db}/documents`
    fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    fn url(&self, suffix: &str) -> String {
        format!(
            "{}/v1/{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.documents_path(),
            suffix
        )
    }

    fn resource_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_path())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn city_write(&self, city: &CityRecord) -> serde_json::Value {
        json!({
            "update": {
                "name": self.resource_name(&self.config.cities_collection, &city.document_id()),
                "fields": {
                    "name": Value::string(&city.name),
                    "name_lowercase": Value::string(&city.name_lowercase),
                    "country": Value::string(&city.country),
                    "is_approved": Value::boolean(city.is_approved),
                },
            }
        })
    }

    fn marker_write(&self) -> serde_json::Value {
        json!({
            "update": {
                "name": self.resource_name(&self.config.meta_collection, &self.config.meta_document),
                "fields": {},
            },
            "updateTransforms": [{
                "fieldPath": LAST_FETCHED_FIELD,
                "setToServerValue": "REQUEST_TIME",
            }],
        })
    }
}

/// Check response status and map to appropriate error.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(CitySuggestError::AuthenticationFailed)
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(CitySuggestError::Store(format!(
                "Firestore returned {status}: {}",
                body.trim()
            )))
        }
    }
}

#[async_trait]
impl CityStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    #[instrument(skip(self), fields(store = "firestore"))]
    async fn search_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CityRecord>> {
        let (start, end) = prefix_bounds(prefix);
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.config.cities_collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "is_approved" },
                        "op": "EQUAL",
                        "value": Value::boolean(true),
                    }
                },
                "orderBy": [{
                    "field": { "fieldPath": "name_lowercase" },
                    "direction": "ASCENDING",
                }],
                "startAt": { "values": [Value::string(&start)], "before": true },
                "endAt": { "values": [Value::string(&end)], "before": false },
                "limit": limit,
            }
        });

        let response = self
            .authorize(self.http.post(self.url(":runQuery")))
            .json(&body)
            .send()
            .await?;
        let items: Vec<RunQueryItem> = check_status(response).await?.json().await?;

        let cities = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(Document::into_city)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = cities.len(), "prefix query returned");
        Ok(cities)
    }

    async fn last_fetched(&self) -> Result<Option<DateTime<Utc>>> {
        let suffix = format!(
            "/{}/{}",
            self.config.meta_collection, self.config.meta_document
        );
        let response = self
            .authorize(self.http.get(self.url(&suffix)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document: Document = check_status(response).await?.json().await?;
        let Some(raw) = document
            .fields
            .get(LAST_FETCHED_FIELD)
            .and_then(|v| v.timestamp_value.as_deref())
        else {
            return Ok(None);
        };

        DateTime::parse_from_rfc3339(raw)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| CitySuggestError::Store(format!("invalid marker timestamp {raw:?}: {e}")))
    }

    #[instrument(skip_all, fields(store = "firestore", writes = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let writes: Vec<serde_json::Value> = batch
            .writes()
            .iter()
            .map(|write| match write {
                BatchWrite::SetCity(city) => self.city_write(city),
                BatchWrite::TouchLastFetched => self.marker_write(),
            })
            .collect();

        let response = self
            .authorize(self.http.post(self.url(":commit")))
            .json(&json!({ "writes": writes }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl Document {
    fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.string_value.as_deref()
    }

    fn into_city(self) -> Result<CityRecord> {
        let (Some(name), Some(country)) = (self.string_field("name"), self.string_field("country"))
        else {
            return Err(CitySuggestError::Store(format!(
                "city document {} is missing name or country",
                self.name
            )));
        };

        let mut city = CityRecord::approved(name, country);
        if let Some(key) = self.string_field("name_lowercase") {
            city.name_lowercase = key.to_string();
        }
        city.is_approved = self
            .fields
            .get("is_approved")
            .and_then(|v| v.boolean_value)
            .unwrap_or(false);
        Ok(city)
    }
}

/// Firestore typed value; only the variants this store reads or writes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Value {
    string_value: Option<String>,
    boolean_value: Option<bool>,
    timestamp_value: Option<String>,
}

impl Value {
    /// Encode a string as a Firestore value.
    fn string(s: &str) -> serde_json::Value {
        json!({ "stringValue": s })
    }

    fn boolean(b: bool) -> serde_json::Value {
        json!({ "booleanValue": b })
    }
}
