//! HTTP routes.
//!
//! ## Endpoints
//!
//! - `GET /api/get-cities?query=...` - city autocomplete
//! - `GET /health` - liveness and build version

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::types::{LookupResponse, ValidationError};
use crate::{BuildInfo, CityResolver};

/// Query params for city lookup
#[derive(Debug, Deserialize)]
pub struct CitiesParams {
    /// Partial city name, 3 to 20 characters, at most two words.
    pub query: Option<String>,
}

/// Error body: `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Errors surfaced to HTTP clients.
///
/// Store and fallback failures are absorbed by the resolver, so only
/// request problems reach this layer. Every variant renders as a 400 with
/// an [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    /// The query string could not be decoded (e.g. `query` given twice).
    QueryString(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::QueryString(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::QueryString(message) => message,
        };
        (StatusCode::BAD_REQUEST, Json(ErrorBody { message })).into_response()
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: String,
    pub build: BuildInfo,
}

/// Build the router with all routes and the HTTP trace layer.
pub fn router(resolver: Arc<CityResolver>) -> Router {
    Router::new()
        .route("/api/get-cities", get(get_cities))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}

/// GET /api/get-cities
///
/// ```text
/// GET /api/get-cities?query=los%20an
/// ```
async fn get_cities(
    State(resolver): State<Arc<CityResolver>>,
    params: Result<Query<CitiesParams>, QueryRejection>,
) -> Result<Json<LookupResponse>, ApiError> {
    let Query(params) = params?;
    let response = resolver.lookup(params.query.as_deref()).await?;
    Ok(Json(response))
}

/// GET /health
async fn health() -> Json<HealthBody> {
    let build = BuildInfo::current();
    Json(HealthBody {
        status: "ok",
        version: build.to_string(),
        build,
    })
}
