mod identifiers;
mod places;
mod replies;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use revhub_places::{PlacesClient, PlacesError};
use revhub_reply::ReplyDispatcher;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider key is configured.
    pub places: Option<Arc<PlacesClient>>,
    pub replies: Arc<ReplyDispatcher>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    places: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "provider_error" => StatusCode::UNPROCESSABLE_ENTITY,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Returns the provider client or a `not_configured` error.
pub(super) fn require_places(
    state: &AppState,
    request_id: &str,
) -> Result<Arc<PlacesClient>, ApiError> {
    state.places.clone().ok_or_else(|| {
        ApiError::new(
            request_id,
            "not_configured",
            "the review provider API key is not configured",
        )
    })
}

/// Maps a provider failure to the error envelope. The user-facing message
/// stays generic; the diagnostic goes into `details`.
pub(super) fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    tracing::warn!(error = %error, "review provider call failed");
    let message = error.user_message();

    match error {
        PlacesError::Provider { status, message: provider_message } => {
            let code = if error.is_stale_identifier() {
                "not_found"
            } else {
                "provider_error"
            };
            ApiError::new(request_id, code, message).with_details(serde_json::json!({
                "provider_status": status,
                "provider_message": provider_message,
            }))
        }
        PlacesError::Transport { status, body } => {
            ApiError::new(request_id, "upstream_error", message).with_details(serde_json::json!({
                "status": status,
                "body": body,
            }))
        }
        PlacesError::Http(_) | PlacesError::Deserialize { .. } => {
            ApiError::new(request_id, "upstream_error", message)
                .with_details(serde_json::json!({ "reason": error.to_string() }))
        }
        PlacesError::InvalidBaseUrl { .. } => ApiError::new(request_id, "internal_error", message),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/identifiers/resolve",
            get(identifiers::resolve_identifier),
        )
        .route(
            "/api/v1/identifiers/validate",
            post(identifiers::validate_identifier),
        )
        .route(
            "/api/v1/places/{place_id}/reviews",
            get(places::list_reviews),
        )
        .route("/api/v1/replies", post(replies::submit_reply))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let places = if state.places.is_some() {
        "configured"
    } else {
        "not_configured"
    };
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            places,
        },
        req_id.0,
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
