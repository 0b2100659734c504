use axum::{
    extract::{Query, State},
    Extension, Json,
};
use revhub_places::{resolve, CanonicalIdentifier, Resolution, ResolutionSource};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{require_places, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ResolveQuery {
    pub input: Option<String>,
    pub business_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ValidateBody {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ResolveItem {
    input: String,
    identifier: String,
    source: ResolutionSource,
}

/// Resolves free-form input to an identifier, searching the provider when
/// the input is not already usable.
pub(super) async fn resolve_identifier(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<ResolveItem>>, ApiError> {
    let input = query
        .input
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "validation_error", "input is required"))?
        .to_owned();

    // Direct identifiers never need the provider.
    let local = resolve(&input);
    let resolution = if local.valid {
        Some(Resolution {
            identifier: local.cleaned,
            source: ResolutionSource::Direct,
        })
    } else {
        let places = require_places(&state, &req_id.0)?;
        places
            .resolve_input(&input, query.business_name.as_deref())
            .await
    };

    let Some(resolution) = resolution else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no place matched the input",
        ));
    };

    Ok(Json(ApiResponse::new(
        ResolveItem {
            input,
            identifier: resolution.identifier,
            source: resolution.source,
        },
        req_id.0,
    )))
}

/// Local-only cleaning and classification; always answers 200.
pub(super) async fn validate_identifier(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ValidateBody>,
) -> Json<ApiResponse<CanonicalIdentifier>> {
    Json(ApiResponse::new(resolve(&body.input), req_id.0))
}
