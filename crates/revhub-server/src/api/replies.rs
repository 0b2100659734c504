use axum::{extract::State, Extension, Json};
use revhub_reply::{ReplyOutcome, ReplyRequest};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Submits a reply. Delivered and fallback outcomes are both 200; the
/// outcome's `success` flag tells them apart.
pub(super) async fn submit_reply(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ApiResponse<ReplyOutcome>>, ApiError> {
    if request.review_id.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "review_id is required",
        ));
    }
    if request.message.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "message is required",
        ));
    }

    let outcome = state.replies.submit_reply(&request).await;

    if !outcome.success && !outcome.is_fallback() {
        let message = outcome
            .error
            .clone()
            .unwrap_or_else(|| "reply was not delivered".to_owned());
        let details = serde_json::to_value(&outcome).unwrap_or_default();
        return Err(ApiError::new(req_id.0, "validation_error", message).with_details(details));
    }

    Ok(Json(ApiResponse::new(outcome, req_id.0)))
}
