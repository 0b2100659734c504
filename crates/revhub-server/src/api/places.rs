use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use revhub_places::filter::{parse_platform_filter, parse_rating_filter};
use revhub_places::{FetchMode, ResponseFilter, ReviewFilters, ReviewQuery, ReviewsPage, SortOrder};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_places_error, require_places, ApiError, ApiResponse, AppState};

/// Raw query string values; parsed by hand so bad values produce the
/// standard error envelope.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ReviewsParams {
    pub mode: Option<String>,
    pub platform: Option<String>,
    pub rating: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub response: Option<String>,
    pub sort: Option<String>,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid {field} value \"{value}\" (expected YYYY-MM-DD)"))
}

impl ReviewsParams {
    pub(super) fn parse(&self) -> Result<(FetchMode, ReviewQuery), String> {
        let mode = self
            .mode
            .as_deref()
            .map(str::parse::<FetchMode>)
            .transpose()
            .map_err(|e| e.to_string())?
            .unwrap_or_default();

        let filters = ReviewFilters {
            platform: self.platform.as_deref().and_then(parse_platform_filter),
            rating: self
                .rating
                .as_deref()
                .map(parse_rating_filter)
                .transpose()
                .map_err(|e| e.to_string())?,
            date_from: self
                .date_from
                .as_deref()
                .map(|v| parse_date("date_from", v))
                .transpose()?,
            date_to: self
                .date_to
                .as_deref()
                .map(|v| parse_date("date_to", v))
                .transpose()?,
            response: self
                .response
                .as_deref()
                .map(str::parse::<ResponseFilter>)
                .transpose()
                .map_err(|e| e.to_string())?
                .unwrap_or_default(),
        };

        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()
            .map_err(|e| e.to_string())?
            .unwrap_or_default();

        Ok((mode, ReviewQuery { filters, sort }))
    }
}

pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
    Query(params): Query<ReviewsParams>,
) -> Result<Json<ApiResponse<ReviewsPage>>, ApiError> {
    let (mode, query) = params
        .parse()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let places = require_places(&state, &req_id.0)?;
    let page = places
        .fetch_reviews(&place_id, mode, &query)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(page, req_id.0)))
}
