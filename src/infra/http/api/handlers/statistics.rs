//! Storage statistics handler

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use super::{StatisticsQuery, parse_time_bound, repo_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::StatisticsResponse;
use crate::infra::http::api::state::ApiState;

pub async fn subject_statistics(
    State(state): State<ApiState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let start = query
        .start_date
        .as_deref()
        .map(|raw| parse_time_bound("start_date", raw))
        .transpose()?;
    let end = query
        .end_date
        .as_deref()
        .map(|raw| parse_time_bound("end_date", raw))
        .transpose()?;

    let stats = state
        .statistics
        .collect(start, end)
        .await
        .map_err(repo_to_api)?;

    Ok(Json(StatisticsResponse::from(stats)))
}
