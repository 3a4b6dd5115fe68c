//! Subject CRUD handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::NewSubject;

use super::{SubjectListQuery, subject_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::SubjectCreateRequest;
use crate::infra::http::api::state::ApiState;

pub async fn create_subject(
    State(state): State<ApiState>,
    Json(payload): Json<SubjectCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .subjects
        .create(NewSubject {
            length: payload.length,
            weight: payload.weight,
        })
        .await
        .map_err(subject_to_api)?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_subject(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid_id(id)?;

    let record = state.subjects.get(id).await.map_err(subject_to_api)?;

    Ok(Json(record))
}

pub async fn delete_subject(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid_id(id)?;

    let record = state.subjects.delete(id).await.map_err(subject_to_api)?;

    Ok(Json(record))
}

pub async fn list_subjects(
    State(state): State<ApiState>,
    Query(query): Query<SubjectListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;

    let outcome = state.subjects.list(&filter).await.map_err(subject_to_api)?;
    let cache_state = if outcome.cache_hit { "hit" } else { "miss" };

    Ok(([("x-cache", cache_state)], Json(outcome.subjects)))
}

fn ensure_valid_id(id: i64) -> Result<(), ApiError> {
    if id < 0 {
        return Err(ApiError::validation(
            "Invalid identifier",
            Some("id must be non-negative".to_string()),
        ));
    }
    Ok(())
}
