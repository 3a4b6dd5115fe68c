//! API handlers for the subjects service.
//!
//! Shared query structs, time-bound parsing, and error conversions live
//! here; the per-resource handlers sit in their own modules.

mod statistics;
mod subjects;

pub use statistics::*;
pub use subjects::*;

// ----- Shared query structs -----

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SubjectListQuery {
    pub id_min: Option<i64>,
    pub id_max: Option<i64>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub length_min: Option<f64>,
    pub length_max: Option<f64>,
    pub is_active: Option<bool>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub deleted_after: Option<String>,
    pub deleted_before: Option<String>,
}

impl SubjectListQuery {
    pub(crate) fn into_filter(self) -> Result<SubjectFilter, ApiError> {
        Ok(SubjectFilter {
            id_min: self.id_min,
            id_max: self.id_max,
            weight_min: self.weight_min,
            weight_max: self.weight_max,
            length_min: self.length_min,
            length_max: self.length_max,
            is_active: self.is_active,
            created_after: parse_optional_bound("created_after", self.created_after)?,
            created_before: parse_optional_bound("created_before", self.created_before)?,
            deleted_after: parse_optional_bound("deleted_after", self.deleted_after)?,
            deleted_before: parse_optional_bound("deleted_before", self.deleted_before)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ----- Shared time-bound parsing -----

use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::domain::window::start_of_day;

pub(crate) fn parse_time_bound(
    field: &'static str,
    value: &str,
) -> Result<OffsetDateTime, ApiError> {
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(instant);
    }

    let date_only = format_description!("[year]-[month]-[day]");
    match Date::parse(value, &date_only) {
        Ok(date) => Ok(start_of_day(date)),
        Err(_) => Err(ApiError::validation(
            "Invalid time bound",
            Some(format!(
                "{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"
            )),
        )),
    }
}

fn parse_optional_bound(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<OffsetDateTime>, ApiError> {
    value
        .as_deref()
        .map(|raw| parse_time_bound(field, raw))
        .transpose()
}

// ----- Shared error conversions -----

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::application::repos::RepoError;
use crate::application::subjects::SubjectError;
use crate::domain::SubjectFilter;

use super::error::{ApiError, codes};
use super::state::ApiState;

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("subject not found"),
        RepoError::AlreadyInactive => ApiError::conflict("subject is already inactive"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION,
            "Invalid input",
            Some(message),
        ),
        RepoError::Connection(message) => ApiError::connection(Some(message)),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "Persistence error",
            Some(message),
        ),
    }
}

pub(crate) fn subject_to_api(err: SubjectError) -> ApiError {
    match err {
        SubjectError::Validation { field, reason } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION,
            "Invalid measurement",
            Some(format!("{field}: {reason}")),
        ),
        SubjectError::Repo(repo) => repo_to_api(repo),
    }
}

pub async fn db_health(State(state): State<ApiState>) -> Response {
    crate::infra::http::db_health_response(state.db.health_check().await)
}
