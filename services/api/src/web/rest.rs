//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shift_scheduler_core::ScheduleError;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_schedule_handler,
        week_schedule_handler,
        health_handler,
    ),
    components(
        schemas(
            GenerateScheduleRequest,
            GenerateScheduleResponse,
            WeekScheduleResponse,
            AssignmentDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Shift Scheduler API", description = "Weekly shift schedule generation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    /// Any date inside the target week, as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub start_date: String,
}

/// The response payload sent after a week has been generated and stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub success: bool,
    pub assignments_count: usize,
    pub conflicts: Vec<String>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    /// Any date inside the week to show.
    pub start_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub shift_requirement_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekScheduleResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub assignments: Vec<AssignmentDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Accepts a plain date or a timestamp and keeps only the calendar date.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn invalid_date(raw: &str) -> ApiFailure {
    failure(
        StatusCode::BAD_REQUEST,
        format!("Invalid startDate '{}', expected YYYY-MM-DD", raw),
    )
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate the schedule for the week containing `startDate`.
///
/// Any assignments already stored for that week are replaced.
#[utoipa::path(
    post,
    path = "/schedules/generate",
    request_body = GenerateScheduleRequest,
    responses(
        (status = 200, description = "Schedule generated", body = GenerateScheduleResponse),
        (status = 400, description = "Malformed body or date", body = ErrorResponse),
        (status = 500, description = "Loading or saving failed", body = ErrorResponse)
    )
)]
pub async fn generate_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Result<Json<GenerateScheduleResponse>, ApiFailure> {
    let Json(request) =
        payload.map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?;
    let start_date =
        parse_start_date(&request.start_date).ok_or_else(|| invalid_date(&request.start_date))?;

    match app_state.scheduler.generate_week(start_date).await {
        Ok(report) => {
            info!(
                "Generated {} assignments with {} conflicts",
                report.assignments_count,
                report.conflicts.len()
            );
            Ok(Json(GenerateScheduleResponse {
                success: true,
                assignments_count: report.assignments_count,
                conflicts: report.conflicts.iter().map(|c| c.to_string()).collect(),
                week_start: report.week.start,
                week_end: report.week.end,
            }))
        }
        Err(e) => {
            error!("Failed to generate schedule: {:?}", e);
            let message = match e {
                ScheduleError::Load(_) => "Failed to load scheduling data",
                ScheduleError::Persist(_) => "Failed to save generated schedule",
            };
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, message))
        }
    }
}

/// List the stored assignments for the week containing `startDate`.
#[utoipa::path(
    get,
    path = "/schedules",
    params(WeekQuery),
    responses(
        (status = 200, description = "Assignments for the week", body = WeekScheduleResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Loading failed", body = ErrorResponse)
    )
)]
pub async fn week_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekScheduleResponse>, ApiFailure> {
    let date = parse_start_date(&query.start_date).ok_or_else(|| invalid_date(&query.start_date))?;

    let (week, assignments) = app_state
        .scheduler
        .week_assignments(date)
        .await
        .map_err(|e| {
            error!("Failed to list assignments: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load schedule")
        })?;

    Ok(Json(WeekScheduleResponse {
        week_start: week.start,
        week_end: week.end,
        assignments: assignments
            .into_iter()
            .map(|a| AssignmentDto {
                id: a.id,
                employee_id: a.employee_id,
                shift_requirement_id: a.shift_requirement_id,
                date: a.date,
            })
            .collect(),
    }))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_dates_accept_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_start_date("2024-01-10"), Some(expected));
        assert_eq!(parse_start_date(" 2024-01-10 "), Some(expected));
        assert_eq!(parse_start_date("2024-01-10T08:30:00Z"), Some(expected));
        assert_eq!(parse_start_date("2024-01-10T08:30:00+02:00"), Some(expected));
        assert_eq!(parse_start_date("2024-01-10T08:30:00"), Some(expected));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("next monday"), None);
        assert_eq!(parse_start_date("2024-02-30"), None);
    }
}
