use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_types::{AppError, HearingResponse, ScheduleHearingRequest, UpdateHearingRequest};

use crate::auth::Principal;
use crate::db::AppState;
use crate::workflow;

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("Invalid {what} UUID format")))
}

/// POST /api/cases/{case_id}/hearings
#[utoipa::path(
    post,
    path = "/api/cases/{case_id}/hearings",
    request_body = ScheduleHearingRequest,
    params(("case_id" = String, Path, description = "Case UUID")),
    responses(
        (status = 201, description = "Hearing scheduled", body = HearingResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "hearings"
)]
pub async fn schedule_hearing(
    State(state): State<AppState>,
    principal: Principal,
    Path(case_id): Path<String>,
    Json(body): Json<ScheduleHearingRequest>,
) -> Result<(StatusCode, Json<HearingResponse>), AppError> {
    let hearing =
        workflow::hearings::schedule_hearing(&state, &principal, parse_uuid(&case_id, "case")?, body)
            .await?;
    Ok((StatusCode::CREATED, Json(HearingResponse::from(hearing))))
}

/// GET /api/cases/{case_id}/hearings
#[utoipa::path(
    get,
    path = "/api/cases/{case_id}/hearings",
    params(("case_id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Hearings for the case", body = Vec<HearingResponse>),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "hearings"
)]
pub async fn list_hearings(
    State(state): State<AppState>,
    principal: Principal,
    Path(case_id): Path<String>,
) -> Result<Json<Vec<HearingResponse>>, AppError> {
    let hearings =
        workflow::hearings::list_hearings(&state, &principal, parse_uuid(&case_id, "case")?).await?;
    Ok(Json(hearings.into_iter().map(HearingResponse::from).collect()))
}

/// PUT /api/hearings/{id}
#[utoipa::path(
    put,
    path = "/api/hearings/{id}",
    request_body = UpdateHearingRequest,
    params(("id" = String, Path, description = "Hearing UUID")),
    responses(
        (status = 200, description = "Hearing updated", body = HearingResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Hearing not found", body = AppError)
    ),
    tag = "hearings"
)]
pub async fn update_hearing(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<UpdateHearingRequest>,
) -> Result<Json<HearingResponse>, AppError> {
    let hearing =
        workflow::hearings::update_hearing(&state, &principal, parse_uuid(&id, "hearing")?, body)
            .await?;
    Ok(Json(HearingResponse::from(hearing)))
}
