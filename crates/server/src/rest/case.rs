use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_types::{
    AppError, AssignStaffRequest, CaseListResponse, CaseResponse, CreateCaseRequest,
    UpdateCaseRequest,
};

use crate::auth::Principal;
use crate::db::AppState;
use crate::workflow;

fn parse_case_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid case UUID format"))
}

/// POST /api/cases
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 422, description = "Invalid assignment", body = AppError)
    ),
    tag = "cases"
)]
pub async fn create_case(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    let case = workflow::cases::create_case(&state, &principal, body).await?;
    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

/// GET /api/cases
#[utoipa::path(
    get,
    path = "/api/cases",
    responses(
        (status = 200, description = "Cases visible to the caller", body = CaseListResponse)
    ),
    tag = "cases"
)]
pub async fn list_cases(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<CaseListResponse>, AppError> {
    let cases = workflow::cases::list_cases(&state, &principal).await?;
    let total = cases.len() as i64;
    Ok(Json(CaseListResponse {
        cases: cases.into_iter().map(CaseResponse::from).collect(),
        total,
    }))
}

/// GET /api/cases/{id}
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case detail", body = CaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn get_case(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = workflow::cases::get_case(&state, &principal, parse_case_id(&id)?).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// PUT /api/cases/{id}
#[utoipa::path(
    put,
    path = "/api/cases/{id}",
    request_body = UpdateCaseRequest,
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case updated", body = CaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn update_case(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<UpdateCaseRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = workflow::cases::update_case(&state, &principal, parse_case_id(&id)?, body).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// DELETE /api/cases/{id}
#[utoipa::path(
    delete,
    path = "/api/cases/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 204, description = "Case deleted"),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn delete_case(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    workflow::cases::delete_case(&state, &principal, parse_case_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cases/{id}/assign-staff
#[utoipa::path(
    post,
    path = "/api/cases/{id}/assign-staff",
    request_body = AssignStaffRequest,
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Assignment replaced", body = CaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 422, description = "Invalid assignment", body = AppError)
    ),
    tag = "cases"
)]
pub async fn assign_staff(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<AssignStaffRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = workflow::cases::assign_staff(&state, &principal, parse_case_id(&id)?, body).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// PUT /api/cases/{id}/accept
#[utoipa::path(
    put,
    path = "/api/cases/{id}/accept",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case accepted", body = CaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 409, description = "Case already accepted", body = AppError)
    ),
    tag = "cases"
)]
pub async fn accept_case(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = workflow::cases::accept_case(&state, &principal, parse_case_id(&id)?).await?;
    Ok(Json(CaseResponse::from(case)))
}
