use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_types::{
    AppError, ApproveCaseRequest, ApprovedCaseResponse, CaseRequestListResponse,
    CaseRequestResponse, CaseResponse, RejectCaseRequest, SubmitCaseRequest,
};

use crate::auth::Principal;
use crate::db::AppState;
use crate::workflow;

fn parse_request_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid case request UUID format"))
}

/// POST /api/case-requests
#[utoipa::path(
    post,
    path = "/api/case-requests",
    request_body = SubmitCaseRequest,
    responses(
        (status = 201, description = "Case request submitted", body = CaseRequestResponse),
        (status = 403, description = "Access denied", body = AppError)
    ),
    tag = "case-requests"
)]
pub async fn create_case_request(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<SubmitCaseRequest>,
) -> Result<(StatusCode, Json<CaseRequestResponse>), AppError> {
    let request = workflow::case_requests::create_case_request(&state, &principal, body).await?;
    Ok((StatusCode::CREATED, Json(CaseRequestResponse::from(request))))
}

/// GET /api/case-requests
#[utoipa::path(
    get,
    path = "/api/case-requests",
    responses(
        (status = 200, description = "Case requests visible to the caller", body = CaseRequestListResponse)
    ),
    tag = "case-requests"
)]
pub async fn list_case_requests(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<CaseRequestListResponse>, AppError> {
    let requests = workflow::case_requests::list_case_requests(&state, &principal).await?;
    let total = requests.len() as i64;
    Ok(Json(CaseRequestListResponse {
        requests: requests.into_iter().map(CaseRequestResponse::from).collect(),
        total,
    }))
}

/// PUT /api/case-requests/{id}/approve
#[utoipa::path(
    put,
    path = "/api/case-requests/{id}/approve",
    request_body = ApproveCaseRequest,
    params(("id" = String, Path, description = "Case request UUID")),
    responses(
        (status = 200, description = "Request approved, case created", body = ApprovedCaseResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
        (status = 409, description = "Request already decided", body = AppError),
        (status = 422, description = "Invalid assignment", body = AppError)
    ),
    tag = "case-requests"
)]
pub async fn approve_case_request(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<ApproveCaseRequest>,
) -> Result<Json<ApprovedCaseResponse>, AppError> {
    let (request, case) =
        workflow::case_requests::approve_case_request(&state, &principal, parse_request_id(&id)?, body)
            .await?;
    Ok(Json(ApprovedCaseResponse {
        request: CaseRequestResponse::from(request),
        case: CaseResponse::from(case),
    }))
}

/// PUT /api/case-requests/{id}/reject
#[utoipa::path(
    put,
    path = "/api/case-requests/{id}/reject",
    request_body = RejectCaseRequest,
    params(("id" = String, Path, description = "Case request UUID")),
    responses(
        (status = 200, description = "Request rejected", body = CaseRequestResponse),
        (status = 403, description = "Access denied", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
        (status = 409, description = "Request already decided", body = AppError)
    ),
    tag = "case-requests"
)]
pub async fn reject_case_request(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<RejectCaseRequest>,
) -> Result<Json<CaseRequestResponse>, AppError> {
    let request =
        workflow::case_requests::reject_case_request(&state, &principal, parse_request_id(&id)?, body)
            .await?;
    Ok(Json(CaseRequestResponse::from(request)))
}
