use axum::{middleware, routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::{auth, health, rest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Juris API",
        description = "Legal case management: cases, case requests, hearings and notifications"
    ),
    paths(
        rest::auth::register,
        rest::auth::login,
        rest::auth::me,
        rest::case::create_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::update_case,
        rest::case::delete_case,
        rest::case::assign_staff,
        rest::case::accept_case,
        rest::hearing::schedule_hearing,
        rest::hearing::list_hearings,
        rest::hearing::update_hearing,
        rest::case_request::create_case_request,
        rest::case_request::list_case_requests,
        rest::case_request::approve_case_request,
        rest::case_request::reject_case_request,
        rest::notification::list_notifications,
        rest::notification::mark_read,
        rest::notification::mark_all_read,
        rest::notification::delete_notification,
        rest::notification::clear_all_notifications,
        rest::notification::unread_count,
        health::health_check,
    ),
    components(schemas(
        shared_types::AppError,
        shared_types::AppErrorKind,
        shared_types::AuthResponse,
        shared_types::AuthUser,
        shared_types::LoginRequest,
        shared_types::RegisterRequest,
        shared_types::MessageResponse,
        shared_types::CaseResponse,
        shared_types::CaseListResponse,
        shared_types::CreateCaseRequest,
        shared_types::UpdateCaseRequest,
        shared_types::AssignStaffRequest,
        shared_types::CaseRequestResponse,
        shared_types::CaseRequestListResponse,
        shared_types::SubmitCaseRequest,
        shared_types::ApproveCaseRequest,
        shared_types::ApprovedCaseResponse,
        shared_types::RejectCaseRequest,
        shared_types::HearingResponse,
        shared_types::ScheduleHearingRequest,
        shared_types::UpdateHearingRequest,
        shared_types::NotificationResponse,
        shared_types::NotificationListResponse,
        shared_types::UnreadCountResponse,
    )),
    tags(
        (name = "auth", description = "Authentication"),
        (name = "cases", description = "Case lifecycle and access"),
        (name = "hearings", description = "Hearing scheduling"),
        (name = "case-requests", description = "Pre-case intake"),
        (name = "notifications", description = "Per-recipient notifications"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build an Axum router that serves the API docs at `/api/docs`
/// and the REST API at `/api/*`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/api/openapi.json", get(serve_openapi))
        .layer(middleware::from_fn(auth::middleware::auth_middleware))
        .with_state(state)
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()))
}
