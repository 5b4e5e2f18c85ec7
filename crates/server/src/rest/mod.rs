pub mod auth;
pub mod case;
pub mod case_request;
pub mod hearing;
pub mod notification;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::db::AppState;
use crate::health;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Cases
        .route("/api/cases", get(case::list_cases).post(case::create_case))
        .route(
            "/api/cases/{id}",
            get(case::get_case)
                .put(case::update_case)
                .delete(case::delete_case),
        )
        .route("/api/cases/{id}/assign-staff", post(case::assign_staff))
        .route("/api/cases/{id}/accept", put(case::accept_case))
        // Hearings
        .route(
            "/api/cases/{case_id}/hearings",
            get(hearing::list_hearings).post(hearing::schedule_hearing),
        )
        .route("/api/hearings/{id}", put(hearing::update_hearing))
        // Case requests
        .route(
            "/api/case-requests",
            get(case_request::list_case_requests).post(case_request::create_case_request),
        )
        .route(
            "/api/case-requests/{id}/approve",
            put(case_request::approve_case_request),
        )
        .route(
            "/api/case-requests/{id}/reject",
            put(case_request::reject_case_request),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notification::list_notifications).delete(notification::clear_all_notifications),
        )
        .route(
            "/api/notifications/read-all",
            put(notification::mark_all_read),
        )
        .route(
            "/api/notifications/unread-count",
            get(notification::unread_count),
        )
        .route(
            "/api/notifications/{id}",
            delete(notification::delete_notification),
        )
        .route("/api/notifications/{id}/read", put(notification::mark_read))
        // Health
        .route("/api/health", get(health::health_check))
}
