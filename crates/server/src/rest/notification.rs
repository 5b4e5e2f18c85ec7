use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    is_valid_notification_type, AppError, MessageResponse, NotificationListParams,
    NotificationListResponse, NotificationResponse, UnreadCountResponse, NOTIFICATION_TYPES,
};

use crate::auth::Principal;
use crate::repo;

fn parse_notification_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid notification UUID format"))
}

/// GET /api/notifications
///
/// Always recipient-scoped: a principal only ever sees their own records.
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListParams),
    responses(
        (status = 200, description = "Caller's notifications", body = NotificationListResponse)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<NotificationListResponse>, AppError> {
    if let Some(t) = params.notification_type.as_deref() {
        if !is_valid_notification_type(t) {
            return Err(AppError::bad_request(format!(
                "Invalid type: {}. Valid values: {}",
                t,
                NOTIFICATION_TYPES.join(", ")
            )));
        }
    }

    let (notifications, total) =
        repo::notification::list_for_recipient(&pool, principal.id, &params).await?;

    Ok(Json(NotificationListResponse {
        notifications: notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
        total,
    }))
}

/// PUT /api/notifications/{id}/read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification UUID")),
    responses(
        (status = 200, description = "Marked read", body = NotificationResponse),
        (status = 404, description = "Not found or not the caller's", body = AppError)
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification =
        repo::notification::mark_read(&pool, parse_notification_id(&id)?, principal.id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

    Ok(Json(NotificationResponse::from(notification)))
}

/// PUT /api/notifications/read-all
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All unread marked read", body = MessageResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
) -> Result<Json<MessageResponse>, AppError> {
    let updated = repo::notification::mark_all_read(&pool, principal.id).await?;
    Ok(Json(MessageResponse {
        message: format!("{updated} notifications marked read"),
    }))
}

/// DELETE /api/notifications/{id}
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification UUID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found or not the caller's", body = AppError)
    ),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted =
        repo::notification::delete(&pool, parse_notification_id(&id)?, principal.id).await?;
    if !deleted {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/notifications
#[utoipa::path(
    delete,
    path = "/api/notifications",
    responses(
        (status = 200, description = "All of the caller's notifications deleted", body = MessageResponse)
    ),
    tag = "notifications"
)]
pub async fn clear_all_notifications(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = repo::notification::clear_all(&pool, principal.id).await?;
    Ok(Json(MessageResponse {
        message: format!("{deleted} notifications deleted"),
    }))
}

/// GET /api/notifications/unread-count
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse)
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = repo::notification::unread_count(&pool, principal.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}
