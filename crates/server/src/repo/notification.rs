use shared_types::{AppError, Notification, NotificationListParams};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, sender_id, notification_type, title, \
     message, case_id, document_id, hearing_id, is_read, read_at, action_url, priority, \
     created_at";

/// Insert a single notification record. Called only by the dispatcher.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool<Postgres>,
    recipient_id: Uuid,
    sender_id: Option<Uuid>,
    notification_type: &str,
    title: &str,
    message: &str,
    case_id: Option<Uuid>,
    document_id: Option<Uuid>,
    hearing_id: Option<Uuid>,
    action_url: Option<&str>,
    priority: &str,
) -> Result<Notification, AppError> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications
             (recipient_id, sender_id, notification_type, title, message,
              case_id, document_id, hearing_id, action_url, priority)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(recipient_id)
    .bind(sender_id)
    .bind(notification_type)
    .bind(title)
    .bind(message)
    .bind(case_id)
    .bind(document_id)
    .bind(hearing_id)
    .bind(action_url)
    .bind(priority)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List a recipient's notifications, newest first, with optional read-state
/// and type filters. Returns (notifications, total matching count).
pub async fn list_for_recipient(
    pool: &Pool<Postgres>,
    recipient_id: Uuid,
    params: &NotificationListParams,
) -> Result<(Vec<Notification>, i64), AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let skip = params.skip.unwrap_or(0).max(0);

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications
         WHERE recipient_id = $1
           AND ($2::BOOL IS NULL OR is_read = $2)
           AND ($3::TEXT IS NULL OR notification_type = $3)",
    )
    .bind(recipient_id)
    .bind(params.is_read)
    .bind(params.notification_type.as_deref())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications
         WHERE recipient_id = $1
           AND ($2::BOOL IS NULL OR is_read = $2)
           AND ($3::TEXT IS NULL OR notification_type = $3)
         ORDER BY created_at DESC
         LIMIT $4 OFFSET $5"
    ))
    .bind(recipient_id)
    .bind(params.is_read)
    .bind(params.notification_type.as_deref())
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}

/// Mark one notification read, recipient-scoped. Re-marking an already-read
/// notification keeps its original `read_at` (no-op). Returns None if the
/// notification does not exist or belongs to someone else.
pub async fn mark_read(
    pool: &Pool<Postgres>,
    id: Uuid,
    recipient_id: Uuid,
) -> Result<Option<Notification>, AppError> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "UPDATE notifications SET
             is_read = TRUE,
             read_at = COALESCE(read_at, NOW())
         WHERE id = $1 AND recipient_id = $2
         RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(id)
    .bind(recipient_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Mark all of a recipient's unread notifications read. Returns the count.
pub async fn mark_all_read(pool: &Pool<Postgres>, recipient_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE, read_at = NOW()
         WHERE recipient_id = $1 AND NOT is_read",
    )
    .bind(recipient_id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected())
}

/// Delete one notification, recipient-scoped. Returns true if deleted.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid, recipient_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

/// Delete all of a recipient's notifications. Returns the count.
pub async fn clear_all(pool: &Pool<Postgres>, recipient_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected())
}

/// Count a recipient's unread notifications.
pub async fn unread_count(pool: &Pool<Postgres>, recipient_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(count)
}
