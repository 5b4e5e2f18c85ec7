use shared_types::{AppError, CaseRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const REQUEST_COLUMNS: &str = "id, client_id, title, case_type, description, \
     preferred_lawyer_id, urgency, status, admin_notes, documents, reviewed_by, \
     reviewed_at, created_at";

/// Insert a new pending case request.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool<Postgres>,
    client_id: Uuid,
    title: &str,
    case_type: &str,
    description: &str,
    preferred_lawyer_id: Option<Uuid>,
    urgency: &str,
    documents: &[String],
) -> Result<CaseRequest, AppError> {
    let row = sqlx::query_as::<_, CaseRequest>(&format!(
        "INSERT INTO case_requests
             (client_id, title, case_type, description, preferred_lawyer_id,
              urgency, documents)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(client_id)
    .bind(title)
    .bind(case_type)
    .bind(description)
    .bind(preferred_lawyer_id)
    .bind(urgency)
    .bind(documents)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a case request by ID.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<CaseRequest>, AppError> {
    let row = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List every case request, newest first (admin view).
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<CaseRequest>, AppError> {
    let rows = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// List a single client's case requests, newest first.
pub async fn list_for_client(
    pool: &Pool<Postgres>,
    client_id: Uuid,
) -> Result<Vec<CaseRequest>, AppError> {
    let rows = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests
         WHERE client_id = $1 ORDER BY created_at DESC"
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Conditional decision transition: only a pending request can be decided,
/// so two concurrent reviews cannot both win. Returns None when the guard
/// fails (missing or already decided).
pub async fn try_decide(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
    reviewed_by: Uuid,
    admin_notes: Option<&str>,
) -> Result<Option<CaseRequest>, AppError> {
    let row = sqlx::query_as::<_, CaseRequest>(&format!(
        "UPDATE case_requests SET
             status      = $2,
             reviewed_by = $3,
             reviewed_at = NOW(),
             admin_notes = COALESCE($4, admin_notes)
         WHERE id = $1 AND status = 'pending'
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .bind(reviewed_by)
    .bind(admin_notes)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}
