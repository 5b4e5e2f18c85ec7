use shared_types::{AppError, Case, UpdateCaseRequest, UserRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error_convert::SqlxErrorExt;

const CASE_COLUMNS: &str = "id, title, case_type, description, status, classification, result, \
     city, client_id, assigned_staff, primary_lawyer_id, accepted_by, accepted_at, \
     hearing_ids, registered_at, created_at, updated_at";

/// Insert a new case in `pending` status.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool<Postgres>,
    title: &str,
    case_type: &str,
    description: &str,
    classification: &str,
    city: Option<&str>,
    client_id: Uuid,
    assigned_staff: &[Uuid],
    primary_lawyer_id: Option<Uuid>,
) -> Result<Case, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "INSERT INTO cases
             (title, case_type, description, classification, city, client_id,
              assigned_staff, primary_lawyer_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(title)
    .bind(case_type)
    .bind(description)
    .bind(classification)
    .bind(city)
    .bind(client_id)
    .bind(assigned_staff)
    .bind(primary_lawyer_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a case by ID.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "SELECT {CASE_COLUMNS} FROM cases WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List cases visible to the principal, newest first.
///
/// This is the query-narrowing counterpart of the access evaluator's read
/// rule: admin sees all, a client their own cases, staff the cases they are
/// assigned to or primary lawyer on. The visible set must equal what
/// per-item read evaluation would allow.
pub async fn list_for_principal(
    pool: &Pool<Postgres>,
    principal: &Principal,
) -> Result<Vec<Case>, AppError> {
    let rows = match principal.role {
        UserRole::Admin => {
            sqlx::query_as::<_, Case>(&format!(
                "SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at DESC"
            ))
            .fetch_all(pool)
            .await
        }
        UserRole::Client => {
            sqlx::query_as::<_, Case>(&format!(
                "SELECT {CASE_COLUMNS} FROM cases WHERE client_id = $1 ORDER BY created_at DESC"
            ))
            .bind(principal.id)
            .fetch_all(pool)
            .await
        }
        UserRole::Staff => {
            sqlx::query_as::<_, Case>(&format!(
                "SELECT {CASE_COLUMNS} FROM cases
                 WHERE $1 = ANY(assigned_staff) OR primary_lawyer_id = $1
                 ORDER BY created_at DESC"
            ))
            .bind(principal.id)
            .fetch_all(pool)
            .await
        }
        // Unknown roles see nothing rather than an error; list never denies.
        UserRole::Unknown => return Ok(Vec::new()),
    }
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Update a case with only the provided fields, as a single atomic write.
/// Returns the updated row or None if the case does not exist.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateCaseRequest,
) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "UPDATE cases SET
             title          = COALESCE($2, title),
             case_type      = COALESCE($3, case_type),
             description    = COALESCE($4, description),
             status         = COALESCE($5, status),
             classification = COALESCE($6, classification),
             result         = COALESCE($7, result),
             city           = COALESCE($8, city),
             updated_at     = NOW()
         WHERE id = $1
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(id)
    .bind(req.title.as_deref())
    .bind(req.case_type.as_deref())
    .bind(req.description.as_deref())
    .bind(req.status.as_deref())
    .bind(req.classification.as_deref())
    .bind(req.result.as_deref())
    .bind(req.city.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Replace both assignment fields in one write — no partial assignment state.
pub async fn replace_assignment(
    pool: &Pool<Postgres>,
    id: Uuid,
    assigned_staff: &[Uuid],
    primary_lawyer_id: Option<Uuid>,
) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "UPDATE cases SET
             assigned_staff    = $2,
             primary_lawyer_id = $3,
             updated_at        = NOW()
         WHERE id = $1
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(id)
    .bind(assigned_staff)
    .bind(primary_lawyer_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Atomic accept transition: checks the status guard and the assignment in
/// the same conditional UPDATE, so two concurrent accepts cannot both
/// succeed. Returns None when the guard fails (already active, unassigned,
/// or missing case) — the workflow distinguishes those by reloading.
pub async fn try_accept(
    pool: &Pool<Postgres>,
    id: Uuid,
    staff_id: Uuid,
) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "UPDATE cases SET
             status      = 'active',
             accepted_by = $2,
             accepted_at = NOW(),
             updated_at  = NOW()
         WHERE id = $1 AND status <> 'active' AND $2 = ANY(assigned_staff)
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(id)
    .bind(staff_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Delete a case. Returns true if a row was deleted.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM cases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
