use shared_types::{AppError, Hearing, UpdateHearingRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const HEARING_COLUMNS: &str =
    "id, case_id, hearing_date, remarks, status, created_by, created_at, updated_at";

/// Insert a hearing and append its id to the parent case's hearing list in
/// one transaction. A case and its hearing list must never disagree; if the
/// link update misses (case deleted mid-flight) the transaction aborts and
/// the caller gets a distinct inconsistent-state error for operator
/// alerting — unlike notification failures, this one is correctness-relevant.
pub async fn create_for_case(
    pool: &Pool<Postgres>,
    case_id: Uuid,
    hearing_date: chrono::DateTime<chrono::Utc>,
    remarks: &str,
    created_by: Uuid,
) -> Result<Hearing, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let hearing = sqlx::query_as::<_, Hearing>(&format!(
        "INSERT INTO hearings (case_id, hearing_date, remarks, created_by)
         VALUES ($1, $2, $3, $4)
         RETURNING {HEARING_COLUMNS}"
    ))
    .bind(case_id)
    .bind(hearing_date)
    .bind(remarks)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let linked = sqlx::query(
        "UPDATE cases SET hearing_ids = array_append(hearing_ids, $2), updated_at = NOW()
         WHERE id = $1",
    )
    .bind(case_id)
    .bind(hearing.id)
    .execute(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if linked.rows_affected() == 0 {
        tx.rollback().await.ok();
        tracing::error!(%case_id, hearing_id = %hearing.id, "hearing link update matched no case");
        return Err(AppError::internal(
            "Hearing could not be linked to its case; nothing was written",
        ));
    }

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    Ok(hearing)
}

/// Find a hearing by ID.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Hearing>, AppError> {
    let row = sqlx::query_as::<_, Hearing>(&format!(
        "SELECT {HEARING_COLUMNS} FROM hearings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List a case's hearings, soonest first.
pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<Hearing>, AppError> {
    let rows = sqlx::query_as::<_, Hearing>(&format!(
        "SELECT {HEARING_COLUMNS} FROM hearings WHERE case_id = $1 ORDER BY hearing_date"
    ))
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Update a hearing with only the provided fields. Returns the updated row
/// or None.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateHearingRequest,
) -> Result<Option<Hearing>, AppError> {
    let row = sqlx::query_as::<_, Hearing>(&format!(
        "UPDATE hearings SET
             hearing_date = COALESCE($2, hearing_date),
             remarks      = COALESCE($3, remarks),
             status       = COALESCE($4, status),
             updated_at   = NOW()
         WHERE id = $1
         RETURNING {HEARING_COLUMNS}"
    ))
    .bind(id)
    .bind(req.hearing_date)
    .bind(req.remarks.as_deref())
    .bind(req.status.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}
