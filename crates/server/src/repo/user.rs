use shared_types::{AppError, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, created_at";

/// Insert a new user with a pre-hashed password.
pub async fn create(
    pool: &Pool<Postgres>,
    full_name: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<User, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (full_name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a user by email (for login).
pub async fn find_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a user by ID.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// IDs of every user holding the given role. Used for role-wide fan-out
/// (e.g. notifying all admins of a new case request).
pub async fn list_ids_by_role(pool: &Pool<Postgres>, role: &str) -> Result<Vec<Uuid>, AppError> {
    let rows = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1")
        .bind(role)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Count how many of the given IDs are existing staff users. Lets the
/// workflow reject assignments that reference clients or nonexistent users.
pub async fn count_staff_among(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<i64, AppError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE id = ANY($1) AND role = 'staff'",
    )
    .bind(ids)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(count)
}
