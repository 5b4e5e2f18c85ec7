use axum::{extract::State, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{
    is_valid_user_role, AppError, AuthResponse, AuthUser, LoginRequest, RegisterRequest, UserRole,
};

use crate::auth::{jwt, password, MaybePrincipal, Principal};
use crate::error_convert::ValidateRequest;
use crate::repo;

/// POST /api/auth/register
///
/// Self-service registration creates client accounts. Admin and staff
/// accounts can only be created by an authenticated admin.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Invalid request", body = AppError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    MaybePrincipal(principal): MaybePrincipal,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate_request()?;

    let role = body.role.as_deref().unwrap_or("client");
    if !is_valid_user_role(role) {
        return Err(AppError::bad_request(format!("Invalid role: {role}")));
    }
    if role != "client" && !principal.is_some_and(|p| p.role == UserRole::Admin) {
        return Err(AppError::forbidden("Access denied"));
    }

    let password_hash = password::hash_password(&body.password)?;
    let user = repo::user::create(&pool, &body.full_name, &body.email, &password_hash, role).await?;

    let token = jwt::create_access_token(user.id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AuthUser::from(user),
        }),
    ))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    body.validate_request()?;

    let user = repo::user::find_by_email(&pool, &body.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !password::verify_password(&body.password, &user.password_hash) {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = jwt::create_access_token(user.id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: AuthUser::from(user),
    }))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth"
)]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    principal: Principal,
) -> Result<Json<AuthUser>, AppError> {
    let user = repo::user::find_by_id(&pool, principal.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    Ok(Json(AuthUser::from(user)))
}
