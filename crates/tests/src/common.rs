use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use server::notify::{Dispatcher, NoopPublisher};

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating and seeding, preventing
/// concurrent tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

/// Build a test router backed by a real Postgres pool.
///
/// Returns None (after logging) when neither TEST_DATABASE_URL nor
/// DATABASE_URL is set, so the suite is skipped instead of failing on
/// machines without a database. The returned `MutexGuard` must be held for
/// the duration of the test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();

    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("skipping: TEST_DATABASE_URL / DATABASE_URL not set");
        return None;
    };

    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE notifications, hearings, case_requests, cases, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    let dispatcher = Arc::new(Dispatcher::new(pool.clone(), Arc::new(NoopPublisher)));
    let state = server::db::AppState {
        pool: pool.clone(),
        dispatcher,
    };
    let router = server::rest::api_router()
        .layer(middleware::from_fn(
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    Some((router, pool, guard))
}

/// Insert a user directly and return its id. Password is always
/// "password-123" so login tests can authenticate.
pub async fn create_user(pool: &Pool<Postgres>, role: &str, email: &str) -> Uuid {
    let hash = server::auth::password::hash_password("password-123").expect("hash");
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (full_name, email, password_hash, role)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(format!("Test {role}"))
    .bind(email)
    .bind(hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("Failed to create test user")
}

/// Access token for a seeded user.
pub fn token_for(id: Uuid, email: &str, role: &str) -> String {
    server::auth::jwt::create_access_token(id, email, role).expect("Failed to create test JWT")
}

/// Insert a case directly and return its id.
pub async fn create_case_in_db(
    pool: &Pool<Postgres>,
    client_id: Uuid,
    assigned_staff: &[Uuid],
    primary_lawyer: Option<Uuid>,
    status: &str,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO cases (title, case_type, client_id, assigned_staff, primary_lawyer_id, status)
         VALUES ('Seeded case', 'civil', $1, $2, $3, $4) RETURNING id",
    )
    .bind(client_id)
    .bind(assigned_staff)
    .bind(primary_lawyer)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to create test case")
}

/// Count notifications of a type for a recipient, retrying until the
/// detached dispatch lands or the deadline passes. Fan-out is
/// fire-and-forget, so tests poll instead of racing it.
pub async fn wait_for_notifications(
    pool: &Pool<Postgres>,
    recipient: Uuid,
    notification_type: &str,
    expected: i64,
) -> i64 {
    let mut count = 0;
    for _ in 0..40 {
        count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications
             WHERE recipient_id = $1 AND notification_type = $2",
        )
        .bind(recipient)
        .bind(notification_type)
        .fetch_one(pool)
        .await
        .expect("count notifications");
        if count >= expected {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    count
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}

fn request(method: &str, uri: &str, body: Option<&str>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap()
}

/// POST JSON with a bearer token.
pub async fn post_json_authed(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(body), Some(token))).await
}

/// POST JSON without authentication.
pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(body), None)).await
}

/// PUT JSON with a bearer token.
pub async fn put_json_authed(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    send(app, request("PUT", uri, Some(body), Some(token))).await
}

/// PUT without a body, with a bearer token.
pub async fn put_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("PUT", uri, None, Some(token))).await
}

/// GET with a bearer token.
pub async fn get_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("GET", uri, None, Some(token))).await
}

/// GET without authentication.
pub async fn get_unauthed(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request("GET", uri, None, None)).await
}

/// DELETE with a bearer token.
pub async fn delete_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("DELETE", uri, None, Some(token))).await
}
