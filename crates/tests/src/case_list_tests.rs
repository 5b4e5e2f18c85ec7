use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{create_case_in_db, create_user, get_authed, test_app, token_for};

/// The list filter must expose exactly the set per-item read evaluation
/// would allow — no over- or under-exposure.
#[tokio::test]
async fn list_narrows_to_role_visibility() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let client_a = create_user(&pool, "client", "la@example.com").await;
    let client_b = create_user(&pool, "client", "lb@example.com").await;
    let staff = create_user(&pool, "staff", "ls@example.com").await;
    let lawyer = create_user(&pool, "staff", "ll@example.com").await;
    let admin = create_user(&pool, "admin", "ladmin@example.com").await;

    let case_a = create_case_in_db(&pool, client_a, &[staff], None, "pending").await;
    let case_b = create_case_in_db(&pool, client_b, &[], Some(lawyer), "pending").await;
    let case_c = create_case_in_db(&pool, client_b, &[], None, "pending").await;

    // Admin sees everything
    let (status, body) =
        get_authed(&app, "/api/cases", &token_for(admin, "ladmin@example.com", "admin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    // Client A sees only their own case
    let (_, body) =
        get_authed(&app, "/api/cases", &token_for(client_a, "la@example.com", "client")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["cases"][0]["id"], case_a.to_string());

    // Client B sees their two cases
    let (_, body) =
        get_authed(&app, "/api/cases", &token_for(client_b, "lb@example.com", "client")).await;
    assert_eq!(body["total"], 2);

    // Assigned staff sees the case they are on
    let (_, body) =
        get_authed(&app, "/api/cases", &token_for(staff, "ls@example.com", "staff")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["cases"][0]["id"], case_a.to_string());

    // Primary lawyer counts as assigned
    let (_, body) =
        get_authed(&app, "/api/cases", &token_for(lawyer, "ll@example.com", "staff")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["cases"][0]["id"], case_b.to_string());

    // An unassigned staff member sees an empty list, not an error
    let lonely = create_user(&pool, "staff", "lonely@example.com").await;
    let (status, body) =
        get_authed(&app, "/api/cases", &token_for(lonely, "lonely@example.com", "staff")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let _ = case_c;
}

#[tokio::test]
async fn list_requires_authentication() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let (status, _) = crate::common::get_unauthed(&app, "/api/cases").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
