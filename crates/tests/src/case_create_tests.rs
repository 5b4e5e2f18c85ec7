use axum::http::StatusCode;
use uuid::Uuid;

use crate::common::{
    create_user, post_json_authed, test_app, token_for, wait_for_notifications,
};

#[tokio::test]
async fn client_creates_case_and_owns_it() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let client = create_user(&pool, "client", "owner@example.com").await;
    let token = token_for(client, "owner@example.com", "client");

    let body = serde_json::json!({"title": "Property dispute", "case_type": "civil"});
    let (status, response) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED, "{response:?}");
    assert_eq!(response["client_id"], client.to_string());
    assert_eq!(response["status"], "pending");
    assert_eq!(response["classification"], "public");
}

#[tokio::test]
async fn client_payload_cannot_override_owner_or_assignment() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let client = create_user(&pool, "client", "sneaky@example.com").await;
    let other = create_user(&pool, "client", "other@example.com").await;
    let staff = create_user(&pool, "staff", "staff1@example.com").await;
    let token = token_for(client, "sneaky@example.com", "client");

    let body = serde_json::json!({
        "title": "Forced ownership",
        "case_type": "civil",
        "client": other.to_string(),
        "assigned_staff": [staff.to_string()],
        "primary_lawyer": staff.to_string(),
    });
    let (status, response) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED, "{response:?}");
    // Ownership is forced to the caller; assignment fields are ignored.
    assert_eq!(response["client_id"], client.to_string());
    assert_eq!(response["assigned_staff"].as_array().unwrap().len(), 0);
    assert!(response.get("primary_lawyer_id").is_none());
}

#[tokio::test]
async fn staff_cannot_create_cases() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let staff = create_user(&pool, "staff", "nostaff@example.com").await;
    let token = token_for(staff, "nostaff@example.com", "staff");

    let body = serde_json::json!({"title": "Staff case", "case_type": "civil"});
    let (status, _) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_creates_on_behalf_of_client_with_assignment() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "boss@example.com").await;
    let client = create_user(&pool, "client", "forclient@example.com").await;
    let staff = create_user(&pool, "staff", "assigned@example.com").await;
    let token = token_for(admin, "boss@example.com", "admin");

    let body = serde_json::json!({
        "title": "Admin-filed case",
        "case_type": "criminal",
        "classification": "confidential",
        "client": client.to_string(),
        "assigned_staff": [staff.to_string()],
        "primary_lawyer": staff.to_string(),
    });
    let (status, response) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED, "{response:?}");
    assert_eq!(response["client_id"], client.to_string());
    assert_eq!(response["assigned_staff"][0], staff.to_string());
    assert_eq!(response["primary_lawyer_id"], staff.to_string());
    assert_eq!(response["classification"], "confidential");

    // The assigned staff member gets a case_assigned notification.
    let count = wait_for_notifications(&pool, staff, "case_assigned", 1).await;
    assert_eq!(count, 1);
}

#[tokio::test]
async fn assignment_must_reference_staff_users() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "boss2@example.com").await;
    let client = create_user(&pool, "client", "notstaff@example.com").await;
    let token = token_for(admin, "boss2@example.com", "admin");

    // A client id in assigned_staff is rejected
    let body = serde_json::json!({
        "title": "Bad assignment",
        "case_type": "civil",
        "assigned_staff": [client.to_string()],
    });
    let (status, response) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{response:?}");

    // So is a random unknown id
    let body = serde_json::json!({
        "title": "Bad assignment",
        "case_type": "civil",
        "assigned_staff": [Uuid::new_v4().to_string()],
    });
    let (status, _) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_with_zero_admins_still_succeeds() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    // No admin exists anywhere; notification fan-out has nobody to tell.
    let client = create_user(&pool, "client", "alone@example.com").await;
    let token = token_for(client, "alone@example.com", "client");

    let body = serde_json::json!({"title": "Lonely case", "case_type": "civil"});
    let (status, response) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED, "{response:?}");
}

#[tokio::test]
async fn admins_are_notified_of_new_case() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin1 = create_user(&pool, "admin", "a1@example.com").await;
    let admin2 = create_user(&pool, "admin", "a2@example.com").await;
    let client = create_user(&pool, "client", "noisy@example.com").await;
    let token = token_for(client, "noisy@example.com", "client");

    let body = serde_json::json!({"title": "Visible case", "case_type": "civil"});
    let (status, _) = post_json_authed(&app, "/api/cases", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(wait_for_notifications(&pool, admin1, "case_request", 1).await, 1);
    assert_eq!(wait_for_notifications(&pool, admin2, "case_request", 1).await, 1);
}

#[tokio::test]
async fn create_requires_authentication() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let body = serde_json::json!({"title": "Anon", "case_type": "civil"});
    let (status, _) = crate::common::post_json(&app, "/api/cases", &body.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
