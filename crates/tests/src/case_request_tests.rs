use axum::http::StatusCode;

use crate::common::{
    create_user, get_authed, post_json_authed, put_json_authed, test_app, token_for,
    wait_for_notifications,
};

#[tokio::test]
async fn client_submits_request_and_admins_hear_about_it() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "cra@example.com").await;
    let client = create_user(&pool, "client", "crc@example.com").await;
    let token = token_for(client, "crc@example.com", "client");

    let body = serde_json::json!({
        "title": "Contract review",
        "case_type": "commercial",
        "urgency": "high",
    });
    let (status, response) =
        post_json_authed(&app, "/api/case-requests", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::CREATED, "{response:?}");
    assert_eq!(response["status"], "pending");
    assert_eq!(response["client_id"], client.to_string());
    assert_eq!(response["urgency"], "high");

    assert_eq!(wait_for_notifications(&pool, admin, "case_request", 1).await, 1);
}

#[tokio::test]
async fn staff_cannot_submit_requests() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let staff = create_user(&pool, "staff", "crs@example.com").await;
    let token = token_for(staff, "crs@example.com", "staff");

    let body = serde_json::json!({"title": "Nope", "case_type": "civil"});
    let (status, _) = post_json_authed(&app, "/api/case-requests", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_is_role_scoped() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "lra@example.com").await;
    let c1 = create_user(&pool, "client", "lr1@example.com").await;
    let c2 = create_user(&pool, "client", "lr2@example.com").await;

    for (id, email) in [(c1, "lr1@example.com"), (c2, "lr2@example.com")] {
        let body = serde_json::json!({"title": "Req", "case_type": "civil"});
        let (status, _) = post_json_authed(
            &app,
            "/api/case-requests",
            &body.to_string(),
            &token_for(id, email, "client"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) =
        get_authed(&app, "/api/case-requests", &token_for(admin, "lra@example.com", "admin")).await;
    assert_eq!(body["total"], 2);

    let (_, body) =
        get_authed(&app, "/api/case-requests", &token_for(c1, "lr1@example.com", "client")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["requests"][0]["client_id"], c1.to_string());

    let staff = create_user(&pool, "staff", "lrs@example.com").await;
    let (_, body) =
        get_authed(&app, "/api/case-requests", &token_for(staff, "lrs@example.com", "staff")).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn approval_creates_case_and_notifies_everyone_involved() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "apa@example.com").await;
    let client = create_user(&pool, "client", "apc@example.com").await;
    let staff = create_user(&pool, "staff", "aps@example.com").await;

    let body = serde_json::json!({"title": "Labor claim", "case_type": "labor"});
    let (_, request) = post_json_authed(
        &app,
        "/api/case-requests",
        &body.to_string(),
        &token_for(client, "apc@example.com", "client"),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let body = serde_json::json!({
        "assigned_staff": [staff.to_string()],
        "primary_lawyer": staff.to_string(),
        "admin_notes": "assigning to labor team",
    });
    let (status, response) = put_json_authed(
        &app,
        &format!("/api/case-requests/{request_id}/approve"),
        &body.to_string(),
        &token_for(admin, "apa@example.com", "admin"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response:?}");
    assert_eq!(response["request"]["status"], "approved");
    assert_eq!(response["case"]["client_id"], client.to_string());
    assert_eq!(response["case"]["status"], "pending");
    assert_eq!(response["case"]["assigned_staff"][0], staff.to_string());

    assert_eq!(wait_for_notifications(&pool, client, "case_approved", 1).await, 1);
    assert_eq!(wait_for_notifications(&pool, staff, "case_assigned", 1).await, 1);
}

#[tokio::test]
async fn approval_with_staff_requires_primary_lawyer() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "ana@example.com").await;
    let client = create_user(&pool, "client", "anc@example.com").await;
    let staff = create_user(&pool, "staff", "ans@example.com").await;

    let body = serde_json::json!({"title": "No lawyer", "case_type": "civil"});
    let (_, request) = post_json_authed(
        &app,
        "/api/case-requests",
        &body.to_string(),
        &token_for(client, "anc@example.com", "client"),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let body = serde_json::json!({"assigned_staff": [staff.to_string()]});
    let (status, response) = put_json_authed(
        &app,
        &format!("/api/case-requests/{request_id}/approve"),
        &body.to_string(),
        &token_for(admin, "ana@example.com", "admin"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{response:?}");
    assert_eq!(response["field_errors"]["primary_lawyer"], "required");

    // The request stays pending and decidable.
    let (_, body) = get_authed(
        &app,
        "/api/case-requests",
        &token_for(admin, "ana@example.com", "admin"),
    )
    .await;
    assert_eq!(body["requests"][0]["status"], "pending");
}

#[tokio::test]
async fn deciding_twice_is_a_conflict() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let admin = create_user(&pool, "admin", "dta@example.com").await;
    let client = create_user(&pool, "client", "dtc@example.com").await;

    let body = serde_json::json!({"title": "Twice", "case_type": "civil"});
    let (_, request) = post_json_authed(
        &app,
        "/api/case-requests",
        &body.to_string(),
        &token_for(client, "dtc@example.com", "client"),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();
    let admin_token = token_for(admin, "dta@example.com", "admin");

    let body = serde_json::json!({"admin_notes": "not viable"});
    let (status, _) = put_json_authed(
        &app,
        &format!("/api/case-requests/{request_id}/reject"),
        &body.to_string(),
        &admin_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(wait_for_notifications(&pool, client, "case_rejected", 1).await, 1);

    // Approving a rejected request conflicts.
    let (status, _) = put_json_authed(
        &app,
        &format!("/api/case-requests/{request_id}/approve"),
        &serde_json::json!({}).to_string(),
        &admin_token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_admins_decide_requests() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let client = create_user(&pool, "client", "oda@example.com").await;
    let body = serde_json::json!({"title": "Mine", "case_type": "civil"});
    let (_, request) = post_json_authed(
        &app,
        "/api/case-requests",
        &body.to_string(),
        &token_for(client, "oda@example.com", "client"),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();

    // The submitting client cannot approve their own request.
    let (status, _) = put_json_authed(
        &app,
        &format!("/api/case-requests/{request_id}/approve"),
        &serde_json::json!({}).to_string(),
        &token_for(client, "oda@example.com", "client"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
