use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::common::{
    create_user, delete_authed, get_authed, put_authed, test_app, token_for,
};

/// Insert a notification directly, as the dispatcher would.
async fn seed_notification(
    pool: &Pool<Postgres>,
    recipient: Uuid,
    notification_type: &str,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO notifications (recipient_id, notification_type, title, message)
         VALUES ($1, $2, 'Seeded', 'Seeded message') RETURNING id",
    )
    .bind(recipient)
    .bind(notification_type)
    .fetch_one(pool)
    .await
    .expect("seed notification")
}

#[tokio::test]
async fn list_is_recipient_scoped_and_paginated() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let me = create_user(&pool, "client", "me@example.com").await;
    let other = create_user(&pool, "client", "nother@example.com").await;
    for _ in 0..3 {
        seed_notification(&pool, me, "system").await;
    }
    seed_notification(&pool, other, "system").await;

    let token = token_for(me, "me@example.com", "client");
    let (status, body) = get_authed(&app, "/api/notifications", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (_, body) = get_authed(&app, "/api/notifications?limit=2&skip=2", &token).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_filters_by_read_state_and_type() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let me = create_user(&pool, "client", "mf@example.com").await;
    let n1 = seed_notification(&pool, me, "case_updated").await;
    seed_notification(&pool, me, "case_assigned").await;

    let token = token_for(me, "mf@example.com", "client");
    let (_, _) = put_authed(&app, &format!("/api/notifications/{n1}/read"), &token).await;

    let (_, body) = get_authed(&app, "/api/notifications?is_read=false", &token).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["notifications"][0]["notification_type"], "case_assigned");

    let (_, body) = get_authed(&app, "/api/notifications?type=case_updated", &token).await;
    assert_eq!(body["total"], 1);

    let (status, _) = get_authed(&app, "/api/notifications?type=bogus", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn read_roundtrip_decrements_unread_exactly_once() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let me = create_user(&pool, "client", "mr@example.com").await;
    let id = seed_notification(&pool, me, "system").await;
    seed_notification(&pool, me, "system").await;
    let token = token_for(me, "mr@example.com", "client");

    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &token).await;
    assert_eq!(count["unread"], 2);

    let (status, body) = put_authed(&app, &format!("/api/notifications/{id}/read"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);
    let first_read_at = body["read_at"].as_str().unwrap().to_string();

    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &token).await;
    assert_eq!(count["unread"], 1);

    // Re-marking is a no-op: count unchanged, original read_at preserved.
    let (status, body) = put_authed(&app, &format!("/api/notifications/{id}/read"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read_at"], first_read_at);
    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &token).await;
    assert_eq!(count["unread"], 1);
}

#[tokio::test]
async fn foreign_notifications_look_like_not_found() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let owner = create_user(&pool, "client", "no@example.com").await;
    let intruder = create_user(&pool, "client", "ni@example.com").await;
    let id = seed_notification(&pool, owner, "system").await;
    let token = token_for(intruder, "ni@example.com", "client");

    let (status, _) = put_authed(&app, &format!("/api/notifications/{id}/read"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete_authed(&app, &format!("/api/notifications/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Untouched for the rightful owner.
    let owner_token = token_for(owner, "no@example.com", "client");
    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &owner_token).await;
    assert_eq!(count["unread"], 1);
}

#[tokio::test]
async fn mark_all_and_clear_all_are_recipient_scoped() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let me = create_user(&pool, "client", "ma@example.com").await;
    let other = create_user(&pool, "client", "mo@example.com").await;
    seed_notification(&pool, me, "system").await;
    seed_notification(&pool, me, "system").await;
    seed_notification(&pool, other, "system").await;

    let token = token_for(me, "ma@example.com", "client");
    let (status, _) = put_authed(&app, "/api/notifications/read-all", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &token).await;
    assert_eq!(count["unread"], 0);

    // The other recipient's unread notification is untouched.
    let other_token = token_for(other, "mo@example.com", "client");
    let (_, count) = get_authed(&app, "/api/notifications/unread-count", &other_token).await;
    assert_eq!(count["unread"], 1);

    let (status, _) = delete_authed(&app, "/api/notifications", &token).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get_authed(&app, "/api/notifications", &token).await;
    assert_eq!(body["total"], 0);

    let (_, body) = get_authed(&app, "/api/notifications", &other_token).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn delete_one_notification() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let me = create_user(&pool, "client", "md@example.com").await;
    let id = seed_notification(&pool, me, "system").await;
    let token = token_for(me, "md@example.com", "client");

    let (status, _) = delete_authed(&app, &format!("/api/notifications/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete_authed(&app, &format!("/api/notifications/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
