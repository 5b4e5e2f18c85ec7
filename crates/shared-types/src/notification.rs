use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Validation constants ────────────────────────────────────────────

/// Closed enumeration of notification types, matching the DB CHECK constraint.
pub const NOTIFICATION_TYPES: &[&str] = &[
    "case_request",
    "case_approved",
    "case_rejected",
    "case_assigned",
    "case_updated",
    "document_uploaded",
    "hearing_scheduled",
    "hearing_updated",
    "appointment_booked",
    "appointment_confirmed",
    "feedback_received",
    "system",
];

/// Valid notification priority values matching the DB CHECK constraint.
pub const NOTIFICATION_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Check whether a notification type string is in the closed enumeration.
pub fn is_valid_notification_type(s: &str) -> bool {
    NOTIFICATION_TYPES.contains(&s)
}

/// Check whether a priority string is valid.
pub fn is_valid_notification_priority(s: &str) -> bool {
    NOTIFICATION_PRIORITIES.contains(&s)
}

// ── DB row struct ───────────────────────────────────────────────────

/// A persisted notification record.
///
/// Created only by the notification dispatcher; the read-state pair
/// (`is_read`, `read_at`) is the only mutable part (DB CHECK keeps them
/// consistent) and only the recipient may touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub case_id: Option<Uuid>,
    pub document_id: Option<Uuid>,
    pub hearing_id: Option<Uuid>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub action_url: Option<String>,
    pub priority: String,
    pub created_at: DateTime<Utc>,
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationResponse {
    pub id: String,
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hearing_id: Option<String>,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub priority: String,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            recipient_id: n.recipient_id.to_string(),
            sender_id: n.sender_id.map(|u| u.to_string()),
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            case_id: n.case_id.map(|u| u.to_string()),
            document_id: n.document_id.map(|u| u.to_string()),
            hearing_id: n.hearing_id.map(|u| u.to_string()),
            is_read: n.is_read,
            read_at: n.read_at.map(|d| d.to_rfc3339()),
            action_url: n.action_url,
            priority: n.priority,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Paginated list response for a recipient's notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub total: i64,
}

/// Response for the unread-count endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UnreadCountResponse {
    pub unread: i64,
}

// ── Query parameters ────────────────────────────────────────────────

/// Query parameters for listing notifications.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct NotificationListParams {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub is_read: Option<bool>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
}
