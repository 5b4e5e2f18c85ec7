use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Validation constants ────────────────────────────────────────────

/// Valid hearing status values matching the DB CHECK constraint.
pub const HEARING_STATUSES: &[&str] = &["scheduled", "completed", "postponed", "cancelled"];

/// Check whether a hearing status string is valid.
pub fn is_valid_hearing_status(s: &str) -> bool {
    HEARING_STATUSES.contains(&s)
}

// ── DB row struct ───────────────────────────────────────────────────

/// A court hearing attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Hearing {
    pub id: Uuid,
    pub case_id: Uuid,
    pub hearing_date: DateTime<Utc>,
    pub remarks: String,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for a hearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HearingResponse {
    pub id: String,
    pub case_id: String,
    pub hearing_date: String,
    pub remarks: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Hearing> for HearingResponse {
    fn from(h: Hearing) -> Self {
        Self {
            id: h.id.to_string(),
            case_id: h.case_id.to_string(),
            hearing_date: h.hearing_date.to_rfc3339(),
            remarks: h.remarks,
            status: h.status,
            created_by: h.created_by.map(|u| u.to_string()),
            created_at: h.created_at.to_rfc3339(),
            updated_at: h.updated_at.to_rfc3339(),
        }
    }
}

// ── Request types ───────────────────────────────────────────────────

/// Request to schedule a hearing on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScheduleHearingRequest {
    pub hearing_date: DateTime<Utc>,
    #[serde(default)]
    pub remarks: String,
}

/// Request to update a hearing (all fields optional — only provided fields change).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateHearingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
