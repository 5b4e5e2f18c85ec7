use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Validation constants ────────────────────────────────────────────

/// Valid case status values matching the DB CHECK constraint.
pub const CASE_STATUSES: &[&str] = &["pending", "active", "closed", "on-hold"];

/// Valid disclosure classification values matching the DB CHECK constraint.
pub const CASE_CLASSIFICATIONS: &[&str] = &["public", "confidential", "classified"];

/// Valid case result values matching the DB CHECK constraint.
pub const CASE_RESULTS: &[&str] = &["pending", "won", "lost", "settled"];

/// Check whether a status string is a valid case status.
pub fn is_valid_case_status(s: &str) -> bool {
    CASE_STATUSES.contains(&s)
}

/// Check whether a classification string is valid.
pub fn is_valid_case_classification(s: &str) -> bool {
    CASE_CLASSIFICATIONS.contains(&s)
}

/// Check whether a result string is valid.
pub fn is_valid_case_result(s: &str) -> bool {
    CASE_RESULTS.contains(&s)
}

// ── DB row struct ───────────────────────────────────────────────────

/// A legal case record.
///
/// `client_id` is immutable after creation. `accepted_by`/`accepted_at` are
/// set together by the accept transition or not at all (DB CHECK).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Case {
    pub id: Uuid,
    pub title: String,
    pub case_type: String,
    pub description: String,
    pub status: String,
    pub classification: String,
    pub result: String,
    pub city: Option<String>,
    pub client_id: Uuid,
    pub assigned_staff: Vec<Uuid>,
    pub primary_lawyer_id: Option<Uuid>,
    pub accepted_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub hearing_ids: Vec<Uuid>,
    pub registered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// True if the given user is assigned to this case, either in the
    /// assigned staff list or as primary lawyer.
    pub fn is_assigned(&self, user_id: Uuid) -> bool {
        self.assigned_staff.contains(&user_id) || self.primary_lawyer_id == Some(user_id)
    }
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseResponse {
    pub id: String,
    pub title: String,
    pub case_type: String,
    pub description: String,
    pub status: String,
    pub classification: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub client_id: String,
    pub assigned_staff: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_lawyer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<String>,
    pub hearing_ids: Vec<String>,
    pub registered_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Case> for CaseResponse {
    fn from(c: Case) -> Self {
        Self {
            id: c.id.to_string(),
            title: c.title,
            case_type: c.case_type,
            description: c.description,
            status: c.status,
            classification: c.classification,
            result: c.result,
            city: c.city,
            client_id: c.client_id.to_string(),
            assigned_staff: c.assigned_staff.iter().map(Uuid::to_string).collect(),
            primary_lawyer_id: c.primary_lawyer_id.map(|u| u.to_string()),
            accepted_by: c.accepted_by.map(|u| u.to_string()),
            accepted_at: c.accepted_at.map(|d| d.to_rfc3339()),
            hearing_ids: c.hearing_ids.iter().map(Uuid::to_string).collect(),
            registered_at: c.registered_at.to_rfc3339(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// List response for cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseListResponse {
    pub cases: Vec<CaseResponse>,
    pub total: i64,
}

// ── Request types ───────────────────────────────────────────────────

/// Request to create a new case.
///
/// `client`, `assigned_staff` and `primary_lawyer` are honored only for
/// admin callers; client-created cases always belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCaseRequest {
    pub title: String,
    pub case_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub client: Option<Uuid>,
    #[serde(default)]
    pub assigned_staff: Vec<Uuid>,
    #[serde(default)]
    pub primary_lawyer: Option<Uuid>,
}

/// Request to update a case (all fields optional — only provided fields are changed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCaseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Request to replace a case's staff assignment. Both fields are replaced
/// atomically; an empty list plus null lawyer unassigns everyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignStaffRequest {
    #[serde(default)]
    pub assigned_staff: Vec<Uuid>,
    #[serde(default)]
    pub primary_lawyer: Option<Uuid>,
}
