use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Validation constants ────────────────────────────────────────────

/// Valid urgency values matching the DB CHECK constraint.
pub const REQUEST_URGENCIES: &[&str] = &["low", "medium", "high"];

/// Valid intake status values matching the DB CHECK constraint.
pub const REQUEST_STATUSES: &[&str] = &["pending", "approved", "rejected"];

/// Check whether an urgency string is valid.
pub fn is_valid_request_urgency(s: &str) -> bool {
    REQUEST_URGENCIES.contains(&s)
}

/// Check whether an intake status string is valid.
pub fn is_valid_request_status(s: &str) -> bool {
    REQUEST_STATUSES.contains(&s)
}

// ── DB row struct ───────────────────────────────────────────────────

/// A pre-case intake request submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CaseRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub case_type: String,
    pub description: String,
    pub preferred_lawyer_id: Option<Uuid>,
    pub urgency: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub documents: Vec<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for a case request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseRequestResponse {
    pub id: String,
    pub client_id: String,
    pub title: String,
    pub case_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_lawyer_id: Option<String>,
    pub urgency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

impl From<CaseRequest> for CaseRequestResponse {
    fn from(r: CaseRequest) -> Self {
        Self {
            id: r.id.to_string(),
            client_id: r.client_id.to_string(),
            title: r.title,
            case_type: r.case_type,
            description: r.description,
            preferred_lawyer_id: r.preferred_lawyer_id.map(|u| u.to_string()),
            urgency: r.urgency,
            status: r.status,
            admin_notes: r.admin_notes,
            documents: r.documents,
            reviewed_by: r.reviewed_by.map(|u| u.to_string()),
            reviewed_at: r.reviewed_at.map(|d| d.to_rfc3339()),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// List response for case requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseRequestListResponse {
    pub requests: Vec<CaseRequestResponse>,
    pub total: i64,
}

// ── Request types ───────────────────────────────────────────────────

/// Request body for a client submitting a new case request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitCaseRequest {
    pub title: String,
    pub case_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferred_lawyer: Option<Uuid>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Request body for an admin approving a case request. Assigning staff at
/// approval time requires a primary lawyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApproveCaseRequest {
    #[serde(default)]
    pub assigned_staff: Vec<Uuid>,
    #[serde(default)]
    pub primary_lawyer: Option<Uuid>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Response to an approval: the decided request plus the case it originated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApprovedCaseResponse {
    pub request: CaseRequestResponse,
    pub case: crate::case::CaseResponse,
}

/// Request body for an admin rejecting a case request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RejectCaseRequest {
    #[serde(default)]
    pub admin_notes: Option<String>,
}
