//! Case access evaluation.
//!
//! Every entry point that reads or mutates a case goes through
//! [`evaluate`], a pure function over a fully loaded principal and case.
//! Handlers and middleware never make case-level decisions of their own.

use shared_types::{AppError, Case, UserRole};

use crate::auth::Principal;

/// The kind of access requested against a case.
///
/// `Write` means full-field mutation (admin only). The narrower staff
/// transition of claiming an assigned case is the distinct `Accept` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
    Accept,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    WriteRequiresAdmin,
    NotOwner,
    NotAssigned,
    UnknownRole,
    AlreadyAccepted,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::WriteRequiresAdmin => "write-requires-admin",
            DenyReason::NotOwner => "not-owner",
            DenyReason::NotAssigned => "not-assigned",
            DenyReason::UnknownRole => "unknown-role",
            DenyReason::AlreadyAccepted => "already-accepted",
        }
    }

    /// An already-accepted case is a state conflict, not a permission
    /// failure — callers render "already accepted", not "access denied".
    pub fn is_conflict(&self) -> bool {
        matches!(self, DenyReason::AlreadyAccepted)
    }
}

/// Outcome of an access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(&'static str),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Decide whether `principal` may perform `intent` on `case`.
///
/// Pure — the case arrives fully loaded and identities are compared by id,
/// never by denormalized names. Rules are evaluated in precedence order;
/// first match wins.
pub fn evaluate(principal: &Principal, case: &Case, intent: Intent) -> Decision {
    if intent == Intent::Accept {
        return evaluate_accept(principal, case);
    }

    match principal.role {
        UserRole::Admin => Decision::Allow("admin-override"),
        _ if intent == Intent::Write => Decision::Deny(DenyReason::WriteRequiresAdmin),
        UserRole::Client => {
            if case.client_id == principal.id {
                Decision::Allow("owner")
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }
        UserRole::Staff => {
            if case.is_assigned(principal.id) {
                Decision::Allow("assigned")
            } else {
                Decision::Deny(DenyReason::NotAssigned)
            }
        }
        UserRole::Unknown => Decision::Deny(DenyReason::UnknownRole),
    }
}

/// Staff claiming an assigned case. Assignment is checked before state so
/// an unassigned staff member sees a permission failure, not a conflict.
fn evaluate_accept(principal: &Principal, case: &Case) -> Decision {
    if principal.role != UserRole::Staff {
        return Decision::Deny(DenyReason::NotAssigned);
    }
    if !case.assigned_staff.contains(&principal.id) {
        return Decision::Deny(DenyReason::NotAssigned);
    }
    if case.status == "active" {
        return Decision::Deny(DenyReason::AlreadyAccepted);
    }
    Decision::Allow("assigned")
}

/// Translate a decision into the workflow result.
///
/// Denies log the evaluator's reason but the caller-facing message stays
/// generic — role and assignment structure must not leak.
pub fn require(decision: Decision, case_id: uuid::Uuid) -> Result<(), AppError> {
    match decision {
        Decision::Allow(_) => Ok(()),
        Decision::Deny(reason) if reason.is_conflict() => {
            tracing::info!(%case_id, reason = reason.as_str(), "case access conflict");
            Err(AppError::conflict("Case already accepted"))
        }
        Decision::Deny(reason) => {
            tracing::warn!(%case_id, reason = reason.as_str(), "case access denied");
            Err(AppError::forbidden("Access denied"))
        }
    }
}
