//! Case use-cases.
//!
//! Every operation follows the same shape: resolve the case (NotFound
//! first), ask the access evaluator, apply the mutation as one atomic
//! store write, then hand a notification event to the dispatcher without
//! waiting for it. No state is reachable without passing the evaluator.

use shared_types::{
    is_valid_case_classification, is_valid_case_result, is_valid_case_status, AppError,
    AssignStaffRequest, Case, CreateCaseRequest, UpdateCaseRequest, UserRole,
    CASE_CLASSIFICATIONS, CASE_RESULTS, CASE_STATUSES,
};
use uuid::Uuid;

use crate::access::{self, Intent};
use crate::auth::Principal;
use crate::db::AppState;
use crate::notify::NotificationEvent;
use crate::repo;

/// Create a case. Clients always own what they create; only admins may
/// set the owner or seed assignments from the payload.
pub async fn create_case(
    state: &AppState,
    principal: &Principal,
    req: CreateCaseRequest,
) -> Result<Case, AppError> {
    if !matches!(principal.role, UserRole::Admin | UserRole::Client) {
        tracing::warn!(principal = %principal.id, role = principal.role.as_str(), "case creation denied");
        return Err(AppError::forbidden("Access denied"));
    }

    if req.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    if req.case_type.trim().is_empty() {
        return Err(AppError::bad_request("case_type must not be empty"));
    }

    let classification = req.classification.as_deref().unwrap_or("public");
    if !is_valid_case_classification(classification) {
        return Err(AppError::bad_request(format!(
            "Invalid classification: {}. Valid values: {}",
            classification,
            CASE_CLASSIFICATIONS.join(", ")
        )));
    }

    // The payload cannot override ownership for client creators, and only
    // admins may pre-assign staff.
    let (client_id, assigned_staff, primary_lawyer) = match principal.role {
        UserRole::Admin => (
            req.client.unwrap_or(principal.id),
            dedup(&req.assigned_staff),
            req.primary_lawyer,
        ),
        _ => (principal.id, Vec::new(), None),
    };

    validate_staff_assignment(state, &assigned_staff, primary_lawyer).await?;

    let case = repo::case::create(
        &state.pool,
        req.title.trim(),
        req.case_type.trim(),
        &req.description,
        classification,
        req.city.as_deref(),
        client_id,
        &assigned_staff,
        primary_lawyer,
    )
    .await?;

    notify_admins_of_new_case(state, principal, &case).await;

    if !assigned_staff.is_empty() {
        state.dispatcher.notify_detached(
            NotificationEvent::new(
                "case_assigned",
                "case_assigned",
                "New case assignment",
                format!("You have been assigned to case \"{}\"", case.title),
            )
            .recipients(assigned_staff.iter().copied())
            .sender(principal.id)
            .case(case.id)
            .priority("high")
            .action_url(format!("/cases/{}", case.id)),
        );
    }

    Ok(case)
}

/// Fetch one case. Existence is checked before access so a missing id is a
/// plain 404; an existing case the principal may not see is a generic 403.
pub async fn get_case(state: &AppState, principal: &Principal, id: Uuid) -> Result<Case, AppError> {
    let case = repo::case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &case, Intent::Read), id)?;

    Ok(case)
}

/// List the cases visible to the principal. Never denies; the query is
/// narrowed to exactly the set per-item read evaluation would allow.
pub async fn list_cases(state: &AppState, principal: &Principal) -> Result<Vec<Case>, AppError> {
    repo::case::list_for_principal(&state.pool, principal).await
}

/// Full-field update, admin-only via the write intent. Fans out
/// `case_updated` only when the status actually changed.
pub async fn update_case(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    req: UpdateCaseRequest,
) -> Result<Case, AppError> {
    let before = repo::case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &before, Intent::Write), id)?;

    if let Some(status) = req.status.as_deref() {
        if !is_valid_case_status(status) {
            return Err(AppError::bad_request(format!(
                "Invalid status: {}. Valid values: {}",
                status,
                CASE_STATUSES.join(", ")
            )));
        }
    }
    if let Some(classification) = req.classification.as_deref() {
        if !is_valid_case_classification(classification) {
            return Err(AppError::bad_request(format!(
                "Invalid classification: {}. Valid values: {}",
                classification,
                CASE_CLASSIFICATIONS.join(", ")
            )));
        }
    }
    if let Some(result) = req.result.as_deref() {
        if !is_valid_case_result(result) {
            return Err(AppError::bad_request(format!(
                "Invalid result: {}. Valid values: {}",
                result,
                CASE_RESULTS.join(", ")
            )));
        }
    }

    let case = repo::case::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    if case.status != before.status {
        state.dispatcher.notify_detached(
            NotificationEvent::new(
                "case_updated",
                "case_status_updated",
                "Case status updated",
                format!(
                    "Case \"{}\" moved from {} to {}",
                    case.title, before.status, case.status
                ),
            )
            .recipients(
                std::iter::once(case.client_id).chain(case.assigned_staff.iter().copied()),
            )
            .sender(principal.id)
            .case(case.id)
            .action_url(format!("/cases/{}", case.id)),
        );
    }

    Ok(case)
}

/// Replace both assignment fields atomically; only newly assigned staff are
/// notified. Empty list plus null lawyer is a valid "unassign all".
pub async fn assign_staff(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    req: AssignStaffRequest,
) -> Result<Case, AppError> {
    let before = repo::case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &before, Intent::Write), id)?;

    let assigned_staff = dedup(&req.assigned_staff);
    validate_staff_assignment(state, &assigned_staff, req.primary_lawyer).await?;

    let case = repo::case::replace_assignment(&state.pool, id, &assigned_staff, req.primary_lawyer)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    let newly_assigned: Vec<Uuid> = assigned_staff
        .iter()
        .copied()
        .filter(|id| !before.assigned_staff.contains(id))
        .collect();

    if !newly_assigned.is_empty() {
        state.dispatcher.notify_detached(
            NotificationEvent::new(
                "case_assigned",
                "case_assigned",
                "New case assignment",
                format!("You have been assigned to case \"{}\"", case.title),
            )
            .recipients(newly_assigned)
            .sender(principal.id)
            .case(case.id)
            .priority("high")
            .action_url(format!("/cases/{}", case.id)),
        );
    }

    Ok(case)
}

/// Staff claiming an assigned case. The store-level conditional update is
/// the arbiter for concurrent accepts: exactly one caller sees a row.
pub async fn accept_case(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
) -> Result<Case, AppError> {
    let case = repo::case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &case, Intent::Accept), id)?;

    // The evaluator said yes against a snapshot; the guarded update closes
    // the window where another staff member accepted in between.
    let case = repo::case::try_accept(&state.pool, id, principal.id)
        .await?
        .ok_or_else(|| AppError::conflict("Case already accepted"))?;

    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "case_updated",
            "case_accepted",
            "Case accepted",
            format!("Your case \"{}\" has been accepted and is now active", case.title),
        )
        .recipients([case.client_id])
        .sender(principal.id)
        .case(case.id)
        .action_url(format!("/cases/{}", case.id)),
    );

    Ok(case)
}

/// Admin-only hard delete.
pub async fn delete_case(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), AppError> {
    let case = repo::case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &case, Intent::Write), id)?;

    if !repo::case::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Case not found"));
    }

    Ok(())
}

/// Tell every admin (except the actor) about a freshly created case. Any
/// failure resolving the admin list is logged and swallowed — zero admins
/// still means a created case.
async fn notify_admins_of_new_case(state: &AppState, principal: &Principal, case: &Case) {
    let admins = match repo::user::list_ids_by_role(&state.pool, "admin").await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("could not resolve admin recipients: {e}");
            Vec::new()
        }
    };

    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "case_request",
            "new_case_request",
            "New case registered",
            format!("Case \"{}\" was registered and awaits review", case.title),
        )
        .recipients(admins.into_iter().filter(|id| *id != principal.id))
        .sender(principal.id)
        .case(case.id)
        .priority("high")
        .broadcast_role("admin")
        .action_url(format!("/cases/{}", case.id)),
    );
}

/// Reject assignments referencing users that are not existing staff.
pub(crate) async fn validate_staff_assignment(
    state: &AppState,
    assigned_staff: &[Uuid],
    primary_lawyer: Option<Uuid>,
) -> Result<(), AppError> {
    if !assigned_staff.is_empty() {
        let staff_count = repo::user::count_staff_among(&state.pool, assigned_staff).await?;
        if staff_count != assigned_staff.len() as i64 {
            return Err(AppError::validation(
                "assigned_staff must reference existing staff users",
                [("assigned_staff".to_string(), "unknown or non-staff user id".to_string())]
                    .into_iter()
                    .collect(),
            ));
        }
    }

    if let Some(lawyer) = primary_lawyer {
        let staff_count = repo::user::count_staff_among(&state.pool, &[lawyer]).await?;
        if staff_count != 1 {
            return Err(AppError::validation(
                "primary_lawyer must reference an existing staff user",
                [("primary_lawyer".to_string(), "unknown or non-staff user id".to_string())]
                    .into_iter()
                    .collect(),
            ));
        }
    }

    Ok(())
}

pub(crate) fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
