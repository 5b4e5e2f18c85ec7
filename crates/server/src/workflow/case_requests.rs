//! Case-request intake use-cases.
//!
//! Clients submit requests; only admins decide them. Approval originates a
//! real `Case` for the requesting client, optionally assigning staff — in
//! which case a primary lawyer is mandatory. Decisions are guarded by a
//! pending-only conditional update so two admins cannot both decide the
//! same request.

use shared_types::{
    is_valid_request_urgency, AppError, ApproveCaseRequest, Case, CaseRequest, RejectCaseRequest,
    SubmitCaseRequest, UserRole, REQUEST_URGENCIES,
};
use uuid::Uuid;

use crate::auth::Principal;
use crate::db::AppState;
use crate::notify::NotificationEvent;
use crate::repo;

/// Client submits a new case request. All admins are notified.
pub async fn create_case_request(
    state: &AppState,
    principal: &Principal,
    req: SubmitCaseRequest,
) -> Result<CaseRequest, AppError> {
    if principal.role != UserRole::Client {
        tracing::warn!(principal = %principal.id, "case request submission denied");
        return Err(AppError::forbidden("Access denied"));
    }

    if req.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    if req.case_type.trim().is_empty() {
        return Err(AppError::bad_request("case_type must not be empty"));
    }

    let urgency = req.urgency.as_deref().unwrap_or("medium");
    if !is_valid_request_urgency(urgency) {
        return Err(AppError::bad_request(format!(
            "Invalid urgency: {}. Valid values: {}",
            urgency,
            REQUEST_URGENCIES.join(", ")
        )));
    }

    let request = repo::case_request::create(
        &state.pool,
        principal.id,
        req.title.trim(),
        req.case_type.trim(),
        &req.description,
        req.preferred_lawyer,
        urgency,
        &req.documents,
    )
    .await?;

    let admins = match repo::user::list_ids_by_role(&state.pool, "admin").await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("could not resolve admin recipients: {e}");
            Vec::new()
        }
    };

    let priority = if urgency == "high" { "high" } else { "medium" };
    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "case_request",
            "new_case_request",
            "New case request",
            format!("A client submitted the case request \"{}\"", request.title),
        )
        .recipients(admins)
        .sender(principal.id)
        .priority(priority)
        .broadcast_role("admin")
        .action_url(format!("/case-requests/{}", request.id)),
    );

    Ok(request)
}

/// List case requests: admins see all, clients their own, staff nothing.
pub async fn list_case_requests(
    state: &AppState,
    principal: &Principal,
) -> Result<Vec<CaseRequest>, AppError> {
    match principal.role {
        UserRole::Admin => repo::case_request::list_all(&state.pool).await,
        UserRole::Client => repo::case_request::list_for_client(&state.pool, principal.id).await,
        _ => Ok(Vec::new()),
    }
}

/// Admin approves a pending request, creating the case.
pub async fn approve_case_request(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    req: ApproveCaseRequest,
) -> Result<(CaseRequest, Case), AppError> {
    if principal.role != UserRole::Admin {
        return Err(AppError::forbidden("Access denied"));
    }

    let request = repo::case_request::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case request not found"))?;

    if request.status != "pending" {
        return Err(AppError::conflict(format!(
            "Case request already {}",
            request.status
        )));
    }

    if !req.assigned_staff.is_empty() && req.primary_lawyer.is_none() {
        return Err(AppError::validation(
            "primary_lawyer is required when assigning staff at approval",
            [("primary_lawyer".to_string(), "required".to_string())]
                .into_iter()
                .collect(),
        ));
    }

    // Validate the assignment before the decision lands, so a bad payload
    // cannot strand an approved request without a case.
    let assigned_staff = crate::workflow::cases::dedup(&req.assigned_staff);
    crate::workflow::cases::validate_staff_assignment(state, &assigned_staff, req.primary_lawyer)
        .await?;

    let decided = repo::case_request::try_decide(
        &state.pool,
        id,
        "approved",
        principal.id,
        req.admin_notes.as_deref(),
    )
    .await?
    // Pending when we looked, decided by someone else in between.
    .ok_or_else(|| AppError::conflict("Case request already decided"))?;

    // The approved request becomes a live case owned by the requesting client.
    let case = crate::workflow::cases::create_case(
        state,
        principal,
        shared_types::CreateCaseRequest {
            title: decided.title.clone(),
            case_type: decided.case_type.clone(),
            description: decided.description.clone(),
            classification: None,
            city: None,
            client: Some(decided.client_id),
            assigned_staff,
            primary_lawyer: req.primary_lawyer,
        },
    )
    .await?;

    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "case_approved",
            "case_approved",
            "Case request approved",
            format!("Your case request \"{}\" was approved", decided.title),
        )
        .recipients([decided.client_id])
        .sender(principal.id)
        .case(case.id)
        .priority("high")
        .action_url(format!("/cases/{}", case.id)),
    );

    Ok((decided, case))
}

/// Admin rejects a pending request.
pub async fn reject_case_request(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    req: RejectCaseRequest,
) -> Result<CaseRequest, AppError> {
    if principal.role != UserRole::Admin {
        return Err(AppError::forbidden("Access denied"));
    }

    let request = repo::case_request::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case request not found"))?;

    if request.status != "pending" {
        return Err(AppError::conflict(format!(
            "Case request already {}",
            request.status
        )));
    }

    let decided = repo::case_request::try_decide(
        &state.pool,
        id,
        "rejected",
        principal.id,
        req.admin_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::conflict("Case request already decided"))?;

    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "case_rejected",
            "case_rejected",
            "Case request rejected",
            format!("Your case request \"{}\" was rejected", decided.title),
        )
        .recipients([decided.client_id])
        .sender(principal.id)
        .action_url(format!("/case-requests/{}", decided.id)),
    );

    Ok(decided)
}
