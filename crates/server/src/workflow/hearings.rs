//! Hearing use-cases.
//!
//! Hearings are created by admins or by staff with access to the case;
//! clients see them through case reads but never schedule them. The
//! insert-plus-link write happens transactionally in the repo so the case
//! and its hearing list cannot drift apart.

use shared_types::{
    is_valid_hearing_status, AppError, Case, Hearing, ScheduleHearingRequest,
    UpdateHearingRequest, UserRole, HEARING_STATUSES,
};
use uuid::Uuid;

use crate::access::{self, Intent};
use crate::auth::Principal;
use crate::db::AppState;
use crate::notify::NotificationEvent;
use crate::repo;

/// Admin or assigned staff may manage hearings; the owning client may not.
fn require_hearing_access(principal: &Principal, case: &Case) -> Result<(), AppError> {
    match principal.role {
        UserRole::Admin | UserRole::Staff => {
            access::require(access::evaluate(principal, case, Intent::Read), case.id)
        }
        _ => {
            tracing::warn!(principal = %principal.id, case_id = %case.id, "hearing access denied");
            Err(AppError::forbidden("Access denied"))
        }
    }
}

/// Schedule a hearing on a case and notify the parties.
pub async fn schedule_hearing(
    state: &AppState,
    principal: &Principal,
    case_id: Uuid,
    req: ScheduleHearingRequest,
) -> Result<Hearing, AppError> {
    let case = repo::case::find_by_id(&state.pool, case_id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    require_hearing_access(principal, &case)?;

    let hearing = repo::hearing::create_for_case(
        &state.pool,
        case_id,
        req.hearing_date,
        &req.remarks,
        principal.id,
    )
    .await?;

    state.dispatcher.notify_detached(
        NotificationEvent::new(
            "hearing_scheduled",
            "hearing_scheduled",
            "Hearing scheduled",
            format!(
                "A hearing for case \"{}\" is scheduled on {}",
                case.title,
                hearing.hearing_date.format("%Y-%m-%d %H:%M UTC")
            ),
        )
        .recipients(
            std::iter::once(case.client_id)
                .chain(case.assigned_staff.iter().copied())
                .filter(|id| *id != principal.id),
        )
        .sender(principal.id)
        .case(case.id)
        .hearing(hearing.id)
        .priority("high")
        .action_url(format!("/cases/{}/hearings", case.id)),
    );

    Ok(hearing)
}

/// List a case's hearings; visible to anyone who can read the case.
pub async fn list_hearings(
    state: &AppState,
    principal: &Principal,
    case_id: Uuid,
) -> Result<Vec<Hearing>, AppError> {
    let case = repo::case::find_by_id(&state.pool, case_id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    access::require(access::evaluate(principal, &case, Intent::Read), case.id)?;

    repo::hearing::list_by_case(&state.pool, case_id).await
}

/// Update a hearing. The client is told when the date or status moved.
pub async fn update_hearing(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    req: UpdateHearingRequest,
) -> Result<Hearing, AppError> {
    let before = repo::hearing::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Hearing not found"))?;

    let case = repo::case::find_by_id(&state.pool, before.case_id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    require_hearing_access(principal, &case)?;

    if let Some(status) = req.status.as_deref() {
        if !is_valid_hearing_status(status) {
            return Err(AppError::bad_request(format!(
                "Invalid status: {}. Valid values: {}",
                status,
                HEARING_STATUSES.join(", ")
            )));
        }
    }

    let hearing = repo::hearing::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Hearing not found"))?;

    if hearing.status != before.status || hearing.hearing_date != before.hearing_date {
        state.dispatcher.notify_detached(
            NotificationEvent::new(
                "hearing_updated",
                "hearing_updated",
                "Hearing updated",
                format!(
                    "A hearing for case \"{}\" is now {} on {}",
                    case.title,
                    hearing.status,
                    hearing.hearing_date.format("%Y-%m-%d %H:%M UTC")
                ),
            )
            .recipients([case.client_id])
            .sender(principal.id)
            .case(case.id)
            .hearing(hearing.id)
            .action_url(format!("/cases/{}/hearings", case.id)),
        );
    }

    Ok(hearing)
}
