use lz_core::contract::{CustomResourceRequest, CustomResourceResponse, RequestType};
use tracing::{error, info};

use crate::adapters::macie::{MacieMembers, MemberRecord};
use crate::error::{ControlPlaneError, HandlerError};
use crate::handlers::{Reconciliation, ReconcileOutcome};

/// Relationship statuses under which a member already participates in the
/// organization-wide configuration.
const ACTIVE_RELATIONSHIP_STATUSES: [&str; 3] = ["Enabled", "Created", "Invited"];

/// Reconcile one Macie member lifecycle event.
///
/// Create/Update enrolls the account under the delegated administrator;
/// Delete removes it. Either direction is a no-op when membership already
/// matches the desired state.
pub async fn handle_macie_member_event(
    request: &CustomResourceRequest,
    members: &dyn MacieMembers,
) -> CustomResourceResponse {
    info!(
        request_type = request.request_type.as_str(),
        logical_resource_id = %request.logical_resource_id,
        "reconcile_started"
    );

    match reconcile(request, members).await {
        Ok(reconciliation) => {
            match reconciliation.outcome {
                ReconcileOutcome::NoOp => info!(
                    physical_resource_id = %reconciliation.physical_resource_id,
                    "no_op"
                ),
                ReconcileOutcome::Mutated => info!(
                    physical_resource_id = %reconciliation.physical_resource_id,
                    "mutated"
                ),
            }
            CustomResourceResponse::success(request, reconciliation.physical_resource_id)
        }
        Err(handler_error) => {
            error!(error = %handler_error, "reconcile_failed");
            CustomResourceResponse::failed(request, handler_error.to_string())
        }
    }
}

async fn reconcile(
    request: &CustomResourceRequest,
    members: &dyn MacieMembers,
) -> Result<Reconciliation, HandlerError> {
    let properties = &request.resource_properties;
    let account_id = properties.required("AccountId")?;

    match request.request_type {
        RequestType::Create | RequestType::Update => {
            let email = properties.required("Email")?;

            if let Some(member) = find_member(members, account_id).await? {
                if is_active(&member) {
                    return Ok(Reconciliation::no_op(account_id));
                }
            }

            match members.create_member(account_id, email).await {
                Ok(()) => Ok(Reconciliation::mutated(account_id)),
                Err(ControlPlaneError::AlreadyExists(_)) => Ok(Reconciliation::no_op(account_id)),
                Err(control_plane_error) => Err(control_plane_error.into()),
            }
        }
        RequestType::Delete => {
            let physical_id = request.echoed_physical_id().to_string();

            if find_member(members, account_id).await?.is_none() {
                return Ok(Reconciliation::no_op(physical_id));
            }

            match members.delete_member(account_id).await {
                Ok(()) => Ok(Reconciliation::mutated(physical_id)),
                // Removed between our list and the delete call; converged.
                Err(ControlPlaneError::NotFound(_)) => Ok(Reconciliation::no_op(physical_id)),
                Err(control_plane_error) => Err(control_plane_error.into()),
            }
        }
    }
}

fn is_active(member: &MemberRecord) -> bool {
    ACTIVE_RELATIONSHIP_STATUSES.contains(&member.relationship_status.as_str())
}

/// Walk the member listing page by page; a match short-circuits the rest.
async fn find_member(
    members: &dyn MacieMembers,
    account_id: &str,
) -> Result<Option<MemberRecord>, HandlerError> {
    let mut page_token = None;
    loop {
        let page = members.list_members(page_token).await?;
        if let Some(member) = page
            .members
            .into_iter()
            .find(|member| member.account_id == account_id)
        {
            return Ok(Some(member));
        }
        match page.next_token {
            Some(token) => page_token = Some(token),
            None => return Ok(None),
        }
    }
}
