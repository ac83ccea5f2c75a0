use lz_core::contract::{CustomResourceRequest, CustomResourceResponse, RequestType};
use lz_core::physical_id::{attachment_physical_id, is_protected_policy};
use tracing::{error, info};

use crate::adapters::organizations::PolicyAttachments;
use crate::error::{ControlPlaneError, HandlerError};
use crate::handlers::{Reconciliation, ReconcileOutcome};

/// Reconcile one Organizations policy attachment lifecycle event.
///
/// Create/Update ensures the attachment exists; Delete ensures it does not,
/// except for the protected full-access policy which is never detached.
pub async fn handle_policy_attachment_event(
    request: &CustomResourceRequest,
    attachments: &dyn PolicyAttachments,
) -> CustomResourceResponse {
    info!(
        request_type = request.request_type.as_str(),
        logical_resource_id = %request.logical_resource_id,
        "reconcile_started"
    );

    match reconcile(request, attachments).await {
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
    attachments: &dyn PolicyAttachments,
) -> Result<Reconciliation, HandlerError> {
    let properties = &request.resource_properties;
    let policy_id = properties.required("PolicyId")?;

    match request.request_type {
        RequestType::Create | RequestType::Update => {
            let target_id = properties.required("TargetId")?;
            let policy_type = properties.required("PolicyType")?;
            let physical_id = attachment_physical_id(policy_id, target_id);

            if policy_attached(attachments, policy_id, target_id, policy_type).await? {
                return Ok(Reconciliation::no_op(physical_id));
            }

            match attachments.attach_policy(policy_id, target_id).await {
                Ok(()) => Ok(Reconciliation::mutated(physical_id)),
                // Attached between our list and the attach call; converged.
                Err(ControlPlaneError::AlreadyExists(_)) => Ok(Reconciliation::no_op(physical_id)),
                Err(control_plane_error) => Err(control_plane_error.into()),
            }
        }
        RequestType::Delete => {
            let physical_id = request.echoed_physical_id().to_string();
            if is_protected_policy(policy_id) {
                return Ok(Reconciliation::no_op(physical_id));
            }

            let target_id = properties.required("TargetId")?;
            let policy_type = properties.required("PolicyType")?;
            if !policy_attached(attachments, policy_id, target_id, policy_type).await? {
                return Ok(Reconciliation::no_op(physical_id));
            }

            match attachments.detach_policy(policy_id, target_id).await {
                Ok(()) => Ok(Reconciliation::mutated(physical_id)),
                Err(ControlPlaneError::NotFound(_)) => Ok(Reconciliation::no_op(physical_id)),
                Err(control_plane_error) => Err(control_plane_error.into()),
            }
        }
    }
}

/// Walk the attachment listing page by page. A match short-circuits the
/// remaining pages.
async fn policy_attached(
    attachments: &dyn PolicyAttachments,
    policy_id: &str,
    target_id: &str,
    policy_type: &str,
) -> Result<bool, HandlerError> {
    let mut page_token = None;
    loop {
        let page = attachments
            .list_attached_policies(target_id, policy_type, page_token)
            .await?;
        if page.policy_ids.iter().any(|attached| attached == policy_id) {
            return Ok(true);
        }
        match page.next_token {
            Some(token) => page_token = Some(token),
            None => return Ok(false),
        }
    }
}
