use async_trait::async_trait;
use aws_sdk_organizations::error::ProvideErrorMetadata;
use aws_sdk_organizations::types::PolicyType;
use lz_core::backoff::BackoffPolicy;

use crate::adapters::retry::call_with_backoff;
use crate::error::{classify_api_error, ControlPlaneError};

/// One page of policy ids attached to a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachedPolicyPage {
    pub policy_ids: Vec<String>,
    pub next_token: Option<String>,
}

/// Organizations policy attachment operations a handler reconciles against.
#[async_trait]
pub trait PolicyAttachments: Send + Sync {
    async fn list_attached_policies(
        &self,
        target_id: &str,
        policy_type: &str,
        page_token: Option<String>,
    ) -> Result<AttachedPolicyPage, ControlPlaneError>;

    async fn attach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError>;

    async fn detach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError>;
}

/// AWS SDK adapter. Every call passes through the throttling back-off
/// wrapper before its error is classified for the handler.
pub struct OrganizationsPolicyAttachments {
    client: aws_sdk_organizations::Client,
    backoff: BackoffPolicy,
}

impl OrganizationsPolicyAttachments {
    pub fn new(client: aws_sdk_organizations::Client) -> Self {
        Self::with_backoff(client, BackoffPolicy::default())
    }

    pub fn with_backoff(client: aws_sdk_organizations::Client, backoff: BackoffPolicy) -> Self {
        Self { client, backoff }
    }
}

#[async_trait]
impl PolicyAttachments for OrganizationsPolicyAttachments {
    async fn list_attached_policies(
        &self,
        target_id: &str,
        policy_type: &str,
        page_token: Option<String>,
    ) -> Result<AttachedPolicyPage, ControlPlaneError> {
        let filter = PolicyType::from(policy_type);
        let output = call_with_backoff(&self.backoff, "list_policies_for_target", || {
            let request = self
                .client
                .list_policies_for_target()
                .target_id(target_id)
                .filter(filter.clone())
                .set_next_token(page_token.clone());
            async move { request.send().await.map_err(classify_sdk_error) }
        })
        .await?;

        Ok(AttachedPolicyPage {
            policy_ids: output
                .policies()
                .iter()
                .filter_map(|summary| summary.id().map(str::to_string))
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn attach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError> {
        call_with_backoff(&self.backoff, "attach_policy", || {
            let request = self
                .client
                .attach_policy()
                .policy_id(policy_id)
                .target_id(target_id);
            async move { request.send().await.map(|_| ()).map_err(classify_sdk_error) }
        })
        .await
    }

    async fn detach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError> {
        call_with_backoff(&self.backoff, "detach_policy", || {
            let request = self
                .client
                .detach_policy()
                .policy_id(policy_id)
                .target_id(target_id);
            async move { request.send().await.map(|_| ()).map_err(classify_sdk_error) }
        })
        .await
    }
}

fn classify_sdk_error<E: ProvideErrorMetadata>(error: E) -> ControlPlaneError {
    let message = error
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| "control plane request failed".to_string());
    classify_api_error(error.code(), message)
}
