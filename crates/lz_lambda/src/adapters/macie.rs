use async_trait::async_trait;
use aws_sdk_macie2::error::ProvideErrorMetadata;
use aws_sdk_macie2::types::AccountDetail;
use lz_core::backoff::BackoffPolicy;

use crate::adapters::retry::call_with_backoff;
use crate::error::{classify_api_error, ControlPlaneError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub account_id: String,
    pub relationship_status: String,
}

/// One page of members under the delegated administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPage {
    pub members: Vec<MemberRecord>,
    pub next_token: Option<String>,
}

/// Macie membership operations a handler reconciles against.
#[async_trait]
pub trait MacieMembers: Send + Sync {
    async fn list_members(
        &self,
        page_token: Option<String>,
    ) -> Result<MemberPage, ControlPlaneError>;

    async fn create_member(&self, account_id: &str, email: &str)
        -> Result<(), ControlPlaneError>;

    async fn delete_member(&self, account_id: &str) -> Result<(), ControlPlaneError>;
}

/// AWS SDK adapter with the shared throttling back-off wrapper.
pub struct MacieMemberAdministration {
    client: aws_sdk_macie2::Client,
    backoff: BackoffPolicy,
}

impl MacieMemberAdministration {
    pub fn new(client: aws_sdk_macie2::Client) -> Self {
        Self::with_backoff(client, BackoffPolicy::default())
    }

    pub fn with_backoff(client: aws_sdk_macie2::Client, backoff: BackoffPolicy) -> Self {
        Self { client, backoff }
    }
}

#[async_trait]
impl MacieMembers for MacieMemberAdministration {
    async fn list_members(
        &self,
        page_token: Option<String>,
    ) -> Result<MemberPage, ControlPlaneError> {
        let output = call_with_backoff(&self.backoff, "list_members", || {
            let request = self.client.list_members().set_next_token(page_token.clone());
            async move { request.send().await.map_err(classify_sdk_error) }
        })
        .await?;

        Ok(MemberPage {
            members: output
                .members()
                .iter()
                .filter_map(|member| {
                    member.account_id().map(|account_id| MemberRecord {
                        account_id: account_id.to_string(),
                        relationship_status: member
                            .relationship_status()
                            .map(|status| status.as_str().to_string())
                            .unwrap_or_default(),
                    })
                })
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn create_member(
        &self,
        account_id: &str,
        email: &str,
    ) -> Result<(), ControlPlaneError> {
        let account = AccountDetail::builder()
            .account_id(account_id)
            .email(email)
            .build();

        call_with_backoff(&self.backoff, "create_member", || {
            let request = self.client.create_member().account(account.clone());
            async move { request.send().await.map(|_| ()).map_err(classify_sdk_error) }
        })
        .await
    }

    async fn delete_member(&self, account_id: &str) -> Result<(), ControlPlaneError> {
        call_with_backoff(&self.backoff, "delete_member", || {
            let request = self.client.delete_member().id(account_id);
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
