#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use lz_lambda::adapters::macie::{MacieMembers, MemberPage, MemberRecord};
use lz_lambda::adapters::organizations::{AttachedPolicyPage, PolicyAttachments};
use lz_lambda::error::ControlPlaneError;

/// Small page size so lifecycle tests exercise pagination.
const PAGE_SIZE: usize = 2;

#[derive(Default)]
struct ControlPlaneState {
    /// (target_id, policy_id) attachment pairs.
    attachments: BTreeSet<(String, String)>,
    /// account_id -> relationship status.
    members: BTreeMap<String, String>,
    attach_calls: usize,
    detach_calls: usize,
    create_member_calls: usize,
    delete_member_calls: usize,
}

/// Stateful stand-in for Organizations and Macie. Mutations behave like the
/// real control plane: attaching twice or deleting an absent member is an
/// error, so idempotence must come from the handlers' list-before-mutate
/// check rather than from the fake being forgiving.
#[derive(Default)]
pub struct InMemoryControlPlane {
    state: Mutex<ControlPlaneState>,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_attachment(&self, target_id: &str, policy_id: &str) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .attachments
            .insert((target_id.to_string(), policy_id.to_string()));
    }

    pub fn seed_member(&self, account_id: &str, relationship_status: &str) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .members
            .insert(account_id.to_string(), relationship_status.to_string());
    }

    pub fn attachment_exists(&self, target_id: &str, policy_id: &str) -> bool {
        self.state
            .lock()
            .expect("poisoned mutex")
            .attachments
            .contains(&(target_id.to_string(), policy_id.to_string()))
    }

    pub fn member_exists(&self, account_id: &str) -> bool {
        self.state
            .lock()
            .expect("poisoned mutex")
            .members
            .contains_key(account_id)
    }

    pub fn attach_calls(&self) -> usize {
        self.state.lock().expect("poisoned mutex").attach_calls
    }

    pub fn detach_calls(&self) -> usize {
        self.state.lock().expect("poisoned mutex").detach_calls
    }

    pub fn create_member_calls(&self) -> usize {
        self.state.lock().expect("poisoned mutex").create_member_calls
    }

    pub fn delete_member_calls(&self) -> usize {
        self.state.lock().expect("poisoned mutex").delete_member_calls
    }
}

fn page_bounds(page_token: Option<&str>, total: usize) -> (usize, usize, Option<String>) {
    let start = page_token
        .map(|token| token.parse::<usize>().expect("numeric page token"))
        .unwrap_or(0);
    let end = (start + PAGE_SIZE).min(total);
    let next_token = (end < total).then(|| end.to_string());
    (start, end, next_token)
}

#[async_trait]
impl PolicyAttachments for InMemoryControlPlane {
    async fn list_attached_policies(
        &self,
        target_id: &str,
        _policy_type: &str,
        page_token: Option<String>,
    ) -> Result<AttachedPolicyPage, ControlPlaneError> {
        let state = self.state.lock().expect("poisoned mutex");
        let attached: Vec<String> = state
            .attachments
            .iter()
            .filter(|(target, _)| target == target_id)
            .map(|(_, policy)| policy.clone())
            .collect();
        let (start, end, next_token) = page_bounds(page_token.as_deref(), attached.len());
        Ok(AttachedPolicyPage {
            policy_ids: attached[start..end].to_vec(),
            next_token,
        })
    }

    async fn attach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.attach_calls += 1;
        if !state
            .attachments
            .insert((target_id.to_string(), policy_id.to_string()))
        {
            return Err(ControlPlaneError::AlreadyExists(format!(
                "{policy_id} already attached to {target_id}"
            )));
        }
        Ok(())
    }

    async fn detach_policy(
        &self,
        policy_id: &str,
        target_id: &str,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.detach_calls += 1;
        if !state
            .attachments
            .remove(&(target_id.to_string(), policy_id.to_string()))
        {
            return Err(ControlPlaneError::NotFound(format!(
                "{policy_id} is not attached to {target_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MacieMembers for InMemoryControlPlane {
    async fn list_members(
        &self,
        page_token: Option<String>,
    ) -> Result<MemberPage, ControlPlaneError> {
        let state = self.state.lock().expect("poisoned mutex");
        let members: Vec<MemberRecord> = state
            .members
            .iter()
            .map(|(account_id, relationship_status)| MemberRecord {
                account_id: account_id.clone(),
                relationship_status: relationship_status.clone(),
            })
            .collect();
        let (start, end, next_token) = page_bounds(page_token.as_deref(), members.len());
        Ok(MemberPage {
            members: members[start..end].to_vec(),
            next_token,
        })
    }

    async fn create_member(&self, account_id: &str, email: &str) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.create_member_calls += 1;
        if email.trim().is_empty() {
            return Err(ControlPlaneError::Api("member email is required".to_string()));
        }
        state
            .members
            .insert(account_id.to_string(), "Created".to_string());
        Ok(())
    }

    async fn delete_member(&self, account_id: &str) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.delete_member_calls += 1;
        if state.members.remove(account_id).is_none() {
            return Err(ControlPlaneError::NotFound(format!(
                "{account_id} is not a member"
            )));
        }
        Ok(())
    }
}
