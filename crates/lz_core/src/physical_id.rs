/// The organization-default full-access policy. Detaching it would cut the
/// target off from every service, so delete reconciliations skip it.
pub const FULL_ACCESS_POLICY_ID: &str = "p-FullAWSAccess";

/// Physical resource id for a policy-to-target attachment.
pub fn attachment_physical_id(policy_id: &str, target_id: &str) -> String {
    format!("{policy_id}_{target_id}")
}

pub fn is_protected_policy(policy_id: &str) -> bool {
    policy_id == FULL_ACCESS_POLICY_ID
}
