use lz_core::contract::{
    FORCE_UPDATE_TOKEN_PROPERTY, MACIE_MEMBER_RESOURCE_TYPE, POLICY_ATTACHMENT_RESOURCE_TYPE,
    SERVICE_TOKEN_PROPERTY,
};
use serde_json::json;
use uuid::Uuid;

use crate::iam::{lambda_execution_role, PolicyStatement};
use crate::template::{get_att, Resource, Template};

pub const HANDLER_ROLE_ID: &str = "HandlerRole";
pub const HANDLER_FUNCTION_ID: &str = "HandlerFunction";

/// Where a packaged handler zip lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub bucket: String,
    pub key: String,
}

/// Desired Organizations policy attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAttachmentSpec {
    pub policy_id: String,
    pub target_id: String,
    pub policy_type: String,
}

/// Desired Macie member enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacieMemberSpec {
    pub account_id: String,
    pub email: String,
}

/// A fresh token per synthesis. Its presence in the properties guarantees a
/// diff, so the engine re-invokes the handler on every update.
fn fresh_update_token() -> String {
    Uuid::new_v4().to_string()
}

fn handler_function(asset: &AssetLocation) -> Resource {
    Resource::new(
        "AWS::Lambda::Function",
        json!({
            "Runtime": "provided.al2023",
            "Handler": "bootstrap",
            "MemorySize": 128,
            "Timeout": 300,
            "Role": get_att(HANDLER_ROLE_ID, "Arn"),
            "Code": {
                "S3Bucket": asset.bucket,
                "S3Key": asset.key,
            },
        }),
    )
    .depends_on(HANDLER_ROLE_ID)
}

/// Stack registering the policy attachment handler and its custom resource.
pub fn policy_attachment_stack(asset: &AssetLocation, spec: &PolicyAttachmentSpec) -> Template {
    let mut template = Template::new("Organizations policy attachment custom resource");
    template.add_resource(
        HANDLER_ROLE_ID,
        lambda_execution_role(&[
            PolicyStatement::allow(&["organizations:ListPoliciesForTarget"], &["*"]),
            PolicyStatement::allow(
                &["organizations:AttachPolicy", "organizations:DetachPolicy"],
                &["*"],
            ),
        ]),
    );
    template.add_resource(HANDLER_FUNCTION_ID, handler_function(asset));
    template.add_resource(
        "PolicyAttachment",
        Resource::new(
            POLICY_ATTACHMENT_RESOURCE_TYPE,
            json!({
                SERVICE_TOKEN_PROPERTY: get_att(HANDLER_FUNCTION_ID, "Arn"),
                "PolicyId": spec.policy_id,
                "TargetId": spec.target_id,
                "PolicyType": spec.policy_type,
                FORCE_UPDATE_TOKEN_PROPERTY: fresh_update_token(),
            }),
        )
        .depends_on(HANDLER_FUNCTION_ID),
    );
    template
}

/// Stack registering the Macie member handler and its custom resource.
pub fn macie_member_stack(asset: &AssetLocation, spec: &MacieMemberSpec) -> Template {
    let mut template = Template::new("Macie member custom resource");
    template.add_resource(
        HANDLER_ROLE_ID,
        lambda_execution_role(&[
            PolicyStatement::allow(&["macie2:ListMembers"], &["*"]),
            PolicyStatement::allow(&["macie2:CreateMember", "macie2:DeleteMember"], &["*"]),
        ]),
    );
    template.add_resource(HANDLER_FUNCTION_ID, handler_function(asset));
    template.add_resource(
        "MacieMember",
        Resource::new(
            MACIE_MEMBER_RESOURCE_TYPE,
            json!({
                SERVICE_TOKEN_PROPERTY: get_att(HANDLER_FUNCTION_ID, "Arn"),
                "AccountId": spec.account_id,
                "Email": spec.email,
                FORCE_UPDATE_TOKEN_PROPERTY: fresh_update_token(),
            }),
        )
        .depends_on(HANDLER_FUNCTION_ID),
    );
    template
}
