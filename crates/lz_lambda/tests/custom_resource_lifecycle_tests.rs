mod support;

use lz_core::contract::{
    CustomResourceRequest, RequestType, ResourceProperties, ResponseStatus,
};
use lz_lambda::handlers::macie_member::handle_macie_member_event;
use lz_lambda::handlers::policy_attachment::handle_policy_attachment_event;
use support::InMemoryControlPlane;

fn attachment_properties(policy_id: &str) -> ResourceProperties {
    [
        ("PolicyId".to_string(), policy_id.to_string()),
        ("TargetId".to_string(), "ou-5678".to_string()),
        (
            "PolicyType".to_string(),
            "SERVICE_CONTROL_POLICY".to_string(),
        ),
    ]
    .into_iter()
    .collect()
}

fn attachment_event(
    request_type: RequestType,
    policy_id: &str,
    physical_resource_id: Option<&str>,
) -> CustomResourceRequest {
    CustomResourceRequest {
        request_type,
        request_id: "req-1".to_string(),
        stack_id: "arn:aws:cloudformation:eu-west-1:111122223333:stack/lz/guid".to_string(),
        logical_resource_id: "ScpAttachment".to_string(),
        resource_type: "Custom::OrganizationsPolicyAttachment".to_string(),
        response_url: None,
        physical_resource_id: physical_resource_id.map(str::to_string),
        resource_properties: attachment_properties(policy_id),
        old_resource_properties: None,
    }
}

fn member_event(
    request_type: RequestType,
    account_id: &str,
    physical_resource_id: Option<&str>,
) -> CustomResourceRequest {
    CustomResourceRequest {
        request_type,
        request_id: "req-2".to_string(),
        stack_id: "arn:aws:cloudformation:eu-west-1:111122223333:stack/lz/guid".to_string(),
        logical_resource_id: "MacieMember".to_string(),
        resource_type: "Custom::MacieMember".to_string(),
        response_url: None,
        physical_resource_id: physical_resource_id.map(str::to_string),
        resource_properties: [
            ("AccountId".to_string(), account_id.to_string()),
            ("Email".to_string(), "security@example.org".to_string()),
        ]
        .into_iter()
        .collect(),
        old_resource_properties: None,
    }
}

#[tokio::test]
async fn attachment_lifecycle_converges_through_create_recreate_delete() {
    let control_plane = InMemoryControlPlane::new();

    let create = handle_policy_attachment_event(
        &attachment_event(RequestType::Create, "p-1234", None),
        &control_plane,
    )
    .await;
    assert_eq!(create.status, ResponseStatus::Success);
    assert_eq!(create.physical_resource_id, "p-1234_ou-5678");
    assert!(control_plane.attachment_exists("ou-5678", "p-1234"));
    assert_eq!(control_plane.attach_calls(), 1);

    // Re-invocation with identical input converges without a second attach.
    let recreate = handle_policy_attachment_event(
        &attachment_event(RequestType::Create, "p-1234", None),
        &control_plane,
    )
    .await;
    assert_eq!(recreate.status, ResponseStatus::Success);
    assert_eq!(recreate.physical_resource_id, "p-1234_ou-5678");
    assert_eq!(control_plane.attach_calls(), 1);

    let delete = handle_policy_attachment_event(
        &attachment_event(RequestType::Delete, "p-1234", Some("p-1234_ou-5678")),
        &control_plane,
    )
    .await;
    assert_eq!(delete.status, ResponseStatus::Success);
    assert_eq!(delete.physical_resource_id, "p-1234_ou-5678");
    assert!(!control_plane.attachment_exists("ou-5678", "p-1234"));
    assert_eq!(control_plane.detach_calls(), 1);

    // Deleting again finds nothing and issues no further detach.
    let redelete = handle_policy_attachment_event(
        &attachment_event(RequestType::Delete, "p-1234", Some("p-1234_ou-5678")),
        &control_plane,
    )
    .await;
    assert_eq!(redelete.status, ResponseStatus::Success);
    assert_eq!(control_plane.detach_calls(), 1);
}

#[tokio::test]
async fn attachment_reconciliation_walks_multiple_listing_pages() {
    let control_plane = InMemoryControlPlane::new();
    // Five pre-existing attachments at page size two put the desired policy
    // past the first page boundary.
    for other in ["p-aaaa", "p-bbbb", "p-cccc", "p-dddd", "p-eeee"] {
        control_plane.seed_attachment("ou-5678", other);
    }
    control_plane.seed_attachment("ou-5678", "p-zzzz");

    let response = handle_policy_attachment_event(
        &attachment_event(RequestType::Create, "p-zzzz", None),
        &control_plane,
    )
    .await;

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(control_plane.attach_calls(), 0);
}

#[tokio::test]
async fn protected_policy_survives_stack_deletion() {
    let control_plane = InMemoryControlPlane::new();
    control_plane.seed_attachment("ou-5678", "p-FullAWSAccess");

    let response = handle_policy_attachment_event(
        &attachment_event(
            RequestType::Delete,
            "p-FullAWSAccess",
            Some("p-FullAWSAccess_ou-5678"),
        ),
        &control_plane,
    )
    .await;

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.physical_resource_id, "p-FullAWSAccess_ou-5678");
    assert!(control_plane.attachment_exists("ou-5678", "p-FullAWSAccess"));
    assert_eq!(control_plane.detach_calls(), 0);
}

#[tokio::test]
async fn member_lifecycle_converges_through_create_recreate_delete() {
    let control_plane = InMemoryControlPlane::new();

    let create = handle_macie_member_event(
        &member_event(RequestType::Create, "222233334444", None),
        &control_plane,
    )
    .await;
    assert_eq!(create.status, ResponseStatus::Success);
    assert_eq!(create.physical_resource_id, "222233334444");
    assert!(control_plane.member_exists("222233334444"));
    assert_eq!(control_plane.create_member_calls(), 1);

    let recreate = handle_macie_member_event(
        &member_event(RequestType::Create, "222233334444", None),
        &control_plane,
    )
    .await;
    assert_eq!(recreate.status, ResponseStatus::Success);
    assert_eq!(control_plane.create_member_calls(), 1);

    let delete = handle_macie_member_event(
        &member_event(RequestType::Delete, "222233334444", Some("222233334444")),
        &control_plane,
    )
    .await;
    assert_eq!(delete.status, ResponseStatus::Success);
    assert!(!control_plane.member_exists("222233334444"));
    assert_eq!(control_plane.delete_member_calls(), 1);

    let redelete = handle_macie_member_event(
        &member_event(RequestType::Delete, "222233334444", Some("222233334444")),
        &control_plane,
    )
    .await;
    assert_eq!(redelete.status, ResponseStatus::Success);
    assert_eq!(control_plane.delete_member_calls(), 1);
}

#[tokio::test]
async fn lapsed_member_is_re_enrolled_on_update() {
    let control_plane = InMemoryControlPlane::new();
    control_plane.seed_member("222233334444", "Removed");

    let response = handle_macie_member_event(
        &member_event(RequestType::Update, "222233334444", Some("222233334444")),
        &control_plane,
    )
    .await;

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(control_plane.create_member_calls(), 1);
    assert!(control_plane.member_exists("222233334444"));
}

#[tokio::test]
async fn engine_event_json_drives_a_full_reconciliation() {
    let control_plane = InMemoryControlPlane::new();
    let event: CustomResourceRequest = serde_json::from_value(serde_json::json!({
        "RequestType": "Create",
        "RequestId": "req-9",
        "StackId": "arn:aws:cloudformation:eu-west-1:111122223333:stack/lz/guid",
        "LogicalResourceId": "ScpAttachment",
        "ResourceType": "Custom::OrganizationsPolicyAttachment",
        "ResourceProperties": {
            "ServiceToken": "arn:aws:lambda:eu-west-1:111122223333:function:handler",
            "ForceUpdateToken": "7f2c6a1e-59d1-4f51-a2b5-3c1f6f6a7b01",
            "PolicyId": "p-1234",
            "TargetId": "ou-5678",
            "PolicyType": "SERVICE_CONTROL_POLICY"
        }
    }))
    .expect("engine event should deserialize");

    let response = handle_policy_attachment_event(&event, &control_plane).await;

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.physical_resource_id, "p-1234_ou-5678");
    assert_eq!(response.request_id, "req-9");
    assert!(control_plane.attachment_exists("ou-5678", "p-1234"));
}
