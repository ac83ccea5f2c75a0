//! Consolidated runtime serving every custom resource type from a single
//! function, dispatching on the event's `ResourceType`.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use lz_core::contract::{
    CustomResourceRequest, CustomResourceResponse, MACIE_MEMBER_RESOURCE_TYPE,
    POLICY_ATTACHMENT_RESOURCE_TYPE,
};
use lz_lambda::adapters::macie::{MacieMemberAdministration, MacieMembers};
use lz_lambda::adapters::organizations::{OrganizationsPolicyAttachments, PolicyAttachments};
use lz_lambda::delivery::deliver_response;
use lz_lambda::handlers::macie_member::handle_macie_member_event;
use lz_lambda::handlers::policy_attachment::handle_policy_attachment_event;

async fn dispatch(
    request: &CustomResourceRequest,
    attachments: &dyn PolicyAttachments,
    members: &dyn MacieMembers,
) -> CustomResourceResponse {
    match request.resource_type.as_str() {
        POLICY_ATTACHMENT_RESOURCE_TYPE => {
            handle_policy_attachment_event(request, attachments).await
        }
        MACIE_MEMBER_RESOURCE_TYPE => handle_macie_member_event(request, members).await,
        other => CustomResourceResponse::failed(
            request,
            format!("unsupported resource type '{other}'"),
        ),
    }
}

async fn handle_request(
    event: LambdaEvent<CustomResourceRequest>,
) -> Result<CustomResourceResponse, Error> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let attachments =
        OrganizationsPolicyAttachments::new(aws_sdk_organizations::Client::new(&config));
    let members = MacieMemberAdministration::new(aws_sdk_macie2::Client::new(&config));

    let request = event.payload;
    let response = dispatch(&request, &attachments, &members).await;
    deliver_response(&reqwest::Client::new(), &request, &response).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lz_lambda::telemetry::init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
