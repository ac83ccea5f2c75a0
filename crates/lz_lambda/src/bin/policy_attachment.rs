use lambda_runtime::{service_fn, Error, LambdaEvent};
use lz_core::contract::{CustomResourceRequest, CustomResourceResponse};
use lz_lambda::adapters::organizations::OrganizationsPolicyAttachments;
use lz_lambda::delivery::deliver_response;
use lz_lambda::handlers::policy_attachment::handle_policy_attachment_event;

async fn handle_request(
    event: LambdaEvent<CustomResourceRequest>,
) -> Result<CustomResourceResponse, Error> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let attachments =
        OrganizationsPolicyAttachments::new(aws_sdk_organizations::Client::new(&config));

    let request = event.payload;
    let response = handle_policy_attachment_event(&request, &attachments).await;
    deliver_response(&reqwest::Client::new(), &request, &response).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lz_lambda::telemetry::init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
