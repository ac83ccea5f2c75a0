use lambda_runtime::{service_fn, Error, LambdaEvent};
use lz_core::contract::{CustomResourceRequest, CustomResourceResponse};
use lz_lambda::adapters::macie::MacieMemberAdministration;
use lz_lambda::delivery::deliver_response;
use lz_lambda::handlers::macie_member::handle_macie_member_event;

async fn handle_request(
    event: LambdaEvent<CustomResourceRequest>,
) -> Result<CustomResourceResponse, Error> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let members = MacieMemberAdministration::new(aws_sdk_macie2::Client::new(&config));

    let request = event.payload;
    let response = handle_macie_member_event(&request, &members).await;
    deliver_response(&reqwest::Client::new(), &request, &response).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lz_lambda::telemetry::init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
