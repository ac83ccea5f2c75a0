use lz_core::contract::{stable_contract_json, CustomResourceRequest, CustomResourceResponse};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to send response to deployment engine: {0}")]
    Send(String),
    #[error("deployment engine rejected response: status {0}")]
    Rejected(u16),
}

/// PUT the response to the event's pre-signed callback URL when one is
/// present. Provider-framework events carry no URL; the caller returns the
/// response value to the invoker instead and this is a no-op.
pub async fn deliver_response(
    http: &reqwest::Client,
    request: &CustomResourceRequest,
    response: &CustomResourceResponse,
) -> Result<(), DeliveryError> {
    let Some(url) = request.response_url.as_deref() else {
        return Ok(());
    };

    // The pre-signed URL is signed with an empty content type.
    let delivery = http
        .put(url)
        .header("content-type", "")
        .body(stable_contract_json(response))
        .send()
        .await
        .map_err(|error| DeliveryError::Send(error.to_string()))?;

    if !delivery.status().is_success() {
        return Err(DeliveryError::Rejected(delivery.status().as_u16()));
    }

    info!(
        logical_resource_id = %request.logical_resource_id,
        "response delivered to callback url"
    );
    Ok(())
}
