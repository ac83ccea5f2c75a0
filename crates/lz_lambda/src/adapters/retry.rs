use std::future::Future;

use lz_core::backoff::BackoffPolicy;
use tracing::debug;

use crate::error::ControlPlaneError;

/// Issue a control-plane call, retrying on rate-limit rejections per the
/// back-off schedule. Any other failure returns immediately.
pub async fn call_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, ControlPlaneError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ControlPlaneError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_throttling() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay_for_attempt(attempt);
                debug!(
                    operation = operation_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "throttled, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
