use aws_sdk_s3::primitives::ByteStream;
use lz_core::fingerprint::artifact_fingerprint;
use tracing::info;

use crate::error::SynthError;

/// Object key for a packaged handler zip. The key embeds the content
/// fingerprint, so unchanged code maps to a stable key and the function's
/// code location only diffs when the handler actually changed.
pub fn handler_asset_key(handler_name: &str, zip_bytes: &[u8]) -> String {
    format!(
        "assets/{handler_name}/{}.zip",
        artifact_fingerprint(zip_bytes)
    )
}

/// Uploads packaged handler zips to the asset bucket.
pub struct AssetUploader {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl AssetUploader {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Upload a handler zip under its fingerprinted key, skipping the write
    /// when an object with that key already exists.
    pub async fn upload(
        &self,
        handler_name: &str,
        zip_bytes: Vec<u8>,
    ) -> Result<String, SynthError> {
        let key = handler_asset_key(handler_name, &zip_bytes);

        if self.object_exists(&key).await? {
            info!(handler = handler_name, key = %key, "asset unchanged, skipping upload");
            return Ok(key);
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(zip_bytes))
            .send()
            .await
            .map_err(|error| SynthError::Upload {
                key: key.clone(),
                message: error.to_string(),
            })?;

        info!(handler = handler_name, key = %key, "asset uploaded");
        Ok(key)
    }

    async fn object_exists(&self, key: &str) -> Result<bool, SynthError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(sdk_error) => {
                let service_error = sdk_error.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(SynthError::Upload {
                        key: key.to_string(),
                        message: service_error.to_string(),
                    })
                }
            }
        }
    }
}
