use sha2::{Digest, Sha256};

/// Hex SHA-256 of a packaged artifact. Object keys embed this so unchanged
/// handler code maps to a stable key and re-synthesis never re-uploads it.
pub fn artifact_fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
