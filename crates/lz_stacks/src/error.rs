use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("failed to write synthesized output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize template: {0}")]
    Template(#[from] serde_json::Error),
    #[error("failed to upload asset '{key}': {message}")]
    Upload { key: String, message: String },
}
