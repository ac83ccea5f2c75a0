use lz_core::contract::PropertyError;
use thiserror::Error;

/// Service error codes that signal a rate-limit rejection. Only these are
/// eligible for the back-off wrapper; everything else fails the call.
pub const THROTTLING_ERROR_CODES: [&str; 5] = [
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "SlowDown",
];

/// Control-plane API failure, classified by the service error code so
/// handlers can treat already-exists and not-found as converged state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlPlaneError {
    #[error("throttled by control plane ({code})")]
    Throttled { code: String },
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("control plane call failed: {0}")]
    Api(String),
}

impl ControlPlaneError {
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

/// Map a service error code and message onto the reconciliation taxonomy.
pub fn classify_api_error(code: Option<&str>, message: impl Into<String>) -> ControlPlaneError {
    let message = message.into();
    match code {
        Some(code) if THROTTLING_ERROR_CODES.contains(&code) => ControlPlaneError::Throttled {
            code: code.to_string(),
        },
        Some("DuplicatePolicyAttachmentException") => ControlPlaneError::AlreadyExists(message),
        Some("PolicyNotAttachedException") | Some("ResourceNotFoundException") => {
            ControlPlaneError::NotFound(message)
        }
        _ => ControlPlaneError::Api(message),
    }
}

/// Why a single reconciliation failed. Surfaced to the deployment engine as
/// the response `Reason`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),
}
