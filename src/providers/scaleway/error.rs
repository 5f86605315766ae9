use thiserror::Error;

/// Errors raised while talking to the Scaleway API.
///
/// SECURITY: Error messages must NEVER contain the secret key.
#[derive(Debug, Error)]
pub enum ScalewayError {
    /// Missing, invalid or revoked secret key
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("failed to decode {resource_type}: {message}")]
    Decode {
        resource_type: String,
        message: String,
    },
}

impl ScalewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScalewayError::Api { status: 404, .. })
    }
}

impl From<ScalewayError> for crate::providers::ProviderError {
    fn from(err: ScalewayError) -> Self {
        match err {
            ScalewayError::Auth { message } => crate::providers::ProviderError::Auth(message),
            other => crate::providers::ProviderError::Scaleway(other.to_string()),
        }
    }
}
