//! Error types for model access.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a model provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials not found (e.g. the API key variable is unset).
    #[error("credentials not found: {0}")]
    CredentialsNotFound(String),

    /// Provider API error (non-success status or unusable body).
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// Request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::CredentialsNotFound("OPENAI_API_KEY".to_string());
        assert_eq!(err.to_string(), "credentials not found: OPENAI_API_KEY");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
