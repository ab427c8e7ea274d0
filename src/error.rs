//! Error types for the SonarCloud provider.

use thiserror::Error;

/// Errors that can occur while running provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An operation was dispatched before the provider was configured.
    #[error("Provider not configured")]
    NotConfigured,

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A lookup returned no matching entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A configuration value failed schema validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation is not supported for this resource type.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A provider configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The SonarCloud API rejected a request.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// An HTTP transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Build an API error from a response status and extracted message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// True when the error represents a missing entity, either as an explicit
    /// [`ProviderError::NotFound`] or as an HTTP 404 from the API.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotConfigured;
        assert_eq!(format!("{}", err), "Provider not configured");

        let err = ProviderError::UnknownResource("sonarcloud_widget".to_string());
        assert_eq!(
            format!("{}", err),
            "Unknown resource type: sonarcloud_widget"
        );

        let err = ProviderError::api(400, "Value is too long");
        assert_eq!(
            format!("{}", err),
            "API error (status 400): Value is too long"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::NotFound("gate 7".to_string()).is_not_found());
        assert!(ProviderError::api(404, "no such project").is_not_found());
        assert!(!ProviderError::api(500, "boom").is_not_found());
        assert!(!ProviderError::NotConfigured.is_not_found());
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: ProviderError = json_err.into();
        assert!(matches!(err, ProviderError::Serialization(_)));
    }
}
