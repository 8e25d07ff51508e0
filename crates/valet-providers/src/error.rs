//! Error types for the domain providers.

use valet_core::ValetError;

/// Errors from provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
    #[error("service error: {0}")]
    Unavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

impl From<ProviderError> for ValetError {
    fn from(err: ProviderError) -> Self {
        ValetError::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::NotConfigured("missing weather API key".to_string());
        assert_eq!(
            err.to_string(),
            "provider not configured: missing weather API key"
        );

        let err = ProviderError::Unavailable("city not found".to_string());
        assert_eq!(err.to_string(), "service error: city not found");

        let err = ProviderError::NotFound("event ev-1".to_string());
        assert_eq!(err.to_string(), "not found: event ev-1");
    }

    #[test]
    fn test_into_valet_error() {
        let err: ValetError = ProviderError::Http("timeout".to_string()).into();
        assert!(matches!(err, ValetError::Provider(_)));
        assert!(err.to_string().contains("timeout"));
    }
}
