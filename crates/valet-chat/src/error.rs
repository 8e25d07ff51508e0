//! Error types for the conversation engine.

use uuid::Uuid;
use valet_core::ValetError;
use valet_providers::ProviderError;

/// Errors from the conversation engine.
///
/// Provider failures inside a handler never surface as this type; they are
/// folded into an error-kind `ChatResponse`. `ChatError` covers the paths
/// outside the handler boundary (store access, internal invariants).
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("conversation not found: {0}")]
    UnknownConversation(Uuid),
    #[error("store error: {0}")]
    Store(String),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ChatError> for ValetError {
    fn from(err: ChatError) -> Self {
        ValetError::Chat(err.to_string())
    }
}
