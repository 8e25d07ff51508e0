//! Conversation engine for the Valet assistant.
//!
//! Classifies free-text utterances into intents, extracts structured
//! entities, maintains bounded per-session conversation state, and
//! dispatches to the weather/news/calendar providers, folding every
//! result into a uniform response envelope.

pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod store;
pub mod types;

pub use classify::IntentClassifier;
pub use dispatcher::Dispatcher;
pub use error::ChatError;
pub use extract::extract;
pub use lexicon::Lexicon;
pub use store::ConversationStore;
pub use types::{
    ChatResponse, Conversation, ConversationSummary, DateReference, Entities, IntentKind,
    Message, MessageKind, ProcessOutcome, ResponseKind, Role, TimeReference, UserIntent,
};
