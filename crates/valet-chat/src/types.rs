//! Core types and value objects for the conversation engine.
//!
//! Defines intents, messages, conversations, extracted entities, and the
//! response envelope.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;
use valet_core::{Timestamp, UserPreferences};
use valet_providers::{CalendarAction, NewsCategory};

// =============================================================================
// Enums
// =============================================================================

/// Intent categories an utterance can classify into.
///
/// Declaration order doubles as the classifier's tie-break priority:
/// when two intents share the top score, the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Weather,
    News,
    Calendar,
    Greeting,
    Goodbye,
    Help,
    Thanks,
    General,
}

impl IntentKind {
    /// Intents with a lexicon entry, in scoring order. `General` is the
    /// fallback and is never scored.
    pub const CLASSIFIABLE: [IntentKind; 7] = [
        IntentKind::Weather,
        IntentKind::News,
        IntentKind::Calendar,
        IntentKind::Greeting,
        IntentKind::Goodbye,
        IntentKind::Help,
        IntentKind::Thanks,
    ];
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Weather => write!(f, "weather"),
            IntentKind::News => write!(f, "news"),
            IntentKind::Calendar => write!(f, "calendar"),
            IntentKind::Greeting => write!(f, "greeting"),
            IntentKind::Goodbye => write!(f, "goodbye"),
            IntentKind::Help => write!(f, "help"),
            IntentKind::Thanks => write!(f, "thanks"),
            IntentKind::General => write!(f, "general"),
        }
    }
}

impl std::str::FromStr for IntentKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weather" => Ok(IntentKind::Weather),
            "news" => Ok(IntentKind::News),
            "calendar" => Ok(IntentKind::Calendar),
            "greeting" => Ok(IntentKind::Greeting),
            "goodbye" => Ok(IntentKind::Goodbye),
            "help" => Ok(IntentKind::Help),
            "thanks" => Ok(IntentKind::Thanks),
            "general" => Ok(IntentKind::General),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Modality tag on a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Voice,
    Image,
}

/// Whether a weather query asks about now or the coming days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeReference {
    #[default]
    Current,
    Forecast,
}

/// Relative date mentioned in a calendar query, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateReference {
    Today,
    Tomorrow,
    NextWeek,
    ThisWeek,
}

impl fmt::Display for DateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateReference::Today => write!(f, "today"),
            DateReference::Tomorrow => write!(f, "tomorrow"),
            DateReference::NextWeek => write!(f, "next_week"),
            DateReference::ThisWeek => write!(f, "this_week"),
        }
    }
}

/// Tag on a chat response, mirroring the intent that produced it (or
/// `Error` when a collaborator failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Weather,
    News,
    Calendar,
    Greeting,
    Goodbye,
    Help,
    Thanks,
    General,
    Error,
}

impl From<IntentKind> for ResponseKind {
    fn from(kind: IntentKind) -> Self {
        match kind {
            IntentKind::Weather => ResponseKind::Weather,
            IntentKind::News => ResponseKind::News,
            IntentKind::Calendar => ResponseKind::Calendar,
            IntentKind::Greeting => ResponseKind::Greeting,
            IntentKind::Goodbye => ResponseKind::Goodbye,
            IntentKind::Help => ResponseKind::Help,
            IntentKind::Thanks => ResponseKind::Thanks,
            IntentKind::General => ResponseKind::General,
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Structured values extracted from an utterance, conditioned on its intent.
///
/// Intents without entity patterns (greeting, goodbye, help, thanks,
/// general) carry `Entities::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Entities {
    Weather {
        location: Option<String>,
        time_reference: TimeReference,
    },
    News {
        category: Option<NewsCategory>,
        search_terms: Option<String>,
    },
    Calendar {
        action: CalendarAction,
        date_reference: Option<DateReference>,
        time: Option<String>,
    },
    None,
}

// =============================================================================
// Domain structs
// =============================================================================

/// Ephemeral classification result for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIntent {
    pub kind: IntentKind,
    /// Confidence in [0, 1].
    pub confidence: f32,
    pub entities: Entities,
    /// Lexicon keywords that matched during scoring.
    pub matched_keywords: Vec<String>,
}

impl UserIntent {
    /// The fallback intent when no lexicon keyword matched.
    pub fn general() -> Self {
        Self {
            kind: IntentKind::General,
            confidence: 0.5,
            entities: Entities::None,
            matched_keywords: vec![],
        }
    }
}

/// One utterance or reply within a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub timestamp: Timestamp,
    pub role: Role,
    pub kind: MessageKind,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            timestamp: Utc::now(),
            role,
            kind,
            metadata: HashMap::new(),
        }
    }

    /// A plain-text user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, MessageKind::Text)
    }

    /// A plain-text assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, MessageKind::Text)
    }
}

/// A conversation session: bounded message history plus a context map.
///
/// Owned exclusively by the `ConversationStore`; mutation happens only
/// through the methods below so the updated-at invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<Message>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub context: HashMap<String, Value>,
    pub preferences: UserPreferences,
}

impl Conversation {
    /// Messages retained per conversation; oldest are trimmed on overflow.
    pub const MAX_MESSAGES: usize = 50;

    pub fn new(preferences: UserPreferences) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            context: HashMap::new(),
            preferences,
        }
    }

    /// Append a message, trimming the oldest beyond the cap.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > Self::MAX_MESSAGES {
            let excess = self.messages.len() - Self::MAX_MESSAGES;
            self.messages.drain(..excess);
        }
        self.updated_at = Utc::now();
    }

    /// Set a context key.
    pub fn set_context(&mut self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), value);
        self.updated_at = Utc::now();
    }

    /// Look up a context key.
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// The most recent `limit` messages in chronological order.
    pub fn recent(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }
}

/// Output envelope for every processed utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub kind: ResponseKind,
    pub confidence: f32,
    /// Human-readable audit strings for what the handler did.
    pub actions_taken: Vec<String>,
    /// Follow-up suggestions to show the user.
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub created_at: Timestamp,
}

impl ChatResponse {
    pub fn new(kind: ResponseKind, message: impl Into<String>, confidence: f32) -> Self {
        Self {
            message: message.into(),
            kind,
            confidence,
            actions_taken: vec![],
            suggestions: vec![],
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions_taken.push(action.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of processing one utterance, as seen from outside the core.
///
/// Always produced, never an error: internal failures degrade to
/// `success: false` with a human-readable `error` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub success: bool,
    pub response: Option<ChatResponse>,
    pub conversation_id: Option<Uuid>,
    pub intent: IntentKind,
    pub confidence: f32,
    pub error: Option<String>,
}

impl ProcessOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            conversation_id: None,
            intent: IntentKind::General,
            confidence: 0.0,
            error: Some(message.into()),
        }
    }
}

/// Conversation metadata exposed at the outward boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub message_count: usize,
    pub context: HashMap<String, Value>,
    pub preferences: UserPreferences,
}
