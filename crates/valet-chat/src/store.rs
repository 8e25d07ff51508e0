//! In-memory registry of conversation sessions.
//!
//! The store is the exclusive owner of all `Conversation` values. Callers
//! address conversations by id and receive clones; mutation goes through
//! the store so per-conversation updates stay atomic. The lock is never
//! held across an await point.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use uuid::Uuid;
use valet_core::config::ChatConfig;
use valet_core::UserPreferences;

use crate::error::ChatError;
use crate::types::{Conversation, ConversationSummary, Message};

/// Bounded in-memory conversation registry with least-recently-updated
/// eviction.
pub struct ConversationStore {
    inner: Mutex<HashMap<Uuid, Conversation>>,
    max_conversations: usize,
}

impl ConversationStore {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            max_conversations: config.max_conversations,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Conversation>>, ChatError> {
        self.inner
            .lock()
            .map_err(|e| ChatError::Store(format!("conversation lock poisoned: {}", e)))
    }

    /// Return the id of an existing conversation, or create a new one with
    /// the given preferences.
    ///
    /// Creating may evict: if the store then holds more than its capacity,
    /// the least-recently-updated conversations are destroyed until it is
    /// back at capacity.
    pub fn get_or_create(
        &self,
        id: Option<Uuid>,
        preferences: Option<UserPreferences>,
    ) -> Result<Uuid, ChatError> {
        let mut conversations = self.lock()?;

        if let Some(id) = id {
            if conversations.contains_key(&id) {
                return Ok(id);
            }
        }

        let conversation = Conversation::new(preferences.unwrap_or_default());
        let new_id = conversation.id;
        conversations.insert(new_id, conversation);

        if conversations.len() > self.max_conversations {
            let mut by_age: Vec<(Uuid, chrono::DateTime<chrono::Utc>)> = conversations
                .values()
                .map(|c| (c.id, c.updated_at))
                .collect();
            by_age.sort_by_key(|(_, updated_at)| *updated_at);
            let excess = conversations.len() - self.max_conversations;
            for (old_id, _) in by_age.into_iter().take(excess) {
                conversations.remove(&old_id);
                tracing::debug!(conversation_id = %old_id, "Evicted least-recently-updated conversation");
            }
        }

        Ok(new_id)
    }

    /// A snapshot of a conversation, if known.
    pub fn get(&self, id: &Uuid) -> Option<Conversation> {
        self.inner.lock().ok().and_then(|c| c.get(id).cloned())
    }

    /// The most recent `limit` messages in chronological order; empty if
    /// the conversation is unknown.
    pub fn history(&self, id: &Uuid, limit: usize) -> Vec<Message> {
        self.inner
            .lock()
            .ok()
            .and_then(|c| c.get(id).map(|conv| conv.recent(limit).to_vec()))
            .unwrap_or_default()
    }

    /// Append a message to a conversation.
    pub fn append(&self, id: &Uuid, message: Message) -> Result<(), ChatError> {
        let mut conversations = self.lock()?;
        let conversation = conversations
            .get_mut(id)
            .ok_or(ChatError::UnknownConversation(*id))?;
        conversation.add_message(message);
        Ok(())
    }

    /// Set a context key on a conversation.
    pub fn set_context(&self, id: &Uuid, key: &str, value: Value) -> Result<(), ChatError> {
        let mut conversations = self.lock()?;
        let conversation = conversations
            .get_mut(id)
            .ok_or(ChatError::UnknownConversation(*id))?;
        conversation.set_context(key, value);
        Ok(())
    }

    /// Metadata snapshot for the outward boundary.
    pub fn summary(&self, id: &Uuid) -> Option<ConversationSummary> {
        self.get(id).map(|c| ConversationSummary {
            id: c.id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            message_count: c.messages.len(),
            context: c.context,
            preferences: c.preferences,
        })
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
