//! In-memory calendar provider.
//!
//! Stands in for an external calendar service: events live in a
//! mutex-guarded list for the lifetime of the process. Listings are
//! returned sorted by start time and capped at the configured maximum.

use async_trait::async_trait;
use std::sync::Mutex;
use valet_core::config::CalendarConfig;

use crate::error::ProviderError;
use crate::types::{CalendarAction, CalendarEvent, CalendarInfo};
use crate::CalendarProvider;

/// Calendar provider holding events in process memory.
pub struct LocalCalendarProvider {
    events: Mutex<Vec<CalendarEvent>>,
    max_results: usize,
}

impl LocalCalendarProvider {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            max_results: config.max_results,
        }
    }

    /// Construct with a pre-seeded event list.
    pub fn with_events(config: CalendarConfig, events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            max_results: config.max_results,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<CalendarEvent>>, ProviderError> {
        self.events
            .lock()
            .map_err(|e| ProviderError::Unavailable(format!("calendar lock poisoned: {}", e)))
    }
}

#[async_trait]
impl CalendarProvider for LocalCalendarProvider {
    async fn list_events(&self) -> Result<CalendarInfo, ProviderError> {
        let events = self.lock()?;
        let mut listed: Vec<CalendarEvent> = events.clone();
        listed.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        listed.truncate(self.max_results);
        Ok(CalendarInfo {
            events: listed,
            action: CalendarAction::List,
        })
    }

    async fn create_event(&self, event: CalendarEvent) -> Result<CalendarInfo, ProviderError> {
        let mut events = self.lock()?;
        events.push(event.clone());
        Ok(CalendarInfo {
            events: vec![event],
            action: CalendarAction::Create,
        })
    }

    async fn delete_event(&self, event_id: &str) -> Result<CalendarInfo, ProviderError> {
        let mut events = self.lock()?;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(ProviderError::NotFound(format!("event {}", event_id)));
        }
        Ok(CalendarInfo {
            events: vec![],
            action: CalendarAction::Delete,
        })
    }
}
