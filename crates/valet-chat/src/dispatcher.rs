//! Conversation dispatcher: central coordinator wiring classifier,
//! extractor, store, and the domain providers.
//!
//! `process` runs the full pipeline for one utterance: resolve the
//! conversation, append the user message, classify, extract, route to
//! exactly one handler, append the reply, update context. No error
//! escapes: provider failures become error-kind responses, anything else
//! degrades to a failure outcome with a stable message.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Local, Timelike, Utc};
use serde_json::json;
use uuid::Uuid;
use valet_core::config::ChatConfig;
use valet_core::UserPreferences;
use valet_providers::{CalendarAction, CalendarProvider, NewsProvider, WeatherProvider};

use crate::classify::IntentClassifier;
use crate::error::ChatError;
use crate::extract::extract;
use crate::lexicon::Lexicon;
use crate::store::ConversationStore;
use crate::types::{
    ChatResponse, Conversation, ConversationSummary, Entities, IntentKind, Message,
    ProcessOutcome, ResponseKind, TimeReference, UserIntent,
};

/// Context key recording the most recent intent.
const CTX_LAST_INTENT: &str = "last_intent";
/// Context key recording when the conversation was last touched.
const CTX_LAST_MESSAGE_TIME: &str = "last_message_time";

/// Stable message for failures outside the handler boundary.
const PROCESS_FAILURE: &str = "Failed to process message";

static FAREWELLS: &[&str] = &[
    "Goodbye! Have a great day!",
    "See you later! Feel free to ask me anything anytime.",
    "Farewell! I'm always here when you need assistance.",
];

static THANKS_REPLIES: &[&str] = &[
    "You're welcome! Happy to help!",
    "My pleasure! Is there anything else you need?",
    "Glad I could help! Feel free to ask me anything else.",
];

static GENERAL_REPLIES: &[&str] = &[
    "I understand you're trying to communicate with me, but I'm not sure exactly what you need. Could you be more specific?",
    "I'm here to help with weather, news, and calendar information. What would you like to know?",
    "I didn't quite understand that. You can ask me about the weather, latest news, or your calendar events.",
];

const HELP_MESSAGE: &str = "🤖 **Valet Help**

I can help you with:

🌤️ **Weather**:
   • \"What's the weather in New York?\"
   • \"Will it rain today?\"
   • \"Weather forecast for this week\"

📰 **News**:
   • \"Show me the latest news\"
   • \"Technology news\"
   • \"News about climate change\"

📅 **Calendar**:
   • \"What's on my calendar today?\"
   • \"Show upcoming events\"
   • \"Schedule a meeting\" (basic support)

Just ask me naturally - I understand conversational language!";

/// Coordinates intent detection, entity extraction, conversation state,
/// and handler dispatch.
pub struct Dispatcher {
    store: ConversationStore,
    classifier: IntentClassifier,
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    calendar: Arc<dyn CalendarProvider>,
    /// Round-robin cursor for the fixed reply lists. Deterministic so
    /// tests are reproducible; wording has no functional effect.
    rotation: AtomicUsize,
}

impl Dispatcher {
    /// Build a dispatcher. The lexicon is assembled from the providers'
    /// own intent keyword lists.
    pub fn new(
        config: &ChatConfig,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
        calendar: Arc<dyn CalendarProvider>,
    ) -> Self {
        let lexicon = Lexicon::new(
            weather.intent_keywords(),
            news.intent_keywords(),
            calendar.intent_keywords(),
        );
        Self {
            store: ConversationStore::new(config),
            classifier: IntentClassifier::new(lexicon),
            weather,
            news,
            calendar,
            rotation: AtomicUsize::new(0),
        }
    }

    /// Process one utterance end to end.
    ///
    /// Always returns an outcome: internal failures are logged and
    /// reported as `success: false` with a generic error string, never
    /// raised.
    pub async fn process(
        &self,
        utterance: &str,
        conversation_id: Option<Uuid>,
        preferences: Option<UserPreferences>,
    ) -> ProcessOutcome {
        match self.run(utterance, conversation_id, preferences).await {
            Ok((id, intent, response)) => ProcessOutcome {
                success: true,
                response: Some(response),
                conversation_id: Some(id),
                intent: intent.kind,
                confidence: intent.confidence,
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "Error processing message");
                ProcessOutcome::failure(format!("{}: {}", PROCESS_FAILURE, e))
            }
        }
    }

    async fn run(
        &self,
        utterance: &str,
        conversation_id: Option<Uuid>,
        preferences: Option<UserPreferences>,
    ) -> Result<(Uuid, UserIntent, ChatResponse), ChatError> {
        let id = self.store.get_or_create(conversation_id, preferences)?;

        self.store.append(&id, Message::user(utterance))?;
        let conversation = self
            .store
            .get(&id)
            .ok_or(ChatError::UnknownConversation(id))?;

        let mut intent = self.classifier.classify(utterance);
        intent.entities = extract(utterance, intent.kind, &conversation);
        tracing::debug!(
            intent = %intent.kind,
            confidence = intent.confidence,
            "Classified utterance"
        );

        let response = self.handle(&intent, &conversation).await;

        self.store
            .append(&id, Message::assistant(response.message.clone()))?;
        self.store
            .set_context(&id, CTX_LAST_INTENT, json!(intent.kind.to_string()))?;
        self.store.set_context(
            &id,
            CTX_LAST_MESSAGE_TIME,
            json!(Utc::now().to_rfc3339()),
        )?;

        Ok((id, intent, response))
    }

    /// Route to exactly one handler by intent. Provider failures are
    /// contained here and become error-kind responses.
    async fn handle(&self, intent: &UserIntent, conversation: &Conversation) -> ChatResponse {
        match intent.kind {
            IntentKind::Weather => self.handle_weather(intent, conversation).await,
            IntentKind::News => self.handle_news(intent).await,
            IntentKind::Calendar => self.handle_calendar(intent).await,
            IntentKind::Greeting => self.handle_greeting(intent),
            IntentKind::Goodbye => self.handle_goodbye(intent),
            IntentKind::Help => self.handle_help(intent),
            IntentKind::Thanks => self.handle_thanks(intent),
            IntentKind::General => self.handle_general(),
        }
    }

    // -- Provider-backed handlers --

    async fn handle_weather(
        &self,
        intent: &UserIntent,
        conversation: &Conversation,
    ) -> ChatResponse {
        let (location, time_reference) = match &intent.entities {
            Entities::Weather {
                location,
                time_reference,
            } => (location.clone(), *time_reference),
            _ => (None, TimeReference::Current),
        };
        let location = location
            .or_else(|| conversation.preferences.location.clone())
            .unwrap_or_else(|| "current location".to_string());

        let result = match time_reference {
            TimeReference::Forecast => self.weather.forecast(&location).await,
            TimeReference::Current => self.weather.current_weather(&location).await,
        };

        match result {
            Ok(info) => ChatResponse::new(
                ResponseKind::Weather,
                self.weather.format(&info),
                intent.confidence,
            )
            .with_action(format!("Retrieved weather for {}", location)),
            Err(e) => {
                tracing::warn!(error = %e, location = %location, "Weather lookup failed");
                ChatResponse::new(
                    ResponseKind::Error,
                    format!("Sorry, I couldn't get weather information. {}", e),
                    intent.confidence,
                )
            }
        }
    }

    async fn handle_news(&self, intent: &UserIntent) -> ChatResponse {
        let (category, search_terms) = match &intent.entities {
            Entities::News {
                category,
                search_terms,
            } => (*category, search_terms.clone()),
            _ => (None, None),
        };

        let (result, action) = match &search_terms {
            Some(terms) => (
                self.news.search(terms).await,
                format!("Searched news for '{}'", terms),
            ),
            None => (
                self.news.headlines(category).await,
                format!(
                    "Retrieved {} news",
                    category.map(|c| c.to_string()).unwrap_or_else(|| "general".to_string())
                ),
            ),
        };

        match result {
            Ok(info) => ChatResponse::new(
                ResponseKind::News,
                self.news.format(&info),
                intent.confidence,
            )
            .with_action(action),
            Err(e) => {
                tracing::warn!(error = %e, "News lookup failed");
                ChatResponse::new(
                    ResponseKind::Error,
                    format!("Sorry, I couldn't get news information. {}", e),
                    intent.confidence,
                )
            }
        }
    }

    async fn handle_calendar(&self, intent: &UserIntent) -> ChatResponse {
        let action = match &intent.entities {
            Entities::Calendar { action, .. } => *action,
            _ => CalendarAction::List,
        };

        // Event creation needs structured parsing the core does not do;
        // answer with guidance instead of calling the provider.
        if action == CalendarAction::Create {
            return ChatResponse::new(
                ResponseKind::Calendar,
                "I can help you view your calendar events. To create events, please use \
                 specific commands like 'Schedule a meeting tomorrow at 2 PM'.",
                intent.confidence,
            )
            .with_suggestions(["What's on my calendar today?", "Show upcoming events"]);
        }

        match self.calendar.list_events().await {
            Ok(info) => ChatResponse::new(
                ResponseKind::Calendar,
                self.calendar.format(&info),
                intent.confidence,
            )
            .with_action("Retrieved calendar events"),
            Err(e) => {
                tracing::warn!(error = %e, "Calendar lookup failed");
                ChatResponse::new(
                    ResponseKind::Error,
                    format!("Sorry, I couldn't access your calendar. {}", e),
                    intent.confidence,
                )
            }
        }
    }

    // -- Local handlers --

    fn handle_greeting(&self, intent: &UserIntent) -> ChatResponse {
        let hour = Local::now().hour();
        let greeting = if hour < 12 {
            "Good morning! How can I assist you today?"
        } else if hour < 17 {
            "Good afternoon! What can I help you with?"
        } else {
            "Good evening! How may I be of service?"
        };

        ChatResponse::new(ResponseKind::Greeting, greeting, intent.confidence).with_suggestions([
            "What's the weather like?",
            "Show me the latest news",
            "What's on my calendar today?",
            "What can you do?",
        ])
    }

    fn handle_goodbye(&self, intent: &UserIntent) -> ChatResponse {
        ChatResponse::new(ResponseKind::Goodbye, self.pick(FAREWELLS), intent.confidence)
    }

    fn handle_help(&self, intent: &UserIntent) -> ChatResponse {
        ChatResponse::new(ResponseKind::Help, HELP_MESSAGE, intent.confidence).with_suggestions([
            "Weather in London",
            "Latest tech news",
            "My calendar today",
        ])
    }

    fn handle_thanks(&self, intent: &UserIntent) -> ChatResponse {
        ChatResponse::new(
            ResponseKind::Thanks,
            self.pick(THANKS_REPLIES),
            intent.confidence,
        )
        .with_suggestions([
            "What else can you do?",
            "Show me the weather",
            "Latest news please",
        ])
    }

    fn handle_general(&self) -> ChatResponse {
        ChatResponse::new(ResponseKind::General, self.pick(GENERAL_REPLIES), 0.3)
            .with_suggestions([
                "Help - show me what you can do",
                "What's the weather like?",
                "Show me today's news",
                "What's on my calendar?",
            ])
    }

    /// Round-robin selection from a fixed candidate list.
    fn pick(&self, options: &'static [&'static str]) -> &'static str {
        let index = self.rotation.fetch_add(1, Ordering::Relaxed);
        options[index % options.len()]
    }

    // -- Outward boundary --

    /// The most recent `limit` messages of a conversation, oldest first.
    pub fn history(&self, conversation_id: &Uuid, limit: usize) -> Vec<Message> {
        self.store.history(conversation_id, limit)
    }

    /// Conversation metadata, if the id is known.
    pub fn conversation_info(&self, conversation_id: &Uuid) -> Option<ConversationSummary> {
        self.store.summary(conversation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valet_providers::{MockCalendarProvider, MockNewsProvider, MockWeatherProvider};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            &ChatConfig::default(),
            Arc::new(MockWeatherProvider::succeeding()),
            Arc::new(MockNewsProvider::succeeding()),
            Arc::new(MockCalendarProvider::succeeding()),
        )
    }

    // ---- Greeting ----

    #[tokio::test]
    async fn test_process_hello_creates_conversation() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("Hello", None, None).await;

        assert!(outcome.success);
        assert!(outcome.conversation_id.is_some());
        assert_eq!(outcome.intent, IntentKind::Greeting);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Greeting);
        assert_eq!(response.suggestions.len(), 4);
    }

    #[tokio::test]
    async fn test_greeting_varies_by_local_hour() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("Hello", None, None).await;
        let message = outcome.response.unwrap().message;

        let hour = Local::now().hour();
        let expected = if hour < 12 {
            "Good morning"
        } else if hour < 17 {
            "Good afternoon"
        } else {
            "Good evening"
        };
        assert!(message.starts_with(expected), "got: {}", message);
    }

    // ---- Message invariant ----

    #[tokio::test]
    async fn test_each_utterance_appends_user_then_assistant() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("Hello", None, None).await;
        let id = outcome.conversation_id.unwrap();

        let history = dispatcher.history(&id, 20);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, crate::types::Role::User);
        assert_eq!(history[0].content, "Hello");
        assert_eq!(history[1].role, crate::types::Role::Assistant);
        assert_eq!(history[1].content, outcome.response.unwrap().message);
    }

    #[tokio::test]
    async fn test_context_updated_after_process() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("Hello", None, None).await;
        let id = outcome.conversation_id.unwrap();

        let info = dispatcher.conversation_info(&id).unwrap();
        assert_eq!(
            info.context.get(CTX_LAST_INTENT),
            Some(&json!("greeting"))
        );
        assert!(info.context.contains_key(CTX_LAST_MESSAGE_TIME));
    }

    #[tokio::test]
    async fn test_same_conversation_reused() {
        let dispatcher = dispatcher();
        let first = dispatcher.process("Hello", None, None).await;
        let id = first.conversation_id.unwrap();
        let second = dispatcher.process("thanks", Some(id), None).await;
        assert_eq!(second.conversation_id, Some(id));

        let history = dispatcher.history(&id, 20);
        assert_eq!(history.len(), 4);
    }

    // ---- Weather ----

    #[tokio::test]
    async fn test_weather_success() {
        let dispatcher = dispatcher();
        let outcome = dispatcher
            .process("What's the weather in Paris tomorrow?", None, None)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.intent, IntentKind::Weather);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Weather);
        assert!(response.message.contains("Weather in Paris"));
        assert_eq!(
            response.actions_taken,
            vec!["Retrieved weather for Paris".to_string()]
        );
    }

    #[tokio::test]
    async fn test_weather_failure_becomes_error_response() {
        let weather = Arc::new(MockWeatherProvider::failing("city not found"));
        let dispatcher = Dispatcher::new(
            &ChatConfig::default(),
            weather.clone(),
            Arc::new(MockNewsProvider::succeeding()),
            Arc::new(MockCalendarProvider::succeeding()),
        );

        let outcome = dispatcher.process("weather in Nowhereland", None, None).await;
        // The envelope still reports success; the failure is in the
        // response kind and text.
        assert!(outcome.success);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Error);
        assert!(response.message.contains("couldn't get weather information"));
        assert!(response.message.contains("city not found"));
        assert_eq!(response.confidence, outcome.confidence);
        assert_eq!(weather.calls(), 1);
    }

    #[tokio::test]
    async fn test_weather_uses_preference_location() {
        let dispatcher = dispatcher();
        let prefs = UserPreferences {
            location: Some("Berlin".to_string()),
            ..UserPreferences::default()
        };
        let outcome = dispatcher
            .process("how cold is it?", None, Some(prefs))
            .await;
        let response = outcome.response.unwrap();
        assert_eq!(
            response.actions_taken,
            vec!["Retrieved weather for Berlin".to_string()]
        );
    }

    // ---- News ----

    #[tokio::test]
    async fn test_news_headlines_with_category() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("Show me technology news", None, None).await;

        assert_eq!(outcome.intent, IntentKind::News);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::News);
        assert_eq!(
            response.actions_taken,
            vec!["Retrieved technology news".to_string()]
        );
    }

    #[tokio::test]
    async fn test_news_search_terms() {
        let dispatcher = dispatcher();
        let outcome = dispatcher
            .process("news about climate change", None, None)
            .await;
        let response = outcome.response.unwrap();
        // The lazy capture stops at the first word boundary.
        assert_eq!(
            response.actions_taken,
            vec!["Searched news for 'climate'".to_string()]
        );
    }

    #[tokio::test]
    async fn test_news_failure_becomes_error_response() {
        let dispatcher = Dispatcher::new(
            &ChatConfig::default(),
            Arc::new(MockWeatherProvider::succeeding()),
            Arc::new(MockNewsProvider::failing("rate limited")),
            Arc::new(MockCalendarProvider::succeeding()),
        );
        let outcome = dispatcher.process("latest headlines", None, None).await;
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Error);
        assert!(response.message.contains("couldn't get news information"));
        assert!(response.message.contains("rate limited"));
    }

    // ---- Calendar ----

    #[tokio::test]
    async fn test_calendar_list() {
        let dispatcher = dispatcher();
        let outcome = dispatcher
            .process("What's on my calendar?", None, None)
            .await;

        assert_eq!(outcome.intent, IntentKind::Calendar);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Calendar);
        assert_eq!(
            response.actions_taken,
            vec!["Retrieved calendar events".to_string()]
        );
    }

    #[tokio::test]
    async fn test_calendar_create_returns_guidance_without_provider_call() {
        // A failing provider proves the guidance path never reaches it.
        let calendar = Arc::new(MockCalendarProvider::failing("must not be called"));
        let dispatcher = Dispatcher::new(
            &ChatConfig::default(),
            Arc::new(MockWeatherProvider::succeeding()),
            Arc::new(MockNewsProvider::succeeding()),
            calendar.clone(),
        );

        let outcome = dispatcher
            .process("Schedule a meeting tomorrow", None, None)
            .await;
        assert_eq!(outcome.intent, IntentKind::Calendar);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Calendar);
        assert!(response.message.contains("To create events"));
        assert_eq!(calendar.calls(), 0);
    }

    #[tokio::test]
    async fn test_calendar_failure_becomes_error_response() {
        let dispatcher = Dispatcher::new(
            &ChatConfig::default(),
            Arc::new(MockWeatherProvider::succeeding()),
            Arc::new(MockNewsProvider::succeeding()),
            Arc::new(MockCalendarProvider::failing("token expired")),
        );
        let outcome = dispatcher
            .process("show my upcoming events", None, None)
            .await;
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Error);
        assert!(response.message.contains("couldn't access your calendar"));
        assert!(response.message.contains("token expired"));
    }

    // ---- Conversational handlers ----

    #[tokio::test]
    async fn test_goodbye_rotates_deterministically() {
        let dispatcher = dispatcher();
        let mut messages = Vec::new();
        for _ in 0..3 {
            let outcome = dispatcher.process("goodbye", None, None).await;
            messages.push(outcome.response.unwrap().message);
        }
        assert_eq!(messages[0], FAREWELLS[0]);
        assert_eq!(messages[1], FAREWELLS[1]);
        assert_eq!(messages[2], FAREWELLS[2]);
    }

    #[tokio::test]
    async fn test_help_is_static_usage_message() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("what can you do?", None, None).await;
        assert_eq!(outcome.intent, IntentKind::Help);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Help);
        assert!(response.message.contains("**Weather**"));
        assert!(response.message.contains("**News**"));
        assert!(response.message.contains("**Calendar**"));
        assert_eq!(response.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_thanks_response() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("thank you", None, None).await;
        assert_eq!(outcome.intent, IntentKind::Thanks);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::Thanks);
        assert!(THANKS_REPLIES.contains(&response.message.as_str()));
    }

    #[tokio::test]
    async fn test_general_fallback() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.process("fhqwhgads", None, None).await;
        assert!(outcome.success);
        assert_eq!(outcome.intent, IntentKind::General);
        assert_eq!(outcome.confidence, 0.5);
        let response = outcome.response.unwrap();
        assert_eq!(response.kind, ResponseKind::General);
        // The general handler reports lower confidence than the intent.
        assert_eq!(response.confidence, 0.3);
        assert!(GENERAL_REPLIES.contains(&response.message.as_str()));
    }

    // ---- Outward boundary ----

    #[tokio::test]
    async fn test_history_unknown_conversation_is_empty() {
        let dispatcher = dispatcher();
        assert!(dispatcher.history(&Uuid::new_v4(), 10).is_empty());
    }

    #[tokio::test]
    async fn test_conversation_info_unknown_is_none() {
        let dispatcher = dispatcher();
        assert!(dispatcher.conversation_info(&Uuid::new_v4()).is_none());
    }
}
