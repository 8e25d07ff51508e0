//! Static per-intent keyword lists.
//!
//! The weather/news/calendar lists come from the providers (each
//! collaborator owns the vocabulary that routes utterances to it); the
//! conversational intents are defined here. Matching is case-insensitive
//! substring containment, so multi-word phrases are valid entries.

use crate::types::IntentKind;

/// Keywords for the greeting intent.
pub static GREETING: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Keywords for the goodbye intent.
pub static GOODBYE: &[&str] = &["bye", "goodbye", "see you", "farewell", "exit", "quit"];

/// Keywords for the help intent.
pub static HELP: &[&str] = &["help", "what can you do", "commands", "assistance", "support"];

/// Keywords for the thanks intent.
pub static THANKS: &[&str] = &["thank you", "thanks", "appreciate", "grateful"];

/// Per-intent keyword lists, iterated in classification priority order.
pub struct Lexicon {
    entries: Vec<(IntentKind, Vec<String>)>,
}

impl Lexicon {
    /// Assemble the lexicon from the provider keyword lists plus the local
    /// conversational lists. Entry order follows `IntentKind::CLASSIFIABLE`,
    /// which is also the tie-break order.
    pub fn new(weather: &[&str], news: &[&str], calendar: &[&str]) -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            entries: vec![
                (IntentKind::Weather, owned(weather)),
                (IntentKind::News, owned(news)),
                (IntentKind::Calendar, owned(calendar)),
                (IntentKind::Greeting, owned(GREETING)),
                (IntentKind::Goodbye, owned(GOODBYE)),
                (IntentKind::Help, owned(HELP)),
                (IntentKind::Thanks, owned(THANKS)),
            ],
        }
    }

    /// Iterate `(intent, keywords)` pairs in priority order.
    pub fn entries(&self) -> impl Iterator<Item = (IntentKind, &[String])> {
        self.entries.iter().map(|(kind, list)| (*kind, list.as_slice()))
    }

    /// The keyword list for one intent; empty for `General`.
    pub fn keywords(&self, kind: IntentKind) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(
            valet_providers::keywords::WEATHER,
            valet_providers::keywords::NEWS,
            valet_providers::keywords::CALENDAR,
        )
    }
}
