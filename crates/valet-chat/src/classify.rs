//! Keyword-based intent classification.
//!
//! Scores an utterance against each lexicon list by case-insensitive
//! substring containment. No tokenization or stemming: a keyword may match
//! inside a longer word ("news" inside "newsworthy"), and that behavior is
//! part of the contract.

use crate::lexicon::Lexicon;
use crate::types::{Entities, UserIntent};

/// Classifies utterances against a fixed lexicon.
///
/// Pure and infallible: the worst case is the `general` fallback.
pub struct IntentClassifier {
    lexicon: Lexicon,
}

impl IntentClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Classify an utterance.
    ///
    /// For each intent, `score = matched keywords / total keywords`; the
    /// highest score wins, ties broken by lexicon order (first maximum).
    /// Confidence is `min(score * 2, 1.0)`. No keyword hit at all yields
    /// `general` at 0.5. Entities are not extracted here; see
    /// [`crate::extract`].
    pub fn classify(&self, utterance: &str) -> UserIntent {
        let lower = utterance.to_lowercase();

        let mut best: Option<(UserIntent, f32)> = None;
        for (kind, keywords) in self.lexicon.entries() {
            let matched: Vec<String> = keywords
                .iter()
                .filter(|keyword| lower.contains(keyword.as_str()))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }

            let score = matched.len() as f32 / keywords.len() as f32;
            // Strict comparison keeps the first maximum on ties.
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((
                    UserIntent {
                        kind,
                        confidence: (score * 2.0).min(1.0),
                        entities: Entities::None,
                        matched_keywords: matched,
                    },
                    score,
                ));
            }
        }

        match best {
            Some((intent, _)) => intent,
            None => UserIntent::general(),
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntentKind;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    // ---- Fallback ----

    #[test]
    fn test_empty_utterance_is_general() {
        let intent = classifier().classify("");
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.entities, Entities::None);
        assert!(intent.matched_keywords.is_empty());
    }

    #[test]
    fn test_no_keyword_match_is_general() {
        let intent = classifier().classify("the quick brown fox");
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.5);
    }

    // ---- Domain intents ----

    #[test]
    fn test_weather_intent() {
        let intent = classifier().classify("What's the weather in Paris tomorrow?");
        assert_eq!(intent.kind, IntentKind::Weather);
        assert!(intent.confidence > 0.0);
        assert!(intent.matched_keywords.contains(&"weather".to_string()));
    }

    #[test]
    fn test_news_intent() {
        let intent = classifier().classify("Show me technology news");
        assert_eq!(intent.kind, IntentKind::News);
        assert!(intent.matched_keywords.contains(&"news".to_string()));
    }

    #[test]
    fn test_calendar_intent() {
        let intent = classifier().classify("Schedule a meeting tomorrow");
        assert_eq!(intent.kind, IntentKind::Calendar);
        assert!(intent.matched_keywords.contains(&"schedule".to_string()));
        assert!(intent.matched_keywords.contains(&"meeting".to_string()));
    }

    #[test]
    fn test_weather_beats_calendar_on_date_words() {
        // "tomorrow" is not a calendar keyword, so a weather query with a
        // date word still classifies as weather.
        let intent = classifier().classify("Will it rain today?");
        assert_eq!(intent.kind, IntentKind::Weather);
    }

    // ---- Conversational intents ----

    #[test]
    fn test_greeting_intent() {
        for utterance in ["hello", "Hi there!", "hey", "good morning"] {
            let intent = classifier().classify(utterance);
            assert_eq!(intent.kind, IntentKind::Greeting, "utterance: {}", utterance);
            assert!(intent.confidence > 0.0);
        }
    }

    #[test]
    fn test_goodbye_intent() {
        let intent = classifier().classify("goodbye then");
        assert_eq!(intent.kind, IntentKind::Goodbye);
    }

    #[test]
    fn test_help_intent() {
        let intent = classifier().classify("what can you do?");
        assert_eq!(intent.kind, IntentKind::Help);
    }

    #[test]
    fn test_thanks_intent() {
        let intent = classifier().classify("thanks a lot");
        assert_eq!(intent.kind, IntentKind::Thanks);
    }

    // ---- Scoring mechanics ----

    #[test]
    fn test_case_insensitive_matching() {
        let intent = classifier().classify("WEATHER FORECAST");
        assert_eq!(intent.kind, IntentKind::Weather);
        assert!(intent.matched_keywords.contains(&"forecast".to_string()));
    }

    #[test]
    fn test_substring_overlap_matches() {
        // "news" matches inside "newsworthy": substring containment only.
        let intent = classifier().classify("that was newsworthy");
        assert_eq!(intent.kind, IntentKind::News);
    }

    #[test]
    fn test_confidence_scales_with_hits() {
        let one_hit = classifier().classify("rain");
        let two_hits = classifier().classify("rain and snow");
        assert!(two_hits.confidence > one_hit.confidence);
    }

    #[test]
    fn test_confidence_capped_at_one() {
        // "hello hi hey good morning good afternoon good evening" hits all
        // six greeting keywords: score 1.0, confidence capped at 1.0.
        let intent =
            classifier().classify("hello hi hey good morning good afternoon good evening");
        assert_eq!(intent.kind, IntentKind::Greeting);
        assert_eq!(intent.confidence, 1.0);
    }

    #[test]
    fn test_tie_break_prefers_lexicon_order() {
        // Two custom single-keyword lists tie at score 1.0; weather comes
        // first in lexicon order and must win.
        let classifier = IntentClassifier::new(Lexicon::new(&["xyzzy"], &["xyzzy"], &["plugh"]));
        let intent = classifier.classify("xyzzy");
        assert_eq!(intent.kind, IntentKind::Weather);
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for utterance in ["🌧️🌧️🌧️", "   ", "\n\t", "é è ü ß"] {
            let _ = classifier().classify(utterance);
        }
    }
}
