//! Core types for the drill session contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Blank marker inside a sentence template.
pub const BLANK_MARKER: &str = "__";

/// Daily goal shown before the provider has reported an authoritative one.
pub const DEFAULT_DAILY_GOAL: u32 = 50;

/// Deck a card belongs to (display-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRef {
    pub id: String,
    pub name: String,
}

/// Expected answer for a card's blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTarget {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// One drill unit: a sentence with a blank, its expected answer, and display
/// aids. Immutable for the duration of a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: Uuid,
    /// Sentence with exactly one [`BLANK_MARKER`] where the answer goes.
    pub sentence_template: String,
    pub target: CardTarget,
    /// Phonetic aid shown alongside the correct form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_translation: Option<String>,
    /// Pronunciation audio for the full sentence; presence triggers the
    /// playback branch of the advancement sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_audio_url: Option<String>,
    /// Per-word audio on older card payloads; playback fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub proficiency_level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckRef>,
    /// Fully resolved sentence (display-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_furigana: Option<String>,
}

/// Sentence template split around the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceParts<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl Card {
    /// Split the sentence template around the blank marker.
    ///
    /// A template without the marker is a contract violation by the provider;
    /// the whole template becomes the prefix with an empty suffix.
    pub fn sentence_parts(&self) -> SentenceParts<'_> {
        match self.sentence_template.split_once(BLANK_MARKER) {
            Some((prefix, suffix)) => SentenceParts { prefix, suffix },
            None => SentenceParts {
                prefix: &self.sentence_template,
                suffix: "",
            },
        }
    }

    /// URL to play once the card is answered, if any. Sentence audio wins
    /// over the legacy per-word recording.
    pub fn playback_url(&self) -> Option<&str> {
        self.sentence_audio_url
            .as_deref()
            .or(self.audio_url.as_deref())
    }
}

/// Running daily-goal counter. Replaced wholesale by every provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub completed_today: u32,
    pub goal_today: u32,
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self {
            completed_today: 0,
            goal_today: DEFAULT_DAILY_GOAL,
        }
    }
}

/// Outcome of the previous card, forwarded to the provider with the next
/// fetch. `is_correct` carries the first judgment even when the card was
/// corrected afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousAnswer {
    pub card_id: Uuid,
    pub is_correct: bool,
    pub response_time_ms: u64,
}

/// Provider response. `card: null` signals session completion, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextCardResponse {
    pub card: Option<Card>,
    pub session_progress: SessionProgress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(template: &str) -> Card {
        Card {
            card_id: Uuid::new_v4(),
            sentence_template: template.to_string(),
            target: CardTarget {
                word: "test".to_string(),
                hint: None,
            },
            reading: None,
            sentence_translation: None,
            sentence_audio_url: None,
            audio_url: None,
            proficiency_level: 0,
            deck: None,
            sentence: None,
            sentence_furigana: None,
        }
    }

    #[test]
    fn test_sentence_parts_split() {
        let card = card("This is a __.");
        let parts = card.sentence_parts();
        assert_eq!(parts.prefix, "This is a ");
        assert_eq!(parts.suffix, ".");
    }

    #[test]
    fn test_sentence_parts_without_marker() {
        let card = card("No blank here.");
        let parts = card.sentence_parts();
        assert_eq!(parts.prefix, "No blank here.");
        assert_eq!(parts.suffix, "");
    }

    #[test]
    fn test_playback_url_prefers_sentence_audio() {
        let mut card = card("A __.");
        card.audio_url = Some("word.mp3".to_string());
        assert_eq!(card.playback_url(), Some("word.mp3"));

        card.sentence_audio_url = Some("sentence.mp3".to_string());
        assert_eq!(card.playback_url(), Some("sentence.mp3"));
    }

    #[test]
    fn test_previous_answer_wire_names() {
        let answer = PreviousAnswer {
            card_id: Uuid::nil(),
            is_correct: false,
            response_time_ms: 1200,
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cardId": "00000000-0000-0000-0000-000000000000",
                "isCorrect": false,
                "responseTimeMs": 1200,
            })
        );
    }

    #[test]
    fn test_next_card_response_parses_minimal_card() {
        let json = serde_json::json!({
            "card": {
                "card_id": "00000000-0000-0000-0000-000000000001",
                "sentence_template": "I drink __ every morning.",
                "target": { "word": "coffee", "hint": null },
                "audio_url": null,
                "proficiency_level": 2
            },
            "session_progress": { "completed_today": 3, "goal_today": 50 }
        });
        let response: NextCardResponse = serde_json::from_value(json).unwrap();
        let card = response.card.unwrap();
        assert_eq!(card.target.word, "coffee");
        assert_eq!(card.playback_url(), None);
        assert_eq!(response.session_progress.completed_today, 3);
    }

    #[test]
    fn test_next_card_response_null_card_is_completion() {
        let json = serde_json::json!({
            "card": null,
            "session_progress": { "completed_today": 50, "goal_today": 50 }
        });
        let response: NextCardResponse = serde_json::from_value(json).unwrap();
        assert!(response.card.is_none());
        assert_eq!(response.session_progress.goal_today, 50);
    }
}
