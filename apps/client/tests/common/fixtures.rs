//! Card and response builders shared across integration tests.

use uuid::Uuid;

use drill_core::types::{Card, CardTarget, NextCardResponse, SessionProgress};

/// Card with no audio: advancement runs on the fixed delay.
pub fn card(word: &str) -> Card {
    Card {
        card_id: Uuid::new_v4(),
        sentence_template: format!("Please fill in __ here ({word})."),
        target: CardTarget {
            word: word.to_string(),
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

/// Card whose advancement gates on sentence audio.
pub fn audio_card(word: &str, url: &str) -> Card {
    let mut card = card(word);
    card.sentence_audio_url = Some(url.to_string());
    card
}

pub fn response(card: Option<Card>, completed: u32) -> NextCardResponse {
    NextCardResponse {
        card,
        session_progress: SessionProgress {
            completed_today: completed,
            goal_today: 50,
        },
    }
}
