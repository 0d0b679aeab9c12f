//! Per-card interaction state machine.
//!
//! Sans-IO and clock-injected: operations that touch time take `now` so
//! drivers and tests control it. The async driver runs the advancement gate
//! (audio playback or a fixed delay) and feeds every completion signal back
//! through [`CardInteraction::finish_advance`], which resolves the card at
//! most once no matter how many signals arrive.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::matching;
use crate::types::Card;

/// Judgment state of the active card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Unanswered,
    Correct,
    Incorrect,
}

/// Gate the driver must run between a final evaluation and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceGate {
    /// Play pronunciation audio; resolution waits for ended (or failure).
    Audio(String),
    /// No audio on this card; hold the feedback on screen for a fixed delay.
    Delay,
}

/// Final outcome of a card, reported upward exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub card_id: Uuid,
    /// Correctness of the first judgment, even if the card was corrected
    /// before advancing.
    pub is_correct: bool,
    pub response_time_ms: u64,
}

/// Outcome of a submit or retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input or wrong state; nothing changed.
    Ignored,
    /// First judgment matched; run the gate, then finish the advance.
    Correct(AdvanceGate),
    /// First judgment missed; input cleared, the card stays put.
    Incorrect,
    /// A retry matched the expected word; advance, but the original miss is
    /// what gets reported.
    Corrected(AdvanceGate),
    /// A retry missed again; input cleared.
    StillIncorrect,
}

impl Submission {
    /// Gate to run when this submission triggered advancement.
    pub fn gate(&self) -> Option<&AdvanceGate> {
        match self {
            Submission::Correct(gate) | Submission::Corrected(gate) => Some(gate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Answering,
    Advancing { audio: bool },
    Resolved,
}

/// State machine for one presented card.
///
/// Owns the ephemeral answer attempt: the input buffer, the judgment, the
/// frozen start time, and the sticky was-ever-incorrect flag.
#[derive(Debug, Clone)]
pub struct CardInteraction {
    card: Card,
    input: String,
    evaluation: Evaluation,
    was_ever_incorrect: bool,
    started_at: DateTime<Utc>,
    phase: Phase,
}

impl CardInteraction {
    /// Present a card: input cleared, evaluation reset, timer started.
    pub fn new(card: Card, now: DateTime<Utc>) -> Self {
        Self {
            card,
            input: String::new(),
            evaluation: Evaluation::Unanswered,
            was_ever_incorrect: false,
            started_at: now,
            phase: Phase::Answering,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    /// Current input buffer. Cleared after every wrong answer to force
    /// re-entry.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while the advancement gate runs and input is disabled.
    pub fn is_advancing(&self) -> bool {
        matches!(self.phase, Phase::Advancing { .. })
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    pub fn was_ever_incorrect(&self) -> bool {
        self.was_ever_incorrect
    }

    /// Judge the first submission for this card.
    ///
    /// Valid only while unanswered. Blank input is rejected silently: it is
    /// never judged as wrong.
    pub fn submit(&mut self, raw: &str) -> Submission {
        if self.phase != Phase::Answering || self.evaluation != Evaluation::Unanswered {
            return Submission::Ignored;
        }
        if matching::is_blank(raw) {
            return Submission::Ignored;
        }
        if matching::answer_matches(raw, &self.card.target.word) {
            self.input = raw.to_string();
            self.evaluation = Evaluation::Correct;
            Submission::Correct(self.begin_advance())
        } else {
            self.input.clear();
            self.evaluation = Evaluation::Incorrect;
            self.was_ever_incorrect = true;
            Submission::Incorrect
        }
    }

    /// Re-typed attempt after an incorrect judgment.
    ///
    /// A match unlocks advancement and shows as success, but the original
    /// miss is what resolution reports. A mismatch clears the input and
    /// leaves the card where it is.
    pub fn retry_after_incorrect(&mut self, raw: &str) -> Submission {
        if self.phase != Phase::Answering || self.evaluation != Evaluation::Incorrect {
            return Submission::Ignored;
        }
        if matching::is_blank(raw) {
            return Submission::Ignored;
        }
        if matching::answer_matches(raw, &self.card.target.word) {
            self.input = raw.to_string();
            self.evaluation = Evaluation::Correct;
            Submission::Corrected(self.begin_advance())
        } else {
            self.input.clear();
            Submission::StillIncorrect
        }
    }

    fn begin_advance(&mut self) -> AdvanceGate {
        let gate = match self.card.playback_url() {
            Some(url) => AdvanceGate::Audio(url.to_string()),
            None => AdvanceGate::Delay,
        };
        self.phase = Phase::Advancing {
            audio: matches!(gate, AdvanceGate::Audio(_)),
        };
        gate
    }

    /// Whether an explicit "continue" may cut the gate short. Only the timed
    /// delay is skippable; audio playback is not.
    pub fn skip_delay_allowed(&self) -> bool {
        matches!(self.phase, Phase::Advancing { audio: false })
    }

    /// Consume a gate completion signal (audio ended, audio failed, or the
    /// delay timer fired).
    ///
    /// Returns the resolution exactly once per card; any later signal is
    /// ignored. Response time is computed here, at resolution, from the
    /// frozen start time, and is reported as at least 1 ms.
    pub fn finish_advance(&mut self, now: DateTime<Utc>) -> Option<Resolution> {
        if !matches!(self.phase, Phase::Advancing { .. }) {
            return None;
        }
        self.phase = Phase::Resolved;
        let response_time_ms = (now - self.started_at).num_milliseconds().max(1) as u64;
        Some(Resolution {
            card_id: self.card.card_id,
            is_correct: !self.was_ever_incorrect,
            response_time_ms,
        })
    }
}
