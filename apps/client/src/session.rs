//! Session lifecycle: provider negotiation, progress tracking, and the
//! Loading → Answering → (Loading | Completed | Error) cycle.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use drill_core::interaction::{Evaluation, Resolution, Submission};
use drill_core::types::{Card, NextCardResponse, PreviousAnswer, SessionProgress};

use crate::audio::AudioPlayer;
use crate::card::{CardInteractionController, DEFAULT_ADVANCE_DELAY};
use crate::provider::CardProvider;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hold on feedback before advancing a card with no audio.
    pub advance_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

/// Where the session stands, shaped for direct rendering by a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SessionPhase {
    /// A provider round-trip is in flight.
    Loading,
    /// A card is active and accepting input.
    Answering,
    /// The provider has no more cards for now.
    Completed,
    /// The last provider call failed; `retry` re-issues it.
    Error { error: String },
}

/// Owns the card sequence: requests cards from the provider, forwards each
/// resolution as the next fetch's previous-answer context, and tracks
/// daily-goal progress.
pub struct SessionController {
    provider: Box<dyn CardProvider>,
    cards: CardInteractionController,
    phase: SessionPhase,
    progress: SessionProgress,
    /// Single-slot buffer backing `retry`: the answer travelling with the
    /// next fetch. Overwritten only by a new resolution, cleared only once a
    /// response arrives.
    pending_answer: Option<PreviousAnswer>,
}

impl SessionController {
    pub fn new(
        provider: Box<dyn CardProvider>,
        audio: Arc<dyn AudioPlayer>,
        config: SessionConfig,
    ) -> Self {
        Self {
            provider,
            cards: CardInteractionController::new(audio, config.advance_delay),
            phase: SessionPhase::Loading,
            progress: SessionProgress::default(),
            pending_answer: None,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn progress(&self) -> SessionProgress {
        self.progress
    }

    /// The active card, while answering.
    pub fn card(&self) -> Option<&Card> {
        self.cards.card()
    }

    pub fn evaluation(&self) -> Option<Evaluation> {
        self.cards.evaluation()
    }

    pub fn is_advancing(&self) -> bool {
        self.cards.is_advancing()
    }

    /// Begin the session: fetch the first card with no previous answer.
    pub async fn start(&mut self) {
        self.fetch().await;
    }

    /// Route a typed submission to the active card. Only meaningful while
    /// answering; judgment is immediate so the shell can paint feedback, and
    /// a triggered advancement gate starts in the background.
    pub fn submit(&mut self, raw: &str) -> Submission {
        if self.phase != SessionPhase::Answering {
            return Submission::Ignored;
        }
        self.cards.submit(raw)
    }

    /// Await the active card's gate, then report its resolution and fetch
    /// the next card. Call after a submission that triggered advancement.
    pub async fn advance(&mut self) {
        if let Some(resolution) = self.cards.resolution().await {
            self.on_card_resolved(resolution).await;
        }
    }

    /// Explicit "continue": cut the delay gate short when permitted and move
    /// on immediately.
    pub async fn request_advance(&mut self) {
        if let Some(resolution) = self.cards.request_advance() {
            self.on_card_resolved(resolution).await;
        }
    }

    /// Accept a card's final outcome and negotiate the next card.
    ///
    /// Ignored unless a session card is currently answering and the
    /// resolution refers to it; a stale resolution for a superseded card
    /// must not consume the session.
    pub async fn on_card_resolved(&mut self, resolution: Resolution) {
        if self.phase != SessionPhase::Answering {
            tracing::debug!("resolution arrived outside an active card; ignored");
            return;
        }
        if self.cards.active_card_id() != Some(resolution.card_id) {
            tracing::debug!(card_id = %resolution.card_id, "stale resolution ignored");
            return;
        }

        if resolution.is_correct {
            // Optimistic bump; the provider's count wins on the next response.
            self.progress.completed_today = self.progress.completed_today.saturating_add(1);
        }
        self.pending_answer = Some(PreviousAnswer {
            card_id: resolution.card_id,
            is_correct: resolution.is_correct,
            response_time_ms: resolution.response_time_ms,
        });
        self.fetch().await;
    }

    /// Re-issue the last provider call, previous answer included. Valid only
    /// in the error phase.
    pub async fn retry(&mut self) {
        if !matches!(self.phase, SessionPhase::Error { .. }) {
            return;
        }
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        self.phase = SessionPhase::Loading;
        match self.provider.next_card(self.pending_answer.as_ref()).await {
            Ok(NextCardResponse {
                card,
                session_progress,
            }) => {
                self.pending_answer = None;
                self.progress = session_progress;
                match card {
                    Some(card) => {
                        tracing::info!(card_id = %card.card_id, "presenting next card");
                        self.cards.present(card);
                        self.phase = SessionPhase::Answering;
                    }
                    None => {
                        tracing::info!(
                            completed = self.progress.completed_today,
                            "session completed"
                        );
                        self.cards.clear();
                        self.phase = SessionPhase::Completed;
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch next card");
                self.phase = SessionPhase::Error {
                    error: error.to_string(),
                };
            }
        }
    }
}
