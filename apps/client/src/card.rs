//! Async driver for the per-card interaction state machine.
//!
//! Judgment itself is synchronous so a shell can paint feedback immediately;
//! the advancement gate (audio playback or the fixed delay) runs as a spawned
//! task whose completion is consumed through [`CardInteractionController::resolution`].
//! Every gate carries the generation of the card that spawned it; a completion
//! whose generation no longer matches the active card is discarded, so late
//! timers and audio callbacks from a superseded card are no-ops.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use drill_core::interaction::{AdvanceGate, CardInteraction, Evaluation, Resolution, Submission};
use drill_core::types::Card;
use uuid::Uuid;

use crate::audio::AudioPlayer;

/// Hold on feedback before advancing a card that has no audio to play.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(600);

struct GateHandle {
    generation: u64,
    done: oneshot::Receiver<u64>,
    task: JoinHandle<()>,
}

/// Owns the active card's interaction, the injected audio player, and the
/// generation token that invalidates stale gate completions.
pub struct CardInteractionController {
    audio: Arc<dyn AudioPlayer>,
    advance_delay: Duration,
    active: Option<CardInteraction>,
    generation: u64,
    gate: Option<GateHandle>,
}

impl CardInteractionController {
    pub fn new(audio: Arc<dyn AudioPlayer>, advance_delay: Duration) -> Self {
        Self {
            audio,
            advance_delay,
            active: None,
            generation: 0,
            gate: None,
        }
    }

    /// Make `card` the active card: input cleared, timer started, any
    /// in-flight audio or pending gate from the previous card cancelled.
    pub fn present(&mut self, card: Card) {
        self.invalidate();
        self.active = Some(CardInteraction::new(card, Utc::now()));
    }

    /// Drop the active card (session completed or torn down), cancelling
    /// whatever was still in flight.
    pub fn clear(&mut self) {
        self.invalidate();
        self.active = None;
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.audio.stop();
        if let Some(gate) = self.gate.take() {
            gate.task.abort();
        }
    }

    pub fn card(&self) -> Option<&Card> {
        self.active.as_ref().map(CardInteraction::card)
    }

    pub fn active_card_id(&self) -> Option<Uuid> {
        self.card().map(|card| card.card_id)
    }

    pub fn evaluation(&self) -> Option<Evaluation> {
        self.active.as_ref().map(CardInteraction::evaluation)
    }

    /// True while the gate runs and input is disabled.
    pub fn is_advancing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(CardInteraction::is_advancing)
    }

    pub fn input(&self) -> &str {
        self.active.as_ref().map_or("", CardInteraction::input)
    }

    /// Route a typed submission to the active card: first judgment while
    /// unanswered, correction attempt while incorrect. When the outcome
    /// triggers advancement the gate starts immediately.
    pub fn submit(&mut self, raw: &str) -> Submission {
        let Some(interaction) = self.active.as_mut() else {
            return Submission::Ignored;
        };
        let outcome = match interaction.evaluation() {
            Evaluation::Unanswered => interaction.submit(raw),
            Evaluation::Incorrect => interaction.retry_after_incorrect(raw),
            Evaluation::Correct => Submission::Ignored,
        };
        if let Some(gate) = outcome.gate() {
            self.spawn_gate(gate.clone());
        }
        outcome
    }

    fn spawn_gate(&mut self, gate: AdvanceGate) {
        let (tx, rx) = oneshot::channel();
        let generation = self.generation;
        let audio = Arc::clone(&self.audio);
        let delay = self.advance_delay;
        let task = tokio::spawn(async move {
            match gate {
                AdvanceGate::Audio(url) => {
                    // A failed play counts as completed playback.
                    if let Err(error) = audio.play(&url).await {
                        tracing::debug!(%error, "audio playback failed; advancing");
                    }
                }
                AdvanceGate::Delay => tokio::time::sleep(delay).await,
            }
            let _ = tx.send(generation);
        });
        self.gate = Some(GateHandle {
            generation,
            done: rx,
            task,
        });
    }

    /// Await the pending gate and resolve the card.
    ///
    /// Returns `None` when there is no gate, when the gate belonged to a
    /// superseded card, or when the card already resolved. Resolution fires
    /// at most once per card.
    pub async fn resolution(&mut self) -> Option<Resolution> {
        let gate = self.gate.take()?;
        match gate.done.await {
            Ok(generation) if generation == self.generation && generation == gate.generation => {
                self.active
                    .as_mut()
                    .and_then(|interaction| interaction.finish_advance(Utc::now()))
            }
            _ => {
                tracing::debug!("discarding gate completion for a superseded card");
                None
            }
        }
    }

    /// Explicit user-driven continuation. Cuts the delay gate short when the
    /// card is waiting on it; a no-op during audio playback or before the
    /// evaluation is final.
    pub fn request_advance(&mut self) -> Option<Resolution> {
        let interaction = self.active.as_mut()?;
        if !interaction.skip_delay_allowed() {
            return None;
        }
        if let Some(gate) = self.gate.take() {
            gate.task.abort();
        }
        interaction.finish_advance(Utc::now())
    }
}
