//! Audio playback capability.
//!
//! The engine never talks to an audio backend directly; the rendering shell
//! injects one through [`AudioPlayer`]. Tests substitute a fake.

use async_trait::async_trait;
use thiserror::Error;

/// Playback failure. Always absorbed by the advancement sequence; a broken
/// audio backend never leaves a card stuck.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("playback rejected: {0}")]
    Rejected(String),

    #[error("no audio backend available")]
    Unavailable,
}

/// Pronunciation playback resource, exclusively owned by the active card's
/// attempt.
///
/// `play` resolves exactly once: on "ended", or immediately with an error
/// when playback could not start or failed midway. `stop` cancels in-flight
/// playback; the corresponding `play` future is dropped by the caller. No
/// seeking, pausing, or volume control.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, url: &str) -> Result<(), AudioError>;

    fn stop(&self);
}

/// Player for headless embeddings. Every request reports [`AudioError::Unavailable`],
/// so audio cards advance immediately instead of blocking on playback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudioPlayer;

#[async_trait]
impl AudioPlayer for NullAudioPlayer {
    async fn play(&self, _url: &str) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn stop(&self) {}
}
