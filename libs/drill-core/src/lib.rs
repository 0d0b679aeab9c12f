//! Core drill-session library shared by the client engine and tooling.
//!
//! Provides:
//! - Wire types for the next-card session contract
//! - Typed-answer matching
//! - The per-card interaction state machine (sans-IO, clock-injected)

pub mod interaction;
pub mod matching;
pub mod types;

pub use interaction::{AdvanceGate, CardInteraction, Evaluation, Resolution, Submission};
pub use matching::answer_matches;
pub use types::{
    Card, CardTarget, DeckRef, NextCardResponse, PreviousAnswer, SentenceParts, SessionProgress,
};
