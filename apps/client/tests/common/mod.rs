//! Common test utilities and fixtures for integration tests.
//!
//! Provides:
//! - Scripted provider and audio fakes with call recording
//! - Card/response fixtures

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use dabia_client::{AudioError, AudioPlayer, CardProvider, ProviderError};
use drill_core::types::{NextCardResponse, PreviousAnswer};

/// Install a fmt subscriber once so RUST_LOG works for failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Scripted provider: pops one response per call, records every request
/// payload so tests can assert what actually went over the boundary.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<NextCardResponse, ProviderError>>>,
    requests: Mutex<Vec<Option<PreviousAnswer>>>,
}

impl ScriptedProvider {
    pub fn push(&self, response: Result<NextCardResponse, ProviderError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<Option<PreviousAnswer>> {
        self.requests.lock().unwrap().clone()
    }
}

/// Local newtype so the foreign `CardProvider` trait can be implemented for a
/// shared `ScriptedProvider` handle without tripping the orphan rule (a direct
/// `impl CardProvider for Arc<ScriptedProvider>` is illegal in this crate).
pub struct SharedProvider(pub Arc<ScriptedProvider>);

#[async_trait]
impl CardProvider for SharedProvider {
    async fn next_card(
        &self,
        previous: Option<&PreviousAnswer>,
    ) -> Result<NextCardResponse, ProviderError> {
        self.0.requests.lock().unwrap().push(previous.copied());
        self.0
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".to_string())))
    }
}

/// Audio fake: records play calls and completes a playback only when the
/// test releases it through [`ControlledAudio::finish_playback`].
#[derive(Default)]
pub struct ControlledAudio {
    plays: Mutex<Vec<String>>,
    stops: Mutex<usize>,
    ended: Notify,
}

impl ControlledAudio {
    /// Release the pending (or next) playback as "ended".
    pub fn finish_playback(&self) {
        self.ended.notify_one();
    }

    pub fn plays(&self) -> Vec<String> {
        self.plays.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        *self.stops.lock().unwrap()
    }
}

#[async_trait]
impl AudioPlayer for ControlledAudio {
    async fn play(&self, url: &str) -> Result<(), AudioError> {
        self.plays.lock().unwrap().push(url.to_string());
        self.ended.notified().await;
        Ok(())
    }

    fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
    }
}
