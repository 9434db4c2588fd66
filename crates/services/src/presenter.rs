//! View presenter that records every published state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use wayfinder_core::ViewState;

use super::ViewPresenter;

/// Keeps the history of presented view states.
#[derive(Default)]
pub struct RecordingPresenter {
    history: Arc<Mutex<Vec<ViewState>>>,
}

impl RecordingPresenter {
    /// Create a presenter with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// All presented states, oldest first.
    pub async fn history(&self) -> Vec<ViewState> {
        self.history.lock().await.clone()
    }

    /// Most recently presented state.
    pub async fn latest(&self) -> Option<ViewState> {
        self.history.lock().await.last().cloned()
    }
}

#[async_trait]
impl ViewPresenter for RecordingPresenter {
    async fn present(&self, view: &ViewState) {
        debug!(
            arrow = view.arrow_visible,
            route_button = view.route_button_enabled,
            "{} | {}",
            view.navigation_button_title(),
            view.instruction_text
        );
        self.history.lock().await.push(view.clone());
    }
}
