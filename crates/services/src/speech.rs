//! Speech announcer that writes utterances to the log.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::SpeechAnnouncer;

/// A spoken message.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text that was spoken
    pub text: String,
    /// BCP 47 language tag
    pub language: String,
    /// Speaking rate
    pub rate: f32,
}

/// Logs every utterance at info level and keeps a copy.
#[derive(Default)]
pub struct TracingAnnouncer {
    spoken: Arc<Mutex<Vec<Utterance>>>,
}

impl TracingAnnouncer {
    /// Create an announcer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything spoken so far.
    pub async fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().await.clone()
    }
}

#[async_trait]
impl SpeechAnnouncer for TracingAnnouncer {
    async fn speak(&self, text: &str, language: &str, rate: f32) {
        info!(language, rate, "speak: {}", text);
        self.spoken.lock().await.push(Utterance {
            text: text.to_string(),
            language: language.to_string(),
            rate,
        });
    }
}
