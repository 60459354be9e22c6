//! Incremental progress events and the reporters that consume them
//!
//! The orchestrator never renders anything itself. It pushes
//! [`TranslationEvent`]s to a [`Reporter`] as soon as each step resolves, so a
//! terminal, a web page or a test can show results while slower providers
//! are still working.

use crate::mt::detector::DetectionResult;
use crate::mt::provider::Provider;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// One rendered result card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// Set for multi-target requests only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    pub provider: Provider,
    pub translated_text: String,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranslationEvent {
    /// A request was accepted; the UI is busy until `Ready`
    Started,
    /// Auto-detection succeeded and its answer is used as the source
    LanguageDetected { detection: DetectionResult },
    /// Auto-detection failed; `fallback` is used as the source instead
    DetectionFailed { fallback: String },
    Result(ResultRecord),
    /// Text for the main output area
    Primary { text: String },
    /// Every provider failed; the main output area should be cleared
    AllProvidersFailed,
    /// The request failed as a whole
    Failed { message: String },
    /// Emitted exactly once per request, whatever the outcome
    Ready,
}

/// Consumer of translation events.
///
/// Only the orchestrator writes to a reporter, from a single task.
pub trait Reporter: Send {
    fn report(&mut self, event: TranslationEvent);
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Vec<TranslationEvent>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TranslationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TranslationEvent> {
        self.events
    }

    /// The result records, in arrival order
    pub fn records(&self) -> Vec<&ResultRecord> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TranslationEvent::Result(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &TranslationEvent) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, event: TranslationEvent) {
        self.events.push(event);
    }
}

/// Forwards events into a tokio channel
#[derive(Debug)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<TranslationEvent>,
}

impl ChannelReporter {
    pub fn new(sender: mpsc::UnboundedSender<TranslationEvent>) -> Self {
        Self { sender }
    }
}

impl Reporter for ChannelReporter {
    fn report(&mut self, event: TranslationEvent) {
        // A dropped receiver only means nobody is listening any more.
        if self.sender.send(event).is_err() {
            debug!("event receiver dropped, discarding event");
        }
    }
}
