//! Mock translator and detector for testing
//!
//! Deterministic, API-free stand-ins for exercising the orchestrator without
//! network access. Each mock can simulate latency, so tests can control which
//! provider completes first.
//!
//! # Example
//!
//! ```ignore
//! use tarjama::mt::{MachineTranslator, MockTranslator, MockMode, Provider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(Provider::Google, MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "fr").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::mt::detector::{DetectionResult, LanguageDetector};
use crate::mt::error::{DetectionError, MtError, MtResult};
use crate::mt::provider::Provider;
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation; falls back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Fail only for the listed target locales, `Suffix` otherwise
    FailFor(Vec<String>),

    /// Simulate API errors
    Error(String),

    /// Panic inside the call, simulating a crashed task
    Panic,

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug, Clone)]
pub struct MockTranslator {
    provider: Provider,
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new MockTranslator reporting as `provider`
    pub fn new(provider: Provider, mode: MockMode) -> Self {
        Self::with_delay(provider, mode, 0)
    }

    /// Create a MockTranslator with simulated network delay
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_delay(Provider::Google, MockMode::Suffix, 50);
    /// // Each translation will take ~50ms
    /// ```
    pub fn with_delay(provider: Provider, mode: MockMode, delay_ms: u64) -> Self {
        Self {
            provider,
            mode,
            delay_ms,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `translate` calls made so far (shared between clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::FailFor(targets) => {
                if targets.iter().any(|t| t == target) {
                    Err(MtError::Service(format!("no model for {}", target)))
                } else {
                    Ok(format!("{}_{}", text, target))
                }
            }
            MockMode::Error(msg) => Err(MtError::Service(msg.clone())),
            MockMode::Panic => panic!("mock translator crashed"),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}

/// Mock language detector returning a fixed answer
#[derive(Debug, Clone)]
pub struct MockDetector {
    outcome: Result<String, String>,
    delay_ms: u64,
    calls: Arc<AtomicUsize>,
}

impl MockDetector {
    /// Always detect `language`
    pub fn detecting(language: impl Into<String>) -> Self {
        Self {
            outcome: Ok(language.into()),
            delay_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageDetector for MockDetector {
    async fn detect(&self, _text: &str) -> Result<DetectionResult, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        match &self.outcome {
            Ok(language) => Ok(DetectionResult::new(language.clone(), 1.0)),
            Err(message) => Err(DetectionError(MtError::Network(message.clone()))),
        }
    }
}
