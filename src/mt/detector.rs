//! Language detection contract

use crate::mt::error::DetectionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a successful detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected language code as reported by the service
    pub language: String,
    /// Confidence in `[0, 1]`; services without a score report `1.0`
    pub confidence: f64,
}

impl DetectionResult {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            language: language.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Detects the language of a piece of text.
///
/// Detection is best-effort: callers are expected to fall back to a default
/// language when this fails rather than abort.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<DetectionResult, DetectionError>;
}
