//! Google Translate provider (public `translate_a/single` endpoint)
//!
//! The same endpoint serves two purposes: translation with an explicit
//! source language, and language detection with `sl=auto`, where the
//! detected code is returned at index 2 of the response array.
//!
//! # Response shape
//!
//! ```text
//! [
//!   [["Bonjour ", "Hello ", ...], ["le monde", "world", ...]],  // fragments
//!   null,
//!   "en",                                                       // detected source
//!   ...
//! ]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tarjama::mt::{GoogleTranslateProvider, LanguageDetector, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new(reqwest::Client::new(), GoogleTranslateProvider::DEFAULT_BASE_URL);
//!     let detected = provider.detect("Bonjour").await?;
//!     let result = provider.translate("Bonjour", &detected.language, "en").await?;
//!     println!("{} → {}", detected.language, result);
//!     Ok(())
//! }
//! ```

use crate::mt::detector::{DetectionResult, LanguageDetector};
use crate::mt::error::{DetectionError, MtError, MtResult};
use crate::mt::provider::Provider;
use crate::mt::translator::{
    AUTO_DETECT, MachineTranslator, endpoint_url, fetch_json, normalize_locale,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Google Translate provider and language detector
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL, without the `/translate_a/single` path
    base_url: String,
}

impl GoogleTranslateProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://translate.googleapis.com";

    const PATH: &'static str = "translate_a/single";
    const CLIENT: &'static str = "gtx";
    /// Detection always asks for English output; only index 2 is read.
    const DETECTION_TARGET: &'static str = "en";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Concatenate every `fragment[0]` of `response[0]`, in order
    fn extract_translation(json: &Value) -> MtResult<String> {
        let fragments = json.get(0).and_then(Value::as_array).ok_or_else(|| {
            MtError::InvalidResponse("missing translation fragments at index 0".to_string())
        })?;

        let translated: String = fragments
            .iter()
            .filter_map(|fragment| fragment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(MtError::InvalidResponse(
                "response contains no translated text".to_string(),
            ));
        }
        Ok(translated)
    }

    fn extract_language(json: &Value) -> MtResult<String> {
        json.get(2)
            .and_then(Value::as_str)
            .filter(|code| !code.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                MtError::InvalidResponse("missing detected language at index 2".to_string())
            })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        let source = normalize_locale(source_locale)?;
        let target = normalize_locale(target_locale)?;

        let url = endpoint_url(
            &self.base_url,
            Self::PATH,
            &[
                ("client", Self::CLIENT),
                ("sl", &source),
                ("tl", &target),
                ("dt", "t"),
                ("q", text),
            ],
        )?;
        debug!(provider = self.provider_name(), %source, %target, "sending translation request");

        let json = fetch_json(&self.client, url).await?;
        Self::extract_translation(&json)
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }
}

#[async_trait]
impl LanguageDetector for GoogleTranslateProvider {
    async fn detect(&self, text: &str) -> Result<DetectionResult, DetectionError> {
        let url = endpoint_url(
            &self.base_url,
            Self::PATH,
            &[
                ("client", Self::CLIENT),
                ("dt", "t"),
                ("sl", AUTO_DETECT),
                ("tl", Self::DETECTION_TARGET),
                ("q", text),
            ],
        )?;
        debug!("sending language detection request");

        let json = fetch_json(&self.client, url).await?;
        let language = Self::extract_language(&json)?;
        // The endpoint carries no confidence score.
        Ok(DetectionResult::new(language, 1.0))
    }
}
