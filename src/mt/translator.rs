//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction.
//! Every provider, whether it talks to a real endpoint (Google, MyMemory),
//! delegates to another provider (Microsoft, DeepL) or is a deterministic
//! stand-in (mock), is driven through the same contract, so the orchestrator
//! never needs to know which one it is talking to.
//!
//! # Example
//!
//! ```ignore
//! use tarjama::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new(reqwest::Client::new(), GoogleTranslateProvider::DEFAULT_BASE_URL);
//!     let result = provider.translate("Hello, world!", "en", "fr").await?;
//!     println!("{}", result); // "Bonjour le monde !"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::provider::Provider;
use async_trait::async_trait;
use icu_locale::Locale;

/// Sentinel source language asking for automatic detection
pub const AUTO_DETECT: &str = "auto";

/// Generic trait for machine translation providers
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en", "zh-CN")
    /// * `target_locale` - Target language code (e.g., "fr", "ar")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - Network failure, non-success status, or a response
    ///   without extractable translated text
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// The provider this translator reports results as
    fn provider(&self) -> Provider;

    /// Get the name of this translation provider, used for logging
    fn provider_name(&self) -> &str {
        self.provider().display_name()
    }
}

/// Normalize a locale code to its canonical BCP 47 form
///
/// - `EN` → `en`
/// - `zh-cn` → `zh-CN`
/// - `auto` → `auto` (detection sentinel, passed through)
///
/// # Returns
///
/// * `Ok(String)` - The canonical locale code
/// * `Err(MtError::InvalidLocale)` - If the code is empty or not well formed
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize_locale("zh-cn")?, "zh-CN");
/// ```
pub fn normalize_locale(locale: &str) -> MtResult<String> {
    let locale = locale.trim();
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }
    if locale.eq_ignore_ascii_case(AUTO_DETECT) {
        return Ok(AUTO_DETECT.to_string());
    }

    let parsed: Locale = locale.parse().map_err(|e| {
        MtError::InvalidLocale(format!("Invalid locale code '{}': {:?}", locale, e))
    })?;
    Ok(parsed.to_string())
}

/// Validate that a locale code is well formed
pub fn validate_locale(locale: &str) -> MtResult<()> {
    normalize_locale(locale).map(|_| ())
}

/// Send a GET request and decode the JSON body
///
/// Non-success statuses become `MtError::HttpStatus` carrying the response body.
pub(crate) async fn fetch_json(
    client: &reqwest::Client,
    url: url::Url,
) -> MtResult<serde_json::Value> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(MtError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| MtError::InvalidResponse(format!("Failed to parse API response: {}", e)))
}

/// Build `{base_url}/{path}` with url-encoded query parameters
pub(crate) fn endpoint_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> MtResult<url::Url> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    url::Url::parse_with_params(&raw, params)
        .map_err(|e| MtError::Config(format!("Invalid endpoint URL '{}': {}", raw, e)))
}
