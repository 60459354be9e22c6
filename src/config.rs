//! Runtime configuration
//!
//! Defaults target the public endpoints. Every field can be overridden from
//! the environment:
//!
//! | Variable                     | Field               |
//! |------------------------------|---------------------|
//! | `TARJAMA_GOOGLE_URL`         | `google_base_url`   |
//! | `TARJAMA_MYMEMORY_URL`       | `mymemory_base_url` |
//! | `TARJAMA_TIMEOUT_SECS`       | `timeout_secs`      |
//! | `TARJAMA_FALLBACK_LANGUAGE`  | `fallback_language` |
//! | `TARJAMA_UI_LOCALE`          | `ui_locale`         |

use crate::mt::error::{MtError, MtResult};
use crate::mt::google_translate::GoogleTranslateProvider;
use crate::mt::mymemory::MyMemoryProvider;
use crate::mt::translator::normalize_locale;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub google_base_url: String,
    pub mymemory_base_url: String,
    /// Per-call timeout applied to every provider and detection request
    pub timeout_secs: u64,
    /// Source language used when auto-detection fails
    pub fallback_language: String,
    /// Locale of placeholders and notices
    pub ui_locale: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            google_base_url: GoogleTranslateProvider::DEFAULT_BASE_URL.to_string(),
            mymemory_base_url: MyMemoryProvider::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            fallback_language: "en".to_string(),
            ui_locale: "en".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Load overrides from the process environment
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`, starting from the defaults
    pub fn from_lookup<F>(lookup: F) -> MtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = value("TARJAMA_GOOGLE_URL") {
            config.google_base_url = url;
        }
        if let Some(url) = value("TARJAMA_MYMEMORY_URL") {
            config.mymemory_base_url = url;
        }
        if let Some(secs) = value("TARJAMA_TIMEOUT_SECS") {
            config.timeout_secs = secs.parse().map_err(|_| {
                MtError::Config(format!("TARJAMA_TIMEOUT_SECS must be a number, got '{}'", secs))
            })?;
        }
        if let Some(language) = value("TARJAMA_FALLBACK_LANGUAGE") {
            config.fallback_language = language;
        }
        if let Some(locale) = value("TARJAMA_UI_LOCALE") {
            config.ui_locale = locale;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MtResult<()> {
        if self.timeout_secs == 0 {
            return Err(MtError::Config("timeout must be at least one second".to_string()));
        }
        for url in [&self.google_base_url, &self.mymemory_base_url] {
            url::Url::parse(url)
                .map_err(|e| MtError::Config(format!("Invalid base URL '{}': {}", url, e)))?;
        }
        if normalize_locale(&self.fallback_language)? == crate::mt::translator::AUTO_DETECT {
            return Err(MtError::Config(
                "fallback language cannot be 'auto'".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client shared by every provider
    pub fn http_client(&self) -> MtResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| MtError::Config(format!("Failed to create HTTP client: {}", e)))
    }
}
