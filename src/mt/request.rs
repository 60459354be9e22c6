//! Translation requests and their results

use crate::mt::detector::DetectionResult;
use crate::mt::error::ValidationError;
use crate::mt::provider::{Provider, ProviderSelection};
use crate::mt::translator::AUTO_DETECT;
use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    AUTO_DETECT.to_string()
}

/// What the user asked to translate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// Language code, or `"auto"` to detect it first
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    /// Target languages in the order the user selected them
    #[serde(default)]
    pub target_langs: Vec<String>,
    #[serde(default, rename = "provider")]
    pub selection: ProviderSelection,
}

impl TranslationRequest {
    pub fn new<I, S>(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_langs: I,
        selection: ProviderSelection,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_langs: target_langs.into_iter().map(Into::into).collect(),
            selection,
        }
    }

    pub fn is_auto_detect(&self) -> bool {
        self.source_lang.trim().eq_ignore_ascii_case(AUTO_DETECT)
    }

    /// Trim the text and target codes, drop blank and repeated targets.
    ///
    /// Fails when nothing is left to translate or nowhere to translate it to.
    pub fn normalized(&self) -> Result<TranslationRequest, ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let mut targets: Vec<String> = Vec::with_capacity(self.target_langs.len());
        for target in self.target_langs.iter().map(|t| t.trim()) {
            if !target.is_empty() && !targets.iter().any(|t| t == target) {
                targets.push(target.to_string());
            }
        }
        if targets.is_empty() {
            return Err(ValidationError::NoTargetLanguage);
        }

        let source_lang = if self.is_auto_detect() {
            default_source_lang()
        } else {
            self.source_lang.trim().to_string()
        };

        Ok(TranslationRequest {
            text: text.to_string(),
            source_lang,
            target_langs: targets,
            selection: self.selection,
        })
    }

    /// Swap source and target: the first target becomes the source, the old
    /// source becomes the only target and `translated_text` becomes the text.
    ///
    /// With no target selected the new source is English. Refused while the
    /// source is auto-detected, since there is no language to swap in.
    pub fn swapped(&self, translated_text: &str) -> Result<TranslationRequest, ValidationError> {
        if self.is_auto_detect() {
            return Err(ValidationError::AutoSwap);
        }

        let new_source = self
            .target_langs
            .first()
            .cloned()
            .unwrap_or_else(|| "en".to_string());

        Ok(TranslationRequest {
            text: translated_text.to_string(),
            source_lang: new_source,
            target_langs: vec![self.source_lang.clone()],
            selection: self.selection,
        })
    }
}

/// One attempt of one provider for one target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub target_lang: String,
    pub provider: Provider,
    /// The translation, or the localized error placeholder when `ok` is false
    pub translated_text: String,
    pub ok: bool,
}

/// Everything a finished request produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AggregatedOutcome {
    /// Single target: one result per queried provider, in priority order
    Providers {
        source_lang: String,
        detected: Option<DetectionResult>,
        results: Vec<ProviderResult>,
        /// Text of the successful result that completed first
        primary: String,
    },
    /// Several targets: one result per target, in request order
    Targets {
        source_lang: String,
        detected: Option<DetectionResult>,
        results: Vec<ProviderResult>,
    },
}

impl AggregatedOutcome {
    pub fn results(&self) -> &[ProviderResult] {
        match self {
            AggregatedOutcome::Providers { results, .. } => results.as_slice(),
            AggregatedOutcome::Targets { results, .. } => results.as_slice(),
        }
    }

    pub fn primary(&self) -> Option<&str> {
        match self {
            AggregatedOutcome::Providers { primary, .. } => Some(primary.as_str()),
            AggregatedOutcome::Targets { .. } => None,
        }
    }

    /// The source language the providers were actually called with
    pub fn source_lang(&self) -> &str {
        match self {
            AggregatedOutcome::Providers { source_lang, .. } => source_lang.as_str(),
            AggregatedOutcome::Targets { source_lang, .. } => source_lang.as_str(),
        }
    }

    pub fn detected(&self) -> Option<&DetectionResult> {
        match self {
            AggregatedOutcome::Providers { detected, .. } => detected.as_ref(),
            AggregatedOutcome::Targets { detected, .. } => detected.as_ref(),
        }
    }
}
