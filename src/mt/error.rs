//! Error types for the machine translation module

use crate::mt::provider::Provider;
use thiserror::Error;

/// Failure of a single call to a translation or detection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// The request never produced a response (connect, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-success status
    #[error("HTTP error ({status}): {body}")]
    HttpStatus { status: u16, body: String },
    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The service answered but reported a failure of its own
    #[error("Service error: {0}")]
    Service(String),
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    #[error("Configuration error: {0}")]
    Config(String),
    /// The task running the call did not finish normally
    #[error("{0}")]
    Internal(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MtError::Network(format!("request timed out: {}", err))
        } else {
            MtError::Network(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

/// A translation provider failed; carries which one and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} failed: {cause}")]
pub struct ProviderError {
    pub provider: Provider,
    #[source]
    pub cause: MtError,
}

impl ProviderError {
    pub fn new(provider: Provider, cause: MtError) -> Self {
        Self { provider, cause }
    }
}

/// Language detection failed. Always recovered by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Language detection failed: {0}")]
pub struct DetectionError(#[from] pub MtError);

/// The request was rejected before any network call was made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text to translate is empty")]
    EmptyText,
    #[error("no target language selected")]
    NoTargetLanguage,
    #[error("languages cannot be swapped while the source language is auto-detected")]
    AutoSwap,
}

/// Request-level failure returned by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The single selected provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Every provider failed; one entry per provider in priority order
    #[error("all {} translation providers failed", .0.len())]
    AllProvidersFailed(Vec<ProviderError>),
}
