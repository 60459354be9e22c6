//! Machine Translation Module
//!
//! Sends one piece of text to several machine-translation services and
//! reconciles what they return.
//!
//! # Overview
//!
//! 1. **Providers** - [`GoogleTranslateProvider`] and [`MyMemoryProvider`] talk to
//!    real services; Microsoft and DeepL are served through a
//!    [`DelegatingTranslator`] over Google and MyMemory respectively
//! 2. **Detector** - [`LanguageDetector`] resolves an `auto` source language
//! 3. **Orchestrator** - [`Orchestrator`] validates a [`TranslationRequest`],
//!    detects, dispatches and aggregates the results
//! 4. **Reporting** - every step is pushed to a [`Reporter`] as it resolves
//!
//! # Example
//!
//! ```ignore
//! use tarjama::TranslatorConfig;
//! use tarjama::mt::{CollectingReporter, Orchestrator, ProviderSelection, TranslationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::from_config(&TranslatorConfig::from_env()?)?;
//!     let request = TranslationRequest::new("Hello", "auto", ["ar"], ProviderSelection::All);
//!
//!     let mut reporter = CollectingReporter::new();
//!     let outcome = orchestrator.translate(&request, &mut reporter).await?;
//!
//!     println!("{:?}", outcome.primary());
//!     Ok(())
//! }
//! ```

pub mod delegating;
pub mod detector;
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod mymemory;
pub mod orchestrator;
pub mod provider;
pub mod report;
pub mod request;
pub mod translator;


pub use delegating::DelegatingTranslator;
pub use detector::{DetectionResult, LanguageDetector};
pub use error::{DetectionError, MtError, MtResult, ProviderError, TranslateError, ValidationError};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockDetector, MockMode, MockTranslator};
pub use mymemory::MyMemoryProvider;
pub use orchestrator::{Orchestrator, ProviderSet};
pub use provider::{Provider, ProviderSelection};
pub use report::{ChannelReporter, CollectingReporter, Reporter, ResultRecord, TranslationEvent};
pub use request::{AggregatedOutcome, ProviderResult, TranslationRequest};
pub use translator::{AUTO_DETECT, MachineTranslator, normalize_locale, validate_locale};
