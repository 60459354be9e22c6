//! Translation orchestrator
//!
//! Drives the language detector and the provider adapters for one request
//! and reconciles their results:
//!
//! 1. **Detection** (source `auto` only): sequential, best-effort. A failure
//!    falls back to the configured language and is reported, never raised.
//! 2. **Dispatch**, by target count and provider selection:
//!    - one target, one provider: a single call whose failure fails the request;
//!    - one target, all providers: one task per provider, started in priority
//!      order, each outcome reported as it settles, the first success becomes
//!      the primary text, and the request fails only if every branch failed;
//!    - several targets: one call per target, strictly in request order, with
//!      each failure turned into a placeholder record.
//! 3. **Completion**: `Ready` is reported exactly once on every exit path.

use crate::config::TranslatorConfig;
use crate::mt::delegating::DelegatingTranslator;
use crate::mt::detector::{DetectionResult, LanguageDetector};
use crate::mt::error::{MtError, MtResult, ProviderError, TranslateError, ValidationError};
use crate::mt::google_translate::GoogleTranslateProvider;
use crate::mt::mymemory::MyMemoryProvider;
use crate::mt::provider::{Provider, ProviderSelection};
use crate::mt::report::{Reporter, ResultRecord, TranslationEvent};
use crate::mt::request::{AggregatedOutcome, ProviderResult, TranslationRequest};
use crate::mt::translator::MachineTranslator;
use crate::I18n;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// One translator per provider
#[derive(Clone)]
pub struct ProviderSet {
    translators: [Arc<dyn MachineTranslator>; 4],
}

impl ProviderSet {
    /// Build from explicit translators, one per provider.
    ///
    /// # Errors
    ///
    /// `MtError::Config` when a translator reports a provider other than the
    /// slot it was given for.
    pub fn new(
        google: Arc<dyn MachineTranslator>,
        mymemory: Arc<dyn MachineTranslator>,
        microsoft: Arc<dyn MachineTranslator>,
        deepl: Arc<dyn MachineTranslator>,
    ) -> MtResult<Self> {
        let translators = [google, mymemory, microsoft, deepl];
        for (expected, translator) in Provider::ALL.iter().zip(translators.iter()) {
            if translator.provider() != *expected {
                return Err(MtError::Config(format!(
                    "{} translator registered in the {} slot",
                    translator.provider(),
                    expected
                )));
            }
        }
        Ok(Self { translators })
    }

    /// The real services: Google and MyMemory over HTTP, Microsoft served
    /// through Google and DeepL through MyMemory.
    pub fn from_config(config: &TranslatorConfig) -> MtResult<Self> {
        Self::with_client(config, config.http_client()?)
    }

    /// Like [`ProviderSet::from_config`], sending every request through `client`
    pub fn with_client(config: &TranslatorConfig, client: reqwest::Client) -> MtResult<Self> {
        let google: Arc<dyn MachineTranslator> = Arc::new(GoogleTranslateProvider::new(
            client.clone(),
            config.google_base_url.clone(),
        ));
        let mymemory: Arc<dyn MachineTranslator> = Arc::new(MyMemoryProvider::new(
            client,
            config.mymemory_base_url.clone(),
        ));
        let microsoft = Arc::new(DelegatingTranslator::new(Provider::Microsoft, google.clone()));
        let deepl = Arc::new(DelegatingTranslator::new(Provider::DeepL, mymemory.clone()));
        Self::new(google, mymemory, microsoft, deepl)
    }

    pub fn get(&self, provider: Provider) -> &Arc<dyn MachineTranslator> {
        &self.translators[provider.index()]
    }
}

/// Reports `Ready` when dropped, so every exit path of a request
/// (including early returns and unwinding) ends the busy state once.
struct ReadyGuard<'a> {
    reporter: &'a mut dyn Reporter,
}

impl Reporter for ReadyGuard<'_> {
    fn report(&mut self, event: TranslationEvent) {
        self.reporter.report(event);
    }
}

impl Drop for ReadyGuard<'_> {
    fn drop(&mut self) {
        self.reporter.report(TranslationEvent::Ready);
    }
}

pub struct Orchestrator {
    providers: ProviderSet,
    detector: Arc<dyn LanguageDetector>,
    messages: I18n,
    ui_locale: String,
    fallback_language: String,
}

impl Orchestrator {
    pub fn new(providers: ProviderSet, detector: Arc<dyn LanguageDetector>) -> Self {
        let defaults = TranslatorConfig::default();
        Self {
            providers,
            detector,
            messages: I18n::bundled(),
            ui_locale: defaults.ui_locale,
            fallback_language: defaults.fallback_language,
        }
    }

    /// Orchestrator over the real services, detecting with Google
    pub fn from_config(config: &TranslatorConfig) -> MtResult<Self> {
        config.validate()?;
        Self::from_config_with_client(config, config.http_client()?)
    }

    /// Like [`Orchestrator::from_config`], with the detector and every
    /// provider sharing `client`
    pub fn from_config_with_client(
        config: &TranslatorConfig,
        client: reqwest::Client,
    ) -> MtResult<Self> {
        let detector = Arc::new(GoogleTranslateProvider::new(
            client.clone(),
            config.google_base_url.clone(),
        ));
        Ok(Self::new(ProviderSet::with_client(config, client)?, detector)
            .with_ui_locale(&config.ui_locale)
            .with_fallback_language(&config.fallback_language))
    }

    pub fn with_ui_locale(mut self, locale: &str) -> Self {
        self.ui_locale = locale.to_lowercase();
        self
    }

    pub fn with_fallback_language(mut self, language: &str) -> Self {
        self.fallback_language = language.to_string();
        self
    }

    pub fn with_messages(mut self, messages: I18n) -> Self {
        self.messages = messages;
        self
    }

    pub fn ui_locale(&self) -> &str {
        &self.ui_locale
    }

    pub fn messages(&self) -> &I18n {
        &self.messages
    }

    /// Run one request, reporting progress to `reporter` as it happens.
    ///
    /// # Errors
    ///
    /// - `Validation` when the text is blank or no target is given; no
    ///   network call is made.
    /// - `Provider` when the single selected provider fails on a
    ///   single-target request.
    /// - `AllProvidersFailed` when every provider failed on a single-target
    ///   all-providers request.
    ///
    /// Detection failures and per-target failures are never returned.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        reporter: &mut dyn Reporter,
    ) -> Result<AggregatedOutcome, TranslateError> {
        let mut reporter = ReadyGuard { reporter };
        reporter.report(TranslationEvent::Started);

        let request = match request.normalized() {
            Ok(request) => request,
            Err(err) => {
                reporter.report(TranslationEvent::Failed {
                    message: self.validation_message(&err),
                });
                return Err(err.into());
            }
        };

        let (source_lang, detected) = self.resolve_source(&request, &mut reporter).await;

        let outcome = match (request.target_langs.as_slice(), request.selection) {
            ([target], ProviderSelection::Single(provider)) => {
                self.translate_single(&request.text, &source_lang, target, provider, detected, &mut reporter)
                    .await
            }
            ([target], ProviderSelection::All) => {
                self.translate_all(&request.text, &source_lang, target, detected, &mut reporter)
                    .await
            }
            (targets, selection) => Ok(self
                .translate_targets(
                    &request.text,
                    &source_lang,
                    targets,
                    selection.sequential_provider(),
                    detected,
                    &mut reporter,
                )
                .await),
        };

        if let Err(TranslateError::Provider(err)) = &outcome {
            warn!(provider = %err.provider, error = %err.cause, "translation request failed");
            reporter.report(TranslationEvent::Failed {
                message: self.message("request-failed"),
            });
        }
        outcome
    }

    /// Step 1: the source language providers are called with
    async fn resolve_source(
        &self,
        request: &TranslationRequest,
        reporter: &mut dyn Reporter,
    ) -> (String, Option<DetectionResult>) {
        if !request.is_auto_detect() {
            return (request.source_lang.clone(), None);
        }

        match self.detector.detect(&request.text).await {
            Ok(detection) => {
                info!(language = %detection.language, "detected source language");
                reporter.report(TranslationEvent::LanguageDetected {
                    detection: detection.clone(),
                });
                (detection.language.clone(), Some(detection))
            }
            Err(err) => {
                warn!(error = %err, fallback = %self.fallback_language, "language detection failed");
                reporter.report(TranslationEvent::DetectionFailed {
                    fallback: self.fallback_language.clone(),
                });
                (self.fallback_language.clone(), None)
            }
        }
    }

    async fn translate_single(
        &self,
        text: &str,
        source_lang: &str,
        target: &str,
        provider: Provider,
        detected: Option<DetectionResult>,
        reporter: &mut dyn Reporter,
    ) -> Result<AggregatedOutcome, TranslateError> {
        debug!(%provider, target_lang = %target, "dispatching to single provider");
        let translated = self
            .providers
            .get(provider)
            .translate(text, source_lang, target)
            .await
            .map_err(|cause| ProviderError::new(provider, cause))?;

        let result = ProviderResult {
            target_lang: target.to_string(),
            provider,
            translated_text: translated.clone(),
            ok: true,
        };
        reporter.report(TranslationEvent::Result(self.record(&result, false, &detected)));
        reporter.report(TranslationEvent::Primary {
            text: translated.clone(),
        });

        Ok(AggregatedOutcome::Providers {
            source_lang: source_lang.to_string(),
            detected,
            results: vec![result],
            primary: translated,
        })
    }

    /// Race every provider; report each branch as it settles.
    async fn translate_all(
        &self,
        text: &str,
        source_lang: &str,
        target: &str,
        detected: Option<DetectionResult>,
        reporter: &mut dyn Reporter,
    ) -> Result<AggregatedOutcome, TranslateError> {
        let mut tasks = JoinSet::new();
        let mut task_providers: HashMap<Id, Provider> = HashMap::with_capacity(Provider::ALL.len());
        for provider in Provider::ALL {
            let translator = Arc::clone(self.providers.get(provider));
            let (text, source_lang, target) =
                (text.to_string(), source_lang.to_string(), target.to_string());
            debug!(%provider, target_lang = %target, "dispatching to provider");
            let handle = tasks.spawn(async move {
                let result = translator.translate(&text, &source_lang, &target).await;
                (provider, result)
            });
            task_providers.insert(handle.id(), provider);
        }

        let mut results: Vec<ProviderResult> = Vec::with_capacity(Provider::ALL.len());
        let mut failures: Vec<ProviderError> = Vec::new();
        let mut primary: Option<String> = None;

        while let Some(joined) = tasks.join_next().await {
            let (provider, outcome) = match joined {
                Ok(settled) => settled,
                Err(err) => match task_providers.get(&err.id()) {
                    Some(&provider) => {
                        warn!(%provider, error = %err, "provider task did not complete");
                        let cause = MtError::Internal(format!("{} task aborted: {}", provider, err));
                        (provider, Err(cause))
                    }
                    None => {
                        warn!(error = %err, "unknown provider task did not complete");
                        continue;
                    }
                },
            };
            let result = self.settle(provider, target, outcome, &mut failures);
            reporter.report(TranslationEvent::Result(self.record(&result, false, &detected)));
            if result.ok && primary.is_none() {
                primary = Some(result.translated_text.clone());
                reporter.report(TranslationEvent::Primary {
                    text: result.translated_text.clone(),
                });
            }
            results.push(result);
        }

        results.sort_by_key(|r| r.provider);
        failures.sort_by_key(|f| f.provider);

        match primary {
            Some(primary) => Ok(AggregatedOutcome::Providers {
                source_lang: source_lang.to_string(),
                detected,
                results,
                primary,
            }),
            None => {
                warn!(target_lang = %target, "all translation providers failed");
                reporter.report(TranslationEvent::AllProvidersFailed);
                Err(TranslateError::AllProvidersFailed(failures))
            }
        }
    }

    /// One provider, one call per target, in order. Never fails as a whole.
    async fn translate_targets(
        &self,
        text: &str,
        source_lang: &str,
        targets: &[String],
        provider: Provider,
        detected: Option<DetectionResult>,
        reporter: &mut dyn Reporter,
    ) -> AggregatedOutcome {
        let translator = self.providers.get(provider);
        let mut results = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();

        for target in targets {
            debug!(%provider, target_lang = %target, "dispatching target language");
            let outcome = translator.translate(text, source_lang, target).await;
            let mut result = self.settle(provider, target, outcome, &mut failures);
            if !result.ok {
                result.translated_text = self.message("target-error");
            }
            reporter.report(TranslationEvent::Result(self.record(&result, true, &detected)));
            results.push(result);
        }

        AggregatedOutcome::Targets {
            source_lang: source_lang.to_string(),
            detected,
            results,
        }
    }

    /// Turn one call outcome into a result, logging and collecting failures
    fn settle(
        &self,
        provider: Provider,
        target: &str,
        outcome: MtResult<String>,
        failures: &mut Vec<ProviderError>,
    ) -> ProviderResult {
        match outcome {
            Ok(translated_text) => ProviderResult {
                target_lang: target.to_string(),
                provider,
                translated_text,
                ok: true,
            },
            Err(cause) => {
                warn!(%provider, target_lang = %target, error = %cause, "provider failed");
                failures.push(ProviderError::new(provider, cause));
                ProviderResult {
                    target_lang: target.to_string(),
                    provider,
                    translated_text: self.message("provider-error"),
                    ok: false,
                }
            }
        }
    }

    fn record(
        &self,
        result: &ProviderResult,
        with_target: bool,
        detected: &Option<DetectionResult>,
    ) -> ResultRecord {
        ResultRecord {
            target_lang: with_target.then(|| result.target_lang.clone()),
            provider: result.provider,
            translated_text: result.translated_text.clone(),
            is_error: !result.ok,
            detected_language: detected.as_ref().map(|d| d.language.clone()),
        }
    }

    fn message(&self, key: &str) -> String {
        self.messages.get_message(&self.ui_locale, key)
    }

    fn validation_message(&self, err: &ValidationError) -> String {
        match err {
            ValidationError::EmptyText => self.message("empty-text"),
            ValidationError::NoTargetLanguage => self.message("no-target"),
            ValidationError::AutoSwap => self.message("auto-swap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::mock::{MockDetector, MockMode, MockTranslator};
    use crate::mt::report::CollectingReporter;
    use std::collections::HashMap;

    struct Harness {
        google: MockTranslator,
        mymemory: MockTranslator,
        microsoft: MockTranslator,
        deepl: MockTranslator,
        detector: MockDetector,
    }

    impl Harness {
        fn suffix() -> Self {
            Self::with_modes([
                (MockMode::Suffix, 0),
                (MockMode::Suffix, 0),
                (MockMode::Suffix, 0),
                (MockMode::Suffix, 0),
            ])
        }

        fn with_modes(modes: [(MockMode, u64); 4]) -> Self {
            let [google, mymemory, microsoft, deepl] = modes;
            Self {
                google: MockTranslator::with_delay(Provider::Google, google.0, google.1),
                mymemory: MockTranslator::with_delay(Provider::MyMemory, mymemory.0, mymemory.1),
                microsoft: MockTranslator::with_delay(Provider::Microsoft, microsoft.0, microsoft.1),
                deepl: MockTranslator::with_delay(Provider::DeepL, deepl.0, deepl.1),
                detector: MockDetector::detecting("en"),
            }
        }

        fn detector(mut self, detector: MockDetector) -> Self {
            self.detector = detector;
            self
        }

        fn orchestrator(&self) -> Orchestrator {
            let providers = ProviderSet::new(
                Arc::new(self.google.clone()),
                Arc::new(self.mymemory.clone()),
                Arc::new(self.microsoft.clone()),
                Arc::new(self.deepl.clone()),
            )
            .unwrap();
            Orchestrator::new(providers, Arc::new(self.detector.clone()))
        }

        fn total_calls(&self) -> usize {
            self.google.calls() + self.mymemory.calls() + self.microsoft.calls() + self.deepl.calls()
        }
    }

    fn request(text: &str, source: &str, targets: &[&str], selection: ProviderSelection) -> TranslationRequest {
        TranslationRequest::new(text, source, targets.iter().copied(), selection)
    }

    fn err_text() -> String {
        I18n::bundled().get_message("en", "provider-error")
    }

    // ========== Provider Set ==========

    #[test]
    fn test_provider_set_rejects_wrong_slot() {
        let google = Arc::new(MockTranslator::new(Provider::Google, MockMode::Suffix));
        let result = ProviderSet::new(google.clone(), google.clone(), google.clone(), google);
        assert!(matches!(result, Err(MtError::Config(_))));
    }

    #[test]
    fn test_provider_set_from_config_delegates() {
        let set = ProviderSet::from_config(&TranslatorConfig::default()).unwrap();
        for provider in Provider::ALL {
            assert_eq!(set.get(provider).provider(), provider);
        }
    }

    #[tokio::test]
    async fn test_detector_and_providers_share_one_client() {
        use reqwest::header::{HeaderMap, HeaderValue};
        use serde_json::json;
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "auto"))
            .and(header("x-tarjama-client", "shared"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [["Hello", "Hello", null]],
                null,
                "en"
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "en"))
            .and(header("x-tarjama-client", "shared"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [["Bonjour", "Hello", null]],
                null,
                "en"
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-tarjama-client", HeaderValue::from_static("shared"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap();
        let config = TranslatorConfig {
            google_base_url: server.uri(),
            ..TranslatorConfig::default()
        };

        let orchestrator = Orchestrator::from_config_with_client(&config, client).unwrap();
        let outcome = orchestrator
            .translate(
                &request("Hello", "auto", &["fr"], ProviderSelection::Single(Provider::Google)),
                &mut CollectingReporter::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.primary(), Some("Bonjour"));
        assert_eq!(outcome.source_lang(), "en");
    }

    // ========== Validation ==========

    #[tokio::test]
    async fn test_empty_text_fails_fast() {
        let harness = Harness::suffix();
        let mut reporter = CollectingReporter::new();
        let result = harness
            .orchestrator()
            .translate(&request("   ", "auto", &["fr"], ProviderSelection::All), &mut reporter)
            .await;

        assert_eq!(result, Err(TranslateError::Validation(ValidationError::EmptyText)));
        assert_eq!(harness.total_calls(), 0);
        assert_eq!(harness.detector.calls(), 0);
        assert_eq!(
            reporter.events(),
            &[
                TranslationEvent::Started,
                TranslationEvent::Failed {
                    message: "Please enter some text to translate".to_string()
                },
                TranslationEvent::Ready,
            ]
        );
    }

    #[tokio::test]
    async fn test_no_target_fails_fast() {
        let harness = Harness::suffix();
        let mut reporter = CollectingReporter::new();
        let result = harness
            .orchestrator()
            .translate(&request("Hi", "en", &[], ProviderSelection::All), &mut reporter)
            .await;

        assert_eq!(
            result,
            Err(TranslateError::Validation(ValidationError::NoTargetLanguage))
        );
        assert_eq!(harness.total_calls(), 0);
        assert_eq!(reporter.count(&TranslationEvent::Ready), 1);
    }

    // ========== Detection ==========

    #[tokio::test]
    async fn test_detected_language_used_as_source() {
        let mut map = HashMap::new();
        map.insert(("Hello".to_string(), "ar".to_string()), "مرحبا".to_string());
        let harness = Harness::with_modes([
            (MockMode::Mappings(map), 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
        ]);
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(
                &request("Hello", "auto", &["ar"], ProviderSelection::Single(Provider::Google)),
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(outcome.source_lang(), "en");
        assert_eq!(outcome.detected().map(|d| d.language.as_str()), Some("en"));
        assert_eq!(
            outcome.results(),
            &[ProviderResult {
                target_lang: "ar".to_string(),
                provider: Provider::Google,
                translated_text: "مرحبا".to_string(),
                ok: true,
            }]
        );
        assert_eq!(outcome.primary(), Some("مرحبا"));
        assert!(matches!(
            reporter.events()[1],
            TranslationEvent::LanguageDetected { .. }
        ));
        assert_eq!(reporter.records()[0].detected_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_detection_failure_falls_back_to_english() {
        let harness = Harness::suffix().detector(MockDetector::failing("offline"));
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(
                &request("Bonjour", "auto", &["de"], ProviderSelection::Single(Provider::Google)),
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(outcome.source_lang(), "en");
        assert!(outcome.detected().is_none());
        assert_eq!(
            reporter.events()[1],
            TranslationEvent::DetectionFailed {
                fallback: "en".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_configured_fallback_language() {
        let harness = Harness::suffix().detector(MockDetector::failing("offline"));
        let orchestrator = harness.orchestrator().with_fallback_language("fr");
        let mut reporter = CollectingReporter::new();
        let outcome = orchestrator
            .translate(
                &request("Hallo", "auto", &["de"], ProviderSelection::Single(Provider::Google)),
                &mut reporter,
            )
            .await
            .unwrap();
        assert_eq!(outcome.source_lang(), "fr");
    }

    #[tokio::test]
    async fn test_explicit_source_skips_detection() {
        let harness = Harness::suffix();
        let mut reporter = CollectingReporter::new();
        harness
            .orchestrator()
            .translate(
                &request("Hi", "en", &["fr"], ProviderSelection::Single(Provider::Google)),
                &mut reporter,
            )
            .await
            .unwrap();
        assert_eq!(harness.detector.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detection_completes_before_dispatch() {
        let harness = Harness::suffix().detector(MockDetector::detecting("es").with_delay(500));
        let mut reporter = CollectingReporter::new();
        harness
            .orchestrator()
            .translate(&request("Hola", "auto", &["fr"], ProviderSelection::All), &mut reporter)
            .await
            .unwrap();

        let first_result = reporter
            .events()
            .iter()
            .position(|e| matches!(e, TranslationEvent::Result(_)))
            .unwrap();
        let detected = reporter
            .events()
            .iter()
            .position(|e| matches!(e, TranslationEvent::LanguageDetected { .. }))
            .unwrap();
        assert!(detected < first_result);
    }

    // ========== Single Provider ==========

    #[tokio::test]
    async fn test_single_provider_failure_is_request_failure() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 0),
            (MockMode::Error("quota".to_string()), 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
        ]);
        let mut reporter = CollectingReporter::new();
        let result = harness
            .orchestrator()
            .translate(
                &request("Hi", "en", &["fr"], ProviderSelection::Single(Provider::MyMemory)),
                &mut reporter,
            )
            .await;

        assert_eq!(
            result,
            Err(TranslateError::Provider(ProviderError::new(
                Provider::MyMemory,
                MtError::Service("quota".to_string())
            )))
        );
        assert!(reporter.records().is_empty());
        assert_eq!(harness.google.calls(), 0);
        assert_eq!(
            reporter.events()[reporter.events().len() - 2],
            TranslationEvent::Failed {
                message: "An error occurred while translating".to_string()
            }
        );
        assert_eq!(reporter.count(&TranslationEvent::Ready), 1);
    }

    // ========== All Providers ==========

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_primary_is_first_to_complete() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 300),
            (MockMode::NoOp, 100),
            (MockMode::Suffix, 200),
            (MockMode::Suffix, 400),
        ]);
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(&request("Hi", "en", &["fr"], ProviderSelection::All), &mut reporter)
            .await
            .unwrap();

        assert_eq!(outcome.primary(), Some("Hi"));
        let providers: Vec<Provider> = outcome.results().iter().map(|r| r.provider).collect();
        assert_eq!(providers, Provider::ALL.to_vec());

        let arrival: Vec<Provider> = reporter.records().iter().map(|r| r.provider).collect();
        assert_eq!(
            arrival,
            vec![Provider::MyMemory, Provider::Microsoft, Provider::Google, Provider::DeepL]
        );
        assert_eq!(
            reporter.count(&TranslationEvent::Primary {
                text: "Hi".to_string()
            }),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_primary_skips_failures() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 300),
            (MockMode::Error("down".to_string()), 10),
            (MockMode::Error("down".to_string()), 20),
            (MockMode::Suffix, 200),
        ]);
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(&request("Hi", "en", &["fr"], ProviderSelection::All), &mut reporter)
            .await
            .unwrap();

        assert_eq!(outcome.primary(), Some("Hi_fr"));
        let results = outcome.results();
        assert_eq!(results.len(), 4);
        assert_eq!(
            results.iter().map(|r| r.ok).collect::<Vec<_>>(),
            vec![true, false, false, true]
        );
        assert_eq!(results[1].translated_text, err_text());
        assert_eq!(reporter.records().len(), 4);
        assert!(reporter.records()[0].is_error);
        assert_eq!(
            reporter
                .events()
                .iter()
                .filter(|e| matches!(e, TranslationEvent::Primary { .. }))
                .count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_failed() {
        let failing = || (MockMode::Error("down".to_string()), 10);
        let harness = Harness::with_modes([failing(), failing(), failing(), failing()]);
        let mut reporter = CollectingReporter::new();
        let result = harness
            .orchestrator()
            .translate(&request("Hi", "en", &["fr"], ProviderSelection::All), &mut reporter)
            .await;

        match result {
            Err(TranslateError::AllProvidersFailed(failures)) => {
                let providers: Vec<Provider> = failures.iter().map(|f| f.provider).collect();
                assert_eq!(providers, Provider::ALL.to_vec());
            }
            other => panic!("Expected AllProvidersFailed, got {:?}", other),
        }
        assert_eq!(reporter.records().len(), 4);
        assert!(reporter.records().iter().all(|r| r.is_error));
        assert!(
            !reporter
                .events()
                .iter()
                .any(|e| matches!(e, TranslationEvent::Primary { .. }))
        );
        let events = reporter.events();
        assert_eq!(events[events.len() - 2], TranslationEvent::AllProvidersFailed);
        assert_eq!(events[events.len() - 1], TranslationEvent::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_crashed_provider_task_becomes_error_record() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 500),
            (MockMode::Panic, 0),
            (MockMode::Suffix, 500),
            (MockMode::Suffix, 500),
        ]);
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(&request("Hi", "en", &["fr"], ProviderSelection::All), &mut reporter)
            .await
            .unwrap();

        let results = outcome.results();
        assert_eq!(results.len(), 4);
        assert_eq!(results[1].provider, Provider::MyMemory);
        assert!(!results[1].ok);
        assert_eq!(results[1].translated_text, err_text());

        let records = reporter.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].provider, Provider::MyMemory);
        assert!(records[0].is_error);
        assert!(records[1..].iter().all(|r| !r.is_error));
        assert_eq!(reporter.count(&TranslationEvent::Ready), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_idempotent_with_deterministic_stubs() {
        let modes = || {
            [
                (MockMode::Suffix, 40),
                (MockMode::Error("x".to_string()), 10),
                (MockMode::NoOp, 20),
                (MockMode::Suffix, 30),
            ]
        };
        let req = request("Hi", "auto", &["fr"], ProviderSelection::All);

        let first = Harness::with_modes(modes())
            .orchestrator()
            .translate(&req, &mut CollectingReporter::new())
            .await
            .unwrap();
        let second = Harness::with_modes(modes())
            .orchestrator()
            .translate(&req, &mut CollectingReporter::new())
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.primary(), Some("Hi"));
    }

    #[tokio::test]
    async fn test_delegating_providers_in_all_mode() {
        let google = Arc::new(MockTranslator::new(Provider::Google, MockMode::Suffix));
        let mymemory = Arc::new(MockTranslator::new(
            Provider::MyMemory,
            MockMode::Error("quota".to_string()),
        ));
        let providers = ProviderSet::new(
            google.clone(),
            mymemory.clone(),
            Arc::new(DelegatingTranslator::new(Provider::Microsoft, google.clone())),
            Arc::new(DelegatingTranslator::new(Provider::DeepL, mymemory.clone())),
        )
        .unwrap();
        let orchestrator = Orchestrator::new(providers, Arc::new(MockDetector::detecting("en")));

        let outcome = orchestrator
            .translate(
                &request("Hi", "en", &["fr"], ProviderSelection::All),
                &mut CollectingReporter::new(),
            )
            .await
            .unwrap();

        let summary: Vec<(Provider, bool)> =
            outcome.results().iter().map(|r| (r.provider, r.ok)).collect();
        assert_eq!(
            summary,
            vec![
                (Provider::Google, true),
                (Provider::MyMemory, false),
                (Provider::Microsoft, true),
                (Provider::DeepL, false),
            ]
        );
        assert_eq!(google.calls(), 2);
        assert_eq!(mymemory.calls(), 2);
    }

    // ========== Multiple Targets ==========

    #[tokio::test]
    async fn test_multi_target_all_collapses_to_google() {
        let harness = Harness::suffix();
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(&request("Hi", "en", &["fr", "es"], ProviderSelection::All), &mut reporter)
            .await
            .unwrap();

        assert_eq!(
            outcome.results(),
            &[
                ProviderResult {
                    target_lang: "fr".to_string(),
                    provider: Provider::Google,
                    translated_text: "Hi_fr".to_string(),
                    ok: true,
                },
                ProviderResult {
                    target_lang: "es".to_string(),
                    provider: Provider::Google,
                    translated_text: "Hi_es".to_string(),
                    ok: true,
                },
            ]
        );
        assert_eq!(outcome.primary(), None);
        assert_eq!(harness.google.calls(), 2);
        assert_eq!(harness.mymemory.calls() + harness.microsoft.calls() + harness.deepl.calls(), 0);

        let targets: Vec<Option<&str>> = reporter
            .records()
            .iter()
            .map(|r| r.target_lang.as_deref())
            .collect();
        assert_eq!(targets, vec![Some("fr"), Some("es")]);
    }

    #[tokio::test]
    async fn test_multi_target_failure_is_isolated() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 0),
            (MockMode::FailFor(vec!["ja".to_string()]), 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
        ]);
        let mut reporter = CollectingReporter::new();
        let outcome = harness
            .orchestrator()
            .translate(
                &request(
                    "Hi",
                    "en",
                    &["fr", "ja", "ko"],
                    ProviderSelection::Single(Provider::MyMemory),
                ),
                &mut reporter,
            )
            .await
            .unwrap();

        let summary: Vec<(&str, bool)> = outcome
            .results()
            .iter()
            .map(|r| (r.target_lang.as_str(), r.ok))
            .collect();
        assert_eq!(summary, vec![("fr", true), ("ja", false), ("ko", true)]);
        assert_eq!(
            outcome.results()[1].translated_text,
            I18n::bundled().get_message("en", "target-error")
        );
        assert!(outcome.results().iter().all(|r| r.provider == Provider::MyMemory));
        assert!(reporter.records()[1].is_error);
        assert_eq!(reporter.count(&TranslationEvent::Ready), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_target_is_sequential() {
        let harness = Harness::with_modes([
            (MockMode::Suffix, 100),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
        ]);
        let start = tokio::time::Instant::now();
        harness
            .orchestrator()
            .translate(
                &request("Hi", "en", &["fr", "es", "de"], ProviderSelection::Single(Provider::Google)),
                &mut CollectingReporter::new(),
            )
            .await
            .unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_placeholders_follow_ui_locale() {
        let harness = Harness::with_modes([
            (MockMode::Error("down".to_string()), 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
            (MockMode::Suffix, 0),
        ]);
        let orchestrator = harness.orchestrator().with_ui_locale("ar");
        let outcome = orchestrator
            .translate(
                &request("Hi", "en", &["fr", "es"], ProviderSelection::Single(Provider::Google)),
                &mut CollectingReporter::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            outcome.results()[0].translated_text,
            "حدث خطأ أثناء الترجمة إلى هذه اللغة"
        );
    }

    #[tokio::test]
    async fn test_ready_reported_once_per_request() {
        let harness = Harness::suffix();
        let orchestrator = harness.orchestrator();
        let mut reporter = CollectingReporter::new();
        for selection in [ProviderSelection::All, ProviderSelection::Single(Provider::DeepL)] {
            orchestrator
                .translate(&request("Hi", "en", &["fr"], selection), &mut reporter)
                .await
                .unwrap();
        }
        assert_eq!(reporter.count(&TranslationEvent::Started), 2);
        assert_eq!(reporter.count(&TranslationEvent::Ready), 2);
        assert_eq!(reporter.events().last(), Some(&TranslationEvent::Ready));
    }
}
