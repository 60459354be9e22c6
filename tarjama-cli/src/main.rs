use clap::{Arg, ArgAction, Command};
use std::sync::Arc;
use tarjama::mt::{
    MockDetector, MockMode, MockTranslator, Orchestrator, Provider, ProviderSelection,
    ProviderSet, Reporter, ResultRecord, TranslationEvent, TranslationRequest,
};
use tarjama::{I18n, TranslatorConfig, language_name};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prints events to the terminal as they arrive
struct TerminalReporter {
    messages: I18n,
    locale: String,
    verbose: bool,
}

impl TerminalReporter {
    fn localize(&self, key: &str, values: &[String]) -> String {
        self.messages.localize(&self.locale, key, values)
    }
}

impl TerminalReporter {
    fn result_line(&self, record: &ResultRecord) -> String {
        let marker = if record.is_error { "❌" } else { "✅" };
        let badge = record
            .detected_language
            .as_deref()
            .map(|code| {
                let name = language_name(code, &self.locale);
                format!(" ({})", self.localize("detected-badge", &[name]))
            })
            .unwrap_or_default();
        match &record.target_lang {
            Some(target) => format!(
                "{} [{}] {}: {}{}",
                marker,
                record.provider.display_name(),
                language_name(target, &self.locale),
                record.translated_text,
                badge
            ),
            None => format!(
                "{} [{}] {}{}",
                marker,
                record.provider.display_name(),
                record.translated_text,
                badge
            ),
        }
    }

    /// The notice printed when a request fails; `main` adds nothing to it
    fn failure_line(&self, event: &TranslationEvent) -> Option<String> {
        match event {
            TranslationEvent::AllProvidersFailed => {
                Some(format!("❌ {}", self.localize("all-failed", &[])))
            }
            TranslationEvent::Failed { message } => Some(format!("❌ {}", message)),
            _ => None,
        }
    }
}

impl Reporter for TerminalReporter {
    fn report(&mut self, event: TranslationEvent) {
        match event {
            TranslationEvent::Started => {
                if self.verbose {
                    eprintln!("⏳ {}", self.localize("translating", &[]));
                }
            }
            TranslationEvent::LanguageDetected { detection } => {
                let name = language_name(&detection.language, &self.locale);
                println!(
                    "🔎 {}",
                    self.localize("language-detected", &[name, detection.language])
                );
            }
            TranslationEvent::DetectionFailed { fallback } => {
                let name = language_name(&fallback, &self.locale);
                eprintln!("⚠️  {}", self.localize("detection-failed", &[name]));
            }
            TranslationEvent::Result(record) => println!("{}", self.result_line(&record)),
            TranslationEvent::Primary { text } => {
                if self.verbose {
                    println!("⭐ {}", text);
                }
            }
            TranslationEvent::AllProvidersFailed | TranslationEvent::Failed { .. } => {
                if let Some(line) = self.failure_line(&event) {
                    eprintln!("{}", line);
                }
            }
            TranslationEvent::Ready => {}
        }
    }
}

/// Offline providers with fixed, distinct latencies
fn mock_orchestrator() -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let providers = ProviderSet::new(
        Arc::new(MockTranslator::with_delay(Provider::Google, MockMode::Suffix, 120)),
        Arc::new(MockTranslator::with_delay(Provider::MyMemory, MockMode::Suffix, 60)),
        Arc::new(MockTranslator::with_delay(Provider::Microsoft, MockMode::Suffix, 90)),
        Arc::new(MockTranslator::with_delay(Provider::DeepL, MockMode::Suffix, 150)),
    )?;
    Ok(Orchestrator::new(
        providers,
        Arc::new(MockDetector::detecting("en")),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("tarjama")
        .version("0.1.0")
        .about("Translate text with several machine-translation services at once")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-languages")
                .help("One or more target language codes (e.g., ar fr es)")
                .required(true)
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("source-language")
                .long("source")
                .short('s')
                .help("Source language code, or 'auto' to detect it")
                .default_value("auto"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("google, mymemory, microsoft, deepl, or 'all' to compare every service")
                .default_value("google"),
        )
        .arg(
            Arg::new("ui-locale")
                .long("ui-locale")
                .help("Language of notices and error placeholders (ar or en)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the aggregated outcome as JSON when done")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use offline mock providers instead of the real services")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show progress and debug logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let text = matches
        .get_one::<String>("text")
        .ok_or("missing text")?;
    let targets: Vec<&String> = matches
        .get_many::<String>("target-languages")
        .ok_or("missing target language")?
        .collect();
    let source = matches
        .get_one::<String>("source-language")
        .ok_or("missing source language")?;
    let selection: ProviderSelection = matches
        .get_one::<String>("provider")
        .ok_or("missing provider")?
        .parse()?;

    let mut config = TranslatorConfig::from_env()?;
    if let Some(locale) = matches.get_one::<String>("ui-locale") {
        config.ui_locale = locale.clone();
    }

    let orchestrator = if matches.get_flag("mock") {
        mock_orchestrator()?
            .with_ui_locale(&config.ui_locale)
            .with_fallback_language(&config.fallback_language)
    } else {
        Orchestrator::from_config(&config)?
    };

    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!("🌍 {} → {:?} ({})", source, targets, selection);
        println!();
    }

    let request = TranslationRequest::new(text.as_str(), source.as_str(), targets, selection);
    debug!(?request, ui_locale = %config.ui_locale, mock = matches.get_flag("mock"), "parsed request");
    let mut reporter = TerminalReporter {
        messages: orchestrator.messages().clone(),
        locale: orchestrator.ui_locale().to_string(),
        verbose,
    };

    // The reporter has already printed the localized failure notice.
    let Ok(outcome) = orchestrator.translate(&request, &mut reporter).await else {
        std::process::exit(1);
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(())
}
