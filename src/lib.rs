//! tarjama: send text to several machine-translation services at once and
//! reconcile what comes back.
//!
//! The [`mt`] module holds the providers and the orchestrator. This root
//! module holds the localized UI strings used to render placeholders and
//! notices, with `$1`-style parameters.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub mod catalog;
pub mod config;
pub mod mt;

pub use catalog::{language_name, language_names};
pub use config::TranslatorConfig;

static PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("parameter pattern is valid"));

#[derive(Debug, Clone, Default)]
pub struct LocalizedMessages(pub HashMap<String, String>);

impl LocalizedMessages {
    pub fn new() -> Self {
        LocalizedMessages(HashMap::new())
    }
    pub fn with_message(&mut self, key: &str, message: &str) -> &mut Self {
        self.0.insert(key.to_owned(), message.to_owned());
        self
    }
    pub fn get_message(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }
}

#[derive(Debug, Clone)]
pub struct I18n {
    // Keyed by locale and then by message key
    // e.g. messages["en"]["all-failed"] = "All translation services failed"
    //      messages["ar"]["all-failed"] = "فشلت جميع خدمات الترجمة"
    messages: HashMap<String, LocalizedMessages>,
    default_locale: String,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl I18n {
    pub fn new() -> Self {
        I18n {
            messages: HashMap::new(),
            default_locale: "en".to_string(),
        }
    }

    /// The bundled Arabic and English UI messages
    pub fn bundled() -> Self {
        catalog::bundled_messages()
    }

    pub fn with_locale(&mut self, locale: &str) -> &mut Self {
        self.default_locale = locale.to_lowercase();
        self
    }

    pub fn get_default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn with_messages_for_locale(
        &mut self,
        locale: &str,
        messages: LocalizedMessages,
    ) -> &mut Self {
        self.messages.insert(locale.to_lowercase(), messages);
        self
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.messages.contains_key(&locale.to_lowercase())
    }

    /// Look up `key` in `locale`, then in the default locale, then fall back
    /// to the key itself.
    pub fn get_message(&self, locale: &str, key: &str) -> String {
        [locale.to_lowercase(), self.default_locale.clone()]
            .iter()
            .filter_map(|l| self.messages.get(l))
            .find_map(|messages| messages.get_message(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Look up a message and substitute `$1`, `$2`, ... with `values`.
    ///
    /// Parameters without a value are left as written.
    pub fn localize(&self, locale: &str, key: &str, values: &[String]) -> String {
        let message = self.get_message(locale, key);
        PARAMETER
            .replace_all(&message, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| values.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
