//! Bundled UI messages and language names (Arabic and English)

use crate::{I18n, LocalizedMessages};

/// (code, Arabic name, English name), in the order the language picker shows them
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("auto", "تلقائي", "Auto-detect"),
    ("ar", "العربية", "Arabic"),
    ("en", "الإنجليزية", "English"),
    ("fr", "الفرنسية", "French"),
    ("es", "الإسبانية", "Spanish"),
    ("de", "الألمانية", "German"),
    ("it", "الإيطالية", "Italian"),
    ("ru", "الروسية", "Russian"),
    ("zh", "الصينية", "Chinese"),
    ("ja", "اليابانية", "Japanese"),
    ("ko", "الكورية", "Korean"),
    ("tr", "التركية", "Turkish"),
    ("hi", "الهندية", "Hindi"),
    ("pt", "البرتغالية", "Portuguese"),
    ("sq", "الألبانية", "Albanian"),
];

const ARABIC: &[(&str, &str)] = &[
    ("translating", "جاري الترجمة..."),
    ("provider-error", "حدث خطأ أثناء الترجمة باستخدام هذه الخدمة"),
    ("target-error", "حدث خطأ أثناء الترجمة إلى هذه اللغة"),
    ("request-failed", "حدث خطأ أثناء الترجمة"),
    ("all-failed", "فشلت جميع خدمات الترجمة"),
    ("language-detected", "تم اكتشاف اللغة: $1 ($2)"),
    ("detected-badge", "تم اكتشاف: $1"),
    ("detection-failed", "فشل في اكتشاف اللغة، استخدام $1 كلغة افتراضية"),
    ("empty-text", "الرجاء إدخال نص للترجمة"),
    ("no-target", "الرجاء اختيار لغة هدف واحدة على الأقل"),
    ("auto-swap", "لا يمكن التبديل عند استخدام الكشف التلقائي للغة"),
];

const ENGLISH: &[(&str, &str)] = &[
    ("translating", "Translating..."),
    ("provider-error", "This service failed to translate the text"),
    ("target-error", "Translation into this language failed"),
    ("request-failed", "An error occurred while translating"),
    ("all-failed", "All translation services failed"),
    ("language-detected", "Detected language: $1 ($2)"),
    ("detected-badge", "Detected: $1"),
    ("detection-failed", "Language detection failed, using $1 instead"),
    ("empty-text", "Please enter some text to translate"),
    ("no-target", "Please select at least one target language"),
    ("auto-swap", "Languages cannot be swapped while auto-detecting the source"),
];

pub(crate) fn bundled_messages() -> I18n {
    let mut i18n = I18n::new();
    for (locale, table) in [("ar", ARABIC), ("en", ENGLISH)] {
        let mut messages = LocalizedMessages::new();
        for (key, message) in table {
            messages.with_message(key, message);
        }
        i18n.with_messages_for_locale(locale, messages);
    }
    i18n
}

/// Display name of `code` in the UI `locale` (Arabic for `ar`, English otherwise).
///
/// Region subtags are ignored; unknown codes are returned unchanged.
pub fn language_name(code: &str, locale: &str) -> String {
    let base = code.split(['-', '_']).next().unwrap_or(code).to_lowercase();
    LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == base)
        .map(|(_, ar, en)| if is_arabic(locale) { *ar } else { *en })
        .unwrap_or(code)
        .to_string()
}

/// All known languages as (code, localized name), in picker order
pub fn language_names(locale: &str) -> Vec<(&'static str, &'static str)> {
    LANGUAGES
        .iter()
        .map(|(code, ar, en)| (*code, if is_arabic(locale) { *ar } else { *en }))
        .collect()
}

fn is_arabic(locale: &str) -> bool {
    locale.trim().to_lowercase().starts_with("ar")
}
