use anyhow::{Result, anyhow};
use isolang::Language;

/// Locale utilities for ISO language code handling
///
/// The core treats locale codes as opaque strings; these helpers exist for
/// configuration validation and CLI output. They accept ISO 639-1 (2-letter)
/// and ISO 639-3 (3-letter) codes, optionally carrying a region subtag
/// ("en-US", "ar_EG") which is ignored for lookup purposes.
/// Strip an optional region subtag and lowercase the language part
fn language_part(code: &str) -> String {
    let trimmed = code.trim();
    let language = trimmed
        .split(['-', '_'])
        .next()
        .unwrap_or(trimmed);
    language.to_lowercase()
}

/// Resolve a locale code to an isolang Language
fn resolve(code: &str) -> Option<Language> {
    let language = language_part(code);
    match language.len() {
        2 => Language::from_639_1(&language),
        3 => Language::from_639_3(&language),
        _ => None,
    }
}

/// Validate that a locale code carries a known ISO 639 language
pub fn validate_locale_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid locale code: {}", code))
}

/// Check if two locale codes refer to the same language
///
/// Region subtags are ignored, so "en" and "en-GB" match.
pub fn locale_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve(code1), resolve(code2)) {
        (Some(lang1), Some(lang2)) => lang1 == lang2,
        _ => false,
    }
}

/// Get the English language name for a locale code
pub fn get_locale_name(code: &str) -> Result<String> {
    let lang = resolve(code)
        .ok_or_else(|| anyhow!("Failed to get language from locale code: {}", code))?;

    Ok(lang.to_name().to_string())
}
