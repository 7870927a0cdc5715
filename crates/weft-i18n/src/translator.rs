#![forbid(unsafe_code)]

//! Locale string tables and key lookup with echo fallback.
//!
//! A [`Translator`] holds one [`StringTable`] per locale tag plus an active
//! locale and a fallback locale. Lookup walks active → fallback → the key
//! itself, so a missing translation degrades to showing the key rather than
//! failing. There is deliberately no error type anywhere in this module.

use std::collections::HashMap;

use crate::formatter::format;

/// Key → template map for a single locale.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a template under `key`.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Look up a template.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registered keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Record of a locale switch, returned by [`Translator::set_locale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChange {
    /// The locale that was active before the switch.
    pub previous: String,
    /// The locale that is active now.
    pub current: String,
}

/// Application-wide translation registry.
///
/// Lookup order: active locale table, then the fallback locale table, then
/// the key itself. The echo fallback means `lookup` always produces
/// something renderable.
#[derive(Debug, Clone)]
pub struct Translator {
    locales: HashMap<String, StringTable>,
    active: String,
    fallback: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Create a translator with `"en"` as both active and fallback locale.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback("en")
    }

    /// Create a translator whose active and fallback locale are both `tag`.
    #[must_use]
    pub fn with_fallback(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            locales: HashMap::new(),
            active: tag.clone(),
            fallback: tag,
        }
    }

    /// Register (or replace) the string table for a locale.
    pub fn add_locale(&mut self, tag: impl Into<String>, table: StringTable) {
        self.locales.insert(tag.into(), table);
    }

    /// Switch the active locale and report the transition.
    ///
    /// Switching to an unregistered locale is allowed; lookups then resolve
    /// through the fallback chain.
    pub fn set_locale(&mut self, tag: impl Into<String>) -> LocaleChange {
        let current = tag.into();
        let previous = std::mem::replace(&mut self.active, current.clone());
        LocaleChange { previous, current }
    }

    /// The active locale tag.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.active
    }

    /// Registered locale tags, in arbitrary order.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    /// Whether `key` resolves to a registered template (active or fallback).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.table_get(key).is_some()
    }

    /// Resolve `key` to its template.
    ///
    /// Returns the key itself when no table provides a translation.
    #[must_use]
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.table_get(key).unwrap_or(key)
    }

    /// Resolve `key` and apply replace pairs to the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_i18n::{StringTable, Translator};
    ///
    /// let mut en = StringTable::new();
    /// en.insert("patient.name", "{first} {last}");
    /// let mut translator = Translator::new();
    /// translator.add_locale("en", en);
    ///
    /// let text = translator.lookup_fmt(
    ///     "patient.name",
    ///     [("{first}", "Diane"), ("{last}", "Selden")],
    /// );
    /// assert_eq!(text, "Diane Selden");
    /// ```
    #[must_use]
    pub fn lookup_fmt<'a>(
        &self,
        key: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> String {
        format(self.lookup(key), pairs)
    }

    fn table_get(&self, key: &str) -> Option<&str> {
        if let Some(template) = self.locales.get(&self.active).and_then(|t| t.get(key)) {
            return Some(template);
        }
        if self.fallback != self.active {
            return self.locales.get(&self.fallback).and_then(|t| t.get(key));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Translator {
        let mut en = StringTable::new();
        en.insert("greeting", "Hello");
        en.insert("patient.name", "{first} {last}");
        let mut de = StringTable::new();
        de.insert("greeting", "Hallo");
        de.insert("patient.name", "{last}, {first}");
        let mut translator = Translator::new();
        translator.add_locale("en", en);
        translator.add_locale("de", de);
        translator
    }

    #[test]
    fn lookup_resolves_active_locale() {
        let translator = sample();
        assert_eq!(translator.lookup("greeting"), "Hello");
    }

    #[test]
    fn missing_key_echoes_back() {
        let translator = sample();
        assert_eq!(translator.lookup("missing.key"), "missing.key");
        assert!(!translator.contains("missing.key"));
    }

    #[test]
    fn lookup_on_empty_translator_echoes() {
        let translator = Translator::new();
        assert_eq!(translator.lookup("anything"), "anything");
    }

    #[test]
    fn set_locale_switches_tables() {
        let mut translator = sample();
        let change = translator.set_locale("de");
        assert_eq!(change.previous, "en");
        assert_eq!(change.current, "de");
        assert_eq!(translator.lookup("greeting"), "Hallo");
    }

    #[test]
    fn unknown_locale_falls_back() {
        let mut translator = sample();
        translator.set_locale("fr");
        // No fr table; fallback "en" still resolves.
        assert_eq!(translator.lookup("greeting"), "Hello");
    }

    #[test]
    fn partial_locale_falls_back_per_key() {
        let mut fr = StringTable::new();
        fr.insert("greeting", "Bonjour");
        let mut translator = sample();
        translator.add_locale("fr", fr);
        translator.set_locale("fr");
        assert_eq!(translator.lookup("greeting"), "Bonjour");
        // Key missing from fr resolves through the fallback.
        assert_eq!(translator.lookup("patient.name"), "{first} {last}");
    }

    #[test]
    fn lookup_fmt_composes_with_formatter() {
        let translator = sample();
        let text = translator.lookup_fmt(
            "patient.name",
            [("{first}", "Diane"), ("{last}", "Selden")],
        );
        assert_eq!(text, "Diane Selden");
    }

    #[test]
    fn lookup_fmt_on_missing_key_formats_the_key() {
        let translator = sample();
        let text = translator.lookup_fmt("raw {x}", [("{x}", "value")]);
        assert_eq!(text, "raw value");
    }

    #[test]
    fn locales_lists_registered_tags() {
        let translator = sample();
        let mut tags = translator.locales();
        tags.sort_unstable();
        assert_eq!(tags, vec!["de", "en"]);
    }

    #[test]
    fn string_table_basics() {
        let mut table = StringTable::new();
        assert!(table.is_empty());
        table.insert("k", "v");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("k"), Some("v"));
        assert_eq!(table.get("other"), None);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["k"]);
    }
}
