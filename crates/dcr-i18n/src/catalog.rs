#![forbid(unsafe_code)]

//! Translation table: per-language text fragments plus a flag glyph.
//!
//! The on-disk format is a JSON object keyed by language code. Each language
//! object carries a reserved `flag` entry and any number of fragment keys:
//!
//! ```json
//! {
//!   "en": { "flag": "🇬🇧", "hero_title": "Container registry in one command" },
//!   "fr": { "flag": "🇫🇷", "hero_title": "Un registre de conteneurs en une commande" }
//! }
//! ```
//!
//! Lookups never fail loudly: a missing key yields `None` and callers keep
//! whatever text the element already had.

use std::collections::{BTreeMap, BTreeSet};

use crate::language::LanguageCode;

/// Reserved per-language key holding the display glyph.
pub const FLAG_KEY: &str = "flag";

const BUILTIN_JSON: &str = include_str!("../translations.json");

/// Errors raised while loading a translation table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum I18nError {
    #[error("unsupported language code `{0}`")]
    UnsupportedLanguage(String),
    #[error("language `{0}` has no `flag` entry")]
    MissingFlag(LanguageCode),
    #[error("malformed translation table: {0}")]
    Json(String),
}

/// Localized strings and flag glyph for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleEntry {
    flag: String,
    strings: BTreeMap<String, String>,
}

impl LocaleEntry {
    /// Create an entry with the given flag glyph and no strings.
    #[must_use]
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            strings: BTreeMap::new(),
        }
    }

    /// Insert or replace a fragment.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Mapping from language code to its [`LocaleEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: BTreeMap<LanguageCode, LocaleEntry>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table bundled with the page.
    pub fn builtin() -> Result<Self, I18nError> {
        Self::from_json_str(BUILTIN_JSON)
    }

    /// Parse a table from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, I18nError> {
        let raw: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_str(json).map_err(|err| I18nError::Json(err.to_string()))?;

        let mut table = Self::new();
        for (code, mut fragments) in raw {
            let lang = code.parse::<LanguageCode>()?;
            let flag = fragments
                .remove(FLAG_KEY)
                .ok_or(I18nError::MissingFlag(lang))?;
            table.entries.insert(
                lang,
                LocaleEntry {
                    flag,
                    strings: fragments,
                },
            );
        }
        Ok(table)
    }

    /// Add or replace a language entry.
    pub fn add_language(&mut self, lang: LanguageCode, entry: LocaleEntry) {
        self.entries.insert(lang, entry);
    }

    /// Localized fragment for `key` in `lang`, if present.
    ///
    /// An empty fragment counts as missing.
    #[must_use]
    pub fn get(&self, lang: LanguageCode, key: &str) -> Option<&str> {
        self.entries
            .get(&lang)
            .and_then(|entry| entry.get(key))
            .filter(|text| !text.is_empty())
    }

    /// Flag glyph for `lang`, if the language has an entry.
    #[must_use]
    pub fn flag(&self, lang: LanguageCode) -> Option<&str> {
        self.entries.get(&lang).map(LocaleEntry::flag)
    }

    #[must_use]
    pub fn entry(&self, lang: LanguageCode) -> Option<&LocaleEntry> {
        self.entries.get(&lang)
    }

    /// Languages present in the table, in menu order.
    pub fn languages(&self) -> impl Iterator<Item = LanguageCode> + '_ {
        self.entries.keys().copied()
    }

    /// Union of fragment keys across all languages, sorted.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<&str> {
        self.entries.values().flat_map(LocaleEntry::keys).collect()
    }

    /// Per-language coverage against the union of keys.
    ///
    /// Every supported language is reported, including ones with no entry.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all_keys = self.keys();
        let total_keys = all_keys.len();

        let locales = LanguageCode::ALL
            .into_iter()
            .map(|language| {
                let entry = self.entries.get(&language);
                let missing: Vec<String> = all_keys
                    .iter()
                    .filter(|key| self.get(language, key).is_none())
                    .map(|key| (*key).to_owned())
                    .collect();
                let present = total_keys - missing.len();
                let coverage_percent = if total_keys == 0 {
                    100.0
                } else {
                    present as f64 * 100.0 / total_keys as f64
                };
                LocaleCoverage {
                    language,
                    has_entry: entry.is_some(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_keys,
            locales,
        }
    }
}

/// Coverage of one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCoverage {
    pub language: LanguageCode,
    /// Whether the table has any entry (and therefore a flag) for this language.
    pub has_entry: bool,
    pub present: usize,
    pub missing: Vec<String>,
    /// In `[0, 100]`.
    pub coverage_percent: f64,
}

impl LocaleCoverage {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_entry && self.missing.is_empty()
    }
}

/// Coverage summary for the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// Languages that are missing an entry or at least one key.
    pub fn incomplete(&self) -> impl Iterator<Item = &LocaleCoverage> {
        self.locales.iter().filter(|lc| !lc.is_complete())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete().next().is_none()
    }
}
