#![forbid(unsafe_code)]

//! Internationalization (i18n) data for the dcr landing page.
//!
//! Provides the closed set of supported [`LanguageCode`]s, the bundled
//! [`TranslationTable`] with per-language flag glyphs, a coverage report
//! for spotting incomplete languages, and locale-prefix detection.
//!
//! # How it fits in the system
//! `dcr-web` resolves `data-i18n` keys through this crate before touching the
//! DOM. Nothing here knows about browsers, storage, or rendering, so the
//! catalog stays reusable and testable on native targets.

pub mod catalog;
pub mod language;

pub use catalog::{CoverageReport, I18nError, LocaleCoverage, LocaleEntry, TranslationTable};
pub use language::{LanguageCode, detect_from_locale};
