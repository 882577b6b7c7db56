#![forbid(unsafe_code)]

//! The closed set of page languages.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::I18nError;

/// A supported UI language.
///
/// Declaration order is menu order; `Ord` follows it so tables keyed by
/// `LanguageCode` iterate in the same order the selector renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Fr,
    Es,
    De,
    Ja,
    Ko,
    Zh,
}

impl LanguageCode {
    /// Every supported language, in menu order.
    pub const ALL: [Self; 7] = [
        Self::En,
        Self::Fr,
        Self::Es,
        Self::De,
        Self::Ja,
        Self::Ko,
        Self::Zh,
    ];

    /// Language applied when neither storage nor the browser yields a match.
    pub const DEFAULT: Self = Self::En;

    /// Lower-case code as stored and written to `<html lang>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::De => "de",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Zh => "zh",
        }
    }

    /// Upper-case code shown on the selector button and menu entries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Fr => "FR",
            Self::Es => "ES",
            Self::De => "DE",
            Self::Ja => "JA",
            Self::Ko => "KO",
            Self::Zh => "ZH",
        }
    }

    /// Parse an exact lower-case code. Anything else is treated as absent.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == code)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| I18nError::UnsupportedLanguage(s.to_owned()))
    }
}

/// Derive a supported language from a browser locale string such as `fr-CA`.
///
/// Only the part before the first `-` is considered.
#[must_use]
pub fn detect_from_locale(locale: &str) -> Option<LanguageCode> {
    let prefix = locale.split('-').next()?;
    LanguageCode::parse(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_supported_code() {
        for lang in LanguageCode::ALL {
            assert_eq!(LanguageCode::parse(lang.as_str()), Some(lang));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_uppercase() {
        assert_eq!(LanguageCode::parse("xx"), None);
        assert_eq!(LanguageCode::parse("FR"), None);
        assert_eq!(LanguageCode::parse(""), None);
        assert_eq!(LanguageCode::parse("en-US"), None);
    }

    #[test]
    fn label_is_uppercase_code() {
        for lang in LanguageCode::ALL {
            assert_eq!(lang.label(), lang.as_str().to_ascii_uppercase());
        }
    }

    #[test]
    fn detect_uses_prefix_only() {
        assert_eq!(detect_from_locale("fr-CA"), Some(LanguageCode::Fr));
        assert_eq!(detect_from_locale("zh-Hans-CN"), Some(LanguageCode::Zh));
        assert_eq!(detect_from_locale("ja"), Some(LanguageCode::Ja));
        assert_eq!(detect_from_locale("xx-YY"), None);
        assert_eq!(detect_from_locale(""), None);
    }

    #[test]
    fn from_str_reports_the_rejected_code() {
        let err = "pt".parse::<LanguageCode>().unwrap_err();
        assert_eq!(err, I18nError::UnsupportedLanguage("pt".into()));
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&LanguageCode::Ko).unwrap();
        assert_eq!(json, "\"ko\"");
        let back: LanguageCode = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(back, LanguageCode::De);
    }

    #[test]
    fn ord_follows_menu_order() {
        let mut sorted = LanguageCode::ALL;
        sorted.sort();
        assert_eq!(sorted, LanguageCode::ALL);
    }
}
