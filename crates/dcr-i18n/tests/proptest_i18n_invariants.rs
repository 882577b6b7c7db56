//! Property-based invariant tests for language codes and the translation table.
//!
//! 1. Parsing accepts exactly the supported set
//! 2. Locale detection depends only on the prefix before the first `-`
//! 3. Missing keys always return None
//! 4. Coverage: present + missing == total, percent in [0, 100]
//! 5. Builtin table: every key resolves for every language

use dcr_i18n::{LanguageCode, LocaleEntry, TranslationTable, detect_from_locale};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn any_language() -> impl Strategy<Value = LanguageCode> {
    prop::sample::select(LanguageCode::ALL.to_vec())
}

fn is_supported(code: &str) -> bool {
    LanguageCode::ALL.iter().any(|lang| lang.as_str() == code)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Parsing accepts exactly the supported set
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parse_matches_membership(code in "[a-zA-Z-]{0,6}") {
        let parsed = LanguageCode::parse(&code);
        prop_assert_eq!(parsed.is_some(), is_supported(&code));
        if let Some(lang) = parsed {
            prop_assert_eq!(lang.as_str(), code.as_str());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Locale detection uses the prefix only
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detect_ignores_region_suffix(lang in any_language(), region in "[A-Za-z0-9-]{0,10}") {
        let locale = format!("{}-{}", lang.as_str(), region);
        prop_assert_eq!(detect_from_locale(&locale), Some(lang));
    }

    #[test]
    fn detect_never_panics(locale in ".*") {
        let _ = detect_from_locale(&locale);
    }

    #[test]
    fn detect_rejects_unsupported_prefix(prefix in "[a-z]{2}", region in "[A-Z]{2}") {
        prop_assume!(!is_supported(&prefix));
        let locale = format!("{prefix}-{region}");
        prop_assert_eq!(detect_from_locale(&locale), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Missing keys return None
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn missing_key_returns_none(lang in any_language(), key in "zz_[a-z]{1,12}") {
        let table = TranslationTable::builtin().expect("builtin table parses");
        prop_assert_eq!(table.get(lang, &key), None);
        let empty = TranslationTable::new();
        prop_assert_eq!(empty.get(lang, &key), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Coverage report is internally consistent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coverage_bounded_and_consistent(n_keys in 0usize..=10, stride in 1usize..=4) {
        let mut table = TranslationTable::new();
        for (idx, lang) in LanguageCode::ALL.into_iter().enumerate() {
            if idx % stride == 0 {
                let mut entry = LocaleEntry::new(lang.label());
                for k in 0..n_keys {
                    if k % (idx + 1) == 0 {
                        entry.insert(format!("key_{k}"), format!("{}_{k}", lang.as_str()));
                    }
                }
                table.add_language(lang, entry);
            }
        }

        let report = table.coverage_report();
        prop_assert_eq!(report.locales.len(), LanguageCode::ALL.len());
        for lc in &report.locales {
            prop_assert!(
                (0.0..=100.0).contains(&lc.coverage_percent),
                "coverage {} out of bounds for {}",
                lc.coverage_percent, lc.language
            );
            prop_assert_eq!(lc.present + lc.missing.len(), report.total_keys);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Builtin table resolves every key in every language
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn builtin_table_resolves_every_key() {
    let table = TranslationTable::builtin().expect("builtin table parses");
    let keys: Vec<String> = table.keys().into_iter().map(str::to_owned).collect();
    assert!(keys.iter().any(|k| k == "hero_title"));
    for lang in LanguageCode::ALL {
        for key in &keys {
            let value = table.get(lang, key);
            assert!(
                value.is_some_and(|v| !v.is_empty()),
                "{lang} is missing `{key}`"
            );
        }
    }
}
