//! Property-based invariant tests for page state under arbitrary interaction.
//!
//! 1. Exactly one language option is selected and it matches the current language
//! 2. `aria-expanded` mirrors the menu state
//! 3. At most one notification hide timer is pending; visibility follows it
//! 4. At most one tab panel is active

use std::time::Duration;

use dcr_backend::{PageBackend, PageDom};
use dcr_i18n::LanguageCode;
use dcr_web::memory::{LandingPage, MemoryBackend, MemoryNode};
use dcr_web::notification::VISIBLE_CLASS;
use dcr_web::{MenuState, Page, PageConfig};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    SetLanguage(String),
    Toggle,
    ClickOutside,
    ClickInside,
    Escape,
    ClickOption(LanguageCode),
    Copy,
    Settle,
    Advance(u64),
    SwitchTab(&'static str),
}

fn any_language() -> impl Strategy<Value = LanguageCode> {
    prop::sample::select(LanguageCode::ALL.to_vec())
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any_language().prop_map(|lang| Op::SetLanguage(lang.as_str().to_owned())),
        "[a-z]{2}".prop_map(Op::SetLanguage),
        Just(Op::Toggle),
        Just(Op::ClickOutside),
        Just(Op::ClickInside),
        Just(Op::Escape),
        any_language().prop_map(Op::ClickOption),
        Just(Op::Copy),
        Just(Op::Settle),
        (0u64..3_000).prop_map(Op::Advance),
        prop::sample::select(vec!["curl", "docker", "other"]).prop_map(Op::SwitchTab),
    ]
}

fn option_for(page: &Page<MemoryBackend>, lang: LanguageCode) -> Option<MemoryNode> {
    let dom = page.backend().dom();
    dom.query_all(".lang-option")
        .into_iter()
        .find(|node| dom.attribute(node, "data-lang").as_deref() == Some(lang.as_str()))
}

fn apply(page: &Page<MemoryBackend>, nodes: &LandingPage, op: &Op) {
    let backend = page.backend();
    let dom = backend.dom();
    match op {
        Op::SetLanguage(code) => {
            page.set_language(code);
        }
        Op::Toggle => {
            page.toggle_lang_menu();
        }
        Op::ClickOutside => {
            dom.click(nodes.outside);
        }
        Op::ClickInside => {
            dom.click(nodes.current_code);
        }
        Op::Escape => {
            dom.key_down(None, "Escape");
        }
        Op::ClickOption(lang) => {
            if let Some(node) = option_for(page, *lang) {
                dom.click(node);
            }
        }
        Op::Copy => page.copy_command(),
        Op::Settle => backend.clipboard().settle(),
        Op::Advance(ms) => backend.timers().advance(Duration::from_millis(*ms)),
        Op::SwitchTab(name) => {
            let clicked = match *name {
                "curl" => Some(nodes.tab_curl),
                "docker" => Some(nodes.tab_docker),
                _ => None,
            };
            page.switch_tab(name, clicked.as_ref());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1–4. Invariants hold after every step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn page_invariants_hold(ops in prop::collection::vec(any_op(), 0..40)) {
        let (backend, nodes) = MemoryBackend::landing_page();
        let page = Page::with_builtin_table(backend, PageConfig::default());
        page.start();
        let mut expected = LanguageCode::En;

        for op in &ops {
            apply(&page, &nodes, op);
            match op {
                Op::SetLanguage(code) => {
                    if let Some(lang) = LanguageCode::parse(code) {
                        expected = lang;
                    }
                }
                Op::ClickOption(lang) => expected = *lang,
                _ => {}
            }

            let backend = page.backend();
            let dom = backend.dom();
            prop_assert_eq!(page.current_language(), expected);

            let selected: Vec<String> = dom
                .query_all(".lang-option")
                .into_iter()
                .filter(|node| dom.has_class(node, "active"))
                .filter_map(|node| dom.attribute(&node, "data-lang"))
                .collect();
            prop_assert_eq!(selected, vec![expected.as_str().to_owned()]);

            let expanded = dom.attribute(&nodes.lang_button, "aria-expanded");
            let open = page.menu_state() == MenuState::Open;
            prop_assert_eq!(expanded.as_deref(), Some(if open { "true" } else { "false" }));

            let pending = backend.timers().pending();
            prop_assert!(pending <= 1);
            prop_assert_eq!(dom.has_class(&nodes.notification, VISIBLE_CLASS), pending == 1);

            let active_panels = dom
                .query_all(".tab-content")
                .into_iter()
                .filter(|node| dom.has_class(node, "active"))
                .count();
            prop_assert!(active_panels <= 1);
        }
    }
}
