//! Browser smoke tests; run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use dcr_backend::{PageBackend, PageDom};
use dcr_i18n::LanguageCode;
use dcr_web::{MenuState, Page, PageConfig, WebBackend};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn page() -> Page<WebBackend> {
    let backend = WebBackend::new().expect("browser window");
    Page::with_builtin_table(backend, PageConfig::default())
}

#[wasm_bindgen_test]
fn starts_against_an_empty_document() {
    let page = page();
    let report = page.start().expect("first start");
    assert!(LanguageCode::ALL.contains(&report.language));
    assert_eq!(page.menu_state(), MenuState::Closed);
}

#[wasm_bindgen_test]
fn set_language_updates_document_lang() {
    let page = page();
    page.start();
    page.set_language("de");
    let dom = page.backend().dom();
    let body = dom.body().expect("body");
    let lang = dom
        .closest(&body, "html")
        .and_then(|html| dom.attribute(&html, "lang"));
    assert_eq!(lang.as_deref(), Some("de"));
}
