#![forbid(unsafe_code)]

//! Page context and event wiring.
//!
//! [`Page`] owns the backend and every component's state behind one `Rc`.
//! Registered handlers hold a `Weak` to it, so dropping the last `Page`
//! turns every pending callback into a no-op.
//!
//! Borrows of component state are scoped to a single call and are never held
//! while host code may re-enter: timers and clipboard completions always run
//! on a later turn.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use dcr_backend::{
    ClipboardWriter, ControlIds, DomEvent, EmbeddedGraphic, EventKind, EventResponse, HostError,
    ListenOptions, ListenTarget, NodeOf, PageBackend, PageDom,
};
use dcr_i18n::{LanguageCode, TranslationTable};
use tracing::{debug, error, info, warn};

use crate::autoplay::{AutoplayHook, AutoplayOutcome};
use crate::clipboard::{fallback_copy, is_command_box_copy, manual_copy_message};
use crate::config::PageConfig;
use crate::language_selector::{InitReport, LanguageSelector, MenuState, is_activation_key};
use crate::notification::Notification;
use crate::tabs::{TabSwitch, switch_tab};

/// Class removed from `<body>` once the script runs.
pub const NO_JS_CLASS: &str = "no-js";

struct PageInner<B: PageBackend> {
    backend: B,
    config: PageConfig,
    selector: RefCell<LanguageSelector<NodeOf<B>>>,
    notification: RefCell<Notification>,
    autoplay: RefCell<AutoplayHook>,
    started: Cell<bool>,
}

/// Shared handle to the page context.
pub struct Page<B: PageBackend> {
    inner: Rc<PageInner<B>>,
}

impl<B: PageBackend> Clone for Page<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: PageBackend + 'static> Page<B> {
    #[must_use]
    pub fn new(backend: B, config: PageConfig, table: TranslationTable) -> Self {
        let selector = LanguageSelector::new(table, &config);
        let notification = Notification::new(&config);
        Self {
            inner: Rc::new(PageInner {
                backend,
                config,
                selector: RefCell::new(selector),
                notification: RefCell::new(notification),
                autoplay: RefCell::new(AutoplayHook::new()),
                started: Cell::new(false),
            }),
        }
    }

    /// Page using the bundled translation table.
    ///
    /// A table that fails to load leaves every element with its markup text.
    #[must_use]
    pub fn with_builtin_table(backend: B, config: PageConfig) -> Self {
        let table = TranslationTable::builtin().unwrap_or_else(|err| {
            error!(%err, "bundled translations failed to load");
            TranslationTable::new()
        });
        Self::new(backend, config, table)
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn current_language(&self) -> LanguageCode {
        self.inner.selector.borrow().current()
    }

    #[must_use]
    pub fn menu_state(&self) -> MenuState {
        self.inner.selector.borrow().menu_state()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.inner.started.get()
    }

    /// Start now if the document is parsed, otherwise on `DOMContentLoaded`.
    pub fn mount(&self) {
        let dom = self.inner.backend.dom();
        if dom.is_ready() {
            self.start();
            return;
        }
        let weak = self.downgrade();
        dom.listen(
            ListenTarget::Document,
            EventKind::DomReady,
            ListenOptions::ONCE,
            Box::new(move |_: &DomEvent<NodeOf<B>>| {
                if let Some(page) = upgrade(&weak) {
                    page.start();
                }
                EventResponse::Continue
            }),
        );
        debug!("waiting for DOMContentLoaded");
    }

    /// Initialise every component and register the page's listeners.
    ///
    /// Returns `None` if the page was already started.
    pub fn start(&self) -> Option<InitReport> {
        if self.inner.started.replace(true) {
            debug!("page already started");
            return None;
        }
        let dom = self.inner.backend.dom();
        if let Some(body) = dom.body() {
            dom.set_class(&body, NO_JS_CLASS, false);
        }

        self.check_coverage();
        let report = self
            .inner
            .selector
            .borrow_mut()
            .initialize(&self.inner.backend);

        self.register_option_listeners();
        self.register_document_listeners();
        self.register_command_box();
        self.register_demo_autoplay();

        info!(lang = %report.language, "page started");
        Some(report)
    }

    fn check_coverage(&self) {
        let selector = self.inner.selector.borrow();
        let report = selector.table().coverage_report();
        for locale in report.incomplete() {
            warn!(
                lang = %locale.language,
                has_entry = locale.has_entry,
                missing = locale.missing.len(),
                coverage = locale.coverage_percent,
                "incomplete translations"
            );
        }
    }

    fn register_option_listeners(&self) {
        let options: Vec<(LanguageCode, NodeOf<B>)> = self
            .inner
            .selector
            .borrow()
            .options()
            .iter()
            .map(|option| (option.language, option.node.clone()))
            .collect();
        let dom = self.inner.backend.dom();

        for (language, node) in options {
            let weak = self.downgrade();
            dom.listen(
                ListenTarget::Node(&node),
                EventKind::Click,
                ListenOptions::default(),
                Box::new(move |_: &DomEvent<NodeOf<B>>| {
                    if let Some(page) = upgrade(&weak) {
                        page.on_option_click(language);
                    }
                    EventResponse::Continue
                }),
            );

            let weak = self.downgrade();
            dom.listen(
                ListenTarget::Node(&node),
                EventKind::KeyDown,
                ListenOptions::default(),
                Box::new(move |event: &DomEvent<NodeOf<B>>| match (upgrade(&weak), event.key()) {
                    (Some(page), Some(key)) => page.on_option_keydown(language, key),
                    _ => EventResponse::Continue,
                }),
            );
        }
    }

    fn register_document_listeners(&self) {
        let dom = self.inner.backend.dom();

        let weak = self.downgrade();
        dom.listen(
            ListenTarget::Document,
            EventKind::Click,
            ListenOptions::default(),
            Box::new(move |event: &DomEvent<NodeOf<B>>| {
                if let Some(page) = upgrade(&weak) {
                    page.on_document_click(event.target.as_ref());
                }
                EventResponse::Continue
            }),
        );

        let weak = self.downgrade();
        dom.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            ListenOptions::default(),
            Box::new(move |event: &DomEvent<NodeOf<B>>| {
                if let (Some(page), Some(key)) = (upgrade(&weak), event.key()) {
                    page.on_document_keydown(key);
                }
                EventResponse::Continue
            }),
        );
    }

    fn register_command_box(&self) {
        let dom = self.inner.backend.dom();
        let Some(command_box) = dom.query_one(&self.inner.config.elements.command_box_selector)
        else {
            debug!("no command box on this page");
            return;
        };
        let weak = self.downgrade();
        dom.listen(
            ListenTarget::Node(&command_box),
            EventKind::Click,
            ListenOptions::default(),
            Box::new(move |event: &DomEvent<NodeOf<B>>| {
                if let Some(page) = upgrade(&weak) {
                    page.on_command_box_click(event.target.as_ref());
                }
                EventResponse::Continue
            }),
        );
    }

    fn register_demo_autoplay(&self) {
        let dom = self.inner.backend.dom();
        let Some(graphic) = dom.by_id(&self.inner.config.elements.demo_graphic_id) else {
            debug!("no demo graphic on this page");
            return;
        };
        // The module may start after the graphic's only load event.
        if self.inner.backend.graphic().is_loaded(&graphic) {
            let outcome = self.on_graphic_load(&graphic);
            debug!(?outcome, "demo graphic loaded before start");
            return;
        }
        let weak = self.downgrade();
        dom.listen(
            ListenTarget::Node(&graphic),
            EventKind::Load,
            ListenOptions::ONCE,
            Box::new(move |event: &DomEvent<NodeOf<B>>| {
                if let (Some(page), Some(host)) = (upgrade(&weak), event.target.as_ref()) {
                    page.on_graphic_load(host);
                }
                EventResponse::Continue
            }),
        );
    }

    /// Close the menu when the click landed outside the selector.
    pub fn on_document_click(&self, target: Option<&NodeOf<B>>) {
        let closed = self
            .inner
            .selector
            .borrow_mut()
            .handle_document_click(self.inner.backend.dom(), target);
        if closed {
            debug!("language menu closed by outside click");
        }
    }

    /// Escape closes the menu.
    pub fn on_document_keydown(&self, key: &str) {
        self.inner
            .selector
            .borrow_mut()
            .handle_document_key(self.inner.backend.dom(), key);
    }

    pub fn on_option_click(&self, language: LanguageCode) {
        self.inner
            .selector
            .borrow_mut()
            .select(&self.inner.backend, language);
    }

    /// Enter or Space on a focused option selects it and suppresses the
    /// default action (page scroll for Space).
    pub fn on_option_keydown(&self, language: LanguageCode, key: &str) -> EventResponse {
        let response = if is_activation_key(key) {
            EventResponse::PreventDefault
        } else {
            EventResponse::Continue
        };
        if response == EventResponse::PreventDefault {
            self.on_option_click(language);
        }
        response
    }

    pub fn on_command_box_click(&self, target: Option<&NodeOf<B>>) {
        let dom = self.inner.backend.dom();
        if is_command_box_copy(dom, target, &self.inner.config.elements.copy_button_class) {
            self.copy_command();
        }
    }

    pub fn on_graphic_load(&self, host: &NodeOf<B>) -> AutoplayOutcome {
        let elements = &self.inner.config.elements;
        let ids = ControlIds {
            play: &elements.play_control_id,
            pause: &elements.pause_control_id,
        };
        self.inner
            .autoplay
            .borrow_mut()
            .on_load(self.inner.backend.graphic(), host, ids)
    }

    pub fn switch_tab(&self, tab_name: &str, clicked: Option<&NodeOf<B>>) -> TabSwitch {
        switch_tab(self.inner.backend.dom(), &self.inner.config, tab_name, clicked)
    }

    pub fn toggle_lang_menu(&self) -> MenuState {
        self.inner
            .selector
            .borrow_mut()
            .toggle_menu(self.inner.backend.dom())
    }

    /// Apply a language by code. Unsupported codes are ignored.
    pub fn set_language(&self, code: &str) -> Option<LanguageCode> {
        self.inner
            .selector
            .borrow_mut()
            .set_language_str(&self.inner.backend, code)
    }

    /// Copy the install command shown on the page.
    pub fn copy_command(&self) {
        self.copy_element_text(&self.inner.config.elements.install_command_id);
    }

    /// Copy the compose snippet shown on the page.
    pub fn copy_docker_compose(&self) {
        self.copy_element_text(&self.inner.config.elements.docker_compose_id);
    }

    fn copy_element_text(&self, id: &str) {
        let dom = self.inner.backend.dom();
        let Some(node) = dom.by_id(id) else {
            warn!(id, "copy source element missing");
            return;
        };
        let text = dom.text(&node);
        self.copy_to_clipboard(&text);
    }

    /// Copy `text`, falling back to the selection technique when the
    /// asynchronous clipboard is missing or refuses the write.
    pub fn copy_to_clipboard(&self, text: &str) {
        let weak = self.downgrade();
        let owned = text.to_owned();
        self.inner.backend.clipboard().write_text(
            text,
            Box::new(move |result: Result<(), HostError>| {
                let Some(page) = upgrade(&weak) else {
                    return;
                };
                match result {
                    Ok(()) => {
                        debug!("copied with the async clipboard");
                        page.show_notification();
                    }
                    Err(err) => {
                        debug!(%err, "async clipboard failed, using fallback");
                        page.copy_with_fallback(&owned);
                    }
                }
            }),
        );
    }

    fn copy_with_fallback(&self, text: &str) {
        let dom = self.inner.backend.dom();
        match fallback_copy(dom, text) {
            Ok(()) => self.show_notification(),
            Err(err) => {
                error!(%err, "copy failed");
                dom.alert(&manual_copy_message(text));
            }
        }
    }

    fn show_notification(&self) {
        let weak = self.downgrade();
        self.inner.notification.borrow_mut().show(
            &self.inner.backend,
            Box::new(move || {
                if let Some(page) = upgrade(&weak) {
                    page.inner
                        .notification
                        .borrow_mut()
                        .hide(page.inner.backend.dom());
                }
            }),
        );
    }

    fn downgrade(&self) -> Weak<PageInner<B>> {
        Rc::downgrade(&self.inner)
    }
}

fn upgrade<B: PageBackend>(weak: &Weak<PageInner<B>>) -> Option<Page<B>> {
    weak.upgrade().map(|inner| Page { inner })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn page() -> (Page<MemoryBackend>, crate::memory::LandingPage) {
        let (backend, nodes) = MemoryBackend::landing_page();
        (
            Page::with_builtin_table(backend, PageConfig::default()),
            nodes,
        )
    }

    #[test]
    fn start_removes_no_js_and_runs_once() {
        let (page, _) = page();
        assert!(page.start().is_some());
        let dom = page.backend().dom();
        assert!(!dom.has_class(&dom.body_node(), NO_JS_CLASS));

        let listeners = dom.listener_count();
        assert!(page.start().is_none());
        assert_eq!(dom.listener_count(), listeners);
    }

    #[test]
    fn mount_waits_for_dom_ready() {
        let (page, _) = page();
        page.backend().dom().set_loading();
        page.mount();
        assert!(!page.is_started());

        page.backend().dom().dom_ready();
        assert!(page.is_started());
    }

    #[test]
    fn copy_waits_for_the_async_clipboard() {
        let (page, _) = page();
        page.start();
        page.copy_command();

        assert_eq!(page.backend().clipboard().pending(), 1);
        assert_eq!(page.backend().timers().pending(), 0);

        page.backend().clipboard().settle();
        assert_eq!(page.backend().timers().pending(), 1);
    }

    #[test]
    fn option_keydown_ignores_other_keys() {
        let (page, _) = page();
        page.start();
        assert_eq!(
            page.on_option_keydown(LanguageCode::De, "Tab"),
            EventResponse::Continue
        );
        assert_eq!(page.current_language(), LanguageCode::En);
    }
}
