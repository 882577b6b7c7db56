#![forbid(unsafe_code)]

//! Language selector: current language, persistence, DOM sync, and the
//! options menu.
//!
//! [`LanguageSelector`] owns the page-wide language state. It is created once
//! at startup and shared by every handler through the page context; there is
//! no module-level state.
//!
//! # Invariants
//! - Exactly one language is current; it is always a supported code.
//! - After [`set_language`](LanguageSelector::set_language), exactly one menu
//!   option is marked selected and it carries the current code.
//! - The toggle button's `aria-expanded` mirrors [`MenuState`].
//!
//! # Failure modes
//! Unreadable storage, unsupported stored/browser codes, missing table keys,
//! and missing elements all degrade silently (logged, never surfaced).

use dcr_backend::{LocaleSource, PageBackend, PageDom, PreferenceStore};
use dcr_i18n::{LanguageCode, TranslationTable, detect_from_locale};
use tracing::{debug, info, warn};

use crate::config::{ElementIds, PageConfig};

/// Class toggled on the menu container while it is open.
pub const MENU_OPEN_CLASS: &str = "show";
/// Class marking the selected menu option.
pub const OPTION_ACTIVE_CLASS: &str = "active";
/// Class carried by every menu option.
pub const OPTION_CLASS: &str = "lang-option";
/// Attribute holding an option's language code.
pub const OPTION_LANG_ATTR: &str = "data-lang";

/// Open/closed state of the options menu. Initial state is `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }
}

/// Where the initial language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    /// Persisted preference.
    Stored,
    /// Browser locale prefix.
    Browser,
    /// Configured default.
    Default,
}

/// Result of [`LanguageSelector::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub language: LanguageCode,
    pub source: LanguageSource,
    /// Options created by this call (zero when the menu already existed).
    pub options_built: usize,
}

/// One entry of the options menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption<N> {
    pub language: LanguageCode,
    pub node: N,
    pub selected: bool,
}

/// Keys that activate a focused menu option.
#[must_use]
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// Page-wide language state and the DOM it drives.
#[derive(Debug)]
pub struct LanguageSelector<N> {
    table: TranslationTable,
    storage_key: String,
    default_language: LanguageCode,
    elements: ElementIds,
    current: LanguageCode,
    menu: MenuState,
    options: Vec<MenuOption<N>>,
}

impl<N: Clone + PartialEq> LanguageSelector<N> {
    #[must_use]
    pub fn new(table: TranslationTable, config: &PageConfig) -> Self {
        Self {
            table,
            storage_key: config.storage_key.clone(),
            default_language: config.default_language,
            elements: config.elements.clone(),
            current: config.default_language,
            menu: MenuState::Closed,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> LanguageCode {
        self.current
    }

    #[must_use]
    pub fn menu_state(&self) -> MenuState {
        self.menu
    }

    #[must_use]
    pub fn options(&self) -> &[MenuOption<N>] {
        &self.options
    }

    #[must_use]
    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Resolve the starting language, build the menu, and apply the language.
    ///
    /// Safe to call again: the menu is only built once.
    pub fn initialize<B>(&mut self, backend: &B) -> InitReport
    where
        B: PageBackend,
        B::Dom: PageDom<Node = N>,
    {
        let (language, source) = self.resolve_initial(backend);
        let options_built = self.build_menu(backend.dom());
        self.set_language(backend, language);
        info!(lang = %language, ?source, options_built, "language selector initialized");
        InitReport {
            language,
            source,
            options_built,
        }
    }

    fn resolve_initial<B: PageBackend>(&self, backend: &B) -> (LanguageCode, LanguageSource) {
        match backend.storage().get(&self.storage_key) {
            Ok(Some(stored)) => match LanguageCode::parse(&stored) {
                Some(lang) => return (lang, LanguageSource::Stored),
                None => debug!(stored = %stored, "ignoring unsupported stored language"),
            },
            Ok(None) => {}
            Err(err) => warn!(%err, key = %self.storage_key, "language preference unreadable"),
        }

        if let Some(locale) = backend.locale().language() {
            match detect_from_locale(&locale) {
                Some(lang) => return (lang, LanguageSource::Browser),
                None => debug!(locale = %locale, "browser locale not supported"),
            }
        }

        (self.default_language, LanguageSource::Default)
    }

    fn build_menu<D: PageDom<Node = N>>(&mut self, dom: &D) -> usize {
        if !self.options.is_empty() {
            return 0;
        }
        let Some(menu) = dom.by_id(&self.elements.lang_menu_id) else {
            warn!(id = %self.elements.lang_menu_id, "language menu container missing");
            return 0;
        };

        for language in LanguageCode::ALL {
            match self.create_option(dom, &menu, language) {
                Ok(node) => self.options.push(MenuOption {
                    language,
                    node,
                    selected: false,
                }),
                Err(err) => warn!(%err, lang = %language, "failed to build language option"),
            }
        }
        self.options.len()
    }

    fn create_option<D: PageDom<Node = N>>(
        &self,
        dom: &D,
        menu: &N,
        language: LanguageCode,
    ) -> Result<N, dcr_backend::HostError> {
        let option = dom.create_element("div")?;
        dom.set_class(&option, OPTION_CLASS, true);
        dom.set_attribute(&option, "role", "option");
        dom.set_attribute(&option, "tabindex", "0");
        dom.set_attribute(&option, "aria-selected", "false");
        dom.set_attribute(&option, OPTION_LANG_ATTR, language.as_str());

        let flag = dom.create_element("span")?;
        dom.set_text(&flag, self.table.flag(language).unwrap_or_default());
        dom.append_child(&option, &flag)?;
        dom.append_text(&option, &format!(" {}", language.label()))?;

        dom.append_child(menu, &option)?;
        Ok(option)
    }

    /// Make `language` current and propagate it everywhere it shows.
    pub fn set_language<B>(&mut self, backend: &B, language: LanguageCode)
    where
        B: PageBackend,
        B::Dom: PageDom<Node = N>,
    {
        self.current = language;
        if let Err(err) = backend.storage().set(&self.storage_key, language.as_str()) {
            warn!(%err, lang = %language, "failed to persist language preference");
        }

        let dom = backend.dom();
        let mut translated = 0usize;
        for node in dom.query_all(&self.elements.i18n_selector()) {
            let Some(key) = dom.attribute(&node, &self.elements.i18n_attribute) else {
                continue;
            };
            if let Some(text) = self.table.get(language, &key) {
                dom.set_text(&node, text);
                translated += 1;
            }
        }

        if let Some(icon) = dom.by_id(&self.elements.current_lang_icon_id) {
            if let Some(flag) = self.table.flag(language) {
                dom.set_text(&icon, flag);
            }
        }
        if let Some(code) = dom.by_id(&self.elements.current_lang_code_id) {
            dom.set_text(&code, language.label());
        }

        for option in &mut self.options {
            option.selected = option.language == language;
            dom.set_class(&option.node, OPTION_ACTIVE_CLASS, option.selected);
            dom.set_attribute(
                &option.node,
                "aria-selected",
                if option.selected { "true" } else { "false" },
            );
        }

        dom.set_document_lang(language.as_str());
        debug!(lang = %language, translated, "language applied");
    }

    /// String-facing variant for host calls. Unsupported codes are a logged
    /// no-op and leave the page untouched.
    pub fn set_language_str<B>(&mut self, backend: &B, code: &str) -> Option<LanguageCode>
    where
        B: PageBackend,
        B::Dom: PageDom<Node = N>,
    {
        let Some(language) = LanguageCode::parse(code) else {
            warn!(code, "ignoring unsupported language code");
            return None;
        };
        self.set_language(backend, language);
        Some(language)
    }

    /// Apply an option's language and close the menu.
    pub fn select<B>(&mut self, backend: &B, language: LanguageCode)
    where
        B: PageBackend,
        B::Dom: PageDom<Node = N>,
    {
        self.set_language(backend, language);
        self.close_menu(backend.dom());
    }

    /// Flip the menu and mirror the state into `aria-expanded`.
    pub fn toggle_menu<D: PageDom<Node = N>>(&mut self, dom: &D) -> MenuState {
        self.menu = self.menu.toggled();
        self.sync_menu(dom);
        self.menu
    }

    /// Force the menu closed. Returns whether it was open.
    pub fn close_menu<D: PageDom<Node = N>>(&mut self, dom: &D) -> bool {
        let was_open = self.menu.is_open();
        self.menu = MenuState::Closed;
        self.sync_menu(dom);
        was_open
    }

    /// Document-wide click: close unless the target is inside the selector.
    pub fn handle_document_click<D: PageDom<Node = N>>(
        &mut self,
        dom: &D,
        target: Option<&N>,
    ) -> bool {
        let inside = target
            .and_then(|node| dom.closest(node, &self.elements.lang_selector_selector))
            .is_some();
        if inside {
            return false;
        }
        self.close_menu(dom)
    }

    /// Document-wide key press: Escape closes the menu.
    pub fn handle_document_key<D: PageDom<Node = N>>(&mut self, dom: &D, key: &str) -> bool {
        if key != "Escape" {
            return false;
        }
        self.close_menu(dom)
    }

    fn sync_menu<D: PageDom<Node = N>>(&self, dom: &D) {
        let open = self.menu.is_open();
        if let Some(menu) = dom.by_id(&self.elements.lang_menu_id) {
            dom.set_class(&menu, MENU_OPEN_CLASS, open);
        }
        if let Some(button) = dom.query_one(&self.elements.lang_button_selector) {
            dom.set_attribute(&button, "aria-expanded", if open { "true" } else { "false" });
        }
    }
}
