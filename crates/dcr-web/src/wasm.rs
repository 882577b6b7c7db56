#![forbid(unsafe_code)]

//! Browser backend and `wasm-bindgen` exports.
//!
//! Only compiled on `wasm32` targets. Every JS call is checked; failures are
//! mapped to [`HostError`] or logged, never unwrapped.

use core::time::Duration;
use std::cell::RefCell;
use std::io;

use dcr_backend::{
    ClipboardCallback, ClipboardWriter, ControlIds, DomEvent, EmbeddedGraphic, EventHandler,
    EventKind, EventResponse, GraphicControls, HostError, ListenOptions, ListenTarget,
    LocaleSource, PageBackend, PageDom, PauseControl, PreferenceStore, TimerHost, TimerId,
};
use js_sys::{Function, Promise, Reflect};
use tracing::{Level, Metadata, debug, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlDocument, HtmlElement,
    HtmlIFrameElement, HtmlObjectElement, HtmlTextAreaElement, KeyboardEvent, MouseEvent,
    MouseEventInit, Window,
};

use crate::config::PageConfig;
use crate::page::Page;

/// Id of the optional inline JSON configuration block.
const CONFIG_ELEMENT_ID: &str = "dcr-config";

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// Buffers one formatted event and forwards it to the console on drop.
struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

fn install_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
    if installed.is_err() {
        console_error("dcr-web: a tracing subscriber was already installed");
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

fn rejected(value: &JsValue) -> HostError {
    HostError::Rejected(describe(value))
}

/// `document` and `window` as a [`PageDom`].
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    fn html_document(&self) -> Option<&HtmlDocument> {
        self.document.dyn_ref::<HtmlDocument>()
    }
}

impl PageDom for WebDom {
    type Node = Element;

    fn is_ready(&self) -> bool {
        self.document.ready_state() != "loading"
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_one(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            warn!(selector, "invalid selector");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|idx| list.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            debug!(name, error = %describe(&err), "set_attribute failed");
        }
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) {
        let _ = node.class_list().toggle_with_force(class, on);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn set_document_lang(&self, lang: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute("lang", lang);
        }
    }

    fn create_element(&self, tag: &str) -> Result<Element, HostError> {
        self.document.create_element(tag).map_err(|e| rejected(&e))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), HostError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| rejected(&e))
    }

    fn append_text(&self, node: &Element, text: &str) -> Result<(), HostError> {
        node.append_with_str_1(text).map_err(|e| rejected(&e))
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn set_value(&self, node: &Element, value: &str) {
        match node.dyn_ref::<HtmlTextAreaElement>() {
            Some(area) => area.set_value(value),
            None => self.set_attribute(node, "value", value),
        }
    }

    fn focus_and_select(&self, node: &Element) -> Result<(), HostError> {
        let area = node
            .dyn_ref::<HtmlTextAreaElement>()
            .ok_or_else(|| HostError::Rejected("selection needs a textarea".into()))?;
        area.focus().map_err(|e| rejected(&e))?;
        area.select();
        Ok(())
    }

    fn exec_copy(&self) -> Result<(), HostError> {
        let document = self
            .html_document()
            .ok_or(HostError::Unavailable("document.execCommand"))?;
        match document.exec_command("copy") {
            Ok(true) => Ok(()),
            Ok(false) => Err(HostError::Rejected("execCommand('copy') returned false".into())),
            Err(err) => Err(rejected(&err)),
        }
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn listen(
        &self,
        target: ListenTarget<'_, Element>,
        kind: EventKind,
        options: ListenOptions,
        handler: EventHandler<Element>,
    ) {
        let event_target: &EventTarget = match target {
            ListenTarget::Document => self.document.as_ref(),
            ListenTarget::Node(node) => node.as_ref(),
        };

        let mut handler = handler;
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let dom_event = DomEvent {
                kind,
                target: event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok()),
                key: event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key),
            };
            if handler(&dom_event) == EventResponse::PreventDefault {
                event.prevent_default();
            }
        });

        let listen_options = AddEventListenerOptions::new();
        listen_options.set_once(options.once);
        if let Err(err) = event_target.add_event_listener_with_callback_and_add_event_listener_options(
            kind.dom_name(),
            callback.as_ref().unchecked_ref(),
            &listen_options,
        ) {
            warn!(event = kind.dom_name(), error = %describe(&err), "failed to add listener");
            return;
        }
        // Listeners live as long as the page.
        callback.forget();
    }
}

/// `window.localStorage`.
pub struct WebStorage {
    window: Window,
}

impl WebStorage {
    fn storage(&self) -> Result<web_sys::Storage, HostError> {
        self.window
            .local_storage()
            .map_err(|e| HostError::AccessDenied(describe(&e)))?
            .ok_or(HostError::Unavailable("localStorage"))
    }
}

impl PreferenceStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| HostError::AccessDenied(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| HostError::AccessDenied(describe(&e)))
    }
}

/// `navigator.language`.
pub struct WebLocale {
    window: Window,
}

impl LocaleSource for WebLocale {
    fn language(&self) -> Option<String> {
        self.window.navigator().language()
    }
}

/// `navigator.clipboard.writeText`, resolved on the microtask queue.
pub struct WebClipboard {
    window: Window,
}

impl WebClipboard {
    fn write_promise(&self, text: &str) -> Result<Promise, HostError> {
        let navigator = self.window.navigator();
        let clipboard = Reflect::get(&navigator, &"clipboard".into())
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .ok_or(HostError::Unavailable("navigator.clipboard"))?;
        let write_text = Reflect::get(&clipboard, &"writeText".into())
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or(HostError::Unavailable("navigator.clipboard.writeText"))?;
        write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|e| rejected(&e))?
            .dyn_into::<Promise>()
            .map_err(|_| HostError::Rejected("writeText did not return a promise".into()))
    }
}

impl ClipboardWriter for WebClipboard {
    fn write_text(&self, text: &str, on_done: ClipboardCallback) {
        let promise = match self.write_promise(text) {
            Ok(promise) => promise,
            Err(err) => {
                on_done(Err(err));
                return;
            }
        };
        spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| rejected(&e));
            on_done(result);
        });
    }
}

/// `setTimeout` / `clearTimeout`.
pub struct WebTimers {
    window: Window,
}

impl TimerHost for WebTimers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let function = Closure::once_into_js(move || callback());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(function.unchecked_ref(), millis)
        {
            Ok(handle) => TimerId(u32::try_from(handle).unwrap_or_default()),
            Err(err) => {
                warn!(error = %describe(&err), "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        if let Ok(handle) = i32::try_from(id.0) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Demo graphic embedded through `<object>` or `<iframe>`.
pub struct WebGraphic;

fn content_document(host: &Element) -> Result<Document, HostError> {
    let document = if let Some(object) = host.dyn_ref::<HtmlObjectElement>() {
        object.content_document()
    } else if let Some(frame) = host.dyn_ref::<HtmlIFrameElement>() {
        frame.content_document()
    } else {
        None
    };
    document.ok_or_else(|| HostError::AccessDenied("embedded document not accessible".into()))
}

impl EmbeddedGraphic for WebGraphic {
    type Node = Element;

    fn controls(&self, host: &Element, ids: ControlIds<'_>) -> Result<GraphicControls, HostError> {
        let document = content_document(host)?;
        let play = document.get_element_by_id(ids.play).is_some();
        let pause = document
            .get_element_by_id(ids.pause)
            .map(|control| PauseControl {
                displayed: control.get_attribute("display").as_deref() != Some("none"),
            });
        Ok(GraphicControls { play, pause })
    }

    fn click_play(&self, host: &Element, ids: ControlIds<'_>) -> Result<(), HostError> {
        let document = content_document(host)?;
        let play = document
            .get_element_by_id(ids.play)
            .ok_or_else(|| HostError::MissingElement(ids.play.to_owned()))?;
        if let Some(html) = play.dyn_ref::<HtmlElement>() {
            html.click();
            return Ok(());
        }

        // SVG elements have no click(); dispatch a synthetic event instead.
        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event =
            MouseEvent::new_with_mouse_event_init_dict("click", &init).map_err(|e| rejected(&e))?;
        play.dispatch_event(&event)
            .map(|_| ())
            .map_err(|e| rejected(&e))
    }

    fn is_loaded(&self, host: &Element) -> bool {
        content_document(host).is_ok_and(|document| document.ready_state() == "complete")
    }
}

/// The browser as a [`PageBackend`].
pub struct WebBackend {
    dom: WebDom,
    storage: WebStorage,
    locale: WebLocale,
    clipboard: WebClipboard,
    timers: WebTimers,
    graphic: WebGraphic,
}

impl WebBackend {
    /// `None` outside a window with a document (e.g. in a worker).
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            dom: WebDom {
                window: window.clone(),
                document,
            },
            storage: WebStorage {
                window: window.clone(),
            },
            locale: WebLocale {
                window: window.clone(),
            },
            clipboard: WebClipboard {
                window: window.clone(),
            },
            timers: WebTimers { window },
            graphic: WebGraphic,
        })
    }

    /// Configuration from the inline JSON block, or defaults.
    fn load_config(&self) -> PageConfig {
        let Some(json) = self
            .dom
            .by_id(CONFIG_ELEMENT_ID)
            .and_then(|node| node.text_content())
        else {
            return PageConfig::default();
        };
        match PageConfig::from_json_str(&json) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "ignoring page config, using defaults");
                PageConfig::default()
            }
        }
    }
}

impl PageBackend for WebBackend {
    type Dom = WebDom;
    type Storage = WebStorage;
    type Locale = WebLocale;
    type Clipboard = WebClipboard;
    type Timers = WebTimers;
    type Graphic = WebGraphic;

    fn dom(&self) -> &WebDom {
        &self.dom
    }

    fn storage(&self) -> &WebStorage {
        &self.storage
    }

    fn locale(&self) -> &WebLocale {
        &self.locale
    }

    fn clipboard(&self) -> &WebClipboard {
        &self.clipboard
    }

    fn timers(&self) -> &WebTimers {
        &self.timers
    }

    fn graphic(&self) -> &WebGraphic {
        &self.graphic
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page<WebBackend>>> = const { RefCell::new(None) };
}

/// Run `f` against the started page. The slot borrow ends before `f` runs.
fn with_page(f: impl FnOnce(&Page<WebBackend>)) {
    let page = PAGE.with(|slot| slot.borrow().clone());
    match page {
        Some(page) => f(&page),
        None => warn!("page script not initialised"),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    install_panic_hook();
    install_tracing();

    let Some(backend) = WebBackend::new() else {
        console_error("dcr-web: no window or document");
        return;
    };
    let config = backend.load_config();
    let page = Page::with_builtin_table(backend, config);
    PAGE.with(|slot| *slot.borrow_mut() = Some(page.clone()));
    page.mount();
    info!("dcr-web loaded");
}

#[wasm_bindgen(js_name = copyCommand)]
pub fn copy_command() {
    with_page(Page::copy_command);
}

#[wasm_bindgen(js_name = copyDockerCompose)]
pub fn copy_docker_compose() {
    with_page(Page::copy_docker_compose);
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub fn copy_to_clipboard(text: &str) {
    with_page(|page| page.copy_to_clipboard(text));
}

#[wasm_bindgen(js_name = switchTab)]
pub fn switch_tab(tab_name: &str, clicked_tab: Option<Element>) {
    with_page(|page| {
        page.switch_tab(tab_name, clicked_tab.as_ref());
    });
}

#[wasm_bindgen(js_name = toggleLangMenu)]
pub fn toggle_lang_menu() {
    with_page(|page| {
        page.toggle_lang_menu();
    });
}

#[wasm_bindgen(js_name = setLanguage)]
pub fn set_language(code: &str) {
    with_page(|page| {
        page.set_language(code);
    });
}
