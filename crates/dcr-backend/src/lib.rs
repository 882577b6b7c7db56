#![forbid(unsafe_code)]
#![doc = "Host traits for the dcr landing page: the boundary between page logic and the browser."]
#![doc = ""]
#![doc = "Page components in `dcr-web` are written against these traits. The browser"]
#![doc = "implementation lives behind `wasm32` in `dcr-web::wasm`; native tests use the"]
#![doc = "in-memory implementation in `dcr-web::memory`."]

use core::time::Duration;

/// Failure reported by a host capability.
///
/// Page components never surface these to the user directly; they log and
/// degrade to a safe default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The capability does not exist in this environment (e.g. no async clipboard).
    #[error("unavailable: {0}")]
    Unavailable(&'static str),
    /// The capability exists but refused or failed the request.
    #[error("rejected: {0}")]
    Rejected(String),
    /// A required element is not present in the page.
    #[error("missing element: {0}")]
    MissingElement(String),
    /// Access was blocked, typically by a cross-origin or storage policy.
    #[error("access denied: {0}")]
    AccessDenied(String),
}

/// DOM event kinds the page listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    /// Resource load (the embedded demo graphic).
    Load,
    /// `DOMContentLoaded` on the document.
    DomReady,
}

impl EventKind {
    /// DOM event type string.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Load => "load",
            Self::DomReady => "DOMContentLoaded",
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy)]
pub enum ListenTarget<'a, N> {
    Document,
    Node(&'a N),
}

/// Listener registration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Remove the listener after its first invocation.
    pub once: bool,
}

impl ListenOptions {
    pub const ONCE: Self = Self { once: true };
}

/// Host-neutral view of a dispatched DOM event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent<N> {
    pub kind: EventKind,
    /// Element the event was dispatched to, if it was an element.
    pub target: Option<N>,
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
}

impl<N> DomEvent<N> {
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// What a handler asks the host to do with the event afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventResponse {
    #[default]
    Continue,
    PreventDefault,
}

/// Boxed event handler.
pub type EventHandler<N> = Box<dyn FnMut(&DomEvent<N>) -> EventResponse>;

/// Document access: queries, mutations, and listener registration.
///
/// All methods take `&self`: the host is single-threaded and the page
/// shares one backend across every handler. Mutations on missing or
/// detached nodes are silent no-ops.
pub trait PageDom {
    /// Element handle. Equality is identity.
    type Node: Clone + PartialEq;

    /// Whether the document has finished parsing (`readyState != "loading"`).
    fn is_ready(&self) -> bool;

    fn by_id(&self, id: &str) -> Option<Self::Node>;

    /// First element matching a CSS selector.
    fn query_one(&self, selector: &str) -> Option<Self::Node>;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Nearest inclusive ancestor matching a CSS selector.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Concatenated text content of the node and its descendants.
    fn text(&self, node: &Self::Node) -> String;
    /// Replace the node's content with a single text run.
    fn set_text(&self, node: &Self::Node, text: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn set_class(&self, node: &Self::Node, class: &str, on: bool);

    /// Flip a class, returning whether it is now present.
    fn toggle_class(&self, node: &Self::Node, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Show (`display: block`) or hide (`display: none`) an element.
    fn set_visible(&self, node: &Self::Node, visible: bool) {
        self.set_style(node, "display", if visible { "block" } else { "none" });
    }

    /// Set the root element's `lang` attribute.
    fn set_document_lang(&self, lang: &str);

    fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
    /// Append a text run after the node's existing children.
    fn append_text(&self, node: &Self::Node, text: &str) -> Result<(), HostError>;
    /// Detach the node from its parent.
    fn remove(&self, node: &Self::Node);

    /// Set the `value` of a form control.
    fn set_value(&self, node: &Self::Node, value: &str);
    /// Focus a text control and select all of its content.
    fn focus_and_select(&self, node: &Self::Node) -> Result<(), HostError>;
    /// Run the legacy synchronous copy command on the current selection.
    fn exec_copy(&self) -> Result<(), HostError>;

    /// Blocking user-facing message.
    fn alert(&self, message: &str);

    /// Register a listener for the lifetime of the page (or one call with
    /// [`ListenOptions::ONCE`]).
    fn listen(
        &self,
        target: ListenTarget<'_, Self::Node>,
        kind: EventKind,
        options: ListenOptions,
        handler: EventHandler<Self::Node>,
    );
}

/// Durable key-value storage (`localStorage`).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, HostError>;
    fn set(&self, key: &str, value: &str) -> Result<(), HostError>;
}

/// Browser locale (`navigator.language`).
pub trait LocaleSource {
    fn language(&self) -> Option<String>;
}

/// Completion callback for an asynchronous clipboard write.
pub type ClipboardCallback = Box<dyn FnOnce(Result<(), HostError>)>;

/// Asynchronous clipboard write (`navigator.clipboard.writeText`).
pub trait ClipboardWriter {
    /// Begin writing `text`. The outcome arrives through `on_done`, on a
    /// later turn when the write is pending, or immediately with
    /// [`HostError::Unavailable`] when the API does not exist.
    fn write_text(&self, text: &str, on_done: ClipboardCallback);
}

/// Handle for a scheduled timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// One-shot timers (`setTimeout` / `clearTimeout`).
pub trait TimerHost {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
    /// Cancel a pending timeout. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Element ids of the play/pause pair inside the embedded graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlIds<'a> {
    pub play: &'a str,
    pub pause: &'a str,
}

/// The pause control, when the embedded document has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseControl {
    /// `false` when the control carries `display="none"`.
    pub displayed: bool,
}

/// Snapshot of the embedded graphic's playback controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicControls {
    pub play: bool,
    pub pause: Option<PauseControl>,
}

impl GraphicControls {
    /// Content counts as playing when a displayed pause control exists.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.pause.is_some_and(|p| p.displayed)
    }
}

/// Access to the internal document of an embedded graphic.
///
/// Cross-origin or not-yet-loaded content yields an `Err`, never a panic.
pub trait EmbeddedGraphic {
    type Node;

    fn controls(&self, host: &Self::Node, ids: ControlIds<'_>)
    -> Result<GraphicControls, HostError>;

    fn click_play(&self, host: &Self::Node, ids: ControlIds<'_>) -> Result<(), HostError>;

    /// Whether the embedded document has already finished loading.
    ///
    /// Content that is inaccessible reports `false`.
    fn is_loaded(&self, host: &Self::Node) -> bool;
}

/// Unified backend combining every host capability the page uses.
///
/// Concrete implementations:
/// - `dcr_web::wasm::WebBackend`: the browser, via `web-sys`.
/// - `dcr_web::memory::MemoryBackend`: deterministic in-memory host for tests.
pub trait PageBackend {
    type Dom: PageDom;
    type Storage: PreferenceStore;
    type Locale: LocaleSource;
    type Clipboard: ClipboardWriter;
    type Timers: TimerHost;
    type Graphic: EmbeddedGraphic<Node = <Self::Dom as PageDom>::Node>;

    fn dom(&self) -> &Self::Dom;
    fn storage(&self) -> &Self::Storage;
    fn locale(&self) -> &Self::Locale;
    fn clipboard(&self) -> &Self::Clipboard;
    fn timers(&self) -> &Self::Timers;
    fn graphic(&self) -> &Self::Graphic;
}

/// Element handle type of a backend.
pub type NodeOf<B> = <<B as PageBackend>::Dom as PageDom>::Node;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[test]
    fn event_kind_dom_names() {
        assert_eq!(EventKind::Click.dom_name(), "click");
        assert_eq!(EventKind::KeyDown.dom_name(), "keydown");
        assert_eq!(EventKind::Load.dom_name(), "load");
        assert_eq!(EventKind::DomReady.dom_name(), "DOMContentLoaded");
    }

    #[test]
    fn listen_options_default_is_persistent() {
        assert!(!ListenOptions::default().once);
        assert!(ListenOptions::ONCE.once);
    }

    #[test]
    fn event_response_defaults_to_continue() {
        assert_eq!(EventResponse::default(), EventResponse::Continue);
    }

    #[test]
    fn dom_event_key_accessor() {
        let event: DomEvent<u32> = DomEvent {
            kind: EventKind::KeyDown,
            target: None,
            key: Some("Escape".into()),
        };
        assert_eq!(event.key(), Some("Escape"));
    }

    #[test]
    fn graphic_playing_requires_displayed_pause() {
        let idle = GraphicControls {
            play: true,
            pause: None,
        };
        assert!(!idle.is_playing());

        let hidden_pause = GraphicControls {
            play: true,
            pause: Some(PauseControl { displayed: false }),
        };
        assert!(!hidden_pause.is_playing());

        let playing = GraphicControls {
            play: true,
            pause: Some(PauseControl { displayed: true }),
        };
        assert!(playing.is_playing());
    }

    #[test]
    fn host_error_display() {
        assert_eq!(
            HostError::Unavailable("clipboard").to_string(),
            "unavailable: clipboard"
        );
        assert_eq!(
            HostError::MissingElement("langMenu".into()).to_string(),
            "missing element: langMenu"
        );
    }

    // -----------------------------------------------------------------------
    // Mock implementations for trait testing
    // -----------------------------------------------------------------------

    struct TestStore {
        values: RefCell<HashMap<String, String>>,
        blocked: bool,
    }

    impl PreferenceStore for TestStore {
        fn get(&self, key: &str) -> Result<Option<String>, HostError> {
            if self.blocked {
                return Err(HostError::AccessDenied("storage".into()));
            }
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
            if self.blocked {
                return Err(HostError::AccessDenied("storage".into()));
            }
            self.values.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }
    }

    #[test]
    fn preference_store_round_trip() {
        let store = TestStore {
            values: RefCell::new(HashMap::new()),
            blocked: false,
        };
        assert_eq!(store.get("dcr_lang"), Ok(None));
        store.set("dcr_lang", "ja").unwrap();
        assert_eq!(store.get("dcr_lang"), Ok(Some("ja".into())));
    }

    #[test]
    fn blocked_store_reports_access_denied() {
        let store = TestStore {
            values: RefCell::new(HashMap::new()),
            blocked: true,
        };
        assert!(matches!(store.get("k"), Err(HostError::AccessDenied(_))));
        assert!(store.set("k", "v").is_err());
    }

    struct ImmediateClipboard;

    impl ClipboardWriter for ImmediateClipboard {
        fn write_text(&self, _text: &str, on_done: ClipboardCallback) {
            on_done(Err(HostError::Unavailable("clipboard")));
        }
    }

    #[test]
    fn clipboard_callback_receives_outcome() {
        let seen = std::rc::Rc::new(RefCell::new(None));
        let sink = seen.clone();
        ImmediateClipboard.write_text(
            "x",
            Box::new(move |result: Result<(), HostError>| {
                *sink.borrow_mut() = Some(result);
            }),
        );
        assert_eq!(
            *seen.borrow(),
            Some(Err(HostError::Unavailable("clipboard")))
        );
    }
}
