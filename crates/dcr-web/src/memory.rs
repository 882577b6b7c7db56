#![forbid(unsafe_code)]

//! Deterministic in-memory host.
//!
//! Implements every [`dcr_backend`] trait without a browser so page flows can
//! be driven and inspected from native tests:
//! - a small element tree with class/attribute/style state and simple
//!   selectors (`#id`, `.class`, `[attr]`, `tag`);
//! - listener registration with click/keydown bubbling to the document;
//! - a manual clock for timers ([`MemoryTimers::advance`]);
//! - a clipboard whose asynchronous writes settle on demand.

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use dcr_backend::{
    ClipboardCallback, ClipboardWriter, ControlIds, DomEvent, EmbeddedGraphic, EventHandler,
    EventKind, EventResponse, GraphicControls, HostError, ListenOptions, ListenTarget,
    LocaleSource, PageBackend, PageDom, PauseControl, PreferenceStore, TimerHost, TimerId,
};

const ROOT: usize = 0;
const BODY: usize = 1;
const TEXT_TAG: &str = "#text";

/// Handle to an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryNode(usize);

#[derive(Debug, Default, Clone)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    value: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    fn matches(&self, selector: &str) -> bool {
        if self.tag == TEXT_TAG {
            return false;
        }
        if let Some(id) = selector.strip_prefix('#') {
            self.attributes.get("id").is_some_and(|v| v == id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else if let Some(attr) = selector
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            self.attributes.contains_key(attr)
        } else {
            self.tag.eq_ignore_ascii_case(selector)
        }
    }
}

struct Listener {
    target: Option<usize>,
    kind: EventKind,
    once: bool,
    handler: Rc<RefCell<EventHandler<MemoryNode>>>,
}

/// In-memory document.
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<Listener>>,
    ready: Cell<bool>,
    copy_fails: Cell<bool>,
    selection: RefCell<Option<String>>,
    copied: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Document with `<html>` and `<body>`, already parsed.
    #[must_use]
    pub fn new() -> Self {
        let mut html = NodeData::new("html");
        html.children.push(BODY);
        let mut body = NodeData::new("body");
        body.parent = Some(ROOT);
        Self {
            nodes: RefCell::new(vec![html, body]),
            listeners: RefCell::new(Vec::new()),
            ready: Cell::new(true),
            copy_fails: Cell::new(false),
            selection: RefCell::new(None),
            copied: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> MemoryNode {
        MemoryNode(ROOT)
    }

    #[must_use]
    pub fn body_node(&self) -> MemoryNode {
        MemoryNode(BODY)
    }

    /// Start building a new element under `parent`.
    pub fn build(&self, parent: MemoryNode, tag: &str) -> ElementBuilder<'_> {
        let node = self.alloc(tag);
        self.attach(parent.0, node.0);
        ElementBuilder { dom: self, node }
    }

    /// Mark the document as still loading (before `DOMContentLoaded`).
    pub fn set_loading(&self) {
        self.ready.set(false);
    }

    /// Make the legacy copy command fail.
    pub fn fail_exec_copy(&self, fails: bool) {
        self.copy_fails.set(fails);
    }

    /// Texts copied through the legacy copy command.
    #[must_use]
    pub fn copied(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }

    /// Messages shown through `alert`.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    /// `lang` attribute of the root element.
    #[must_use]
    pub fn document_lang(&self) -> Option<String> {
        self.read(MemoryNode(ROOT), |n| n.attributes.get("lang").cloned())
            .flatten()
    }

    #[must_use]
    pub fn style(&self, node: MemoryNode, property: &str) -> Option<String> {
        self.read(node, |n| n.style.get(property).cloned()).flatten()
    }

    /// `false` only when the element carries `display: none`.
    #[must_use]
    pub fn is_visible(&self, node: MemoryNode) -> bool {
        self.style(node, "display").as_deref() != Some("none")
    }

    #[must_use]
    pub fn is_attached(&self, node: MemoryNode) -> bool {
        self.attached(node.0)
    }

    /// Attached elements with the given tag.
    #[must_use]
    pub fn count_tag(&self, tag: &str) -> usize {
        self.descendants(ROOT)
            .into_iter()
            .filter(|&idx| self.read(MemoryNode(idx), |n| n.tag == tag).unwrap_or(false))
            .count()
    }

    /// Element children of `node`; empty for a node this DOM does not own.
    #[must_use]
    pub fn children(&self, node: MemoryNode) -> Vec<MemoryNode> {
        let nodes = self.nodes.borrow();
        let Some(parent) = nodes.get(node.0) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .copied()
            .filter(|&idx| nodes.get(idx).is_some_and(|n| n.tag != TEXT_TAG))
            .map(MemoryNode)
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Mark the document parsed and fire `DOMContentLoaded`.
    pub fn dom_ready(&self) {
        self.ready.set(true);
        self.dispatch(EventKind::DomReady, None, None);
    }

    /// Click `node`; the event bubbles to the document.
    pub fn click(&self, node: MemoryNode) -> EventResponse {
        self.dispatch(EventKind::Click, Some(node), None)
    }

    /// Key press on `node` (or on `<body>` when `None`); bubbles to the document.
    pub fn key_down(&self, node: Option<MemoryNode>, key: &str) -> EventResponse {
        let target = node.unwrap_or(MemoryNode(BODY));
        self.dispatch(EventKind::KeyDown, Some(target), Some(key))
    }

    /// Resource load on `node`; does not bubble.
    pub fn load(&self, node: MemoryNode) -> EventResponse {
        self.dispatch(EventKind::Load, Some(node), None)
    }

    /// Dispatch an event, invoking listeners along the propagation path.
    pub fn dispatch(
        &self,
        kind: EventKind,
        target: Option<MemoryNode>,
        key: Option<&str>,
    ) -> EventResponse {
        let path: Vec<Option<usize>> = match kind {
            EventKind::Click | EventKind::KeyDown => {
                let mut hops: Vec<Option<usize>> = target
                    .map(|node| self.ancestors(node.0).into_iter().map(Some).collect())
                    .unwrap_or_default();
                hops.push(None);
                hops
            }
            EventKind::Load => vec![target.map(|node| node.0)],
            EventKind::DomReady => vec![None],
        };

        let event = DomEvent {
            kind,
            target,
            key: key.map(str::to_owned),
        };
        let mut response = EventResponse::Continue;
        for hop in path {
            let handlers: Vec<_> = {
                let mut listeners = self.listeners.borrow_mut();
                let mut picked = Vec::new();
                listeners.retain(|l| {
                    if l.target == hop && l.kind == kind {
                        picked.push(Rc::clone(&l.handler));
                        !l.once
                    } else {
                        true
                    }
                });
                picked
            };
            for handler in handlers {
                let mut handler = handler.borrow_mut();
                if (*handler)(&event) == EventResponse::PreventDefault {
                    response = EventResponse::PreventDefault;
                }
            }
        }
        response
    }

    /// Run `f` on the node's data; `None` for a node this DOM does not own.
    fn read<R>(&self, node: MemoryNode, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.nodes.borrow().get(node.0).map(f)
    }

    fn write(&self, node: MemoryNode, f: impl FnOnce(&mut NodeData)) {
        if let Some(data) = self.nodes.borrow_mut().get_mut(node.0) {
            f(data);
        }
    }

    fn alloc(&self, tag: &str) -> MemoryNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData::new(tag));
        MemoryNode(nodes.len() - 1)
    }

    fn attach(&self, parent: usize, child: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if child >= nodes.len() || parent >= nodes.len() {
            return;
        }
        if let Some(old) = nodes[child].parent.take() {
            nodes[old].children.retain(|&c| c != child);
        }
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    fn detach(&self, child: usize) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(data) = nodes.get_mut(parent) {
            data.children.retain(|&c| c != child);
        }
    }

    fn attached(&self, idx: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            if current == ROOT {
                return true;
            }
            cursor = nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Inclusive ancestors, nearest first.
    fn ancestors(&self, idx: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let Some(data) = nodes.get(idx) else {
            return Vec::new();
        };
        let mut out = vec![idx];
        let mut cursor = data.parent;
        while let Some(current) = cursor {
            out.push(current);
            cursor = nodes.get(current).and_then(|n| n.parent);
        }
        out
    }

    /// Inclusive descendants in document order.
    fn descendants(&self, idx: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let Some(data) = nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    fn text_of(&self, idx: usize) -> String {
        let nodes = self.nodes.borrow();
        self.descendants(idx)
            .into_iter()
            .filter_map(|i| nodes.get(i).map(|n| n.text.as_str()))
            .collect()
    }
}

/// Fluent element construction for fixtures.
pub struct ElementBuilder<'a> {
    dom: &'a MemoryDom,
    node: MemoryNode,
}

impl ElementBuilder<'_> {
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.dom.set_class(&self.node, class, true);
        self
    }

    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.dom.set_attribute(&self.node, name, value);
        self
    }

    #[must_use]
    pub fn text(self, text: &str) -> Self {
        self.dom.write(self.node, |n| n.text = text.to_owned());
        self
    }

    #[must_use]
    pub fn node(self) -> MemoryNode {
        self.node
    }
}

impl PageDom for MemoryDom {
    type Node = MemoryNode;

    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn by_id(&self, id: &str) -> Option<MemoryNode> {
        self.query_one(&format!("#{id}"))
    }

    fn query_one(&self, selector: &str) -> Option<MemoryNode> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<MemoryNode> {
        self.descendants(ROOT)
            .into_iter()
            .map(MemoryNode)
            .filter(|&node| self.read(node, |n| n.matches(selector)).unwrap_or(false))
            .collect()
    }

    fn closest(&self, node: &MemoryNode, selector: &str) -> Option<MemoryNode> {
        self.ancestors(node.0)
            .into_iter()
            .map(MemoryNode)
            .find(|&node| self.read(node, |n| n.matches(selector)).unwrap_or(false))
    }

    fn body(&self) -> Option<MemoryNode> {
        Some(MemoryNode(BODY))
    }

    fn attribute(&self, node: &MemoryNode, name: &str) -> Option<String> {
        self.read(*node, |data| {
            if name == "class" {
                return (!data.classes.is_empty()).then(|| data.classes.join(" "));
            }
            data.attributes.get(name).cloned()
        })
        .flatten()
    }

    fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) {
        self.write(*node, |data| {
            if name == "class" {
                data.classes = value.split_whitespace().map(str::to_owned).collect();
            } else {
                data.attributes.insert(name.to_owned(), value.to_owned());
            }
        });
    }

    fn text(&self, node: &MemoryNode) -> String {
        self.text_of(node.0)
    }

    fn set_text(&self, node: &MemoryNode, text: &str) {
        let mut children = Vec::new();
        self.write(*node, |data| {
            children = std::mem::take(&mut data.children);
            data.text = text.to_owned();
        });
        for child in children {
            self.write(MemoryNode(child), |data| data.parent = None);
        }
    }

    fn has_class(&self, node: &MemoryNode, class: &str) -> bool {
        self.read(*node, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn set_class(&self, node: &MemoryNode, class: &str, on: bool) {
        self.write(*node, |data| {
            let present = data.classes.iter().any(|c| c == class);
            if on && !present {
                data.classes.push(class.to_owned());
            } else if !on && present {
                data.classes.retain(|c| c != class);
            }
        });
    }

    fn set_style(&self, node: &MemoryNode, property: &str, value: &str) {
        self.write(*node, |data| {
            data.style.insert(property.to_owned(), value.to_owned());
        });
    }

    fn set_document_lang(&self, lang: &str) {
        self.set_attribute(&MemoryNode(ROOT), "lang", lang);
    }

    fn create_element(&self, tag: &str) -> Result<MemoryNode, HostError> {
        Ok(self.alloc(tag))
    }

    fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) -> Result<(), HostError> {
        if self.ancestors(parent.0).contains(&child.0) {
            return Err(HostError::Rejected("cannot append an ancestor".into()));
        }
        self.attach(parent.0, child.0);
        Ok(())
    }

    fn append_text(&self, node: &MemoryNode, text: &str) -> Result<(), HostError> {
        let run = self.alloc(TEXT_TAG);
        self.write(run, |data| data.text = text.to_owned());
        self.attach(node.0, run.0);
        Ok(())
    }

    fn remove(&self, node: &MemoryNode) {
        self.detach(node.0);
    }

    fn set_value(&self, node: &MemoryNode, value: &str) {
        self.write(*node, |data| data.value = value.to_owned());
    }

    fn focus_and_select(&self, node: &MemoryNode) -> Result<(), HostError> {
        if !self.attached(node.0) {
            return Err(HostError::Rejected("cannot focus a detached element".into()));
        }
        *self.selection.borrow_mut() = self.read(*node, |n| n.value.clone());
        Ok(())
    }

    fn exec_copy(&self) -> Result<(), HostError> {
        if self.copy_fails.get() {
            return Err(HostError::Rejected("execCommand('copy') failed".into()));
        }
        let selected = self
            .selection
            .borrow_mut()
            .take()
            .ok_or_else(|| HostError::Rejected("nothing selected".into()))?;
        self.copied.borrow_mut().push(selected);
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    fn listen(
        &self,
        target: ListenTarget<'_, MemoryNode>,
        kind: EventKind,
        options: ListenOptions,
        handler: EventHandler<MemoryNode>,
    ) {
        let target = match target {
            ListenTarget::Document => None,
            ListenTarget::Node(node) => Some(node.0),
        };
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            once: options.once,
            handler: Rc::new(RefCell::new(handler)),
        });
    }
}

/// In-memory `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
    blocked: Cell<bool>,
}

impl MemoryStorage {
    /// Simulate storage denied by browser policy.
    pub fn block(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    /// Seed a value regardless of the blocked flag.
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        if self.blocked.get() {
            return Err(HostError::AccessDenied("localStorage".into()));
        }
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
        if self.blocked.get() {
            return Err(HostError::AccessDenied("localStorage".into()));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// In-memory `navigator.language`.
#[derive(Debug, Default)]
pub struct MemoryLocale {
    language: RefCell<Option<String>>,
    reads: Cell<usize>,
}

impl MemoryLocale {
    pub fn set(&self, language: Option<&str>) {
        *self.language.borrow_mut() = language.map(str::to_owned);
    }

    /// How many times the locale has been consulted.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl LocaleSource for MemoryLocale {
    fn language(&self) -> Option<String> {
        self.reads.set(self.reads.get() + 1);
        self.language.borrow().clone()
    }
}

/// How the in-memory async clipboard behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipboardMode {
    /// Writes succeed when settled.
    #[default]
    Grant,
    /// Writes are rejected when settled (e.g. permission denied).
    Deny,
    /// The API does not exist; writes fail immediately.
    Missing,
}

/// In-memory `navigator.clipboard`.
#[derive(Default)]
pub struct MemoryClipboard {
    mode: Cell<ClipboardMode>,
    pending: RefCell<Vec<(String, ClipboardCallback)>>,
    written: RefCell<Vec<String>>,
}

impl MemoryClipboard {
    pub fn set_mode(&self, mode: ClipboardMode) {
        self.mode.set(mode);
    }

    /// Writes waiting to be settled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Texts successfully written through the async API.
    #[must_use]
    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }

    /// Complete every pending write according to the current mode.
    pub fn settle(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for (text, on_done) in pending {
            match self.mode.get() {
                ClipboardMode::Grant => {
                    self.written.borrow_mut().push(text);
                    on_done(Ok(()));
                }
                ClipboardMode::Deny => {
                    on_done(Err(HostError::Rejected("write permission denied".into())));
                }
                ClipboardMode::Missing => {
                    on_done(Err(HostError::Unavailable("navigator.clipboard")));
                }
            }
        }
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str, on_done: ClipboardCallback) {
        if self.mode.get() == ClipboardMode::Missing {
            on_done(Err(HostError::Unavailable("navigator.clipboard")));
            return;
        }
        self.pending.borrow_mut().push((text.to_owned(), on_done));
    }
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

/// Timers on a manual clock.
#[derive(Default)]
pub struct MemoryTimers {
    now: Cell<Duration>,
    next_id: Cell<u32>,
    pending: RefCell<Vec<PendingTimer>>,
    fired: RefCell<Vec<(TimerId, Duration)>>,
    cleared: RefCell<Vec<TimerId>>,
}

impl MemoryTimers {
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Move the clock forward, firing due timers in deadline order.
    pub fn advance(&self, dt: Duration) {
        let target = self.now.get().saturating_add(dt);
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let due_idx = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(idx, _)| idx);
                due_idx.map(|idx| pending.remove(idx))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            self.fired.borrow_mut().push((timer.id, timer.due));
            (timer.callback)();
        }
        self.now.set(target);
    }

    /// Timers that fired, with the clock time they fired at.
    #[must_use]
    pub fn fired(&self) -> Vec<(TimerId, Duration)> {
        self.fired.borrow().clone()
    }

    #[must_use]
    pub fn cleared(&self) -> Vec<TimerId> {
        self.cleared.borrow().clone()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl TimerHost for MemoryTimers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.pending.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get().saturating_add(delay),
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|t| t.id != id);
        if pending.len() != before {
            self.cleared.borrow_mut().push(id);
        }
    }
}

/// In-memory embedded graphic with a play/pause pair.
pub struct MemoryGraphic {
    controls: RefCell<Result<GraphicControls, HostError>>,
    play_clicks: Cell<usize>,
    loaded: Cell<bool>,
}

impl Default for MemoryGraphic {
    fn default() -> Self {
        Self {
            controls: RefCell::new(Ok(GraphicControls {
                play: true,
                pause: Some(PauseControl { displayed: false }),
            })),
            play_clicks: Cell::new(0),
            loaded: Cell::new(false),
        }
    }
}

impl MemoryGraphic {
    pub fn set_controls(&self, controls: Result<GraphicControls, HostError>) {
        *self.controls.borrow_mut() = controls;
    }

    /// Mark the embedded document as loaded, as if its `load` already fired.
    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.set(loaded);
    }

    #[must_use]
    pub fn play_clicks(&self) -> usize {
        self.play_clicks.get()
    }
}

impl EmbeddedGraphic for MemoryGraphic {
    type Node = MemoryNode;

    fn controls(
        &self,
        _host: &MemoryNode,
        _ids: ControlIds<'_>,
    ) -> Result<GraphicControls, HostError> {
        self.controls.borrow().clone()
    }

    fn click_play(&self, _host: &MemoryNode, ids: ControlIds<'_>) -> Result<(), HostError> {
        let mut controls = self.controls.borrow_mut();
        let state = controls.as_mut().map_err(|err| err.clone())?;
        if !state.play {
            return Err(HostError::MissingElement(ids.play.to_owned()));
        }
        self.play_clicks.set(self.play_clicks.get() + 1);
        state.pause = Some(PauseControl { displayed: true });
        Ok(())
    }

    fn is_loaded(&self, _host: &MemoryNode) -> bool {
        self.loaded.get()
    }
}

/// Every in-memory capability bundled as a [`PageBackend`].
#[derive(Default)]
pub struct MemoryBackend {
    dom: MemoryDom,
    storage: MemoryStorage,
    locale: MemoryLocale,
    clipboard: MemoryClipboard,
    timers: MemoryTimers,
    graphic: MemoryGraphic,
}

/// Handles to the elements of [`MemoryBackend::landing_page`].
#[derive(Debug, Clone, Copy)]
pub struct LandingPage {
    pub hero_title: MemoryNode,
    pub hero_subtitle: MemoryNode,
    /// Translatable element whose key has no table entry.
    pub untranslated: MemoryNode,
    pub lang_selector: MemoryNode,
    pub lang_button: MemoryNode,
    pub current_icon: MemoryNode,
    pub current_code: MemoryNode,
    pub lang_menu: MemoryNode,
    pub command_box: MemoryNode,
    pub install_command: MemoryNode,
    pub copy_button: MemoryNode,
    pub docker_compose: MemoryNode,
    pub notification: MemoryNode,
    pub tab_curl: MemoryNode,
    pub tab_docker: MemoryNode,
    pub curl_content: MemoryNode,
    pub docker_content: MemoryNode,
    pub demo_section: MemoryNode,
    pub demo_graphic: MemoryNode,
    /// Plain paragraph outside the language selector.
    pub outside: MemoryNode,
}

/// Install command shown in the landing page fixture.
pub const INSTALL_COMMAND: &str = "curl -fsSL https://get.dcr.sh | sh";
/// Compose snippet shown in the landing page fixture.
pub const DOCKER_COMPOSE: &str = "services:\n  dcr:\n    image: dcr/registry:latest\n";

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with the landing page markup.
    #[must_use]
    pub fn landing_page() -> (Self, LandingPage) {
        let backend = Self::new();
        let dom = &backend.dom;
        let body = dom.body_node();
        dom.set_class(&body, "no-js", true);

        let header = dom.build(body, "header").node();
        let hero_title = dom
            .build(header, "h1")
            .attr("data-i18n", "hero_title")
            .text("Your container registry in one command")
            .node();
        let hero_subtitle = dom
            .build(header, "p")
            .attr("data-i18n", "hero_subtitle")
            .text("A lightweight, self-hosted Docker registry with a web UI.")
            .node();
        let untranslated = dom
            .build(header, "span")
            .attr("data-i18n", "beta_badge")
            .text("beta")
            .node();

        let lang_selector = dom.build(header, "div").class("lang-selector").node();
        let lang_button = dom
            .build(lang_selector, "button")
            .class("lang-btn")
            .attr("aria-expanded", "false")
            .attr("aria-haspopup", "listbox")
            .node();
        let current_icon = dom.build(lang_button, "span").id("currentLangIcon").node();
        let current_code = dom
            .build(lang_button, "span")
            .id("currentLangCode")
            .text("EN")
            .node();
        let lang_menu = dom
            .build(lang_selector, "div")
            .id("langMenu")
            .class("lang-menu")
            .attr("role", "listbox")
            .node();

        let tabs = dom.build(body, "div").class("tabs").node();
        let tab_curl = dom
            .build(tabs, "button")
            .class("tab")
            .class("active")
            .attr("data-i18n", "tab_curl")
            .text("One-liner")
            .node();
        let tab_docker = dom
            .build(tabs, "button")
            .class("tab")
            .attr("data-i18n", "tab_docker")
            .text("Docker Compose")
            .node();

        let curl_content = dom
            .build(body, "div")
            .id("curl-content")
            .class("tab-content")
            .class("active")
            .node();
        let command_box = dom.build(curl_content, "div").class("command-box").node();
        let install_command = dom
            .build(command_box, "code")
            .id("installCommand")
            .text(INSTALL_COMMAND)
            .node();
        let copy_button = dom
            .build(command_box, "button")
            .class("copy-btn")
            .attr("data-i18n", "copy_button")
            .text("Copy")
            .node();

        let docker_content = dom
            .build(body, "div")
            .id("docker-content")
            .class("tab-content")
            .node();
        let docker_compose = dom
            .build(docker_content, "pre")
            .id("dockerCompose")
            .text(DOCKER_COMPOSE)
            .node();

        let demo_section = dom.build(body, "section").id("demo-section").node();
        let demo_graphic = dom
            .build(demo_section, "object")
            .id("demoSvg")
            .attr("type", "image/svg+xml")
            .node();

        let notification = dom
            .build(body, "div")
            .id("notification")
            .class("notification")
            .attr("data-i18n", "copied")
            .text("Copied to clipboard!")
            .node();
        let outside = dom
            .build(body, "p")
            .attr("data-i18n", "footer_text")
            .text("Open source under the MIT license.")
            .node();

        let page = LandingPage {
            hero_title,
            hero_subtitle,
            untranslated,
            lang_selector,
            lang_button,
            current_icon,
            current_code,
            lang_menu,
            command_box,
            install_command,
            copy_button,
            docker_compose,
            notification,
            tab_curl,
            tab_docker,
            curl_content,
            docker_content,
            demo_section,
            demo_graphic,
            outside,
        };
        (backend, page)
    }
}

impl PageBackend for MemoryBackend {
    type Dom = MemoryDom;
    type Storage = MemoryStorage;
    type Locale = MemoryLocale;
    type Clipboard = MemoryClipboard;
    type Timers = MemoryTimers;
    type Graphic = MemoryGraphic;

    fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    fn locale(&self) -> &MemoryLocale {
        &self.locale
    }

    fn clipboard(&self) -> &MemoryClipboard {
        &self.clipboard
    }

    fn timers(&self) -> &MemoryTimers {
        &self.timers
    }

    fn graphic(&self) -> &MemoryGraphic {
        &self.graphic
    }
}
