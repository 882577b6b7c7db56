#![forbid(unsafe_code)]

//! Clipboard fallback and command-box click routing.
//!
//! The asynchronous primary write and its continuation live on
//! [`Page`](crate::page::Page), which owns the shared state the completion
//! needs. This module holds the synchronous pieces.

use dcr_backend::{HostError, PageDom};

/// Off-screen offset for the temporary textarea.
const OFFSCREEN: &str = "-999999px";

/// Message shown when every copy mechanism failed.
#[must_use]
pub fn manual_copy_message(text: &str) -> String {
    format!("Copy failed. Please copy manually: {text}")
}

/// Removes a temporarily inserted node when dropped.
struct DetachOnDrop<'a, D: PageDom> {
    dom: &'a D,
    node: D::Node,
}

impl<D: PageDom> Drop for DetachOnDrop<'_, D> {
    fn drop(&mut self) {
        self.dom.remove(&self.node);
    }
}

/// Copy `text` with the legacy selection technique.
///
/// Inserts a hidden textarea, focuses and selects it, and runs the copy
/// command. The textarea is removed on every path once inserted.
pub fn fallback_copy<D: PageDom>(dom: &D, text: &str) -> Result<(), HostError> {
    let body = dom
        .body()
        .ok_or_else(|| HostError::MissingElement("body".into()))?;
    let area = dom.create_element("textarea")?;
    dom.set_value(&area, text);
    dom.set_style(&area, "position", "fixed");
    dom.set_style(&area, "left", OFFSCREEN);
    dom.set_style(&area, "top", OFFSCREEN);
    dom.append_child(&body, &area)?;

    let inserted = DetachOnDrop { dom, node: area };
    dom.focus_and_select(&inserted.node)?;
    dom.exec_copy()
}

/// Whether a click inside the command box should copy the install command.
///
/// Clicks on (or inside) the dedicated copy button are left to its own handler.
pub fn is_command_box_copy<D: PageDom>(
    dom: &D,
    target: Option<&D::Node>,
    copy_button_class: &str,
) -> bool {
    let Some(target) = target else {
        return true;
    };
    dom.closest(target, &format!(".{copy_button_class}")).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBackend, MemoryDom};
    use dcr_backend::PageBackend;

    #[test]
    fn fallback_copies_and_cleans_up() {
        let dom = MemoryDom::new();
        fallback_copy(&dom, "docker compose up -d").unwrap();
        assert_eq!(dom.copied(), vec!["docker compose up -d".to_owned()]);
        assert_eq!(dom.count_tag("textarea"), 0);
    }

    #[test]
    fn fallback_cleans_up_when_copy_command_fails() {
        let dom = MemoryDom::new();
        dom.fail_exec_copy(true);
        let err = fallback_copy(&dom, "x").unwrap_err();
        assert!(matches!(err, HostError::Rejected(_)));
        assert_eq!(dom.count_tag("textarea"), 0);
        assert!(dom.copied().is_empty());
    }

    #[test]
    fn manual_message_contains_the_text() {
        assert_eq!(
            manual_copy_message("curl x | sh"),
            "Copy failed. Please copy manually: curl x | sh"
        );
    }

    #[test]
    fn copy_button_clicks_are_not_routed() {
        let (backend, page) = MemoryBackend::landing_page();
        let dom = backend.dom();
        assert!(is_command_box_copy(dom, Some(&page.install_command), "copy-btn"));
        assert!(is_command_box_copy(dom, Some(&page.command_box), "copy-btn"));
        assert!(!is_command_box_copy(dom, Some(&page.copy_button), "copy-btn"));
    }
}
