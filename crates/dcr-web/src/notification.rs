#![forbid(unsafe_code)]

//! Transient "copied" notification.
//!
//! At most one hide timer is pending: showing again while visible clears the
//! previous timer before scheduling a new one, so the hide is always timed
//! from the latest show.

use core::time::Duration;

use dcr_backend::{PageBackend, PageDom, TimerHost, TimerId};
use tracing::{trace, warn};

use crate::config::PageConfig;

/// Class that makes the notification visible.
pub const VISIBLE_CLASS: &str = "show";

#[derive(Debug)]
pub struct Notification {
    element_id: String,
    duration: Duration,
    pending: Option<TimerId>,
}

impl Notification {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            element_id: config.elements.notification_id.clone(),
            duration: config.notification_duration(),
            pending: None,
        }
    }

    /// Pending hide timer, if the notification is showing.
    #[must_use]
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Show the notification and (re)schedule its hide.
    ///
    /// `on_elapsed` runs when the hide timer fires and is expected to call
    /// [`hide`](Self::hide). Returns `false` when the element is missing.
    pub fn show<B: PageBackend>(&mut self, backend: &B, on_elapsed: Box<dyn FnOnce()>) -> bool {
        let dom = backend.dom();
        let Some(element) = dom.by_id(&self.element_id) else {
            warn!(id = %self.element_id, "notification element missing");
            return false;
        };

        if let Some(previous) = self.pending.take() {
            backend.timers().clear_timeout(previous);
            trace!(?previous, "superseded pending notification hide");
        }
        dom.set_class(&element, VISIBLE_CLASS, true);
        self.pending = Some(backend.timers().set_timeout(self.duration, on_elapsed));
        true
    }

    /// Hide the notification and forget the pending timer.
    pub fn hide<D: PageDom>(&mut self, dom: &D) {
        self.pending = None;
        if let Some(element) = dom.by_id(&self.element_id) {
            dom.set_class(&element, VISIBLE_CLASS, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[test]
    fn show_adds_class_and_schedules_hide() {
        let (backend, page) = MemoryBackend::landing_page();
        let mut notification = Notification::new(&PageConfig::default());

        assert!(notification.show(&backend, Box::new(|| {})));
        assert!(backend.dom().has_class(&page.notification, VISIBLE_CLASS));
        assert!(notification.pending().is_some());
        assert_eq!(backend.timers().pending(), 1);
    }

    #[test]
    fn second_show_clears_the_first_timer() {
        let (backend, _page) = MemoryBackend::landing_page();
        let mut notification = Notification::new(&PageConfig::default());

        notification.show(&backend, Box::new(|| {}));
        let first = notification.pending().unwrap();
        notification.show(&backend, Box::new(|| {}));

        assert_eq!(backend.timers().cleared(), vec![first]);
        assert_eq!(backend.timers().pending(), 1);
        assert_ne!(notification.pending(), Some(first));
    }

    #[test]
    fn hide_removes_class() {
        let (backend, page) = MemoryBackend::landing_page();
        let mut notification = Notification::new(&PageConfig::default());
        notification.show(&backend, Box::new(|| {}));
        notification.hide(backend.dom());

        assert!(!backend.dom().has_class(&page.notification, VISIBLE_CLASS));
        assert_eq!(notification.pending(), None);
    }

    #[test]
    fn missing_element_schedules_nothing() {
        let backend = MemoryBackend::new();
        let mut notification = Notification::new(&PageConfig::default());
        assert!(!notification.show(&backend, Box::new(|| {})));
        assert_eq!(backend.timers().pending(), 0);
    }
}
