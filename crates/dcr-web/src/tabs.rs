#![forbid(unsafe_code)]

//! Tab controller: one active panel, one active tab, demo section visibility.

use dcr_backend::PageDom;
use tracing::debug;

use crate::config::PageConfig;

/// Class marking the active tab and panel.
pub const ACTIVE_CLASS: &str = "active";

/// What a [`switch_tab`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSwitch {
    pub active_panels: usize,
    pub active_tabs: usize,
    pub demo_visible: bool,
}

/// Activate the panel `<tab_name>-content` and the `clicked` tab; deactivate
/// every other panel and tab. The demo section is shown only for the
/// configured demo tab.
pub fn switch_tab<D: PageDom>(
    dom: &D,
    config: &PageConfig,
    tab_name: &str,
    clicked: Option<&D::Node>,
) -> TabSwitch {
    let elements = &config.elements;
    let panel_id = format!("{tab_name}-content");

    let mut active_panels = 0;
    for panel in dom.query_all(&elements.tab_content_selector) {
        let on = dom.attribute(&panel, "id").as_deref() == Some(panel_id.as_str());
        dom.set_class(&panel, ACTIVE_CLASS, on);
        active_panels += usize::from(on);
    }

    let mut active_tabs = 0;
    for tab in dom.query_all(&elements.tab_selector) {
        let on = clicked == Some(&tab);
        dom.set_class(&tab, ACTIVE_CLASS, on);
        active_tabs += usize::from(on);
    }

    let demo_visible = tab_name == config.demo_tab;
    match dom.by_id(&elements.demo_section_id) {
        Some(demo) => dom.set_visible(&demo, demo_visible),
        None => debug!(id = %elements.demo_section_id, "demo section missing"),
    }

    debug!(tab = tab_name, active_panels, demo_visible, "tab switched");
    TabSwitch {
        active_panels,
        active_tabs,
        demo_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use dcr_backend::PageBackend;

    #[test]
    fn unknown_tab_deactivates_every_panel() {
        let (backend, page) = MemoryBackend::landing_page();
        let dom = backend.dom();
        let result = switch_tab(dom, &PageConfig::default(), "nope", Some(&page.tab_docker));

        assert_eq!(result.active_panels, 0);
        assert_eq!(result.active_tabs, 1);
        assert!(!dom.has_class(&page.curl_content, ACTIVE_CLASS));
        assert!(!dom.has_class(&page.docker_content, ACTIVE_CLASS));
        assert!(!dom.is_visible(page.demo_section));
    }

    #[test]
    fn missing_clicked_tab_clears_all_tabs() {
        let (backend, page) = MemoryBackend::landing_page();
        let dom = backend.dom();
        let result = switch_tab(dom, &PageConfig::default(), "docker", None);

        assert_eq!(result.active_tabs, 0);
        assert!(!dom.has_class(&page.tab_curl, ACTIVE_CLASS));
        assert!(dom.has_class(&page.docker_content, ACTIVE_CLASS));
    }

    #[test]
    fn configured_demo_tab_controls_visibility() {
        let (backend, page) = MemoryBackend::landing_page();
        let dom = backend.dom();
        let config = PageConfig {
            demo_tab: "docker".into(),
            ..PageConfig::default()
        };

        assert!(switch_tab(dom, &config, "docker", Some(&page.tab_docker)).demo_visible);
        assert!(dom.is_visible(page.demo_section));
        assert!(!switch_tab(dom, &config, "curl", Some(&page.tab_curl)).demo_visible);
        assert!(!dom.is_visible(page.demo_section));
    }
}
