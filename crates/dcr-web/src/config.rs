#![forbid(unsafe_code)]

//! Page configuration: storage key, timings, and the DOM contract.
//!
//! Every field defaults to the values the landing page markup uses, so
//! `PageConfig::default()` works without any configuration block. A page may
//! override any subset through JSON:
//!
//! ```json
//! { "storage_key": "dcr_lang", "notification_ms": 2000, "demo_tab": "curl" }
//! ```

use core::time::Duration;

use dcr_i18n::LanguageCode;
use serde::{Deserialize, Serialize};

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid page config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid page config: {0}")]
    Invalid(String),
}

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// `localStorage` key holding the persisted language.
    pub storage_key: String,
    /// Applied when neither storage nor the browser locale match.
    pub default_language: LanguageCode,
    /// How long the copy notification stays visible.
    pub notification_ms: u64,
    /// Tab identifier that shows the demo section.
    pub demo_tab: String,
    pub elements: ElementIds,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            storage_key: "dcr_lang".into(),
            default_language: LanguageCode::DEFAULT,
            notification_ms: 2000,
            demo_tab: "curl".into(),
            elements: ElementIds::default(),
        }
    }
}

impl PageConfig {
    /// Load from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Reject values the page cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.notification_ms == 0 {
            return Err(ConfigError::Invalid(
                "notification_ms must be greater than zero".into(),
            ));
        }
        if self.demo_tab.trim().is_empty() {
            return Err(ConfigError::Invalid("demo_tab must not be empty".into()));
        }
        if let Some(name) = self.elements.first_empty() {
            return Err(ConfigError::Invalid(format!(
                "elements.{name} must not be empty"
            )));
        }
        Ok(())
    }
}

/// Element ids, selectors, and class names the page manipulates.
///
/// Fields named `*_id` are element ids; fields named `*_selector` are CSS
/// selectors; fields named `*_class` are bare class names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub install_command_id: String,
    pub docker_compose_id: String,
    pub notification_id: String,
    pub lang_menu_id: String,
    pub lang_button_selector: String,
    pub lang_selector_selector: String,
    pub current_lang_icon_id: String,
    pub current_lang_code_id: String,
    /// Attribute carrying the fragment key on translatable elements.
    pub i18n_attribute: String,
    pub tab_selector: String,
    pub tab_content_selector: String,
    pub demo_section_id: String,
    pub command_box_selector: String,
    pub copy_button_class: String,
    pub demo_graphic_id: String,
    pub play_control_id: String,
    pub pause_control_id: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            install_command_id: "installCommand".into(),
            docker_compose_id: "dockerCompose".into(),
            notification_id: "notification".into(),
            lang_menu_id: "langMenu".into(),
            lang_button_selector: ".lang-btn".into(),
            lang_selector_selector: ".lang-selector".into(),
            current_lang_icon_id: "currentLangIcon".into(),
            current_lang_code_id: "currentLangCode".into(),
            i18n_attribute: "data-i18n".into(),
            tab_selector: ".tab".into(),
            tab_content_selector: ".tab-content".into(),
            demo_section_id: "demo-section".into(),
            command_box_selector: ".command-box".into(),
            copy_button_class: "copy-btn".into(),
            demo_graphic_id: "demoSvg".into(),
            play_control_id: "play-button".into(),
            pause_control_id: "pause-button".into(),
        }
    }
}

impl ElementIds {
    fn fields(&self) -> [(&'static str, &str); 17] {
        [
            ("install_command_id", self.install_command_id.as_str()),
            ("docker_compose_id", self.docker_compose_id.as_str()),
            ("notification_id", self.notification_id.as_str()),
            ("lang_menu_id", self.lang_menu_id.as_str()),
            ("lang_button_selector", self.lang_button_selector.as_str()),
            ("lang_selector_selector", self.lang_selector_selector.as_str()),
            ("current_lang_icon_id", self.current_lang_icon_id.as_str()),
            ("current_lang_code_id", self.current_lang_code_id.as_str()),
            ("i18n_attribute", self.i18n_attribute.as_str()),
            ("tab_selector", self.tab_selector.as_str()),
            ("tab_content_selector", self.tab_content_selector.as_str()),
            ("demo_section_id", self.demo_section_id.as_str()),
            ("command_box_selector", self.command_box_selector.as_str()),
            ("copy_button_class", self.copy_button_class.as_str()),
            ("demo_graphic_id", self.demo_graphic_id.as_str()),
            ("play_control_id", self.play_control_id.as_str()),
            ("pause_control_id", self.pause_control_id.as_str()),
        ]
    }

    fn first_empty(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }

    /// Selector matching every translatable element.
    #[must_use]
    pub fn i18n_selector(&self) -> String {
        format!("[{}]", self.i18n_attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_page_markup() {
        let config = PageConfig::default();
        assert_eq!(config.storage_key, "dcr_lang");
        assert_eq!(config.default_language, LanguageCode::En);
        assert_eq!(config.notification_duration(), Duration::from_secs(2));
        assert_eq!(config.demo_tab, "curl");
        assert_eq!(config.elements.i18n_selector(), "[data-i18n]");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = PageConfig::from_json_str(
            r#"{ "notification_ms": 500, "elements": { "lang_menu_id": "menu" } }"#,
        )
        .unwrap();
        assert_eq!(config.notification_ms, 500);
        assert_eq!(config.elements.lang_menu_id, "menu");
        assert_eq!(config.elements.notification_id, "notification");
        assert_eq!(config.storage_key, "dcr_lang");
    }

    #[test]
    fn default_language_accepts_supported_codes_only() {
        let config = PageConfig::from_json_str(r#"{ "default_language": "ja" }"#).unwrap();
        assert_eq!(config.default_language, LanguageCode::Ja);
        assert!(matches!(
            PageConfig::from_json_str(r#"{ "default_language": "xx" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = PageConfig::from_json_str(r#"{ "notification_ms": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("notification_ms"));
    }

    #[test]
    fn empty_element_id_is_rejected() {
        let err = PageConfig::from_json_str(r#"{ "elements": { "notification_id": " " } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("notification_id")));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            PageConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
