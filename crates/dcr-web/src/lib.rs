#![forbid(unsafe_code)]

//! Client-side interactivity for the dcr landing page.
//!
//! Components are written against the host traits in [`dcr_backend`]:
//! - [`language_selector`]: current language, persistence, translation, and
//!   the options menu;
//! - [`clipboard`] and [`notification`]: copy with a fallback path and a
//!   transient confirmation;
//! - [`tabs`]: install-method tabs and demo visibility;
//! - [`autoplay`]: one-shot start of the embedded demo graphic.
//!
//! [`page::Page`] wires them to DOM events. On `wasm32` the browser backend
//! and the JavaScript exports live in a private `wasm` module; everywhere else
//! [`memory::MemoryBackend`] drives the same code deterministically.

pub mod autoplay;
pub mod clipboard;
pub mod config;
pub mod language_selector;
pub mod memory;
pub mod notification;
pub mod page;
pub mod tabs;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebBackend;

pub use autoplay::{AutoplayHook, AutoplayOutcome};
pub use config::{ConfigError, ElementIds, PageConfig};
pub use language_selector::{InitReport, LanguageSelector, LanguageSource, MenuState};
pub use notification::Notification;
pub use page::Page;
pub use tabs::TabSwitch;
