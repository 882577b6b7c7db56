#![forbid(unsafe_code)]

//! One-shot autoplay for the embedded demo graphic.

use dcr_backend::{ControlIds, EmbeddedGraphic, HostError};
use tracing::{debug, info};

/// What the hook did on a load event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoplayOutcome {
    /// The play control was activated.
    Started,
    /// A displayed pause control shows the content is already playing.
    AlreadyPlaying,
    NoPlayControl,
    /// The embedded document could not be inspected or driven.
    Unavailable(HostError),
    /// A previous load event was already handled.
    AlreadyHandled,
}

/// Fires the demo's play control on the first load only.
#[derive(Debug, Default)]
pub struct AutoplayHook {
    handled: bool,
}

impl AutoplayHook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn handled(&self) -> bool {
        self.handled
    }

    pub fn on_load<G: EmbeddedGraphic>(
        &mut self,
        graphic: &G,
        host: &G::Node,
        ids: ControlIds<'_>,
    ) -> AutoplayOutcome {
        if self.handled {
            return AutoplayOutcome::AlreadyHandled;
        }
        self.handled = true;

        let controls = match graphic.controls(host, ids) {
            Ok(controls) => controls,
            Err(err) => {
                info!(%err, "demo autoplay not available");
                return AutoplayOutcome::Unavailable(err);
            }
        };
        if !controls.play {
            debug!(play = ids.play, "demo has no play control");
            return AutoplayOutcome::NoPlayControl;
        }
        if controls.is_playing() {
            return AutoplayOutcome::AlreadyPlaying;
        }

        match graphic.click_play(host, ids) {
            Ok(()) => {
                debug!("demo autoplay started");
                AutoplayOutcome::Started
            }
            Err(err) => {
                info!(%err, "demo autoplay not available");
                AutoplayOutcome::Unavailable(err)
            }
        }
    }
}
