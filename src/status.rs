//! Status line reporting
//!
//! One slot on the host status surface shows the active mode, plus a
//! `[C-b]` style marker while the prefix is armed.

use crate::config::Config;
use crate::host::{StatusAlignment, StatusEntry, StatusSurface};
use crate::mode::Mode;
use std::fmt;
use std::sync::Arc;

/// Writes mode and prefix state to a status slot
#[derive(Clone)]
pub struct StatusReporter {
    surface: Arc<dyn StatusSurface>,
    slot: String,
    priority: i32,
    prefix_key: String,
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter")
            .field("slot", &self.slot)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl StatusReporter {
    /// Create a reporter for the slot and prefix key named in `config`.
    #[must_use]
    pub fn new(surface: Arc<dyn StatusSurface>, config: &Config) -> Self {
        Self {
            surface,
            slot: config.status_slot.clone(),
            priority: config.status_priority,
            prefix_key: config.prefix_key.clone(),
        }
    }

    /// Slot id on the status surface.
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Build the element for `mode`, marking a pending prefix.
    #[must_use]
    pub fn render(&self, mode: Mode, prefix_pending: bool) -> StatusEntry {
        let label = mode.status_label();
        let (text, tooltip) = if prefix_pending {
            (
                format!("{label} [C-{}]", self.prefix_key),
                format!("Vim mode: {label}. tmux prefix is pending."),
            )
        } else {
            (label.to_string(), format!("Vim mode: {label}."))
        };
        StatusEntry {
            text,
            tooltip,
            alignment: StatusAlignment::Right,
            priority: self.priority,
        }
    }

    /// Show the current state.
    pub fn report(&self, mode: Mode, prefix_pending: bool) {
        self.surface
            .set_element(&self.slot, self.render(mode, prefix_pending));
    }

    /// Remove the slot from the surface.
    pub fn clear(&self) {
        self.surface.remove_element(&self.slot);
    }
}
