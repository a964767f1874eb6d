//! Context eligibility for modal interpretation

use super::KeyEvent;
use crate::config::Config;
use crate::host::ContextKeys;

/// Decides whether an event belongs to the dispatcher at all.
///
/// An event is eligible iff the modal context holds for its target and the
/// overlay context does not. Checking has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFilter {
    modal_context: String,
    overlay_context: String,
}

impl ContextFilter {
    /// Create a filter from the two context names.
    #[must_use]
    pub fn new(modal_context: impl Into<String>, overlay_context: impl Into<String>) -> Self {
        Self {
            modal_context: modal_context.into(),
            overlay_context: overlay_context.into(),
        }
    }

    /// Create a filter using the context names from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.modal_context, &config.overlay_context)
    }

    /// Name of the modal-eligible region context.
    #[must_use]
    pub fn modal_context(&self) -> &str {
        &self.modal_context
    }

    /// Whether `event` should be handed to the dispatcher.
    #[must_use]
    pub fn is_eligible(&self, contexts: &dyn ContextKeys, event: &KeyEvent) -> bool {
        let target = event.target.as_deref();
        if contexts.matches(&self.overlay_context, target) {
            return false;
        }
        contexts.matches(&self.modal_context, target)
    }
}
