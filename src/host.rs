//! Capabilities the host shell supplies to the dispatcher
//!
//! The dispatcher never reaches into the host directly. Everything it needs
//! (context predicates, the command registry, the status bar, key-value
//! storage, pane layout access and user-visible messages) comes in through the
//! traits below, bundled in a [`Host`].

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Context predicate service.
pub trait ContextKeys: Send + Sync {
    /// Whether the named context holds for the given event target.
    fn matches(&self, context: &str, target: Option<&str>) -> bool;
}

/// The host's command registry.
pub trait CommandHost: Send + Sync {
    /// Whether a command with this identifier is registered.
    fn has_command(&self, id: &str) -> bool;

    /// Run a registered command to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn execute_command(&self, id: &str) -> Result<()>;
}

/// Which side of the status bar an element sits on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusAlignment {
    /// Left side
    Left,
    /// Right side
    #[default]
    Right,
}

/// One element shown on the status surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Visible text
    pub text: String,
    /// Hover text
    pub tooltip: String,
    /// Side of the bar
    pub alignment: StatusAlignment,
    /// Ordering priority (higher sits closer to the edge)
    pub priority: i32,
}

/// A status bar with named slots.
pub trait StatusSurface: Send + Sync {
    /// Create or replace the element in slot `id`.
    fn set_element(&self, id: &str, entry: StatusEntry);

    /// Remove the element in slot `id`, if present.
    fn remove_element(&self, id: &str);
}

/// Persistent key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_data(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_data(&self, key: &str, value: Value) -> Result<()>;
}

/// Access to the shell's pane arrangement as an opaque blob.
pub trait LayoutCapability: Send + Sync {
    /// Capture the current layout.
    fn layout_data(&self) -> Value;

    /// Restore a previously captured layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell rejects the layout.
    fn set_layout_data(&self, data: Value) -> Result<()>;
}

/// The application shell hosting the panes.
///
/// Every method has a default describing a shell that offers nothing, so
/// hosts only implement what they support.
pub trait Shell: Send + Sync {
    /// Identifier of the widget that currently has focus.
    fn current_widget(&self) -> Option<String> {
        None
    }

    /// Close the widget with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot close widgets or the close fails.
    fn close_widget(&self, id: &str) -> Result<()> {
        let _ = id;
        Err(Error::CapabilityUnavailable("close_widget"))
    }

    /// The layout capability, if this shell version has one.
    fn layout(&self) -> Option<Arc<dyn LayoutCapability>> {
        None
    }
}

/// User-visible messages.
pub trait Notifier: Send + Sync {
    /// Show an informational message.
    fn info(&self, message: &str);

    /// Show a warning.
    fn warn(&self, message: &str);
}

/// Every capability the dispatcher is constructed with
#[derive(Clone)]
pub struct Host {
    /// Context predicate service
    pub contexts: Arc<dyn ContextKeys>,
    /// Command registry
    pub commands: Arc<dyn CommandHost>,
    /// Status bar
    pub status: Arc<dyn StatusSurface>,
    /// Key-value storage
    pub store: Arc<dyn KeyValueStore>,
    /// Application shell
    pub shell: Arc<dyn Shell>,
    /// User-visible messages
    pub notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
