//! Keyboard event types and key normalization
//!
//! Key labels follow the DOM `KeyboardEvent.key` convention: printable keys are
//! the character they produce (`"a"`, `":"`), everything else is a name
//! (`"Escape"`, `"Enter"`, `"ArrowLeft"`).

mod filter;

pub use filter::ContextFilter;

use std::borrow::Cow;

/// Label of the escape key.
pub const ESCAPE: &str = "Escape";

/// Label of the enter key.
pub const ENTER: &str = "Enter";

/// Labels produced when a modifier key alone is pressed.
pub const MODIFIER_KEYS: &[&str] = &["Shift", "Control", "Alt", "Meta"];

/// Modifier keys held while a key was struck
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key
    pub ctrl: bool,
    /// Alt / option key
    pub alt: bool,
    /// Meta / command / super key
    pub meta: bool,
    /// Shift key
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        meta: false,
        shift: false,
    };

    /// Only control held.
    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        meta: false,
        shift: false,
    };

    /// Only alt held.
    pub const ALT: Self = Self {
        ctrl: false,
        alt: true,
        meta: false,
        shift: false,
    };

    /// Only meta held.
    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        meta: true,
        shift: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        meta: false,
        shift: true,
    };

    /// Whether a host-shortcut modifier (ctrl, alt or meta) is held.
    ///
    /// Shift is not a command modifier: it only changes which character a key
    /// produces.
    #[must_use]
    pub const fn has_command_modifier(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A keyboard event as delivered by the host's event source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw key label
    pub key: String,
    /// Modifiers held while the key was struck
    pub modifiers: Modifiers,
    /// Identifier of the element the event targets, if any
    pub target: Option<String>,
    /// Whether an earlier listener already handled this event
    pub default_prevented: bool,
}

impl KeyEvent {
    /// Create an unmodified event for `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            target: None,
            default_prevented: false,
        }
    }

    /// Create an event for `key` struck with control held.
    #[must_use]
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(key).with_modifiers(Modifiers::CTRL)
    }

    /// Replace the modifiers of this event.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the target element of this event.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Mark this event as already handled by another listener.
    #[must_use]
    pub const fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    /// The normalized form of this event's key.
    #[must_use]
    pub fn normalized_key(&self) -> Cow<'_, str> {
        normalize_key(&self.key)
    }
}

/// What the host should do with an event after dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Disposition {
    /// The dispatcher handled the event: prevent the default action and stop
    /// propagation.
    Consumed,
    /// The dispatcher did not handle the event: let it reach the editor.
    PassThrough,
}

impl Disposition {
    /// Whether the event was consumed.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Canonicalize a raw key label.
///
/// Single-character labels are lower-cased; named keys such as `"Escape"` are
/// returned unchanged.
#[must_use]
pub fn normalize_key(key: &str) -> Cow<'_, str> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.to_lowercase().eq([ch]) => {
            Cow::Owned(ch.to_lowercase().collect())
        }
        _ => Cow::Borrowed(key),
    }
}

/// Whether `key` is the label of a lone modifier key press.
#[must_use]
pub fn is_modifier_only(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Whether `key` is a single character (as opposed to a named key).
#[must_use]
pub fn is_single_char(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some() && chars.next().is_none()
}
