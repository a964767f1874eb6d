//! The modal state machine
//!
//! Owns the current [`Mode`] and classifies keys against mode-specific rules.
//! This is the only place the mode changes; callers learn about changes
//! through the [`Transition`] in each [`Outcome`].
//!
//! Per key, in order:
//! 1. Escape leaves any non-normal mode (consumed), and passes through in normal.
//! 2. Insert mode passes every other key through.
//! 3. A held ctrl/alt/meta passes the key through so host shortcuts win.
//! 4. Normal: `i`/`v`/`:` switch mode, `hjkl` move focus.
//! 5. Visual: `hjkl` move focus, `i` switches to insert.
//! 6. Command: Enter returns to normal, single characters are swallowed.

use crate::action::LogicalAction;
use crate::keys::{Disposition, ENTER, ESCAPE, KeyEvent, is_single_char};
use crate::mode::Mode;

/// A change of mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode before the change
    pub from: Mode,
    /// Mode after the change
    pub to: Mode,
}

/// Result of interpreting one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the key was consumed
    pub disposition: Disposition,
    /// Mode change caused by the key
    pub transition: Option<Transition>,
    /// Action emitted by the key
    pub action: Option<LogicalAction>,
}

impl Outcome {
    /// The key was not handled.
    pub const PASS_THROUGH: Self = Self {
        disposition: Disposition::PassThrough,
        transition: None,
        action: None,
    };

    /// The key was handled and has no further effect.
    pub const SWALLOWED: Self = Self {
        disposition: Disposition::Consumed,
        transition: None,
        action: None,
    };

    const fn transitioned(transition: Option<Transition>) -> Self {
        Self {
            disposition: Disposition::Consumed,
            transition,
            action: None,
        }
    }

    const fn emitted(action: LogicalAction) -> Self {
        Self {
            disposition: Disposition::Consumed,
            transition: None,
            action: Some(action),
        }
    }
}

/// Vi-style mode tracking and key classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalStateMachine {
    mode: Mode,
}

impl ModalStateMachine {
    /// Create a machine in normal mode.
    #[must_use]
    pub const fn new() -> Self {
        Self { mode: Mode::Normal }
    }

    /// Create a machine starting in `mode` (e.g. restored from storage).
    #[must_use]
    pub const fn with_mode(mode: Mode) -> Self {
        Self { mode }
    }

    /// The active mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch to `mode`. Returns the transition, or `None` if already there.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Transition> {
        if self.mode == mode {
            return None;
        }
        let transition = Transition {
            from: self.mode,
            to: mode,
        };
        self.mode = mode;
        Some(transition)
    }

    /// Classify `event` in the current mode, switching mode if it asks to.
    ///
    /// The event must already have passed the context filter and the prefix
    /// handler.
    pub fn interpret(&mut self, event: &KeyEvent) -> Outcome {
        if event.key == ESCAPE {
            if self.mode == Mode::Normal {
                return Outcome::PASS_THROUGH;
            }
            return Outcome::transitioned(self.set_mode(Mode::Normal));
        }

        if self.mode == Mode::Insert || event.modifiers.has_command_modifier() {
            return Outcome::PASS_THROUGH;
        }

        let key = event.normalized_key();
        match self.mode {
            Mode::Normal => match key.as_ref() {
                "i" => Outcome::transitioned(self.set_mode(Mode::Insert)),
                "v" => Outcome::transitioned(self.set_mode(Mode::Visual)),
                ":" => Outcome::transitioned(self.set_mode(Mode::Command)),
                other => LogicalAction::from_navigation_key(other)
                    .map_or(Outcome::PASS_THROUGH, Outcome::emitted),
            },
            Mode::Visual => match key.as_ref() {
                "i" => Outcome::transitioned(self.set_mode(Mode::Insert)),
                other => LogicalAction::from_navigation_key(other)
                    .map_or(Outcome::PASS_THROUGH, Outcome::emitted),
            },
            Mode::Command => {
                if event.key == ENTER {
                    Outcome::transitioned(self.set_mode(Mode::Normal))
                } else if is_single_char(&key) {
                    Outcome::SWALLOWED
                } else {
                    Outcome::PASS_THROUGH
                }
            }
            Mode::Insert => Outcome::PASS_THROUGH,
        }
    }
}
