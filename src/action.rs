//! Logical actions produced by the prefix dispatcher and the modal state machine

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pane/layout action, independent of which host command performs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalAction {
    /// Split the current pane, new pane below
    SplitHorizontal,
    /// Split the current pane, new pane to the right
    SplitVertical,
    /// Move focus to the pane on the left
    FocusLeft,
    /// Move focus to the pane on the right
    FocusRight,
    /// Move focus to the pane above
    FocusUp,
    /// Move focus to the pane below
    FocusDown,
    /// Close the current pane
    ClosePane,
    /// Capture the shell layout and persist it
    SaveLayoutProfile,
    /// Restore the saved layout
    LoadLayoutProfile,
    /// Switch modal mode
    SetMode(Mode),
}

impl LogicalAction {
    /// Actions resolved through host command chains, in display order.
    pub const CHAINED: &'static [Self] = &[
        Self::SplitHorizontal,
        Self::SplitVertical,
        Self::FocusLeft,
        Self::FocusRight,
        Self::FocusUp,
        Self::FocusDown,
        Self::ClosePane,
    ];

    /// Stable identifier, used for dispatcher command ids and chain config keys.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SplitHorizontal => "split.horizontal",
            Self::SplitVertical => "split.vertical",
            Self::FocusLeft => "focus.left",
            Self::FocusRight => "focus.right",
            Self::FocusUp => "focus.up",
            Self::FocusDown => "focus.down",
            Self::ClosePane => "close-pane",
            Self::SaveLayoutProfile => "layout.save-profile",
            Self::LoadLayoutProfile => "layout.load-profile",
            Self::SetMode(Mode::Normal) => "mode.normal",
            Self::SetMode(Mode::Insert) => "mode.insert",
            Self::SetMode(Mode::Visual) => "mode.visual",
            Self::SetMode(Mode::Command) => "mode.command",
        }
    }

    /// Human readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SplitHorizontal => "Split Pane Horizontal",
            Self::SplitVertical => "Split Pane Vertical",
            Self::FocusLeft => "Focus Pane Left",
            Self::FocusRight => "Focus Pane Right",
            Self::FocusUp => "Focus Pane Up",
            Self::FocusDown => "Focus Pane Down",
            Self::ClosePane => "Close Current Pane",
            Self::SaveLayoutProfile => "Save Layout Profile",
            Self::LoadLayoutProfile => "Load Layout Profile",
            Self::SetMode(Mode::Normal) => "Switch to Normal Mode",
            Self::SetMode(Mode::Insert) => "Switch to Insert Mode",
            Self::SetMode(Mode::Visual) => "Switch to Visual Mode",
            Self::SetMode(Mode::Command) => "Switch to Command Mode",
        }
    }

    /// The focus action bound to a vi navigation key (`h`, `j`, `k`, `l`).
    #[must_use]
    pub fn from_navigation_key(key: &str) -> Option<Self> {
        match key {
            "h" => Some(Self::FocusLeft),
            "j" => Some(Self::FocusDown),
            "k" => Some(Self::FocusUp),
            "l" => Some(Self::FocusRight),
            _ => None,
        }
    }

    /// The action bound to a normalized key struck while the prefix is armed.
    #[must_use]
    pub fn from_prefixed_key(key: &str) -> Option<Self> {
        match key {
            "\"" | "-" => Some(Self::SplitHorizontal),
            "%" | "\\" => Some(Self::SplitVertical),
            "x" => Some(Self::ClosePane),
            "s" => Some(Self::SaveLayoutProfile),
            "r" => Some(Self::LoadLayoutProfile),
            "i" => Some(Self::SetMode(Mode::Insert)),
            "v" => Some(Self::SetMode(Mode::Visual)),
            ":" => Some(Self::SetMode(Mode::Command)),
            "n" => Some(Self::SetMode(Mode::Normal)),
            other => Self::from_navigation_key(other),
        }
    }
}

impl fmt::Display for LogicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
