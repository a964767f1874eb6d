//! Modal editing modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The input interpretation mode. Exactly one is active at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Keys are commands (initial mode)
    #[default]
    Normal,
    /// Keys go to the editor untouched
    Insert,
    /// Navigation keys move focus, the rest reach the editor
    Visual,
    /// A command line is conceptually open; printable keys are swallowed
    Command,
}

impl Mode {
    /// All modes, in display order.
    pub const ALL: &'static [Self] = &[Self::Normal, Self::Insert, Self::Visual, Self::Command];

    /// Lowercase name, as persisted.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Insert => "insert",
            Self::Visual => "visual",
            Self::Command => "command",
        }
    }

    /// Uppercase name, as shown on the status bar.
    #[must_use]
    pub const fn status_label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual => "VISUAL",
            Self::Command => "COMMAND",
        }
    }

    /// Parse a persisted mode name. Only the exact lowercase names are accepted.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|mode| mode.label() == label)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown mode name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownMode(s.to_string()))
    }
}
