//! The dispatcher's own commands and their default keybindings

use crate::action::LogicalAction;
use crate::mode::Mode;
use std::fmt;

/// Category label shown next to every dispatcher command.
pub const CATEGORY: &str = "Modal Layout";

/// Context clause attached to every default keybinding.
pub const KEYBINDING_WHEN: &str = "editorTextFocus";

/// A named operation the host can bind to a key or palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatcherCommand {
    /// Arm the prefix as if the chord had been struck
    ArmPrefix,
    /// Perform a logical action directly
    Run(LogicalAction),
}

/// A default key assignment for a [`DispatcherCommand`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keybinding {
    /// Command to run
    pub command: DispatcherCommand,
    /// Key sequence in host notation
    pub keybinding: &'static str,
    /// Context clause that must hold
    pub when: &'static str,
}

impl DispatcherCommand {
    /// Every command, in registration order.
    pub const ALL: &'static [Self] = &[
        Self::ArmPrefix,
        Self::Run(LogicalAction::SplitHorizontal),
        Self::Run(LogicalAction::SplitVertical),
        Self::Run(LogicalAction::FocusLeft),
        Self::Run(LogicalAction::FocusRight),
        Self::Run(LogicalAction::FocusUp),
        Self::Run(LogicalAction::FocusDown),
        Self::Run(LogicalAction::ClosePane),
        Self::Run(LogicalAction::SaveLayoutProfile),
        Self::Run(LogicalAction::LoadLayoutProfile),
        Self::Run(LogicalAction::SetMode(Mode::Normal)),
        Self::Run(LogicalAction::SetMode(Mode::Insert)),
        Self::Run(LogicalAction::SetMode(Mode::Visual)),
        Self::Run(LogicalAction::SetMode(Mode::Command)),
    ];

    /// Fully qualified command id, e.g. `modal-layout.focus.left`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ArmPrefix => "modal-layout.prefix",
            Self::Run(action) => match action {
                LogicalAction::SplitHorizontal => "modal-layout.split.horizontal",
                LogicalAction::SplitVertical => "modal-layout.split.vertical",
                LogicalAction::FocusLeft => "modal-layout.focus.left",
                LogicalAction::FocusRight => "modal-layout.focus.right",
                LogicalAction::FocusUp => "modal-layout.focus.up",
                LogicalAction::FocusDown => "modal-layout.focus.down",
                LogicalAction::ClosePane => "modal-layout.close-pane",
                LogicalAction::SaveLayoutProfile => "modal-layout.layout.save-profile",
                LogicalAction::LoadLayoutProfile => "modal-layout.layout.load-profile",
                LogicalAction::SetMode(Mode::Normal) => "modal-layout.mode.normal",
                LogicalAction::SetMode(Mode::Insert) => "modal-layout.mode.insert",
                LogicalAction::SetMode(Mode::Visual) => "modal-layout.mode.visual",
                LogicalAction::SetMode(Mode::Command) => "modal-layout.mode.command",
            },
        }
    }

    /// Palette label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ArmPrefix => "Arm tmux Prefix",
            Self::Run(action) => action.description(),
        }
    }

    /// Default key assignment.
    #[must_use]
    pub const fn default_keybinding(self) -> Keybinding {
        let keybinding = match self {
            Self::ArmPrefix => "ctrlcmd+b",
            Self::Run(action) => match action {
                LogicalAction::SplitHorizontal => "ctrlcmd+alt+1",
                LogicalAction::SplitVertical => "ctrlcmd+alt+2",
                LogicalAction::FocusLeft => "ctrlcmd+alt+h",
                LogicalAction::FocusDown => "ctrlcmd+alt+j",
                LogicalAction::FocusUp => "ctrlcmd+alt+k",
                LogicalAction::FocusRight => "ctrlcmd+alt+l",
                LogicalAction::ClosePane => "ctrlcmd+alt+x",
                LogicalAction::SaveLayoutProfile => "ctrlcmd+alt+s",
                LogicalAction::LoadLayoutProfile => "ctrlcmd+alt+r",
                LogicalAction::SetMode(Mode::Normal) => "escape",
                LogicalAction::SetMode(Mode::Insert) => "ctrlcmd+alt+i",
                LogicalAction::SetMode(Mode::Visual) => "ctrlcmd+alt+v",
                LogicalAction::SetMode(Mode::Command) => "ctrlcmd+alt+m",
            },
        };
        Keybinding {
            command: self,
            keybinding,
            when: KEYBINDING_WHEN,
        }
    }

    /// Look up a command by its id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.id() == id)
    }

    /// The logical action this command performs, if it is not the prefix.
    #[must_use]
    pub const fn action(self) -> Option<LogicalAction> {
        match self {
            Self::ArmPrefix => None,
            Self::Run(action) => Some(action),
        }
    }
}

impl fmt::Display for DispatcherCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Default keybindings for every command.
#[must_use]
pub fn default_keybindings() -> Vec<Keybinding> {
    DispatcherCommand::ALL
        .iter()
        .map(|command| command.default_keybinding())
        .collect()
}
