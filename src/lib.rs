//! modal-layout - modal keybinding dispatcher for editor workspaces
//!
//! Intercepts keyboard events and turns them into a layered command model:
//! a vi-style modal state machine (normal / insert / visual / command) sitting
//! under a tmux-style prefix chord with a disambiguation timeout. Logical
//! actions are resolved against host commands through ordered fallback chains.

pub mod action;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod host;
pub mod keys;
pub mod machine;
pub mod mode;
pub mod paths;
pub mod persist;
pub mod prefix;
pub mod resolve;
pub mod status;
pub mod worker;

pub use action::LogicalAction;
pub use config::Config;
pub use dispatcher::{Dispatcher, DispatcherCommand};
pub use error::{Error, Result};
pub use keys::{Disposition, KeyEvent, Modifiers};
pub use mode::Mode;
