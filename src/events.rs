//! State change notifications
//!
//! Each dispatcher owns its observer list; subscribers get a channel receiver.

use crate::action::LogicalAction;
use crate::mode::Mode;
use std::sync::mpsc::{self, Receiver, Sender};

/// Something observable happened inside the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The modal mode changed
    ModeChanged {
        /// Previous mode
        from: Mode,
        /// New mode
        to: Mode,
    },
    /// The prefix was armed (or re-armed)
    PrefixArmed,
    /// A pending prefix was cleared
    PrefixDisarmed {
        /// Whether the window ran out, as opposed to being consumed or cancelled
        expired: bool,
    },
    /// A logical action was emitted
    ActionEmitted(LogicalAction),
}

/// Subscribers to [`DispatchEvent`]s
#[derive(Debug, Default)]
pub struct Observers {
    senders: Vec<Sender<DispatchEvent>>,
}

impl Observers {
    /// Create an empty observer list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<DispatchEvent> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    /// Send `event` to every live subscriber, dropping disconnected ones.
    pub fn publish(&mut self, event: DispatchEvent) {
        self.senders.retain(|sender| sender.send(event).is_ok());
    }

    /// Number of live subscribers as of the last publish.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.senders.len()
    }

    /// Whether there are no subscribers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
