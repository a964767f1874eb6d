//! Command resolution chains
//!
//! A logical action maps to several host command identifiers because host
//! versions differ in which ones they register. The resolver probes them in
//! order and invokes the first one present. Probing is synchronous; the
//! invocation itself runs on the background worker.

use crate::host::CommandHost;
use crate::worker::Worker;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of running a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// This command was found and handed to the host
    Invoked(String),
    /// No command in the chain is registered; nothing was called
    Exhausted,
}

impl Resolution {
    /// Whether a command was invoked.
    #[must_use]
    pub const fn is_invoked(&self) -> bool {
        matches!(self, Self::Invoked(_))
    }
}

/// Probes command chains against the host registry
#[derive(Clone)]
pub struct CommandResolver {
    host: Arc<dyn CommandHost>,
}

impl fmt::Debug for CommandResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResolver").finish_non_exhaustive()
    }
}

impl CommandResolver {
    /// Create a resolver over the host command registry.
    #[must_use]
    pub const fn new(host: Arc<dyn CommandHost>) -> Self {
        Self { host }
    }

    /// The first identifier in `chain` the host has registered.
    #[must_use]
    pub fn first_available<'a>(&self, chain: &'a [String]) -> Option<&'a str> {
        chain
            .iter()
            .map(String::as_str)
            .find(|id| self.host.has_command(id))
    }

    /// Invoke the first registered command in `chain` on `worker`.
    ///
    /// The host call is fire-and-forget: a failure is logged, never returned,
    /// and a slow command does not hold up the caller.
    pub fn run(&self, chain: &[String], worker: &Worker) -> Resolution {
        let Some(id) = self.first_available(chain) else {
            debug!(chain = ?chain, "No command in chain is registered");
            return Resolution::Exhausted;
        };

        let host = Arc::clone(&self.host);
        let command = id.to_string();
        let submitted = worker.submit(move || {
            if let Err(err) = host.execute_command(&command) {
                warn!(command = %command, error = %err, "Host command failed");
            }
        });
        if let Err(err) = submitted {
            warn!(command = id, error = %err, "Host command dropped");
        }
        debug!(command = id, "Invoked host command");
        Resolution::Invoked(id.to_string())
    }
}
