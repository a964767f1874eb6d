//! The modal keybinding dispatcher
//!
//! Every key event goes through the same pipeline:
//!
//! ```text
//! listening? -> timer expiry -> context filter -> prefix -> modal state machine
//! ```
//!
//! Whatever action falls out is resolved against the host's commands. Mode
//! changes are persisted in the background and reflected on the status
//! surface before `handle_key` returns.

mod commands;


pub use commands::{CATEGORY, DispatcherCommand, KEYBINDING_WHEN, Keybinding, default_keybindings};

use crate::action::LogicalAction;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::events::{DispatchEvent, Observers};
use crate::host::Host;
use crate::keys::{ContextFilter, Disposition, KeyEvent, is_modifier_only};
use crate::machine::{ModalStateMachine, Transition};
use crate::mode::Mode;
use crate::persist::{PersistedSnapshot, PersistenceBridge};
use crate::prefix::{DEFAULT_PREFIX_TIMEOUT_MS, PrefixTimer, is_prefix_chord};
use crate::resolve::{CommandResolver, Resolution};
use crate::status::StatusReporter;
use crate::worker::Worker;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::{debug, info, warn};

const WORKER_NAME: &str = "modal-layout-worker";

const SAVE_UNAVAILABLE: &str = "Unable to save layout: layout data API is unavailable.";
const SAVED: &str = "Layout profile saved.";
const NO_PROFILE: &str = "No saved layout profile is available.";
const LOAD_UNAVAILABLE: &str = "Unable to load layout: layout restore API is unavailable.";
const LOADED: &str = "Layout profile loaded.";

/// Routes key events through the prefix handler and the modal state machine
pub struct Dispatcher {
    config: Config,
    host: Host,
    clock: Arc<dyn Clock>,
    filter: ContextFilter,
    machine: ModalStateMachine,
    prefix: PrefixTimer,
    resolver: CommandResolver,
    persistence: PersistenceBridge,
    status: StatusReporter,
    layout_profile: Option<Value>,
    observers: Observers,
    worker: Worker,
    listening: bool,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.machine.mode())
            .field("prefix", &self.prefix)
            .field("listening", &self.listening)
            .field("layout_profile", &self.layout_profile.is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build a dispatcher over `host`. It does nothing until [`Self::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if the background worker cannot be spawned.
    pub fn new(mut config: Config, host: Host, clock: Arc<dyn Clock>) -> Result<Self> {
        config.normalize_prefix_key();
        let worker = Worker::spawn(WORKER_NAME)?;
        Ok(Self {
            filter: ContextFilter::from_config(&config),
            machine: ModalStateMachine::new(),
            prefix: PrefixTimer::new(config.prefix_timeout()),
            resolver: CommandResolver::new(Arc::clone(&host.commands)),
            persistence: PersistenceBridge::new(Arc::clone(&host.store), &config.storage_key),
            status: StatusReporter::new(Arc::clone(&host.status), &config),
            layout_profile: None,
            observers: Observers::new(),
            worker,
            listening: false,
            config,
            host,
            clock,
        })
    }

    /// Restore persisted state, begin handling keys, and show the status.
    ///
    /// Waits for background work still queued from before a [`Self::stop`]
    /// so the restore sees it. Starting a running dispatcher does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the background worker has gone away and cannot be
    /// respawned.
    pub fn start(&mut self) -> Result<()> {
        if self.listening {
            return Ok(());
        }
        if !self.worker.is_running() {
            self.worker = Worker::spawn(WORKER_NAME)?;
        }
        // Writes queued before a stop must land before they are read back
        self.worker.flush();

        let restored = self.persistence.restore();
        if let Some(mode) = restored.mode {
            self.machine.set_mode(mode);
        }
        if let Some(ms) = restored.prefix_timeout_ms {
            self.prefix.set_timeout(Duration::from_millis(ms));
        }
        if restored.layout_profile.is_some() {
            self.layout_profile = restored.layout_profile;
        }

        self.listening = true;
        self.report_status();
        info!(
            mode = %self.machine.mode(),
            prefix_timeout_ms = self.prefix_timeout_ms(),
            "Dispatcher started"
        );
        Ok(())
    }

    /// Stop handling keys, cancel the prefix and clear the status slot.
    /// Stopping twice does nothing.
    ///
    /// Does not wait for queued host commands or persistence writes; they
    /// keep running on the worker, which stays up for a later [`Self::start`].
    /// Call [`Self::flush`] to wait for them.
    pub fn stop(&mut self) {
        if !self.listening {
            return;
        }
        self.listening = false;
        if self.prefix.disarm() {
            self.observers
                .publish(DispatchEvent::PrefixDisarmed { expired: false });
        }
        self.status.clear();
        info!("Dispatcher stopped");
    }

    /// Handle one key event.
    ///
    /// A [`Disposition::Consumed`] result means the host must suppress the
    /// event's default behavior and stop its propagation.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Disposition {
        if !self.listening || event.default_prevented {
            return Disposition::PassThrough;
        }

        self.tick();

        if !self.filter.is_eligible(self.host.contexts.as_ref(), event) {
            return Disposition::PassThrough;
        }

        if let Some(disposition) = self.handle_prefix(event) {
            return disposition;
        }

        let outcome = self.machine.interpret(event);
        if let Some(transition) = outcome.transition {
            self.after_transition(transition);
        }
        if let Some(action) = outcome.action {
            self.perform(action);
        }
        outcome.disposition
    }

    /// Fire the prefix timer if its window has run out.
    ///
    /// Call this from the host's event-loop tick. Returns whether the prefix
    /// expired.
    pub fn tick(&mut self) -> bool {
        if !self.prefix.expire(self.clock.now()) {
            return false;
        }
        debug!("Prefix expired");
        self.observers
            .publish(DispatchEvent::PrefixDisarmed { expired: true });
        self.report_status();
        true
    }

    /// Run a dispatcher command.
    pub fn execute(&mut self, command: DispatcherCommand) {
        debug!(command = %command, "Executing dispatcher command");
        match command {
            DispatcherCommand::ArmPrefix => self.arm_prefix(),
            DispatcherCommand::Run(action) => self.perform(action),
        }
    }

    /// Run the dispatcher command with this id. Returns false for unknown ids.
    pub fn execute_id(&mut self, id: &str) -> bool {
        let Some(command) = DispatcherCommand::from_id(id) else {
            debug!(command = id, "Unknown dispatcher command");
            return false;
        };
        self.execute(command);
        true
    }

    /// The active mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.machine.mode()
    }

    /// Whether the prefix is armed.
    #[must_use]
    pub const fn prefix_pending(&self) -> bool {
        self.prefix.is_pending()
    }

    /// Number of live prefix timers (zero or one).
    #[must_use]
    pub const fn live_timers(&self) -> usize {
        self.prefix.live_timers()
    }

    /// Current prefix window.
    #[must_use]
    pub const fn prefix_timeout(&self) -> Duration {
        self.prefix.timeout()
    }

    /// The saved layout profile, if any.
    #[must_use]
    pub const fn layout_profile(&self) -> Option<&Value> {
        self.layout_profile.as_ref()
    }

    /// Configuration the dispatcher was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Whether key events are being handled.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    /// Receive [`DispatchEvent`]s from now on.
    pub fn subscribe(&mut self) -> Receiver<DispatchEvent> {
        self.observers.subscribe()
    }

    /// Block until all queued host commands and persistence writes have run.
    pub fn flush(&self) {
        self.worker.flush();
    }

    /// The state that would be persisted right now.
    #[must_use]
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            mode: self.machine.mode(),
            prefix_timeout_ms: self.prefix_timeout_ms(),
            layout_profile: self.layout_profile.clone(),
        }
    }

    fn prefix_timeout_ms(&self) -> u64 {
        u64::try_from(self.prefix.timeout().as_millis()).unwrap_or(DEFAULT_PREFIX_TIMEOUT_MS)
    }

    fn handle_prefix(&mut self, event: &KeyEvent) -> Option<Disposition> {
        if is_prefix_chord(event, &self.config.prefix_key) {
            self.arm_prefix();
            return Some(Disposition::Consumed);
        }

        if !self.prefix.is_pending() || is_modifier_only(&event.key) {
            return None;
        }

        let key = event.normalized_key();
        self.disarm_prefix();
        match LogicalAction::from_prefixed_key(&key) {
            Some(action) => self.perform(action),
            None => debug!(key = %key, "No action bound to prefixed key"),
        }
        Some(Disposition::Consumed)
    }

    fn arm_prefix(&mut self) {
        let handle = self.prefix.arm(self.clock.now());
        debug!(?handle, timeout = ?self.prefix.timeout(), "Prefix armed");
        self.observers.publish(DispatchEvent::PrefixArmed);
        self.report_status();
    }

    fn disarm_prefix(&mut self) {
        if self.prefix.disarm() {
            debug!("Prefix disarmed");
            self.observers
                .publish(DispatchEvent::PrefixDisarmed { expired: false });
            self.report_status();
        }
    }

    fn perform(&mut self, action: LogicalAction) {
        debug!(action = %action, "Performing action");
        self.observers.publish(DispatchEvent::ActionEmitted(action));
        match action {
            LogicalAction::SetMode(mode) => self.set_mode(mode),
            LogicalAction::SaveLayoutProfile => self.save_layout_profile(),
            LogicalAction::LoadLayoutProfile => self.load_layout_profile(),
            LogicalAction::ClosePane => self.close_pane(),
            LogicalAction::SplitHorizontal
            | LogicalAction::SplitVertical
            | LogicalAction::FocusLeft
            | LogicalAction::FocusRight
            | LogicalAction::FocusUp
            | LogicalAction::FocusDown => {
                let chain = self.config.chains.chain_for(action);
                if self.resolver.run(chain, &self.worker) == Resolution::Exhausted {
                    debug!(action = %action, "No host command available");
                }
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        match self.machine.set_mode(mode) {
            Some(transition) => self.after_transition(transition),
            None => self.report_status(),
        }
    }

    fn after_transition(&mut self, transition: Transition) {
        debug!(from = %transition.from, to = %transition.to, "Mode changed");
        self.observers.publish(DispatchEvent::ModeChanged {
            from: transition.from,
            to: transition.to,
        });
        self.persistence.persist(self.snapshot(), &self.worker);
        self.report_status();
    }

    fn close_pane(&self) {
        let chain = self.config.chains.chain_for(LogicalAction::ClosePane);
        if self.resolver.run(chain, &self.worker).is_invoked() {
            return;
        }

        let shell = Arc::clone(&self.host.shell);
        let submitted = self.worker.submit(move || {
            let Some(widget) = shell.current_widget() else {
                debug!("No current widget to close");
                return;
            };
            if let Err(err) = shell.close_widget(&widget) {
                warn!(widget = %widget, error = %err, "Failed to close widget");
            }
        });
        if let Err(err) = submitted {
            warn!(error = %err, "Close pane dropped");
        }
    }

    fn save_layout_profile(&mut self) {
        let Some(layout) = self.host.shell.layout() else {
            warn!("Layout capture is unavailable");
            self.host.notifier.warn(SAVE_UNAVAILABLE);
            return;
        };

        self.layout_profile = Some(layout.layout_data());
        self.persistence.persist_and_notify(
            self.snapshot(),
            &self.worker,
            Arc::clone(&self.host.notifier),
            SAVED,
        );
    }

    fn load_layout_profile(&self) {
        let Some(profile) = self.layout_profile.clone() else {
            self.host.notifier.info(NO_PROFILE);
            return;
        };
        let Some(layout) = self.host.shell.layout() else {
            warn!("Layout restore is unavailable");
            self.host.notifier.warn(LOAD_UNAVAILABLE);
            return;
        };

        let notifier = Arc::clone(&self.host.notifier);
        let submitted = self
            .worker
            .submit(move || match layout.set_layout_data(profile) {
                Ok(()) => notifier.info(LOADED),
                Err(err) => {
                    warn!(error = %err, "Failed to restore layout");
                    notifier.warn(&format!("Unable to load layout: {err}"));
                }
            });
        if let Err(err) = submitted {
            warn!(error = %err, "Layout restore dropped");
        }
    }

    fn report_status(&self) {
        self.status
            .report(self.machine.mode(), self.prefix.is_pending());
    }
}
