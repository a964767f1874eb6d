//! Prefix chord detection and the prefix arming timer
//!
//! Striking the prefix chord (ctrl + the prefix key) arms a short window in
//! which the next keystroke is read as a pane/layout shortcut. The window is a
//! single deadline: arming again replaces it, so there is never more than one
//! live timer, and disarming an idle timer does nothing.

use crate::keys::{KeyEvent, normalize_key};
use std::time::{Duration, Instant};

/// Prefix window used when nothing valid is configured or persisted.
pub const DEFAULT_PREFIX_TIMEOUT_MS: u64 = 1250;

/// Whether `event` is the prefix chord for `prefix_key`.
///
/// Control must be held without alt or meta, and the normalized key must equal
/// the prefix key. Stateless.
#[must_use]
pub fn is_prefix_chord(event: &KeyEvent, prefix_key: &str) -> bool {
    let mods = event.modifiers;
    mods.ctrl && !mods.alt && !mods.meta && normalize_key(&event.key) == prefix_key
}

/// Opaque identity of one arming of the prefix timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// State held while the prefix is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixState {
    /// When the prefix was armed
    pub armed_at: Instant,
    /// When the window closes
    pub deadline: Instant,
    /// Which arming this is
    pub handle: TimerHandle,
}

/// Single-shot, cancelable prefix window
#[derive(Debug, Clone)]
#[expect(
    missing_copy_implementations,
    reason = "stateful timer; implicit copies would duplicate arming handles"
)]
pub struct PrefixTimer {
    timeout: Duration,
    state: Option<PrefixState>,
    next_handle: u64,
}

impl PrefixTimer {
    /// Create an idle timer with the given window.
    ///
    /// A zero timeout falls back to [`DEFAULT_PREFIX_TIMEOUT_MS`].
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: sanitize_timeout(timeout),
            state: None,
            next_handle: 0,
        }
    }

    /// Length of the prefix window.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the window length for future armings. Zero is ignored.
    pub fn set_timeout(&mut self, timeout: Duration) {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
    }

    /// Arm the prefix at `now`, replacing any pending arming.
    pub fn arm(&mut self, now: Instant) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.state = Some(PrefixState {
            armed_at: now,
            deadline: now + self.timeout,
            handle,
        });
        handle
    }

    /// Cancel the pending arming. Returns whether one was pending.
    pub fn disarm(&mut self) -> bool {
        self.state.take().is_some()
    }

    /// Fire the timer if its deadline has passed at `now`.
    ///
    /// Returns whether it fired. Once fired the timer is idle, so a second
    /// call returns false.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.state {
            Some(state) if now >= state.deadline => {
                self.state = None;
                true
            }
            _ => false,
        }
    }

    /// Whether the prefix is armed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.state.is_some()
    }

    /// The current arming, if any.
    #[must_use]
    pub const fn state(&self) -> Option<&PrefixState> {
        self.state.as_ref()
    }

    /// Number of live timers (zero or one).
    #[must_use]
    pub const fn live_timers(&self) -> usize {
        if self.state.is_some() { 1 } else { 0 }
    }
}

impl Default for PrefixTimer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PREFIX_TIMEOUT_MS))
    }
}

fn sanitize_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        Duration::from_millis(DEFAULT_PREFIX_TIMEOUT_MS)
    } else {
        timeout
    }
}
