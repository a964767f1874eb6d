//! Persistence of dispatcher state across restarts
//!
//! The snapshot is one JSON object stored under a single key:
//!
//! ```json
//! { "mode": "visual", "prefixTimeoutMs": 900, "layoutProfile": { ... } }
//! ```
//!
//! Restoring never fails. Each field is validated on its own and anything
//! malformed is dropped in favor of the caller's default.

mod store;

pub use store::{JsonFileStore, MemoryStore};

use crate::error::Result;
use crate::host::{KeyValueStore, Notifier};
use crate::mode::Mode;
use crate::worker::Worker;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// State written on every mode change and layout save
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    /// Active mode
    pub mode: Mode,
    /// Prefix window in milliseconds
    pub prefix_timeout_ms: u64,
    /// Opaque layout blob owned by the host shell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_profile: Option<Value>,
}

/// Fields recovered from storage; `None` means absent or invalid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredState {
    /// A known mode name
    pub mode: Option<Mode>,
    /// A positive integer timeout
    pub prefix_timeout_ms: Option<u64>,
    /// Any non-null layout blob
    pub layout_profile: Option<Value>,
}

impl RestoredState {
    /// Extract the valid fields of a stored snapshot.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mode = value
            .get("mode")
            .and_then(Value::as_str)
            .and_then(Mode::parse);
        let prefix_timeout_ms = value
            .get("prefixTimeoutMs")
            .and_then(Value::as_u64)
            .filter(|ms| *ms > 0);
        let layout_profile = value
            .get("layoutProfile")
            .filter(|profile| !profile.is_null())
            .cloned();
        Self {
            mode,
            prefix_timeout_ms,
            layout_profile,
        }
    }
}

/// Reads and writes the snapshot through the host's key-value store
#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceBridge")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PersistenceBridge {
    /// Create a bridge storing under `key`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key of the snapshot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored snapshot. Storage errors and bad data yield defaults.
    #[must_use]
    pub fn restore(&self) -> RestoredState {
        match self.store.get_data(&self.key) {
            Ok(Some(value)) => {
                let restored = RestoredState::from_value(&value);
                debug!(key = %self.key, ?restored, "Restored dispatcher state");
                restored
            }
            Ok(None) => {
                debug!(key = %self.key, "No stored dispatcher state, using defaults");
                RestoredState::default()
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Failed to read dispatcher state");
                RestoredState::default()
            }
        }
    }

    /// Write `snapshot` synchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or stored.
    pub fn write(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        let value = serde_json::to_value(snapshot)?;
        self.store.set_data(&self.key, value)
    }

    /// Write `snapshot` on `worker` without waiting for it.
    pub fn persist(&self, snapshot: PersistedSnapshot, worker: &Worker) {
        self.persist_then(snapshot, worker, None);
    }

    /// Write `snapshot` on `worker`, then tell the user `message` if the
    /// write succeeded. A failed write is reported as a warning instead.
    pub fn persist_and_notify(
        &self,
        snapshot: PersistedSnapshot,
        worker: &Worker,
        notifier: Arc<dyn Notifier>,
        message: &'static str,
    ) {
        self.persist_then(snapshot, worker, Some((notifier, message)));
    }

    fn persist_then(
        &self,
        snapshot: PersistedSnapshot,
        worker: &Worker,
        notify: Option<(Arc<dyn Notifier>, &'static str)>,
    ) {
        let bridge = self.clone();
        let submitted = worker.submit(move || match bridge.write(&snapshot) {
            Ok(()) => {
                debug!(key = %bridge.key, mode = %snapshot.mode, "Persisted dispatcher state");
                if let Some((notifier, message)) = notify {
                    notifier.info(message);
                }
            }
            Err(err) => {
                warn!(key = %bridge.key, error = %err, "Failed to persist dispatcher state");
                if let Some((notifier, _)) = notify {
                    notifier.warn(&format!("Unable to save dispatcher state: {err}"));
                }
            }
        });
        if let Err(err) = submitted {
            warn!(key = %self.key, error = %err, "Dispatcher state write dropped");
        }
    }
}
