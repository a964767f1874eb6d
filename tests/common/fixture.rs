//! A recording host and a dispatcher fixture built on it

use modal_layout::clock::ManualClock;
use modal_layout::config::Config;
use modal_layout::host::{
    CommandHost, ContextKeys, Host, KeyValueStore, LayoutCapability, Notifier, Shell, StatusEntry,
    StatusSurface,
};
use modal_layout::persist::MemoryStore;
use modal_layout::{Dispatcher, KeyEvent};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Host double that records every call the dispatcher makes
#[derive(Default)]
pub struct RecordingHost {
    /// Whether focus is in the modal region
    pub modal_focus: Mutex<bool>,
    /// Whether the quick-open overlay is up
    pub overlay: Mutex<bool>,
    /// Registered host command ids
    pub registered: Mutex<HashSet<String>>,
    /// Commands executed, in order
    pub executed: Mutex<Vec<String>>,
    /// Status slots
    pub status: Mutex<HashMap<String, StatusEntry>>,
    /// Notifier messages, in order
    pub messages: Mutex<Vec<String>>,
    /// Widgets closed through the shell fallback
    pub closed: Mutex<Vec<String>>,
    /// Layout blobs handed back to the shell
    pub restored_layouts: Mutex<Vec<Value>>,
    /// Whether the shell offers the layout capability
    pub has_layout: Mutex<bool>,
}

impl RecordingHost {
    /// A focused host with nothing registered.
    pub fn new() -> Arc<Self> {
        let host = Self::default();
        *host.modal_focus.lock() = true;
        Arc::new(host)
    }

    /// A focused host with the given commands registered.
    pub fn with_commands(ids: &[&str]) -> Arc<Self> {
        let host = Self::new();
        host.registered
            .lock()
            .extend(ids.iter().map(|id| (*id).to_string()));
        host
    }

    /// Text of the dispatcher's status slot.
    pub fn status_text(&self) -> Option<String> {
        self.status
            .lock()
            .get("modal-layout.status")
            .map(|entry| entry.text.clone())
    }

    /// Commands executed so far.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

impl ContextKeys for RecordingHost {
    fn matches(&self, context: &str, _target: Option<&str>) -> bool {
        match context {
            "editorTextFocus" => *self.modal_focus.lock(),
            "inQuickOpen" => *self.overlay.lock(),
            _ => false,
        }
    }
}

impl CommandHost for RecordingHost {
    fn has_command(&self, id: &str) -> bool {
        self.registered.lock().contains(id)
    }

    fn execute_command(&self, id: &str) -> modal_layout::Result<()> {
        self.executed.lock().push(id.to_string());
        Ok(())
    }
}

impl StatusSurface for RecordingHost {
    fn set_element(&self, id: &str, entry: StatusEntry) {
        self.status.lock().insert(id.to_string(), entry);
    }

    fn remove_element(&self, id: &str) {
        self.status.lock().remove(id);
    }
}

struct RecordingLayout {
    host: Arc<RecordingHost>,
}

impl LayoutCapability for RecordingLayout {
    fn layout_data(&self) -> Value {
        json!({"panes": ["editor-1", "editor-2"]})
    }

    fn set_layout_data(&self, data: Value) -> modal_layout::Result<()> {
        self.host.restored_layouts.lock().push(data);
        Ok(())
    }
}

/// Shell view over a [`RecordingHost`]
pub struct RecordingShell {
    host: Arc<RecordingHost>,
}

impl Shell for RecordingShell {
    fn current_widget(&self) -> Option<String> {
        Some("editor-1".to_string())
    }

    fn close_widget(&self, id: &str) -> modal_layout::Result<()> {
        self.host.closed.lock().push(id.to_string());
        Ok(())
    }

    fn layout(&self) -> Option<Arc<dyn LayoutCapability>> {
        if !*self.host.has_layout.lock() {
            return None;
        }
        Some(Arc::new(RecordingLayout {
            host: Arc::clone(&self.host),
        }))
    }
}

impl Notifier for RecordingHost {
    fn info(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// A started dispatcher wired to a recording host, a manual clock and a store
pub struct TestFixture {
    pub dispatcher: Dispatcher,
    pub host: Arc<RecordingHost>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Start a dispatcher over `host` with an empty in-memory store.
    pub fn new(host: Arc<RecordingHost>) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_store(host, Arc::new(MemoryStore::new()), Config::default())
    }

    /// Start a dispatcher over `host` and `store`.
    pub fn with_store(
        host: Arc<RecordingHost>,
        store: Arc<dyn KeyValueStore>,
        config: Config,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let clock = Arc::new(ManualClock::new());
        let bundle = Host {
            contexts: host.clone(),
            commands: host.clone(),
            status: host.clone(),
            store: Arc::clone(&store),
            shell: Arc::new(RecordingShell {
                host: Arc::clone(&host),
            }),
            notifier: host.clone(),
        };
        let mut dispatcher = Dispatcher::new(config, bundle, clock.clone())?;
        dispatcher.start()?;
        Ok(Self {
            dispatcher,
            host,
            store,
            clock,
        })
    }

    /// Send an unmodified key. Returns whether it was consumed.
    pub fn press(&mut self, key: &str) -> bool {
        self.dispatcher.handle_key(&KeyEvent::new(key)).is_consumed()
    }

    /// Strike the prefix chord. Returns whether it was consumed.
    pub fn prefix(&mut self) -> bool {
        self.dispatcher.handle_key(&KeyEvent::ctrl("b")).is_consumed()
    }

    /// The raw stored snapshot, after background writes have landed.
    pub fn stored(&self) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        self.dispatcher.flush();
        Ok(self.store.get_data("modal-layout.state")?)
    }
}
