//! Simulated editor workspace backing the terminal demo
//!
//! Panes sit in rows; each row holds one or more panes side by side. The
//! workspace plays every host role the dispatcher needs: it answers context
//! queries, registers a handful of pane commands, owns the status line, keeps
//! the activity log, and exposes its pane grid as the layout blob.

use modal_layout::Error;
use modal_layout::host::{
    CommandHost, ContextKeys, LayoutCapability, Notifier, Shell, StatusEntry, StatusSurface,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

const LOG_CAPACITY: usize = 200;

/// Host commands the simulated shell registers.
///
/// Some chain candidates are deliberately missing so resolution has to fall
/// back (e.g. `splitEditorOrthogonal`, `focusLeftGroup`, `closeEditorsInGroup`).
pub const REGISTERED_COMMANDS: &[&str] = &[
    "workbench.action.splitEditorDown",
    "workbench.action.splitEditorRight",
    "workbench.action.navigateLeft",
    "workbench.action.navigateRight",
    "workbench.action.navigateUp",
    "workbench.action.navigateDown",
    "workbench.action.closeActiveEditor",
];

/// One simulated editor pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    /// Widget id
    pub id: String,
    /// Buffer contents
    #[serde(default)]
    pub text: String,
}

/// Panes in rows, plus which one has focus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Rows top to bottom, panes left to right
    pub rows: Vec<Vec<Pane>>,
    /// Focused pane as (row, column)
    pub focus: (usize, usize),
    #[serde(default)]
    next_id: u32,
}

impl Default for Grid {
    fn default() -> Self {
        let mut grid = Self {
            rows: Vec::new(),
            focus: (0, 0),
            next_id: 1,
        };
        let pane = grid.new_pane();
        grid.rows.push(vec![pane]);
        grid
    }
}

impl Grid {
    fn new_pane(&mut self) -> Pane {
        let id = format!("editor-{}", self.next_id);
        self.next_id += 1;
        Pane {
            id,
            text: String::new(),
        }
    }

    /// The focused pane.
    pub fn focused(&self) -> Option<&Pane> {
        self.rows.get(self.focus.0)?.get(self.focus.1)
    }

    fn focused_mut(&mut self) -> Option<&mut Pane> {
        self.rows.get_mut(self.focus.0)?.get_mut(self.focus.1)
    }

    /// Total number of panes.
    pub fn pane_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Open a new pane below the focused row and focus it.
    pub fn split_down(&mut self) {
        let pane = self.new_pane();
        let row = (self.focus.0 + 1).min(self.rows.len());
        self.rows.insert(row, vec![pane]);
        self.focus = (row, 0);
    }

    /// Open a new pane right of the focused one and focus it.
    pub fn split_right(&mut self) {
        let pane = self.new_pane();
        let (row, col) = self.focus;
        if let Some(panes) = self.rows.get_mut(row) {
            let col = (col + 1).min(panes.len());
            panes.insert(col, pane);
            self.focus = (row, col);
        }
    }

    /// Move focus by one step; `(d_row, d_col)` each in -1..=1.
    pub fn navigate(&mut self, d_row: isize, d_col: isize) {
        let row = self
            .focus
            .0
            .saturating_add_signed(d_row)
            .min(self.rows.len().saturating_sub(1));
        let width = self.rows.get(row).map_or(1, Vec::len);
        let col = if row == self.focus.0 {
            self.focus.1.saturating_add_signed(d_col)
        } else {
            self.focus.1
        };
        self.focus = (row, col.min(width.saturating_sub(1)));
    }

    /// Close the pane with `id`. The last pane is replaced by a fresh one.
    pub fn close(&mut self, id: &str) -> bool {
        let Some((row, col)) = self.position(id) else {
            return false;
        };
        self.rows[row].remove(col);
        if self.rows[row].is_empty() {
            self.rows.remove(row);
        }
        if self.rows.is_empty() {
            let pane = self.new_pane();
            self.rows.push(vec![pane]);
        }
        self.clamp_focus();
        true
    }

    fn position(&self, id: &str) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row, panes)| {
            panes
                .iter()
                .position(|pane| pane.id == id)
                .map(|col| (row, col))
        })
    }

    fn clamp_focus(&mut self) {
        let row = self.focus.0.min(self.rows.len().saturating_sub(1));
        let width = self.rows.get(row).map_or(1, Vec::len);
        self.focus = (row, self.focus.1.min(width.saturating_sub(1)));
    }
}

#[derive(Debug, Default)]
struct State {
    grid: Grid,
    overlay: bool,
    status: BTreeMap<String, StatusEntry>,
    log: VecDeque<String>,
}

impl State {
    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

/// What the renderer needs, copied out so no lock is held while drawing
#[derive(Debug, Clone)]
pub struct View {
    /// Pane grid
    pub grid: Grid,
    /// Whether the quick-open overlay is showing
    pub overlay: bool,
    /// Status line elements by slot
    pub status: Vec<StatusEntry>,
    /// Most recent log lines, oldest first
    pub log: Vec<String>,
}

/// The simulated shell
#[derive(Debug, Default)]
pub struct Workspace {
    state: Arc<Mutex<State>>,
}

impl Workspace {
    /// Create a workspace with a single empty pane.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot everything the renderer shows.
    pub fn view(&self) -> View {
        let state = self.state.lock();
        View {
            grid: state.grid.clone(),
            overlay: state.overlay,
            status: state.status.values().cloned().collect(),
            log: state.log.iter().cloned().collect(),
        }
    }

    /// Show or hide the quick-open overlay. Returns the new visibility.
    pub fn toggle_overlay(&self) -> bool {
        let mut state = self.state.lock();
        state.overlay = !state.overlay;
        state.overlay
    }

    /// Whether the quick-open overlay is showing.
    pub fn is_overlay_visible(&self) -> bool {
        self.state.lock().overlay
    }

    /// Id of the focused pane, used as the key event target.
    pub fn focused_id(&self) -> String {
        self.state
            .lock()
            .grid
            .focused()
            .map(|pane| pane.id.clone())
            .unwrap_or_default()
    }

    /// Type into the focused pane. Backspace is `'\u{8}'`.
    pub fn type_char(&self, c: char) {
        let mut state = self.state.lock();
        if let Some(pane) = state.grid.focused_mut() {
            if c == '\u{8}' {
                pane.text.pop();
            } else {
                pane.text.push(c);
            }
        }
    }

    /// Append a line to the activity log.
    pub fn log(&self, line: impl Into<String>) {
        self.state.lock().push_log(line.into());
    }
}

impl ContextKeys for Workspace {
    fn matches(&self, context: &str, _target: Option<&str>) -> bool {
        let overlay = self.state.lock().overlay;
        match context {
            "editorTextFocus" => !overlay,
            "inQuickOpen" => overlay,
            _ => false,
        }
    }
}

impl CommandHost for Workspace {
    fn has_command(&self, id: &str) -> bool {
        REGISTERED_COMMANDS.contains(&id)
    }

    fn execute_command(&self, id: &str) -> modal_layout::Result<()> {
        let mut state = self.state.lock();
        match id {
            "workbench.action.splitEditorDown" => state.grid.split_down(),
            "workbench.action.splitEditorRight" => state.grid.split_right(),
            "workbench.action.navigateLeft" => state.grid.navigate(0, -1),
            "workbench.action.navigateRight" => state.grid.navigate(0, 1),
            "workbench.action.navigateUp" => state.grid.navigate(-1, 0),
            "workbench.action.navigateDown" => state.grid.navigate(1, 0),
            "workbench.action.closeActiveEditor" => {
                let focused = state.grid.focused().map(|pane| pane.id.clone());
                if let Some(id) = focused {
                    state.grid.close(&id);
                }
            }
            _ => {
                return Err(Error::CommandFailed {
                    id: id.to_string(),
                    reason: "not registered".to_string(),
                });
            }
        }
        state.push_log(format!("command {id}"));
        Ok(())
    }
}

impl StatusSurface for Workspace {
    fn set_element(&self, id: &str, entry: StatusEntry) {
        self.state.lock().status.insert(id.to_string(), entry);
    }

    fn remove_element(&self, id: &str) {
        self.state.lock().status.remove(id);
    }
}

impl Shell for Workspace {
    fn current_widget(&self) -> Option<String> {
        self.state.lock().grid.focused().map(|pane| pane.id.clone())
    }

    fn close_widget(&self, id: &str) -> modal_layout::Result<()> {
        let mut state = self.state.lock();
        if state.grid.close(id) {
            state.push_log(format!("closed {id}"));
        }
        Ok(())
    }

    fn layout(&self) -> Option<Arc<dyn LayoutCapability>> {
        Some(Arc::new(GridLayout {
            state: Arc::clone(&self.state),
        }))
    }
}

impl Notifier for Workspace {
    fn info(&self, message: &str) {
        self.log(format!("info: {message}"));
    }

    fn warn(&self, message: &str) {
        self.log(format!("warn: {message}"));
    }
}

/// The pane grid as a layout blob
#[derive(Debug)]
struct GridLayout {
    state: Arc<Mutex<State>>,
}

impl LayoutCapability for GridLayout {
    fn layout_data(&self) -> Value {
        serde_json::to_value(&self.state.lock().grid).unwrap_or(Value::Null)
    }

    fn set_layout_data(&self, data: Value) -> modal_layout::Result<()> {
        let mut grid: Grid = serde_json::from_value(data)?;
        grid.rows.retain(|row| !row.is_empty());
        if grid.rows.is_empty() {
            grid = Grid::default();
        }
        grid.clamp_focus();
        let mut state = self.state.lock();
        // Fresh panes must not reuse ids from either layout
        grid.next_id = grid.next_id.max(state.grid.next_id);
        state.grid = grid;
        Ok(())
    }
}
