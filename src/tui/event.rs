//! Terminal event polling and key translation

use anyhow::Result;
use modal_layout::{KeyEvent, Modifiers};
use ratatui::crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKey, KeyEventKind, KeyModifiers,
    ModifierKeyCode,
};
use std::time::Duration;

/// Terminal events the demo reacts to
#[derive(Debug, Clone)]
pub enum Event {
    /// Nothing arrived within the tick interval
    Tick,
    /// Keyboard input
    Key(CrosstermKey),
    /// Terminal resize
    Resize(u16, u16),
}

/// Polls the terminal for events
#[derive(Debug)]
pub struct Handler {
    tick_rate: Duration,
}

impl Handler {
    /// Create a handler that yields a tick every `tick_rate_ms` of silence
    pub const fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait for the next event
    ///
    /// # Errors
    ///
    /// Returns an error if polling the terminal fails
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    Ok(Event::Key(key))
                }
                CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }

    #[cfg(test)]
    const fn tick_rate(&self) -> Duration {
        self.tick_rate
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(50)
    }
}

/// Translate a terminal key into a dispatcher key event.
///
/// Keys with no browser-style name (function keys, media keys) yield `None`.
pub fn to_key_event(key: CrosstermKey, target: &str) -> Option<KeyEvent> {
    let label = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Modifier(modifier) => modifier_label(modifier).to_string(),
        _ => return None,
    };
    let modifiers = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    };
    Some(
        KeyEvent::new(label)
            .with_modifiers(modifiers)
            .with_target(target),
    )
}

const fn modifier_label(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        _ => "Meta",
    }
}
