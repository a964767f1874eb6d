//! Terminal demo host for the dispatcher

mod event;
mod render;
pub mod workspace;

use anyhow::Result;
use event::{Event, Handler, to_key_event};
use modal_layout::events::DispatchEvent;
use modal_layout::keys::Disposition;
use modal_layout::{Dispatcher, Mode};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{KeyCode, KeyEvent as CrosstermKey, KeyModifiers};
use std::sync::mpsc::Receiver;
use tracing::debug;
use workspace::Workspace;

/// Run the interactive demo until the user quits
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn, or polled
pub fn run(dispatcher: &mut Dispatcher, workspace: &Workspace) -> Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = run_loop(&mut terminal, dispatcher, workspace, &Handler::default());
    ratatui::restore();
    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    dispatcher: &mut Dispatcher,
    workspace: &Workspace,
    handler: &Handler,
) -> Result<()> {
    let events = dispatcher.subscribe();
    workspace.log("ready: ctrl+b then h/j/k/l, \"/%, x, s/r; i/v/: switch modes");

    loop {
        drain_events(&events, workspace);
        terminal.draw(|frame| render::render(frame, &workspace.view()))?;

        match handler.next()? {
            Event::Tick => {
                dispatcher.tick();
            }
            Event::Key(key) => {
                if is_ctrl(key, 'q') {
                    break;
                }
                if is_ctrl(key, 'o') {
                    let visible = workspace.toggle_overlay();
                    workspace.log(if visible {
                        "quick open shown"
                    } else {
                        "quick open hidden"
                    });
                    continue;
                }
                handle_key(dispatcher, workspace, key);
            }
            Event::Resize(_, _) => {}
        }
    }

    Ok(())
}

fn handle_key(dispatcher: &mut Dispatcher, workspace: &Workspace, key: CrosstermKey) {
    let target = workspace.focused_id();
    let Some(event) = to_key_event(key, &target) else {
        return;
    };

    let disposition = dispatcher.handle_key(&event);
    debug!(key = %event.key, ?disposition, "Key handled");
    if disposition == Disposition::Consumed || workspace.is_overlay_visible() {
        return;
    }

    // Whatever the dispatcher lets through lands in the editor
    if dispatcher.mode() == Mode::Insert && !event.modifiers.has_command_modifier() {
        match key.code {
            KeyCode::Char(c) => workspace.type_char(c),
            KeyCode::Backspace => workspace.type_char('\u{8}'),
            KeyCode::Enter => workspace.type_char('\n'),
            _ => {}
        }
    }
}

fn drain_events(events: &Receiver<DispatchEvent>, workspace: &Workspace) {
    for event in events.try_iter() {
        workspace.log(describe(event));
    }
}

fn describe(event: DispatchEvent) -> String {
    match event {
        DispatchEvent::ModeChanged { from, to } => format!("mode {from} -> {to}"),
        DispatchEvent::PrefixArmed => "prefix armed".to_string(),
        DispatchEvent::PrefixDisarmed { expired: true } => "prefix expired".to_string(),
        DispatchEvent::PrefixDisarmed { expired: false } => "prefix cleared".to_string(),
        DispatchEvent::ActionEmitted(action) => format!("action {action}"),
    }
}

fn is_ctrl(key: CrosstermKey, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}
