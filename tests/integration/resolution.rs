//! Logical actions resolved against the host's registered commands

use crate::common::{RecordingHost, TestFixture};
use modal_layout::LogicalAction;
use modal_layout::config::Config;
use modal_layout::persist::MemoryStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn chained_config(action: LogicalAction, chain: &[&str]) -> Config {
    let mut config = Config::default();
    config.chains.set_chain(action, chain.iter().copied());
    config
}

#[test]
fn test_first_registered_command_runs() -> Result<(), Box<dyn std::error::Error>> {
    let config = chained_config(LogicalAction::FocusLeft, &["a.missing", "a.present"]);
    let host = RecordingHost::with_commands(&["a.present"]);
    let mut fx = TestFixture::with_store(host, Arc::new(MemoryStore::new()), config)?;

    assert!(fx.prefix());
    assert!(fx.press("h"));
    fx.dispatcher.flush();
    assert_eq!(fx.host.executed(), vec!["a.present"]);
    Ok(())
}

#[test]
fn test_exhausted_chain_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let config = chained_config(LogicalAction::FocusLeft, &["a.missing", "b.missing"]);
    let mut fx = TestFixture::with_store(RecordingHost::new(), Arc::new(MemoryStore::new()), config)?;

    assert!(fx.prefix());
    assert!(fx.press("h"));
    fx.dispatcher.flush();
    assert!(fx.host.executed().is_empty());
    assert!(!fx.dispatcher.prefix_pending());
    Ok(())
}

#[rstest]
#[case(
    &["workbench.action.splitEditorDown", "workbench.action.splitEditor"],
    "workbench.action.splitEditorDown"
)]
#[case(
    &["workbench.action.splitEditorOrthogonal", "workbench.action.splitEditor"],
    "workbench.action.splitEditorOrthogonal"
)]
#[case(&["workbench.action.splitEditor"], "workbench.action.splitEditor")]
fn test_default_split_chain_prefers_earlier_commands(
    #[case] registered: &[&str],
    #[case] expected: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::with_commands(registered))?;
    assert!(fx.prefix());
    assert!(fx.press("-"));
    fx.dispatcher.flush();
    assert_eq!(fx.host.executed(), vec![expected]);
    Ok(())
}

#[test]
fn test_close_pane_uses_registered_command() -> Result<(), Box<dyn std::error::Error>> {
    let host = RecordingHost::with_commands(&["workbench.action.closeActiveEditor"]);
    let mut fx = TestFixture::new(host)?;
    assert!(fx.prefix());
    assert!(fx.press("x"));
    fx.dispatcher.flush();

    assert_eq!(fx.host.executed(), vec!["workbench.action.closeActiveEditor"]);
    assert!(fx.host.closed.lock().is_empty());
    Ok(())
}

#[test]
fn test_close_pane_falls_back_to_shell() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.prefix());
    assert!(fx.press("x"));
    fx.dispatcher.flush();

    assert!(fx.host.executed().is_empty());
    assert_eq!(fx.host.closed.lock().clone(), vec!["editor-1"]);
    Ok(())
}

#[test]
fn test_dispatcher_commands_by_id() -> Result<(), Box<dyn std::error::Error>> {
    let host = RecordingHost::with_commands(&["workbench.action.navigateUp"]);
    let mut fx = TestFixture::new(host)?;

    assert!(fx.dispatcher.execute_id("modal-layout.focus.up"));
    assert!(!fx.dispatcher.execute_id("modal-layout.focus.sideways"));
    fx.dispatcher.flush();
    assert_eq!(fx.host.executed(), vec!["workbench.action.navigateUp"]);
    Ok(())
}
