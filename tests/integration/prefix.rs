//! Prefix chord arming, dispatch and expiry

use crate::common::{RecordingHost, TestFixture};
use modal_layout::events::DispatchEvent;
use modal_layout::{KeyEvent, LogicalAction, Mode};
use pretty_assertions::assert_eq;

const NAVIGATE_LEFT: &str = "workbench.action.navigateLeft";

#[test]
fn test_prefix_then_h_focuses_left() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::with_commands(&[NAVIGATE_LEFT]))?;
    let events = fx.dispatcher.subscribe();

    assert!(fx.prefix());
    assert!(fx.dispatcher.prefix_pending());
    assert!(fx.press("h"));
    assert!(!fx.dispatcher.prefix_pending());

    fx.dispatcher.flush();
    assert_eq!(fx.host.executed(), vec![NAVIGATE_LEFT]);
    assert_eq!(fx.dispatcher.mode(), Mode::Normal);

    let seen: Vec<DispatchEvent> = events.try_iter().collect();
    assert_eq!(
        seen,
        vec![
            DispatchEvent::PrefixArmed,
            DispatchEvent::PrefixDisarmed { expired: false },
            DispatchEvent::ActionEmitted(LogicalAction::FocusLeft),
        ]
    );
    Ok(())
}

#[test]
fn test_silence_expires_prefix_without_action() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::with_commands(&[NAVIGATE_LEFT]))?;
    let events = fx.dispatcher.subscribe();

    assert!(fx.prefix());
    fx.clock.advance_ms(1249);
    assert!(!fx.dispatcher.tick());
    assert!(fx.dispatcher.prefix_pending());

    fx.clock.advance_ms(1);
    assert!(fx.dispatcher.tick());
    assert!(!fx.dispatcher.prefix_pending());
    assert_eq!(fx.dispatcher.live_timers(), 0);
    assert_eq!(fx.host.status_text().as_deref(), Some("NORMAL"));

    fx.dispatcher.flush();
    assert!(fx.host.executed().is_empty());
    let seen: Vec<DispatchEvent> = events.try_iter().collect();
    assert_eq!(
        seen,
        vec![
            DispatchEvent::PrefixArmed,
            DispatchEvent::PrefixDisarmed { expired: true },
        ]
    );
    Ok(())
}

#[test]
fn test_late_key_goes_to_modal_machine() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.press("i"));
    assert!(fx.prefix());
    fx.clock.advance_ms(2000);

    // No tick ran, the expired window is noticed on the next key
    assert!(!fx.press("h"));
    assert!(!fx.dispatcher.prefix_pending());
    assert_eq!(fx.dispatcher.mode(), Mode::Insert);
    Ok(())
}

#[test]
fn test_rearm_restarts_window_with_one_timer() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.prefix());
    fx.clock.advance_ms(1000);
    assert!(fx.prefix());
    assert_eq!(fx.dispatcher.live_timers(), 1);

    fx.clock.advance_ms(1000);
    assert!(!fx.dispatcher.tick());
    assert!(fx.dispatcher.prefix_pending());

    fx.clock.advance_ms(250);
    assert!(fx.dispatcher.tick());
    assert_eq!(fx.dispatcher.live_timers(), 0);
    Ok(())
}

#[test]
fn test_prefix_works_in_insert_mode() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.press("i"));
    assert!(fx.prefix());
    assert!(fx.press("n"));
    assert_eq!(fx.dispatcher.mode(), Mode::Normal);
    Ok(())
}

#[test]
fn test_modifier_key_keeps_prefix_armed() -> Result<(), Box<dyn std::error::Error>> {
    let host = RecordingHost::with_commands(&["workbench.action.splitEditorRight"]);
    let mut fx = TestFixture::new(host)?;
    assert!(fx.prefix());

    // Shift on its own arrives before the '%' it produces
    assert!(!fx.press("Shift"));
    assert!(fx.dispatcher.prefix_pending());
    assert!(fx.press("%"));

    fx.dispatcher.flush();
    assert_eq!(fx.host.executed(), vec!["workbench.action.splitEditorRight"]);
    Ok(())
}

#[test]
fn test_unbound_prefixed_key_is_swallowed() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    let events = fx.dispatcher.subscribe();
    assert!(fx.prefix());
    assert!(fx.press("q"));
    assert!(!fx.dispatcher.prefix_pending());

    let emitted = events
        .try_iter()
        .filter(|event| matches!(event, DispatchEvent::ActionEmitted(_)))
        .count();
    assert_eq!(emitted, 0);
    Ok(())
}

#[test]
fn test_uppercase_prefixed_key_is_normalized() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.prefix());
    assert!(fx.press("V"));
    assert_eq!(fx.dispatcher.mode(), Mode::Visual);
    Ok(())
}

#[test]
fn test_arm_prefix_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.dispatcher.execute_id("modal-layout.prefix"));
    assert!(fx.dispatcher.prefix_pending());
    assert!(fx.press(":"));
    assert_eq!(fx.dispatcher.mode(), Mode::Command);
    Ok(())
}

#[test]
fn test_chord_with_other_modifiers_is_not_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    let mut event = KeyEvent::ctrl("b");
    event.modifiers.alt = true;
    assert!(!fx.dispatcher.handle_key(&event).is_consumed());
    assert!(!fx.dispatcher.prefix_pending());
    Ok(())
}
