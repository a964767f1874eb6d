//! Invariants that hold for any key sequence

use crate::common::{RecordingHost, TestFixture};
use modal_layout::{KeyEvent, Mode};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Key(&'static str),
    Prefix,
    Wait(u64),
}

fn step() -> impl Strategy<Value = Step> {
    let keys = prop::sample::select(vec![
        "h", "j", "k", "l", "i", "v", ":", "n", "x", "s", "w", "%", "-", "Escape", "Enter",
        "Shift", "ArrowDown",
    ]);
    prop_oneof![
        4 => keys.prop_map(Step::Key),
        1 => Just(Step::Prefix),
        1 => (0u64..2000).prop_map(Step::Wait),
    ]
}

proptest! {
    #[test]
    fn prop_state_stays_consistent(steps in prop::collection::vec(step(), 0..60)) {
        let host = RecordingHost::with_commands(&["workbench.action.navigateLeft"]);
        let mut fx = TestFixture::new(host).map_err(|e| TestCaseError::fail(e.to_string()))?;

        for step in steps {
            let mode_before = fx.dispatcher.mode();
            let pending_before = fx.dispatcher.prefix_pending();
            match step {
                Step::Key(key) => {
                    let consumed = fx.dispatcher.handle_key(&KeyEvent::new(key)).is_consumed();
                    if mode_before == Mode::Insert && !pending_before && key != "Escape" {
                        prop_assert!(!consumed);
                        prop_assert_eq!(fx.dispatcher.mode(), Mode::Insert);
                    }
                }
                Step::Prefix => {
                    prop_assert!(fx.prefix());
                    prop_assert!(fx.dispatcher.prefix_pending());
                }
                Step::Wait(ms) => {
                    fx.clock.advance_ms(ms);
                    fx.dispatcher.tick();
                }
            }

            prop_assert!(fx.dispatcher.live_timers() <= 1);
            prop_assert_eq!(fx.dispatcher.live_timers() == 1, fx.dispatcher.prefix_pending());
            prop_assert!(Mode::ALL.contains(&fx.dispatcher.mode()));

            let mut expected = fx.dispatcher.mode().status_label().to_string();
            if fx.dispatcher.prefix_pending() {
                expected.push_str(" [C-b]");
            }
            prop_assert_eq!(fx.host.status_text(), Some(expected));
        }

        fx.dispatcher.flush();
        prop_assert_eq!(fx.dispatcher.snapshot().mode, fx.dispatcher.mode());
    }
}
