//! Persisted mode, prefix window and layout profile across restarts

use crate::common::{RecordingHost, TestFixture};
use modal_layout::Mode;
use modal_layout::config::Config;
use modal_layout::host::KeyValueStore;
use modal_layout::persist::JsonFileStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const STATE_KEY: &str = "modal-layout.state";

fn file_store(dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::new(dir.path().join("state.json")))
}

#[test]
fn test_mode_and_timeout_survive_restart() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let config = Config {
        prefix_timeout_ms: 900,
        ..Config::default()
    };

    let mut first = TestFixture::with_store(RecordingHost::new(), file_store(&dir), config)?;
    assert!(first.press("v"));
    assert_eq!(
        first.stored()?,
        Some(json!({"mode": "visual", "prefixTimeoutMs": 900}))
    );
    first.dispatcher.stop();

    let second = TestFixture::with_store(RecordingHost::new(), file_store(&dir), Config::default())?;
    assert_eq!(second.dispatcher.mode(), Mode::Visual);
    assert_eq!(second.dispatcher.prefix_timeout(), Duration::from_millis(900));
    assert_eq!(second.host.status_text().as_deref(), Some("VISUAL"));
    Ok(())
}

#[test]
fn test_invalid_stored_values_fall_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let store = file_store(&dir);
    store.set_data(STATE_KEY, json!({"mode": "replace", "prefixTimeoutMs": -5}))?;

    let fx = TestFixture::with_store(RecordingHost::new(), store, Config::default())?;
    assert_eq!(fx.dispatcher.mode(), Mode::Normal);
    assert_eq!(fx.dispatcher.prefix_timeout(), Duration::from_millis(1250));
    Ok(())
}

#[test]
fn test_corrupt_state_file_starts_fresh() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("state.json"), "{ not json")?;

    let mut fx = TestFixture::with_store(RecordingHost::new(), file_store(&dir), Config::default())?;
    assert!(fx.dispatcher.is_listening());
    assert_eq!(fx.dispatcher.mode(), Mode::Normal);
    assert!(fx.press("i"));
    assert_eq!(fx.dispatcher.mode(), Mode::Insert);

    fx.dispatcher.flush();
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("state.json"))?)?;
    assert_eq!(
        on_disk,
        json!({STATE_KEY: {"mode": "insert", "prefixTimeoutMs": 1250}})
    );
    Ok(())
}

#[test]
fn test_layout_save_over_corrupt_file_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("state.json"), "{ not json")?;
    let host = RecordingHost::new();
    *host.has_layout.lock() = true;

    let mut fx = TestFixture::with_store(host, file_store(&dir), Config::default())?;
    assert!(fx.prefix());
    assert!(fx.press("s"));
    fx.dispatcher.flush();

    assert_eq!(fx.host.messages.lock().clone(), vec!["Layout profile saved."]);
    let restarted = TestFixture::with_store(RecordingHost::new(), file_store(&dir), Config::default())?;
    assert_eq!(
        restarted.dispatcher.layout_profile(),
        Some(&json!({"panes": ["editor-1", "editor-2"]}))
    );
    Ok(())
}

#[test]
fn test_other_keys_in_state_file_are_kept() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let store = file_store(&dir);
    store.set_data("other.extension", json!([1, 2, 3]))?;

    let mut fx = TestFixture::with_store(RecordingHost::new(), Arc::clone(&store), Config::default())?;
    assert!(fx.press(":"));
    fx.dispatcher.flush();

    assert_eq!(store.get_data("other.extension")?, Some(json!([1, 2, 3])));
    assert_eq!(
        store.get_data(STATE_KEY)?,
        Some(json!({"mode": "command", "prefixTimeoutMs": 1250}))
    );
    Ok(())
}

#[test]
fn test_layout_profile_saved_and_loaded() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let host = RecordingHost::new();
    *host.has_layout.lock() = true;

    let mut first = TestFixture::with_store(host, file_store(&dir), Config::default())?;
    assert!(first.prefix());
    assert!(first.press("s"));
    let stored = first.stored()?;
    assert_eq!(
        stored.as_ref().and_then(|state| state.get("layoutProfile")),
        Some(&json!({"panes": ["editor-1", "editor-2"]}))
    );
    assert_eq!(
        first.host.messages.lock().clone(),
        vec!["Layout profile saved."]
    );
    first.dispatcher.stop();

    let host = RecordingHost::new();
    *host.has_layout.lock() = true;
    let mut second = TestFixture::with_store(host, file_store(&dir), Config::default())?;
    assert!(second.prefix());
    assert!(second.press("r"));
    second.dispatcher.flush();
    assert_eq!(
        second.host.restored_layouts.lock().clone(),
        vec![json!({"panes": ["editor-1", "editor-2"]})]
    );
    assert_eq!(
        second.host.messages.lock().clone(),
        vec!["Layout profile loaded."]
    );
    Ok(())
}

#[test]
fn test_layout_unavailable_warns() -> Result<(), Box<dyn std::error::Error>> {
    let mut fx = TestFixture::new(RecordingHost::new())?;
    assert!(fx.prefix());
    assert!(fx.press("s"));
    assert!(fx.prefix());
    assert!(fx.press("r"));
    fx.dispatcher.flush();

    assert_eq!(
        fx.host.messages.lock().clone(),
        vec![
            "Unable to save layout: layout data API is unavailable.",
            "No saved layout profile is available.",
        ]
    );
    assert!(fx.dispatcher.layout_profile().is_none());
    Ok(())
}
