use std::sync::Arc;
use std::time::Duration;

use pasteup_core::{ClipboardFile, ClipboardPayload};
use pasteup_plugin::{MemoryHost, PasteOptions, Plugin, TextBuffer};
use pasteup_settings::{
    JsonFileSettingsStore, MemorySettingsStore, SettingField, Settings, SettingsHolder,
    SettingsStore,
};
use pasteup_store::{DynObjectStore, RecordingObjectStore};

fn cat() -> ClipboardPayload {
    ClipboardPayload::new().with_file(ClipboardFile::new(
        "cat.png",
        "image/png",
        b"png".as_slice(),
    ))
}

/// Each bucket gets its own recording store; bucket `slow` takes a while.
fn recording_plugin(settings: Arc<dyn SettingsStore>) -> Plugin {
    Plugin::new(settings, |s| {
        let store = RecordingObjectStore::new(format!("https://{}.test/", s.bucket));
        let store = if s.bucket == "slow" {
            store.with_delay(Duration::from_millis(200))
        } else {
            store
        };
        Arc::new(store) as Arc<dyn DynObjectStore>
    })
}

#[test]
fn settings_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = Arc::new(JsonFileSettingsStore::in_dir(dir.path()));

    let defaults = SettingsHolder::load_from(file.clone()).unwrap();
    assert_eq!(defaults.get(), &Settings::default());

    let saved = Settings {
        access_key_id: "AKID".into(),
        access_key_secret: "shh".into(),
        endpoint: "oss-cn-hangzhou.aliyuncs.com".into(),
        bucket: "notes".into(),
        dir: "img/".into(),
        ..Settings::default()
    };
    let mut holder = SettingsHolder::new(file.clone());
    holder.save(saved.clone()).unwrap();

    let reloaded = SettingsHolder::load_from(file.clone()).unwrap();
    assert_eq!(reloaded.get(), &saved);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(raw["accessKeyID"], "AKID");
    assert_eq!(raw["accessKeySecret"], "shh");
    assert_eq!(raw["dir"], "img/");
}

#[tokio::test]
async fn panel_edit_redirects_later_pastes() {
    let mut host = MemoryHost::new();
    let settings = Arc::new(MemorySettingsStore::with_document(r#"{"bucket":"old"}"#));
    let handle = recording_plugin(settings.clone()).start(&mut host).unwrap();

    let mut doc = TextBuffer::default();
    host.paste(Some(cat()), &mut doc).await;
    assert!(doc.text().contains("](https://old.test/"));

    assert!(host.edit_setting(SettingField::Bucket, "new"));
    assert!(host.edit_setting(SettingField::Dir, "pics/"));
    assert_eq!(settings.load().unwrap().bucket, "new");

    let mut doc = TextBuffer::default();
    host.paste(Some(cat()), &mut doc).await;
    assert!(doc.text().contains("](https://new.test/pics/"));

    handle.stop(&mut host);
    let mut doc = TextBuffer::default();
    let dispatched = host.paste(Some(cat()), &mut doc).await;
    assert!(dispatched.default_fired);
    assert_eq!(doc.text(), "");
}

#[tokio::test]
async fn in_flight_paste_keeps_the_store_it_started_with() {
    let mut host = MemoryHost::new();
    let settings = Arc::new(MemorySettingsStore::with_document(r#"{"bucket":"slow"}"#));
    let handle = recording_plugin(settings).start(&mut host).unwrap();

    let task = handle
        .interceptor()
        .on_paste(&mut pasteup_plugin::PasteEvent::new(cat()));
    let mut doc = TextBuffer::default();
    let running = tokio::spawn(async move { task.run(&mut doc).await.inserted });

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.update_setting(SettingField::Bucket, "fast").unwrap();

    let inserted = running.await.unwrap();
    assert!(inserted.contains("](https://slow.test/"));

    let mut doc = TextBuffer::default();
    host.paste(Some(cat()), &mut doc).await;
    assert!(doc.text().contains("](https://fast.test/"));
}

#[tokio::test]
async fn upload_timeout_option_reaches_the_interceptor() {
    let mut host = MemoryHost::new();
    let handle = recording_plugin(Arc::new(MemorySettingsStore::new()))
        .with_options(PasteOptions::default().with_upload_timeout(Duration::from_secs(30)))
        .start(&mut host)
        .unwrap();
    assert_eq!(
        handle.interceptor().options().upload_timeout(),
        Some(Duration::from_secs(30))
    );
}

#[tokio::test]
async fn external_file_edit_rebuilds_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let file = JsonFileSettingsStore::in_dir(dir.path());
    file.save(&Settings {
        bucket: "before".into(),
        ..Settings::default()
    })
    .unwrap();

    let mut host = MemoryHost::new();
    let mut handle = recording_plugin(Arc::new(file.clone()))
        .start(&mut host)
        .unwrap();
    handle.watch_settings_file(file.clone()).unwrap();
    // Give the watcher a moment to subscribe before editing.
    tokio::time::sleep(Duration::from_millis(200)).await;

    std::fs::write(file.path(), r#"{"bucket":"after","dir":"ext/"}"#).unwrap();

    let mut rebuilt = false;
    for _ in 0..100 {
        if handle.interceptor().target().directory() == "ext/" {
            rebuilt = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(rebuilt, "settings watcher did not pick up the edit");
    assert_eq!(handle.settings().bucket, "after");

    handle.stop(&mut host);
}
