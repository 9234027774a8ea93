use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use pasteup_core::{ClipboardFile, ClipboardPayload, TOKEN_LEN, UploadResult};
use pasteup_plugin::{
    Editor, ImageOutcome, PasteEvent, PasteInterceptor, PasteKind, PasteOptions, TextBuffer,
    UploadTarget,
};
use pasteup_store::{DynObjectStore, FailureMode, MemoryObjectStore, RecordingObjectStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn image(name: &str, mime: &str) -> ClipboardFile {
    ClipboardFile::new(name, mime, b"\x89PNG\r\n".as_slice())
}

fn interceptor(store: Arc<dyn DynObjectStore>, dir: &str) -> PasteInterceptor {
    PasteInterceptor::new(UploadTarget::new(store, dir), PasteOptions::default())
}

/// Check `<dir><YYYY-MM-DD>-<token><ext>` and return the date.
fn assert_key_shape(key: &str, dir: &str, ext: &str) -> NaiveDate {
    let rest = key
        .strip_prefix(dir)
        .unwrap_or_else(|| panic!("{key} does not start with {dir}"));
    let rest = rest
        .strip_suffix(ext)
        .unwrap_or_else(|| panic!("{key} does not end with {ext}"));
    let (date, token) = rest.split_at(10);
    let token = token.strip_prefix('-').expect("dash after date");
    assert_eq!(token.len(), TOKEN_LEN, "token in {key}");
    assert!(
        token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
        "token in {key} is not base36"
    );
    NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("ISO date")
}

#[tokio::test]
async fn single_image_is_uploaded_and_linked() {
    init_tracing();
    let store = Arc::new(
        RecordingObjectStore::new("unused")
            .with_response_fn(|_| Ok(UploadResult::new("https://example.com/cat123.png"))),
    );
    let interceptor = interceptor(store.clone(), "notes/");
    let mut editor = TextBuffer::default();

    let mut event = PasteEvent::new(ClipboardPayload::new().with_file(image("cat.png", "image/png")));
    let task = interceptor.on_paste(&mut event);
    assert!(event.is_default_prevented());
    let report = task.run(&mut editor).await;

    store.assert_called(1);
    let call = &store.calls()[0];
    let date = assert_key_shape(&call.key, "notes/", ".png");
    let today = Utc::now().date_naive();
    assert!(date == today || date.succ_opt() == Some(today));
    assert_eq!(call.content_type, "image/png");

    assert_eq!(editor.text(), "![cat.png](https://example.com/cat123.png)");
    assert_eq!(report.kind, PasteKind::UploadedBatch);
    assert_eq!(report.outcomes[0].key().as_str(), call.key);
}

#[tokio::test]
async fn text_only_payload_is_inserted_verbatim() {
    let store = Arc::new(RecordingObjectStore::new("https://x.test/"));
    let interceptor = interceptor(store.clone(), "");
    let text = "line one\n  line two\twith tab  ";
    let mut editor = TextBuffer::new("prefix:");

    let mut event = PasteEvent::new(ClipboardPayload::from_text(text));
    let report = interceptor.on_paste(&mut event).run(&mut editor).await;

    assert!(event.is_default_prevented());
    assert_eq!(report.kind, PasteKind::PassthroughText);
    assert_eq!(report.inserted, text);
    assert_eq!(editor.text(), format!("prefix:{text}"));
    store.assert_not_called();
}

#[tokio::test]
async fn images_win_over_text() {
    let store = Arc::new(MemoryObjectStore::with_base_url("https://x.test/"));
    let interceptor = interceptor(store, "");
    let mut editor = TextBuffer::default();

    let mut event = PasteEvent::new(
        ClipboardPayload::from_text("alt text from the browser")
            .with_file(image("pic.gif", "image/gif")),
    );
    let report = interceptor.on_paste(&mut event).run(&mut editor).await;

    assert_eq!(report.kind, PasteKind::UploadedBatch);
    assert!(!editor.text().contains("alt text"));
    assert!(editor.text().starts_with("![pic.gif](https://x.test/"));
}

#[tokio::test]
async fn n_images_are_linked_in_clipboard_order() {
    let store = Arc::new(RecordingObjectStore::new("https://cdn.test/"));
    let interceptor = interceptor(store.clone(), "img/");
    let mut editor = TextBuffer::default();

    let names = ["a.png", "b.jpeg", "c.webp", "d", "e.tar.gz"];
    let payload = names.iter().fold(ClipboardPayload::new(), |payload, name| {
        payload.with_file(image(name, "image/png"))
    });
    let report = interceptor
        .on_paste(&mut PasteEvent::new(payload))
        .run(&mut editor)
        .await;

    assert_eq!(report.inserted_count(), names.len());
    let lines: Vec<&str> = editor.text().lines().collect();
    assert_eq!(lines.len(), names.len());
    for ((line, name), key) in lines.iter().zip(names).zip(store.keys()) {
        assert_eq!(*line, format!("![{name}](https://cdn.test/{key})"));
    }

    let keys: HashSet<String> = store.keys().into_iter().collect();
    assert_eq!(keys.len(), names.len());
    assert_key_shape(&store.keys()[3], "img/", "");
    assert_key_shape(&store.keys()[4], "img/", ".gz");
}

#[tokio::test]
async fn failed_upload_skips_only_that_image() {
    let store = Arc::new(
        RecordingObjectStore::new("https://cdn.test/")
            .with_failure_mode(FailureMode::Calls(vec![2])),
    );
    let interceptor = interceptor(store.clone(), "");
    let mut editor = TextBuffer::default();

    let payload = ClipboardPayload::new()
        .with_file(image("first.png", "image/png"))
        .with_file(image("second.png", "image/png"))
        .with_file(image("third.png", "image/png"));
    let report = interceptor
        .on_paste(&mut PasteEvent::new(payload))
        .run(&mut editor)
        .await;

    store.assert_called(3);
    assert_eq!(report.inserted_count(), 2);
    assert_eq!(report.failed_count(), 1);

    let failed: Vec<&ImageOutcome> = report.failures().collect();
    assert_eq!(failed[0].filename(), "second.png");
    assert!(failed[0].error().unwrap().to_string().contains("simulated failure"));

    let text = editor.text();
    assert!(text.contains("![first.png]("));
    assert!(!text.contains("second.png"));
    assert!(text.contains("![third.png]("));
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn non_image_files_are_dropped() {
    let store = Arc::new(RecordingObjectStore::new("https://cdn.test/"));
    let interceptor = interceptor(store.clone(), "");
    let mut editor = TextBuffer::default();

    let payload = ClipboardPayload::new()
        .with_file(image("report.pdf", "application/pdf"))
        .with_file(image("shot.png", "IMAGE/PNG"))
        .with_file(image("data.csv", "text/csv"));
    let report = interceptor
        .on_paste(&mut PasteEvent::new(payload))
        .run(&mut editor)
        .await;

    assert_eq!(report.dropped_files, 2);
    assert_eq!(store.keys().len(), 1);
    assert!(editor.text().starts_with("![shot.png]("));
}

#[tokio::test]
async fn only_non_image_files_without_text_insert_nothing() {
    let store = Arc::new(RecordingObjectStore::new("https://cdn.test/"));
    let interceptor = interceptor(store.clone(), "");
    let mut editor = TextBuffer::new("untouched");

    let payload = ClipboardPayload::new().with_file(image("a.zip", "application/zip"));
    let mut event = PasteEvent::new(payload);
    let report = interceptor.on_paste(&mut event).run(&mut editor).await;

    assert!(event.is_default_prevented());
    assert_eq!(report.kind, PasteKind::Nothing);
    assert_eq!(report.dropped_files, 1);
    assert_eq!(editor.text(), "untouched");
    store.assert_not_called();
}

#[tokio::test]
async fn empty_or_missing_payload_is_a_no_op() {
    let store = Arc::new(RecordingObjectStore::new("https://cdn.test/"));
    let interceptor = interceptor(store.clone(), "");
    let mut editor = TextBuffer::new("untouched");

    for mut event in [
        PasteEvent::without_payload(),
        PasteEvent::new(ClipboardPayload::new()),
    ] {
        let report = interceptor.on_paste(&mut event).run(&mut editor).await;
        assert!(event.is_default_prevented());
        assert_eq!(report.kind, PasteKind::Nothing);
        assert!(report.inserted.is_empty());
    }
    assert_eq!(editor.text(), "untouched");
    store.assert_not_called();
}

#[tokio::test(start_paused = true)]
async fn stalled_upload_holds_up_the_batch_without_a_timeout() {
    let store = Arc::new(RecordingObjectStore::new("https://cdn.test/").with_stall_on(1));
    let interceptor = interceptor(store.clone(), "");
    let mut editor = TextBuffer::default();

    let payload = ClipboardPayload::new()
        .with_file(image("stuck.png", "image/png"))
        .with_file(image("next.png", "image/png"));
    let task = interceptor.on_paste(&mut PasteEvent::new(payload));

    let outcome = tokio::time::timeout(Duration::from_secs(3600), task.run(&mut editor)).await;
    assert!(outcome.is_err(), "batch should still be waiting");
    store.assert_called(1);
    assert_eq!(editor.text(), "");
}

#[tokio::test]
async fn concurrent_pastes_do_not_interfere() {
    let store = Arc::new(
        RecordingObjectStore::new("https://cdn.test/").with_delay(Duration::from_millis(10)),
    );
    let interceptor = interceptor(store.clone(), "");
    let mut left = TextBuffer::default();
    let mut right = TextBuffer::default();

    let left_task = interceptor.on_paste(&mut PasteEvent::new(
        ClipboardPayload::new()
            .with_file(image("l1.png", "image/png"))
            .with_file(image("l2.png", "image/png")),
    ));
    let right_task = interceptor.on_paste(&mut PasteEvent::new(
        ClipboardPayload::new().with_file(image("r1.png", "image/png")),
    ));
    let (left_report, right_report) =
        tokio::join!(left_task.run(&mut left), right_task.run(&mut right));

    assert_eq!(left_report.inserted_count(), 2);
    assert_eq!(right_report.inserted_count(), 1);
    assert_eq!(left.text().lines().count(), 2);
    assert!(right.text().starts_with("![r1.png]("));
    let keys: HashSet<String> = store.keys().into_iter().collect();
    assert_eq!(keys.len(), 3);
}

/// An editor that records every call instead of applying it.
#[derive(Default)]
struct CallLog(Vec<String>);

impl Editor for CallLog {
    fn replace_selection(&mut self, text: &str) {
        self.0.push(text.to_owned());
    }
}

#[tokio::test]
async fn every_insertion_goes_through_replace_selection() {
    let store = Arc::new(MemoryObjectStore::with_base_url("u/"));
    let interceptor = interceptor(store, "");
    let mut editor = CallLog::default();

    let payload = ClipboardPayload::new()
        .with_file(image("a.png", "image/png"))
        .with_file(image("b.png", "image/png"));
    interceptor
        .on_paste(&mut PasteEvent::new(payload))
        .run(&mut editor)
        .await;

    assert_eq!(editor.0.len(), 2);
    assert!(editor.0[0].starts_with("![a.png](u/"));
    assert!(editor.0[1].starts_with("\n![b.png](u/"));
}
