//! Integration tests for API hot reload through the settings page
//!
//! These tests verify:
//! - A failed reload rejects the address change, reverts the text field and
//!   reports one error naming the address
//! - A successful reload replaces the session and announces it exactly once
//! - A reload that completes after a newer one was applied is discarded

use pvplauncher::api::{ApiSession, LauncherApi, ReloadError};
use pvplauncher::models::{Blogpost, Metadata};
use pvplauncher::pages::SettingsPage;
use pvplauncher::reload::ErrorReporter;
use pvplauncher::{
    ChangeOutcome, ConfigField, FieldValue, HotReloader, LauncherConfig, LauncherEvent,
    ReloadObserver, ReloadOutcome, SessionStore, SettingsStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{Duration, timeout};

/// Accepts any non-empty address; addresses with a gate wait for it to open.
/// Clones share their gates.
#[derive(Clone, Default)]
struct GatedApi {
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    entered: Arc<Notify>,
}

impl GatedApi {
    fn gate(&self, address: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(address.to_string(), Arc::clone(&gate));
        gate
    }
}

struct FakeSession(String);

impl LauncherApi for GatedApi {
    type Session = FakeSession;

    async fn connect(&self, address: &str) -> Result<FakeSession, ReloadError> {
        if address.trim().is_empty() {
            return Err(ReloadError::InvalidAddress {
                address: address.to_string(),
                reason: "address is empty".to_string(),
            });
        }

        let gate = self.gates.lock().unwrap().get(address).cloned();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }

        Ok(FakeSession(address.to_string()))
    }
}

impl ApiSession for FakeSession {
    fn address(&self) -> &str {
        &self.0
    }

    async fn fetch_metadata(&self) -> Result<Metadata, ReloadError> {
        Ok(Metadata {
            blogposts: vec![Blogpost {
                title: format!("Hello from {}", self.0),
                excerpt: String::new(),
                image: None,
                link: None,
                author: None,
            }],
            alert: None,
        })
    }
}

#[derive(Clone, Default)]
struct RecordingReporter {
    shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl ErrorReporter for RecordingReporter {
    fn show_error(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

struct Harness {
    _runtime: tokio::runtime::Runtime,
    reloader: Arc<HotReloader<GatedApi>>,
    page: SettingsPage,
    store: SettingsStore,
    reporter: RecordingReporter,
}

fn harness() -> Harness {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let reloader = Arc::new(HotReloader::new(
        GatedApi::default(),
        SessionStore::new(),
        runtime.handle().clone(),
    ));
    reloader.reload_blocking("old.example.com").unwrap();

    let mut config = LauncherConfig::default();
    config.api.address = "old.example.com".to_string();

    let mut store = SettingsStore::new(config);
    let page = SettingsPage::build(&mut store, vec!["dark".to_string()], 8192).unwrap();
    let reporter = RecordingReporter::default();
    store.register(ReloadObserver::new(Arc::clone(&reloader), reporter.clone()));

    Harness {
        _runtime: runtime,
        reloader,
        page,
        store,
        reporter,
    }
}

#[test]
fn test_empty_address_is_rolled_back() {
    let mut h = harness();
    let mut events = h.reloader.store().subscribe();

    let outcome = h.page.edit(&mut h.store, ConfigField::ApiAddress, "").unwrap();

    assert!(matches!(outcome, ChangeOutcome::Rejected(_)));
    assert_eq!(h.store.config().api.address, "old.example.com");
    assert_eq!(
        h.page.displayed(ConfigField::ApiAddress),
        FieldValue::Text("old.example.com".to_string())
    );
    assert_eq!(h.reloader.store().current().unwrap().address, "old.example.com");
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

    let shown = h.reporter.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].1.contains("\"\""), "message should quote the address");
}

#[test]
fn test_successful_reload_replaces_session() {
    let mut h = harness();
    let mut events = h.reloader.store().subscribe();
    let before = h.reloader.store().generation();

    let outcome = h
        .page
        .edit(&mut h.store, ConfigField::ApiAddress, "  new.example.com ")
        .unwrap();

    assert_eq!(
        outcome,
        ChangeOutcome::Committed(FieldValue::Text("new.example.com".to_string()))
    );
    assert_eq!(h.store.config().api.address, "new.example.com");

    let live = h.reloader.store().current().unwrap();
    assert_eq!(live.address, "new.example.com");
    assert!(live.generation > before);
    assert_eq!(live.metadata.blogposts[0].title, "Hello from new.example.com");

    assert_eq!(
        events.try_recv(),
        Ok(LauncherEvent::ApiReady {
            generation: live.generation,
            address: "new.example.com".to_string(),
        })
    );
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    assert!(h.reporter.shown.lock().unwrap().is_empty());
}

#[test]
fn test_other_settings_do_not_reload() {
    let mut h = harness();
    let generation = h.reloader.store().generation();

    h.page.edit(&mut h.store, ConfigField::MaxThreads, "4").unwrap();

    assert_eq!(h.reloader.store().generation(), generation);
}

#[test]
fn test_spinner_clamps_out_of_bounds_request() {
    let mut h = harness();

    let outcome = h.page.edit(&mut h.store, ConfigField::MaxThreads, "1000").unwrap();
    assert_eq!(outcome, ChangeOutcome::Committed(FieldValue::Integer(256)));
    assert_eq!(h.store.config().max_threads, 256);

    let outcome = h.page.edit(&mut h.store, ConfigField::ResizeHeight, "-5").unwrap();
    assert_eq!(outcome, ChangeOutcome::Committed(FieldValue::Integer(10)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_late_completion_does_not_overwrite_newer_session() {
    let api = GatedApi::default();
    let gate_a = api.gate("a.example.com");
    let reloader = Arc::new(HotReloader::new(
        api.clone(),
        SessionStore::new(),
        tokio::runtime::Handle::current(),
    ));
    let mut events = reloader.store().subscribe();

    let slow = {
        let reloader = Arc::clone(&reloader);
        tokio::spawn(async move { reloader.reload("a.example.com").await })
    };
    // A has its attempt number and is parked in connect
    timeout(Duration::from_secs(5), api.entered.notified())
        .await
        .expect("reload A never started");

    let fast = reloader.reload("b.example.com").await.unwrap();
    assert!(matches!(fast, ReloadOutcome::Applied { .. }));

    gate_a.notify_one();
    let late = timeout(Duration::from_secs(5), slow)
        .await
        .expect("reload A never finished")
        .unwrap()
        .unwrap();

    assert!(matches!(late, ReloadOutcome::Superseded { .. }));
    assert_eq!(reloader.store().current().unwrap().address, "b.example.com");

    let event = events.recv().await.unwrap();
    assert!(matches!(
        event,
        LauncherEvent::ApiReady { ref address, .. } if address == "b.example.com"
    ));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_reload_timeout_keeps_previous_session() {
    let api = GatedApi::default();
    let _never_opened = api.gate("stuck.example.com");
    let reloader = HotReloader::new(
        api.clone(),
        SessionStore::new(),
        tokio::runtime::Handle::current(),
    )
    .with_timeout(Duration::from_millis(100));

    reloader.reload("ok.example.com").await.unwrap();
    let result = reloader.reload("stuck.example.com").await;

    assert!(matches!(result, Err(ReloadError::Timeout { .. })));
    assert_eq!(reloader.store().current().unwrap().address, "ok.example.com");
}
