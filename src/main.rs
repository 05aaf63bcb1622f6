//! PvPRoom Launcher - settings and news from the command line
//!
//! Main entry point for the launcher binary.
//!
//! # Overview
//!
//! This binary wires the library together:
//! - Logging infrastructure (daily file rotation + console output)
//! - Tokio async runtime (4 worker threads for API reloads)
//! - Configuration loading ([`ConfigManager`])
//! - Live API session ([`SessionStore`]) and its [`HotReloader`]
//! - The settings page, bound to the loaded configuration
//!
//! The main thread plays the UI thread: it reads commands from stdin, drives
//! the settings controls and blocks on API reloads. Network work runs on the
//! tokio workers.
//!
//! # Execution Flow
//!
//! 1. Create the data directory and initialize logging
//! 2. Create tokio runtime with 4 worker threads
//! 3. Load `launcher.yaml` (defaults and environment overrides applied)
//! 4. Load the configured API and print the news feed
//! 5. Run the settings prompt until `quit` or end of input
//! 6. Shutdown tokio runtime with 5s timeout
//!
//! # Flags
//!
//! - `--headless`: report API errors to the log instead of native dialogs
//! - `--debug`: debug-level logging

use anyhow::{Context, Result};
use pvplauncher::api::HttpLauncherApi;
use pvplauncher::pages::{NewsPage, SettingsPage, theme_choices};
use pvplauncher::reload::LogReporter;
use pvplauncher::state::LauncherEvent;
use pvplauncher::ui::NativeDialogs;
use pvplauncher::{
    APP_NAME, ChangeOutcome, ConfigField, ConfigManager, HotReloader, ReloadObserver,
    SessionStore, SettingsStore, VERSION,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use sysinfo::System;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Directory holding `launcher.yaml`, themes and logs
const DATA_DIR: &str = "PvPRoom Launcher";

/// Fallback RAM slider bound when the system reports no memory
const FALLBACK_MEMORY_MB: i64 = 8192;

type Reloader = HotReloader<HttpLauncherApi>;

struct Options {
    headless: bool,
    debug: bool,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Self {
            headless: false,
            debug: false,
        };
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--headless" => options.headless = true,
                "--debug" => options.debug = true,
                other => eprintln!("Ignoring unknown argument: {}", other),
            }
        }
        options
    }
}

fn main() -> Result<()> {
    let options = Options::from_args();

    let config_manager = ConfigManager::new(DATA_DIR)?;
    let _guard =
        pvplauncher::logging::setup_logging(config_manager.log_dir(), options.debug, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("launcher-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    let config = config_manager.load_config()?;
    let timeout = Duration::from_secs(config.api.reload_timeout_secs);

    let api = HttpLauncherApi::new(timeout).context("Failed to build HTTP client")?;
    let sessions = SessionStore::new();
    let mut events = sessions.subscribe();
    let reloader = Arc::new(
        HotReloader::new(api, sessions, runtime.handle().clone()).with_timeout(timeout),
    );

    // Startup load takes the same path as a later change, minus the dialog
    if let Err(e) = reloader.reload_blocking(&config.api.address) {
        tracing::warn!("Initial API load failed: {}", e);
    }

    let mut store = SettingsStore::new(config).with_persistence(config_manager.clone());
    let themes = theme_choices(config_manager.themes_dir());
    let mut page = SettingsPage::build(&mut store, themes, total_memory_mb())
        .context("Failed to bind settings page")?;

    if options.headless {
        store.register(ReloadObserver::new(Arc::clone(&reloader), LogReporter));
    } else {
        store.register(ReloadObserver::new(Arc::clone(&reloader), NativeDialogs));
    }

    let mut news = NewsPage::new();
    refresh_news(&reloader, &mut events, &mut news);

    let result = run_prompt(&mut page, &mut store, &reloader, &mut events, &mut news);

    tracing::info!("Prompt closed, shutting down");
    runtime.shutdown_timeout(Duration::from_secs(5));
    tracing::info!("Application shutdown complete");

    result
}

fn total_memory_mb() -> i64 {
    let mut system = System::new();
    system.refresh_memory();
    let total = system.total_memory() / 1024 / 1024;
    if total == 0 {
        tracing::warn!("Could not read total memory, assuming {} MB", FALLBACK_MEMORY_MB);
        return FALLBACK_MEMORY_MB;
    }
    i64::try_from(total).unwrap_or(i64::MAX)
}

/// Drain pending notifications and reprint the news if an API became ready
fn refresh_news(
    reloader: &Reloader,
    events: &mut broadcast::Receiver<LauncherEvent>,
    news: &mut NewsPage,
) {
    let mut ready = false;
    loop {
        match events.try_recv() {
            Ok(LauncherEvent::ApiReady {
                generation,
                address,
            }) => {
                tracing::debug!("ApiReady received: {} (generation {})", address, generation);
                ready = true;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!("Skipped {} ApiReady notifications", skipped);
                ready = true;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    if !ready {
        return;
    }

    if let Some(data) = reloader.store().current() {
        let today = chrono::Local::now().date_naive();
        news.rebuild(data.generation, &data.metadata, today);
        println!("{}", news);
    }
}

fn run_prompt(
    page: &mut SettingsPage,
    store: &mut SettingsStore,
    reloader: &Reloader,
    events: &mut broadcast::Receiver<LauncherEvent>,
    news: &mut NewsPage,
) -> Result<()> {
    println!("Commands: fields | get <field> | set <field> <value> | news | quit");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;
        let mut parts = line.trim().splitn(3, ' ');

        match (parts.next(), parts.next(), parts.next()) {
            (Some("quit" | "exit"), None, None) => return Ok(()),
            (Some(""), None, None) => {}
            (Some("fields"), None, None) => {
                for field in ConfigField::ALL {
                    println!("{:<24} {}", field.path(), page.displayed(field));
                }
            }
            (Some("get"), Some(path), None) => match ConfigField::from_path(path) {
                Ok(field) => println!("{} = {}", field, field.get(store.config())),
                Err(e) => println!("{}", e),
            },
            (Some("set"), Some(path), Some(raw)) => match ConfigField::from_path(path) {
                Ok(field) => match page.edit(store, field, raw) {
                    Ok(outcome) => print_outcome(page, field, &outcome),
                    Err(e) => println!("{}", e),
                },
                Err(e) => println!("{}", e),
            },
            (Some("news"), None, None) => println!("{}", news),
            _ => println!("Unknown command: {}", line.trim()),
        }

        refresh_news(reloader, events, news);
    }
}

fn print_outcome(page: &SettingsPage, field: ConfigField, outcome: &ChangeOutcome) {
    match outcome {
        ChangeOutcome::Committed(value) => println!("{} = {}", field, value),
        ChangeOutcome::Unchanged => println!("{} unchanged", field),
        ChangeOutcome::Pending => println!("{} not committed yet", field),
        ChangeOutcome::Rejected(reason) => println!(
            "{} rejected ({}), still {}",
            field,
            reason,
            page.displayed(field)
        ),
    }
}
