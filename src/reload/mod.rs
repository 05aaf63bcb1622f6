//! API hot reload with rollback.
//!
//! [`HotReloader`] connects to a proposed API address on the tokio runtime,
//! fetches its metadata and installs both into the [`SessionStore`]. Every
//! attempt is numbered; the store drops completions older than the live
//! generation, so a slow reload can never overwrite a newer one.
//!
//! [`ReloadObserver`] plugs the reloader into the settings event bus: a
//! change to `api.address` is committed only if the reload succeeded.
//! Otherwise the change is rejected (the text field reverts) and the user
//! gets a modal error naming the address.

use crate::api::{ApiSession, LauncherApi, ReloadError};
use crate::binding::{
    ChangeConfigEvent, ConfigField, ConfigObserver, ConfigSection, FieldValue, Verdict,
};
use crate::state::{Replacement, SessionStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;

/// Default bound on a single reload
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to a reload that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The new session is live
    Applied { generation: u64 },
    /// The reload finished after a newer one was applied and was dropped
    Superseded { attempt: u64, current: u64 },
}

/// Shows blocking error dialogs to the user
#[cfg_attr(test, mockall::automock)]
pub trait ErrorReporter {
    fn show_error(&self, title: &str, message: &str);
}

/// Reporter for headless runs: errors only reach the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn show_error(&self, title: &str, message: &str) {
        tracing::error!("{}: {}", title, message);
    }
}

/// Applies API address changes by replacing the live session
pub struct HotReloader<A: LauncherApi> {
    api: Arc<A>,
    store: SessionStore<A::Session>,
    runtime: Handle,
    attempts: AtomicU64,
    timeout: Duration,
}

impl<A: LauncherApi> HotReloader<A> {
    pub fn new(api: A, store: SessionStore<A::Session>, runtime: Handle) -> Self {
        Self {
            api: Arc::new(api),
            store,
            runtime,
            attempts: AtomicU64::new(0),
            timeout: DEFAULT_RELOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &SessionStore<A::Session> {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect to `address`, fetch its metadata and make it live.
    ///
    /// The network work runs as a task on the runtime and is aborted when it
    /// exceeds the timeout. On error nothing in the store changes.
    pub async fn reload(&self, address: &str) -> Result<ReloadOutcome, ReloadError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Reloading API from {} (attempt {})", address, attempt);

        let api = Arc::clone(&self.api);
        let target = address.to_string();
        let task = self.runtime.spawn(async move {
            let session = api.connect(&target).await?;
            let metadata = session.fetch_metadata().await?;
            Ok::<_, ReloadError>((session, metadata))
        });
        let abort = task.abort_handle();

        let (session, metadata) = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(ReloadError::Interrupted {
                    address: address.to_string(),
                    reason: join_error.to_string(),
                });
            }
            Err(_) => {
                abort.abort();
                return Err(ReloadError::Timeout {
                    address: address.to_string(),
                    after: self.timeout,
                });
            }
        };

        match self
            .store
            .replace_if_newer(attempt, address.to_string(), session, metadata)
        {
            Replacement::Applied { generation } => {
                tracing::info!("API is ready: {} (generation {})", address, generation);
                Ok(ReloadOutcome::Applied { generation })
            }
            Replacement::Stale { attempt, current } => {
                Ok(ReloadOutcome::Superseded { attempt, current })
            }
        }
    }

    /// Run [`reload`](Self::reload) to completion from a non-async thread.
    ///
    /// Must not be called from inside the runtime.
    pub fn reload_blocking(&self, address: &str) -> Result<ReloadOutcome, ReloadError> {
        self.runtime.block_on(self.reload(address))
    }
}

/// Event-bus observer that hot reloads on `api.address` changes
pub struct ReloadObserver<A: LauncherApi> {
    reloader: Arc<HotReloader<A>>,
    reporter: Box<dyn ErrorReporter>,
}

impl<A: LauncherApi> ReloadObserver<A> {
    pub fn new(reloader: Arc<HotReloader<A>>, reporter: impl ErrorReporter + 'static) -> Self {
        Self {
            reloader,
            reporter: Box::new(reporter),
        }
    }
}

impl<A: LauncherApi> ConfigObserver for ReloadObserver<A> {
    fn on_config_changed(&self, event: &ChangeConfigEvent) -> Verdict {
        if event.target() != ConfigSection::Api || event.key() != ConfigField::ApiAddress.name() {
            return Verdict::pass(event);
        }

        tracing::info!("API changed, hot reloading...");

        let FieldValue::Text(address) = event.new_value() else {
            tracing::error!("New API value is not a string: {}", event.new_value());
            return Verdict::pass(event);
        };

        match self.reloader.reload_blocking(address) {
            Ok(ReloadOutcome::Applied { .. }) => Verdict::pass(event),
            Ok(ReloadOutcome::Superseded { attempt, current }) => Verdict::Reject(format!(
                "reload {} of {} was superseded by generation {}",
                attempt, address, current
            )),
            Err(e) => {
                tracing::error!("Failed to apply API {}: {}", address, e);
                self.reporter.show_error(
                    "API connection failed",
                    &format!(
                        "Could not connect to the API at \"{}\". The previous API stays in use.",
                        address
                    ),
                );
                Verdict::Reject(e.to_string())
            }
        }
    }
}
