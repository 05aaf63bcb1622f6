// Live API session state
//
// The session store owns the process-wide launcher data (API session plus its
// metadata) and replaces it wholesale. Replacement is keyed by the reload
// attempt number: a completion older than the applied generation is dropped.

use crate::models::Metadata;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Events emitted when the live session changes
#[derive(Clone, Debug, PartialEq)]
pub enum LauncherEvent {
    /// A new API session and its metadata are live
    ApiReady { generation: u64, address: String },
}

/// One complete snapshot of the loaded API
#[derive(Debug)]
pub struct LauncherData<S> {
    /// Reload attempt that produced this snapshot
    pub generation: u64,
    pub address: String,
    pub session: S,
    pub metadata: Metadata,
}

/// Outcome of [`SessionStore::replace_if_newer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    Applied { generation: u64 },
    /// A newer attempt is already live; the candidate was dropped
    Stale { attempt: u64, current: u64 },
}

/// Thread-safe holder of the live [`LauncherData`].
///
/// Readers get an `Arc` to a full snapshot and never observe a partially
/// replaced session.
///
/// # Related Types
///
/// - [`crate::reload::HotReloader`]: the only writer
/// - [`LauncherEvent`]: broadcast to subscribers after each replacement
pub struct SessionStore<S> {
    current: Arc<RwLock<Option<Arc<LauncherData<S>>>>>,

    /// Broadcast channel for ApiReady notifications
    events_tx: broadcast::Sender<LauncherEvent>,
}

impl<S> SessionStore<S> {
    /// Create an empty store with a broadcast buffer of 16 events
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(16);
        Self {
            current: Arc::new(RwLock::new(None)),
            events_tx,
        }
    }

    /// The live snapshot, if any API has been loaded
    pub fn current(&self) -> Option<Arc<LauncherData<S>>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generation of the live snapshot, 0 before the first load
    pub fn generation(&self) -> u64 {
        self.current().map(|data| data.generation).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LauncherEvent> {
        self.events_tx.subscribe()
    }

    /// Install a new snapshot unless a newer attempt is already live.
    ///
    /// The staleness check and the swap happen under one write lock.
    pub fn replace_if_newer(
        &self,
        attempt: u64,
        address: String,
        session: S,
        metadata: Metadata,
    ) -> Replacement {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let live = current.as_ref().map(|data| data.generation).unwrap_or(0);
        if attempt <= live {
            tracing::warn!(
                "Discarding stale API session for {} (attempt {}, live generation {})",
                address,
                attempt,
                live
            );
            return Replacement::Stale {
                attempt,
                current: live,
            };
        }

        *current = Some(Arc::new(LauncherData {
            generation: attempt,
            address: address.clone(),
            session,
            metadata,
        }));
        drop(current);

        // Ignore send errors - it's OK if no one is listening
        let _ = self.events_tx.send(LauncherEvent::ApiReady {
            generation: attempt,
            address,
        });

        Replacement::Applied {
            generation: attempt,
        }
    }
}

impl<S> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Clone implementation to avoid requiring S: Clone
impl<S> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            events_tx: self.events_tx.clone(),
        }
    }
}
