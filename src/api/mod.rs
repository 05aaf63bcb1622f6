//! Remote launcher API.
//!
//! [`LauncherApi::connect`] opens a session against an address and
//! [`ApiSession::fetch_metadata`] downloads the launcher metadata for it. Both
//! are fallible; the hot-reload coordinator turns every failure into a
//! rollback. [`HttpLauncherApi`] is the production implementation.

pub mod http;

pub use http::{HttpLauncherApi, HttpSession};

use crate::models::Metadata;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors from connecting to an API or fetching its metadata
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("Invalid API address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Request to {address} failed: {source}")]
    Request {
        address: String,
        source: reqwest::Error,
    },

    #[error("API at {address} answered with HTTP {status}")]
    Status { address: String, status: u16 },

    #[error("Malformed metadata from {address}: {reason}")]
    Malformed { address: String, reason: String },

    #[error("API at {address} did not answer within {after:?}")]
    Timeout { address: String, after: Duration },

    #[error("Reload of {address} was interrupted: {reason}")]
    Interrupted { address: String, reason: String },
}

/// Factory for API sessions
pub trait LauncherApi: Send + Sync + 'static {
    type Session: ApiSession;

    fn connect(&self, address: &str)
    -> impl Future<Output = Result<Self::Session, ReloadError>> + Send;
}

/// An open session against one API address
pub trait ApiSession: Send + Sync + 'static {
    fn address(&self) -> &str;

    fn fetch_metadata(&self) -> impl Future<Output = Result<Metadata, ReloadError>> + Send;
}
