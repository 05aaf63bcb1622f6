use super::{ApiSession, LauncherApi, ReloadError};
use crate::models::Metadata;
use reqwest::Url;
use std::time::Duration;

/// Metadata endpoint, relative to the API address
const METADATA_PATH: &str = "launcher/metadata";

/// Launcher API over HTTP(S) with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpLauncherApi {
    client: reqwest::Client,
}

impl HttpLauncherApi {
    /// Build a client whose individual requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;
        Ok(Self { client })
    }
}

impl LauncherApi for HttpLauncherApi {
    type Session = HttpSession;

    async fn connect(&self, address: &str) -> Result<HttpSession, ReloadError> {
        let base = parse_address(address)?;
        tracing::debug!("Opened API session for {}", base);

        Ok(HttpSession {
            client: self.client.clone(),
            address: address.to_string(),
            base,
        })
    }
}

/// Session bound to one API base URL
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: reqwest::Client,
    address: String,
    base: Url,
}

impl HttpSession {
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl ApiSession for HttpSession {
    fn address(&self) -> &str {
        &self.address
    }

    async fn fetch_metadata(&self) -> Result<Metadata, ReloadError> {
        let url = self
            .base
            .join(METADATA_PATH)
            .map_err(|e| ReloadError::InvalidAddress {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;

        let request_failed = |source| ReloadError::Request {
            address: self.address.clone(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReloadError::Status {
                address: self.address.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_failed)?;
        let metadata: Metadata =
            serde_json::from_slice(&body).map_err(|e| ReloadError::Malformed {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            "Fetched metadata from {}: {} blog posts, alert={}",
            self.address,
            metadata.blogposts.len(),
            metadata.alert.is_some()
        );
        Ok(metadata)
    }
}

/// Turn a user-entered address into a base URL.
///
/// Addresses without a scheme default to https. The path always ends with a
/// slash so relative endpoints resolve beneath it.
pub fn parse_address(address: &str) -> Result<Url, ReloadError> {
    let invalid = |reason: &str| ReloadError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid("address is empty"));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https are supported"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
