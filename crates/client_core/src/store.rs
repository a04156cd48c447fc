use std::time::Duration;

use anyhow::{ensure, Context};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::NewContactRequest,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("contact store rejected the insert with status {status}")]
    Rejected {
        status: u16,
        #[source]
        source: ApiException,
    },
    #[error("contact store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("contact insert timed out after {0:?}")]
    TimedOut(Duration),
    #[error("contact insert abandoned before completion")]
    Abandoned,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Remote store receiving contact requests. One insert per successful
/// submission; no reads.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact_request(&self, request: &NewContactRequest) -> Result<(), InsertError>;
}

/// Inserts rows by POSTing JSON to `{server_url}/contact`.
#[derive(Debug, Clone)]
pub struct RestContactStore {
    http: Client,
    endpoint: Url,
}

impl RestContactStore {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> anyhow::Result<Self> {
        let mut base = Url::parse(server_url.trim())
            .with_context(|| format!("invalid contact server url '{server_url}'"))?;
        ensure!(
            matches!(base.scheme(), "http" | "https"),
            "contact server url must use http or https, got '{}'",
            base.scheme()
        );
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("contact")
            .context("failed to build contact endpoint url")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ContactStore for RestContactStore {
    async fn insert_contact_request(&self, request: &NewContactRequest) -> Result<(), InsertError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            debug!(%status, endpoint = %self.endpoint, "contact insert accepted");
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        let api_error = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            };
            ApiError::new(ErrorCode::Internal, message)
        });
        Err(InsertError::Rejected {
            status: status.as_u16(),
            source: api_error.into(),
        })
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
