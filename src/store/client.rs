//! HTTP client for the cloud-files store.
//!
//! Thin reqwest wrapper; every failure collapses into a [`StoreError`]
//! that the reducer treats as "leave the state alone". Nothing here
//! retries: retry is the user re-issuing the menu action.

use std::fmt;

use log::debug;

/// Errors that can occur talking to the store.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug)]
pub enum StoreError {
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// The store returned an error response. Retryable if status >= 500.
    Api { status: u16, message: String },
    /// Failed to parse the store's response. Not retryable.
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "store error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub struct StoreClient {
    base_url: String,
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// `GET /files`: all stored keys.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/files", self.base_url);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// `GET /files/{id}`: the raw blob for `name`.
    pub async fn get(&self, name: &str) -> Result<String, StoreError> {
        let url = format!("{}/files/{}", self.base_url, name);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// `POST /files/{id}`: store `body` at `name`; the response echoes the
    /// stored text.
    pub async fn put(&self, name: &str, body: &str) -> Result<String, StoreError> {
        let url = format!("{}/files/{}", self.base_url, name);
        debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(&url)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Maps non-2xx responses to `StoreError::Api`, keeping the body as the
/// message when it is readable.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}
