//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;

use crate::bridge::{BridgeError, LocalBridge};

/// Build a raw bridge payload the way a host would.
pub fn payload_json(name: &str, last_modified: Option<i64>, text: &str) -> String {
    serde_json::json!({
        "name": name,
        "lastModified": last_modified,
        "text": text,
    })
    .to_string()
}

/// A do-nothing bridge for tests that don't exercise device I/O.
pub struct NoopBridge;

#[async_trait]
impl LocalBridge for NoopBridge {
    fn name(&self) -> &str {
        "noop"
    }

    async fn build_new_file(&self) -> Result<String, BridgeError> {
        Ok(payload_json("untitled.md", None, ""))
    }

    async fn open_file(&self) -> Result<String, BridgeError> {
        Err(BridgeError::Unavailable("noop".to_string()))
    }

    async fn overwrite_file(&self, _text: &str) -> Result<bool, BridgeError> {
        Ok(true)
    }

    async fn save_file_as(&self, _text: &str) -> Result<bool, BridgeError> {
        Ok(true)
    }

    async fn propagate_text(&self, _text: &str) {}

    async fn propagate_title(&self, _title: &str) {}

    async fn persist_preferences(&self, _json: &str) {}
}
