//! # Local Bridge
//!
//! The editor's seam to its host device: file dialogs, writing the note
//! back to disk, pushing live text/title to the host chrome, and persisting
//! the preference record. The core never calls a bridge directly; it emits
//! `Effect`s and the shell routes them through a `LocalBridge`
//! implementation.
//!
//! The message contract is fixed:
//!
//! - Outbound: `create-new-file()`, `open-file()`, `overwrite-file(text)`,
//!   `save-file-as(text)`, `propagate-text(text)`, `propagate-title(text)`,
//!   `persist-preferences(json)`.
//! - Inbound: `file-loaded(json)`, `file-written(bool)`, `file-built(json)`,
//!   where each json payload is `{"name", "lastModified", "text"}`.
//!
//! Inbound payloads stay raw strings until they hit `update()`, which
//! decodes them and collapses failures to an empty note. GUI hosts bring
//! their own implementation; [`fs::FsBridge`] is the headless one.

pub mod fs;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::state::Note;

/// The json payload carried by `file-loaded` and `file-built`.
///
/// `lastModified` is epoch milliseconds or null/absent; hosts that speak
/// JS `Date.now()` produce exactly this shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub name: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_modified: Option<DateTime<Utc>>,
    pub text: String,
}

impl FilePayload {
    pub fn into_note(self) -> Note {
        Note::new(self.name, self.last_modified, self.text)
    }
}

/// Decode a bridge payload. Callers collapse the error to a default
/// immediately; nothing downstream ever sees an unchecked dynamic value.
pub fn decode_payload(raw: &str) -> Result<FilePayload, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Errors a bridge implementation can report. The shell logs these and
/// moves on; no bridge failure reaches the state machine as an error.
#[derive(Debug)]
pub enum BridgeError {
    /// Device I/O failed (unreadable dir, full disk).
    Io(String),
    /// The request cannot be served (no bound file, no notes available).
    Unavailable(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Io(msg) => write!(f, "bridge I/O error: {msg}"),
            BridgeError::Unavailable(msg) => write!(f, "bridge unavailable: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Device-side collaborator. One method per outbound request; the return
/// value is the matching inbound message (raw payload json for file
/// operations, the written flag for writes).
#[async_trait]
pub trait LocalBridge: Send + Sync {
    /// Returns the name of the bridge (for logs).
    fn name(&self) -> &str;

    /// `create-new-file()` → `file-built(json)`.
    async fn build_new_file(&self) -> Result<String, BridgeError>;

    /// `open-file()` → `file-loaded(json)`.
    async fn open_file(&self) -> Result<String, BridgeError>;

    /// `overwrite-file(text)` → `file-written(bool)`. Writes to the last
    /// file this bridge opened or built.
    async fn overwrite_file(&self, text: &str) -> Result<bool, BridgeError>;

    /// `save-file-as(text)` → `file-written(bool)`.
    async fn save_file_as(&self, text: &str) -> Result<bool, BridgeError>;

    /// `propagate-text(text)`: live editor text for host consumers.
    async fn propagate_text(&self, text: &str);

    /// `propagate-title(text)`: document title for the host chrome.
    async fn propagate_title(&self, title: &str);

    /// `persist-preferences(json)`: store the preference record.
    async fn persist_preferences(&self, json: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_full_payload() {
        let raw = r##"{"name":"plan.md","lastModified":1700000000000,"text":"# Plan"}"##;
        let payload = decode_payload(raw).unwrap();
        assert_eq!(payload.name, "plan.md");
        assert_eq!(
            payload.last_modified,
            Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
        );
        assert_eq!(payload.text, "# Plan");
    }

    #[test]
    fn test_decode_null_and_missing_last_modified() {
        let with_null = r#"{"name":"a.md","lastModified":null,"text":""}"#;
        assert_eq!(decode_payload(with_null).unwrap().last_modified, None);

        let absent = r#"{"name":"a.md","text":""}"#;
        assert_eq!(decode_payload(absent).unwrap().last_modified, None);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        for raw in ["", "null", "[]", r#"{"name":"a.md"}"#, r#"{"text":"x"}"#] {
            assert!(decode_payload(raw).is_err(), "input: {raw:?}");
        }
    }

    #[test]
    fn test_payload_round_trip() {
        let payload = FilePayload {
            name: "notes/a.md".to_string(),
            last_modified: Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
            text: "body".to_string(),
        };
        let raw = serde_json::to_string(&payload).unwrap();
        assert_eq!(decode_payload(&raw).unwrap(), payload);
    }

    #[test]
    fn test_into_note() {
        let payload = FilePayload {
            name: "a.md".to_string(),
            last_modified: None,
            text: "body".to_string(),
        };
        let note = payload.into_note();
        assert_eq!(note.name, "a.md");
        assert_eq!(note.text, "body");
        assert!(note.last_modified.is_none());
    }
}
