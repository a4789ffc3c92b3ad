//! Headless filesystem bridge.
//!
//! Stands in for a GUI host: new files land in a notes directory as
//! `untitled.md`, `untitled-2.md`, ..., and "open a file" means the most
//! recently modified note (no picker to show). Overwrites go to the last
//! file this bridge touched, which is what `overwrite-file(text)` means.
//!
//! Hosts with real dialogs implement [`LocalBridge`] themselves; this one
//! exists so the whole pipeline runs and tests end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use crate::bridge::{BridgeError, FilePayload, LocalBridge};
use crate::core::prefs;

pub struct FsBridge {
    notes_dir: PathBuf,
    /// Preference record location; `None` means the default
    /// `~/.mdpad/preferences.json`.
    prefs_path: Option<PathBuf>,
    /// The file `overwrite-file` writes to: whatever was last built,
    /// opened, or saved-as.
    last_file: Mutex<Option<PathBuf>>,
}

impl FsBridge {
    pub fn new(notes_dir: PathBuf) -> Self {
        Self {
            notes_dir,
            prefs_path: None,
            last_file: Mutex::new(None),
        }
    }

    /// Relocate the preference record (embedding hosts, tests).
    pub fn with_prefs_path(mut self, path: PathBuf) -> Self {
        self.prefs_path = Some(path);
        self
    }

    fn remember(&self, path: PathBuf) {
        *self.last_file.lock().unwrap() = Some(path);
    }

    /// First unused `untitled.md` / `untitled-N.md` in the notes dir.
    fn fresh_untitled_path(&self) -> PathBuf {
        let first = self.notes_dir.join("untitled.md");
        if !first.exists() {
            return first;
        }
        let mut n = 2;
        loop {
            let candidate = self.notes_dir.join(format!("untitled-{n}.md"));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Most recently modified `.md` file in the notes dir.
    fn most_recent_note(&self) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.notes_dir).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
            .max_by_key(|p| file_mtime(p))
    }

    fn payload_for(&self, path: &Path, text: String) -> Result<String, BridgeError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let payload = FilePayload {
            name,
            last_modified: Some(DateTime::<Utc>::from(file_mtime(path))),
            text,
        };
        serde_json::to_string(&payload).map_err(|e| BridgeError::Io(e.to_string()))
    }
}

fn file_mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[async_trait]
impl LocalBridge for FsBridge {
    fn name(&self) -> &str {
        "fs"
    }

    async fn build_new_file(&self) -> Result<String, BridgeError> {
        fs::create_dir_all(&self.notes_dir).map_err(|e| BridgeError::Io(e.to_string()))?;
        let path = self.fresh_untitled_path();
        fs::write(&path, "").map_err(|e| BridgeError::Io(e.to_string()))?;
        debug!("Built new file {}", path.display());
        let payload = self.payload_for(&path, String::new())?;
        self.remember(path);
        Ok(payload)
    }

    async fn open_file(&self) -> Result<String, BridgeError> {
        let path = self
            .most_recent_note()
            .ok_or_else(|| BridgeError::Unavailable("no notes to open".to_string()))?;
        let text = fs::read_to_string(&path).map_err(|e| BridgeError::Io(e.to_string()))?;
        debug!("Opened {}", path.display());
        let payload = self.payload_for(&path, text)?;
        self.remember(path);
        Ok(payload)
    }

    async fn overwrite_file(&self, text: &str) -> Result<bool, BridgeError> {
        let path = self
            .last_file
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BridgeError::Unavailable("no bound file".to_string()))?;
        fs::write(&path, text).map_err(|e| BridgeError::Io(e.to_string()))?;
        debug!("Overwrote {}", path.display());
        Ok(true)
    }

    async fn save_file_as(&self, text: &str) -> Result<bool, BridgeError> {
        fs::create_dir_all(&self.notes_dir).map_err(|e| BridgeError::Io(e.to_string()))?;
        let path = self.fresh_untitled_path();
        fs::write(&path, text).map_err(|e| BridgeError::Io(e.to_string()))?;
        debug!("Saved as {}", path.display());
        self.remember(path);
        Ok(true)
    }

    async fn propagate_text(&self, text: &str) {
        // No host chrome to update; useful in logs all the same.
        debug!("propagate-text ({} bytes)", text.len());
    }

    async fn propagate_title(&self, title: &str) {
        debug!("propagate-title {:?}", title);
    }

    async fn persist_preferences(&self, json: &str) {
        // Normalize through decode so a malformed record can't be written back.
        let record = prefs::decode(json);
        match &self.prefs_path {
            Some(path) => {
                if let Err(e) = prefs::save_to(path, &record) {
                    log::warn!("Failed to persist preferences: {}", e);
                }
            }
            None => prefs::save(&record),
        }
    }
}
