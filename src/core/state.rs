//! # Application State
//!
//! Core business state for mdpad. This module contains domain data only -
//! no rendering types, no I/O handles. The view projection lives in the
//! `view` module and the effect interpreter in `shell`.
//!
//! ```text
//! App
//! ├── prefs: Preferences       // persisted UI state (theme, layout)
//! ├── note: Note               // the document being edited
//! └── cloud_files: Vec<String> // filenames known to exist remotely
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The document currently open for editing.
///
/// A `Note` is plain data; every edit replaces it with a new value.
/// `last_modified` doubles as the save-path signal: `Some` means the note
/// is bound to a local file (save = overwrite in place), `None` means it
/// is unbound (new or cloud-sourced; save = save-as).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Note {
    pub name: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub text: String,
}

impl Note {
    pub fn new(name: String, last_modified: Option<DateTime<Utc>>, text: String) -> Self {
        Self {
            name,
            last_modified,
            text,
        }
    }
}

/// Color theme for the whole editor surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTheme {
    #[default]
    White,
    Dark,
}

/// Layout mode: which panes are on screen.
///
/// `Read` is reachable only through the editor/preview toggle, never from
/// the menu (see `update`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Write,
    Focus,
    Read,
}

/// The persisted subset of UI state. Exactly this pair survives a session;
/// the note and the cloud listing never do.
///
/// The wire schema is stable: `{"colorTheme":"White","layoutMode":"Write"}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub color_theme: ColorTheme,
    #[serde(default)]
    pub layout_mode: LayoutMode,
}

pub struct App {
    pub prefs: Preferences,
    pub note: Note,
    /// Cache of the last successful remote listing, replaced wholesale.
    pub cloud_files: Vec<String>,
}

impl App {
    /// Fresh state with the given preferences (usually whatever decoded
    /// from disk, or the defaults).
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs,
            note: Note::default(),
            cloud_files: Vec::new(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = App::default();
        assert_eq!(app.prefs, Preferences::default());
        assert_eq!(app.note, Note::default());
        assert!(app.cloud_files.is_empty());
    }

    #[test]
    fn test_default_note_is_unbound_and_empty() {
        let note = Note::default();
        assert!(note.name.is_empty());
        assert!(note.text.is_empty());
        assert!(note.last_modified.is_none());
    }

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.color_theme, ColorTheme::White);
        assert_eq!(prefs.layout_mode, LayoutMode::Write);
    }
}
