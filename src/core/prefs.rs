//! # Preference Persistence
//!
//! Save/load the `Preferences` record to `~/.mdpad/preferences.json`.
//!
//! The wire schema is the stable pair `{"colorTheme": "...", "layoutMode":
//! "..."}`. Decoding is total: a missing file, an unreadable file, or a
//! malformed record all collapse to `Preferences::default()` - a bad blob
//! must never take the editor down.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. Persisting the same value twice produces identical bytes, so
//! the shell can fire a save after every transition without churn.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::state::Preferences;

/// Returns the path to `~/.mdpad/preferences.json`.
pub fn prefs_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mdpad").join("preferences.json"))
}

/// Decode a persisted record. Anything that fails to parse is the default.
pub fn decode(raw: &str) -> Preferences {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Encode a record for persistence.
pub fn encode(prefs: &Preferences) -> String {
    // Serializing two plain enums cannot fail.
    serde_json::to_string(prefs).unwrap_or_default()
}

/// Load preferences from the given file, falling back to defaults.
pub fn load_from(path: &Path) -> Preferences {
    match fs::read_to_string(path) {
        Ok(raw) => decode(&raw),
        Err(_) => Preferences::default(),
    }
}

/// Load preferences from the default location.
pub fn load() -> Preferences {
    match prefs_path() {
        Some(path) => load_from(&path),
        None => Preferences::default(),
    }
}

/// Atomically write preferences to the given file (via `.tmp` + rename),
/// creating parent directories as needed.
pub fn save_to(path: &Path, prefs: &Preferences) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, encode(prefs))?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Save to the default location, logging rather than propagating failure.
/// This sits behind the unconditional per-transition persist effect, so a
/// full disk must not bubble up as an application error.
pub fn save(prefs: &Preferences) {
    let Some(path) = prefs_path() else {
        warn!("Could not determine home directory, preferences not persisted");
        return;
    };
    if let Err(e) = save_to(&path, prefs) {
        warn!("Failed to persist preferences: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{ColorTheme, LayoutMode};

    #[test]
    fn test_decode_valid_record() {
        let prefs = decode(r#"{"colorTheme":"Dark","layoutMode":"Focus"}"#);
        assert_eq!(prefs.color_theme, ColorTheme::Dark);
        assert_eq!(prefs.layout_mode, LayoutMode::Focus);
    }

    #[test]
    fn test_decode_malformed_yields_defaults() {
        for raw in [
            "",
            "not json",
            "42",
            "[]",
            r#"{"colorTheme":"Sepia","layoutMode":"Focus"}"#,
            r#"{"colorTheme":12}"#,
        ] {
            assert_eq!(decode(raw), Preferences::default(), "input: {raw:?}");
        }
    }

    #[test]
    fn test_decode_missing_fields_fill_defaults() {
        let prefs = decode(r#"{"layoutMode":"Read"}"#);
        assert_eq!(prefs.color_theme, ColorTheme::White);
        assert_eq!(prefs.layout_mode, LayoutMode::Read);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for theme in [ColorTheme::White, ColorTheme::Dark] {
            for layout in [LayoutMode::Write, LayoutMode::Focus, LayoutMode::Read] {
                let prefs = Preferences {
                    color_theme: theme,
                    layout_mode: layout,
                };
                assert_eq!(decode(&encode(&prefs)), prefs);
            }
        }
    }

    #[test]
    fn test_encode_uses_stable_field_names() {
        let encoded = encode(&Preferences::default());
        assert_eq!(encoded, r#"{"colorTheme":"White","layoutMode":"Write"}"#);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences {
            color_theme: ColorTheme::Dark,
            layout_mode: LayoutMode::Read,
        };
        save_to(&path, &prefs).unwrap();
        assert_eq!(load_from(&path), prefs);
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let prefs = Preferences::default();
        save_to(&path, &prefs).unwrap();
        let first = fs::read(&path).unwrap();
        save_to(&path, &prefs).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_from(&dir.path().join("nope.json")),
            Preferences::default()
        );
    }
}
