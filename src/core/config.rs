//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mdpad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MdpadConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub cloud: CloudConfig,
}

/// The cloud-files server (`mdpad` binary).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen: Option<String>,
    pub root: Option<PathBuf>,
}

/// The headless filesystem bridge.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    pub notes_dir: Option<PathBuf>,
}

/// The remote store as seen from the editor shell.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CloudConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LISTEN: &str = "127.0.0.1:4096";
pub const DEFAULT_CLOUD_BASE_URL: &str = "http://127.0.0.1:4096";

fn default_store_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mdpad")
        .join("files")
}

fn default_notes_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mdpad")
        .join("notes")
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub listen: String,
    pub store_root: PathBuf,
    pub notes_dir: PathBuf,
    pub cloud_base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.mdpad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mdpad").join("config.toml"))
}

/// Load config from `~/.mdpad/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MdpadConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MdpadConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MdpadConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(MdpadConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: MdpadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# mdpad Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# listen = "127.0.0.1:4096"          # cloud-files server bind address
# root = "/home/you/.mdpad/files"    # where stored blobs live

# [editor]
# notes_dir = "/home/you/.mdpad/notes"   # headless bridge notes directory

# [cloud]
# base_url = "http://127.0.0.1:4096" # store the editor shell talks to
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_listen` and `cli_root` are from CLI flags (None = not specified).
pub fn resolve(
    config: &MdpadConfig,
    cli_listen: Option<&str>,
    cli_root: Option<&PathBuf>,
) -> ResolvedConfig {
    // Listen address: CLI → env → config → default
    let listen = cli_listen
        .map(|s| s.to_string())
        .or_else(|| std::env::var("MDPAD_LISTEN").ok())
        .or_else(|| config.server.listen.clone())
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());

    // Store root: CLI → env → config → default
    let store_root = cli_root
        .cloned()
        .or_else(|| std::env::var("MDPAD_STORE_ROOT").ok().map(PathBuf::from))
        .or_else(|| config.server.root.clone())
        .unwrap_or_else(default_store_root);

    // Notes dir: env → config → default
    let notes_dir = std::env::var("MDPAD_NOTES_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.editor.notes_dir.clone())
        .unwrap_or_else(default_notes_dir);

    // Cloud base URL: env → config → default
    let cloud_base_url = std::env::var("MDPAD_CLOUD_URL")
        .ok()
        .or_else(|| config.cloud.base_url.clone())
        .unwrap_or_else(|| DEFAULT_CLOUD_BASE_URL.to_string());

    ResolvedConfig {
        listen,
        store_root,
        notes_dir,
        cloud_base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = MdpadConfig::default();
        assert!(config.server.listen.is_none());
        assert!(config.cloud.base_url.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = MdpadConfig::default();
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.listen, DEFAULT_LISTEN);
        assert_eq!(resolved.cloud_base_url, DEFAULT_CLOUD_BASE_URL);
        assert!(resolved.store_root.ends_with("files"));
        assert!(resolved.notes_dir.ends_with("notes"));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = MdpadConfig {
            server: ServerConfig {
                listen: Some("0.0.0.0:9000".to_string()),
                root: Some(PathBuf::from("/srv/mdpad")),
            },
            cloud: CloudConfig {
                base_url: Some("http://files.local:9000".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.listen, "0.0.0.0:9000");
        assert_eq!(resolved.store_root, PathBuf::from("/srv/mdpad"));
        assert_eq!(resolved.cloud_base_url, "http://files.local:9000");
    }

    #[test]
    fn test_resolve_cli_flags_win() {
        let config = MdpadConfig {
            server: ServerConfig {
                listen: Some("0.0.0.0:9000".to_string()),
                root: Some(PathBuf::from("/srv/mdpad")),
            },
            ..Default::default()
        };
        let cli_root = PathBuf::from("/tmp/blobs");
        let resolved = resolve(&config, Some("127.0.0.1:1234"), Some(&cli_root));
        assert_eq!(resolved.listen, "127.0.0.1:1234");
        assert_eq!(resolved.store_root, cli_root);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[server]
listen = "127.0.0.1:8080"
"#;
        let config: MdpadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.as_deref(), Some("127.0.0.1:8080"));
        assert!(config.server.root.is_none());
        assert!(config.editor.notes_dir.is_none());
        assert!(config.cloud.base_url.is_none());
    }

    #[test]
    fn test_full_toml_round_trip() {
        let toml_str = r#"
[server]
listen = "0.0.0.0:4096"
root = "/var/lib/mdpad/files"

[editor]
notes_dir = "/home/me/notes"

[cloud]
base_url = "http://notes.example:4096"
"#;
        let config: MdpadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.as_deref(), Some("0.0.0.0:4096"));
        assert_eq!(
            config.editor.notes_dir,
            Some(PathBuf::from("/home/me/notes"))
        );
        assert_eq!(
            config.cloud.base_url.as_deref(),
            Some("http://notes.example:4096")
        );
    }
}
