//! The cloud-files HTTP service.
//!
//! A directory on disk, three routes, last writer wins. Keys are treated
//! as opaque relative paths under the store root; anything that would
//! escape the root (absolute paths, `..`, NULs) is rejected before it
//! touches the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use log::{debug, info, warn};

pub struct StoreInner {
    root: PathBuf,
}

/// Store state wrapper that is Clone-able for sharing with axum.
#[derive(Clone)]
pub struct StoreState(pub Arc<StoreInner>);

impl StoreState {
    pub fn new(root: PathBuf) -> Self {
        Self(Arc::new(StoreInner { root }))
    }
}

impl std::ops::Deref for StoreState {
    type Target = StoreInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Validate a blob key to prevent directory traversal.
/// Returns the normalized relative key on success.
fn validate_key(key: &str) -> Result<String, String> {
    if key.contains('\0') {
        return Err("key contains invalid characters".to_string());
    }

    let normalized = key.replace('\\', "/");

    if normalized.starts_with('/') {
        return Err("key must be a relative path".to_string());
    }

    for component in normalized.split('/') {
        if component == ".." {
            return Err("key must not contain '..'".to_string());
        }
    }

    let cleaned: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    if cleaned.is_empty() {
        return Err("key must not be empty".to_string());
    }

    Ok(cleaned.join("/"))
}

/// Collect every stored key under `dir`, relative to `root`, skipping
/// in-flight `.tmp` files.
fn collect_keys(root: &Path, dir: &Path, keys: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_keys(root, &path, keys)?;
        } else if path.extension().and_then(|e| e.to_str()) != Some("tmp")
            && let Ok(rel) = path.strip_prefix(root)
        {
            keys.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /files`: every stored key, sorted for stable display.
async fn list_files(State(state): State<StoreState>) -> Json<Vec<String>> {
    let mut keys = Vec::new();
    if state.root.exists()
        && let Err(e) = collect_keys(&state.root, &state.root, &mut keys)
    {
        warn!("Failed to walk store root: {}", e);
    }
    keys.sort();
    debug!("Listing {} keys", keys.len());
    Json(keys)
}

/// `GET /files/{id}`: the raw blob, or 404.
async fn get_file(
    State(state): State<StoreState>,
    UrlPath(key): UrlPath<String>,
) -> Result<String, StatusCode> {
    let key = validate_key(&key).map_err(|_| StatusCode::NOT_FOUND)?;
    match fs::read_to_string(state.root.join(&key)) {
        Ok(body) => Ok(body),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// `POST /files/{id}`: store the body, echo it back.
async fn put_file(
    State(state): State<StoreState>,
    UrlPath(key): UrlPath<String>,
    body: String,
) -> Result<String, StatusCode> {
    let key = validate_key(&key).map_err(|_| StatusCode::NOT_FOUND)?;
    let path = state.root.join(&key);
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create store directory: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // Atomic write: .tmp + rename, so a concurrent GET never sees a torn blob.
    let tmp = path.with_extension("tmp");
    if let Err(e) = fs::write(&tmp, &body).and_then(|_| fs::rename(&tmp, &path)) {
        warn!("Failed to store {}: {}", key, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    debug!("Stored {} ({} bytes)", key, body.len());
    Ok(body)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: StoreState) -> Router {
    Router::new()
        .route("/files", get(list_files))
        .route("/files/{*key}", get(get_file).post(put_file))
        .with_state(state)
}

/// Serve the store on an already-bound listener until the task is dropped.
pub async fn serve(listener: tokio::net::TcpListener, state: StoreState) -> io::Result<()> {
    info!("Cloud files store root: {}", state.root.display());
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_plain_and_nested() {
        assert_eq!(validate_key("a.md").unwrap(), "a.md");
        assert_eq!(validate_key("notes/a.md").unwrap(), "notes/a.md");
        assert_eq!(validate_key("notes//a.md").unwrap(), "notes/a.md");
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("notes/../../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("a\\..\\b").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("a\0b").is_err());
    }

    #[test]
    fn test_collect_keys_skips_tmp_and_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("notes/b.md"), "b").unwrap();
        fs::write(dir.path().join("b.tmp"), "partial").unwrap();

        let mut keys = Vec::new();
        collect_keys(dir.path(), dir.path(), &mut keys).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a.md".to_string(), "notes/b.md".to_string()]);
    }
}
