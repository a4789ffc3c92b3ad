//! # Note Store
//!
//! The remote key-value blob store for cloud-saved files, both sides of
//! the wire:
//!
//! - [`client`]: what the editor shell talks to (`StoreClient` over reqwest)
//! - [`server`]: the backing HTTP service (axum, directory-backed)
//!
//! The surface is three operations, last writer wins, no versioning and no
//! auth:
//!
//! ```text
//! GET  /files        → 200 json array of filename strings
//! GET  /files/{id}   → 200 raw text body, or 404
//! POST /files/{id}   → stores the raw text body, 200 echoes it
//! ```

pub mod client;
pub mod server;

pub use client::{StoreClient, StoreError};
pub use server::{StoreState, router, serve};
