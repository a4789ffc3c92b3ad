//! mdpad: a markdown note editor core and its cloud-files store.
//!
//! The editable surface itself belongs to whatever host renders it; this
//! crate owns the state machine (`core`), the device seam (`bridge`), the
//! remote store (`store`, both client and server), the pure view
//! projection (`view`), and the async effect interpreter (`shell`).

pub mod bridge;
pub mod core;
pub mod shell;
pub mod store;
pub mod view;

#[cfg(test)]
pub mod test_support;
