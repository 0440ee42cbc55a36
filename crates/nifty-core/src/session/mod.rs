//! Session memory abstractions.
//!
//! - `SessionStore`: RPITIT trait implemented by the storage backends
//! - `BoxSessionStore`: object-safe wrapper for runtime backend selection
//! - `SessionLocks`: per-session serialization of read-modify-write appends
//! - `id`: random session identifier generation

pub mod box_store;
pub mod id;
pub mod locks;
pub mod store;
