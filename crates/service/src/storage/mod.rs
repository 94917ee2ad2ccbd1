//! Storage abstractions for the todo list
//!
//! `SessionStore` is the authoritative in-memory state. `DurableStore`
//! persists it to a single artifact; `FileStore` is the file-backed
//! implementation with raw-text and keyed JSON encodings.

pub mod durable;
pub mod file_store;
pub mod session_store;

pub use durable::DurableStore;
pub use file_store::FileStore;
pub use session_store::{SessionStore, StoreState, DEFAULT_SESSION};
