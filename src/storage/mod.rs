//! Storage layer for durable key-value state.
//!
//! Session credentials and user settings are persisted one key at a time
//! through the [`KeyValueStore`] abstraction.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-memory storage implementation
//! - `keys`: The fixed set of persisted keys

pub mod backend;
pub mod json;
pub mod keys;
pub mod memory;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use keys::StorageKey;
pub use memory::MemoryStore;
