//! Application layer wiring state owners, storage and remote services.
//!
//! # Startup
//!
//! ```text
//! Config + Collaborators → AppContext::start
//!     ├── PersistWorker (spawned task, owns storage writes)
//!     ├── SessionManager::restore_session ┐
//!     └── SettingsStore::initialize       ┘ run concurrently
//! ```

pub mod context;

pub use context::{AppContext, Collaborators, NOTIFICATIONS_PATH};
