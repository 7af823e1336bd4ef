//! Background persistence worker.
//!
//! Every state mutation publishes its affected key on a queue instead of
//! awaiting storage. The worker applies the queued writes in order on its own
//! task, decoupled from the code path that changed the state.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types
//! - `handler`: Worker implementation and the publishing handle

pub mod handler;
pub mod messages;

pub use handler::{PersistHandle, PersistWorker};
pub use messages::{PersistMessage, PersistResponse};
