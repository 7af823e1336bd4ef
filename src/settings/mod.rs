//! User preferences and the cached notification feed.

pub mod state;
pub mod store;

pub use state::{SettingsState, DEFAULT_REGION};
pub use store::SettingsStore;
