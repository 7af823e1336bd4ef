//! Error types for the marketdir state core.
//!
//! This module defines the centralized error type [`MarketdirError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! None of these errors is fatal to the process. Callers degrade to the last known
//! good local state and log the failure.

use thiserror::Error;

/// The main error type for marketdir operations.
///
/// The first group of variants is the failure taxonomy surfaced by the session
/// and settings components; the rest wrap lower-level failures from storage,
/// serialization and configuration.
///
/// # Examples
///
/// ```
/// use marketdir::MarketdirError;
///
/// fn sign_in() -> Result<(), MarketdirError> {
///     Err(MarketdirError::LoginFailed("user cancelled".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum MarketdirError {
    /// Reading a single persisted field failed.
    ///
    /// Non-fatal: the field falls back to its default value.
    #[error("failed to read `{key}` from storage: {message}")]
    PersistenceRead { key: String, message: String },

    /// Writing a single persisted field failed.
    ///
    /// Logged and dropped. Writes are never retried.
    #[error("failed to write `{key}` to storage: {message}")]
    PersistenceWrite { key: String, message: String },

    /// The identity provider's authorization flow failed or returned an
    /// unusable assertion. The previous session state is left unchanged.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// The identity provider's session-clearing flow failed.
    ///
    /// Local session state has already been cleared when this is returned.
    #[error("logout failed: {0}")]
    LogoutFailed(String),

    /// A remote fetch failed. Cached data is retained.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// An identity token could not be decoded into claims.
    #[error("invalid identity token: {0}")]
    InvalidToken(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for marketdir operations.
pub type Result<T> = std::result::Result<T, MarketdirError>;
