//! Authentication session management.
//!
//! - `manager`: Session lifecycle (restore, login, logout)
//! - `provider`: External identity provider abstraction
//! - `token`: Unverified identity token decoding for display

pub mod manager;
pub mod provider;
pub mod token;

pub use manager::{Session, SessionManager, SessionState};
pub use provider::{AuthorizeRequest, ClearSessionRequest, Credentials, IdentityProvider};
pub use token::decode_id_token;
