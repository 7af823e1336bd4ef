//! Domain layer for the marketdir state core.
//!
//! This module contains the core domain types, independent of storage backends,
//! identity providers or remote APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`listing`]: Listing records and the [`Filterable`] field-access trait
//! - [`notification`]: Notification feed entries
//! - [`user`]: Identity claims of the signed-in user

pub mod error;
pub mod listing;
pub mod notification;
pub mod user;

pub use error::{MarketdirError, Result};
pub use listing::{
    Business, EventListing, FieldValue, Filterable, Profile, Promotion, Publication, Vacancy,
    Vendor,
};
pub use notification::Notification;
pub use user::UserProfile;
