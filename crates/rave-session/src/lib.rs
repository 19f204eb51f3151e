//! Rave Session Identifiers
//!
//! - One opaque token per tab, created lazily on first need
//! - Persisted in a key-value slot for the tab's lifetime
//! - Never rotated or expired

mod error;
mod store;
mod token;

pub use error::SessionError;
pub use store::{SessionIdStore, SESSION_KEY};
pub use token::generate_session_id;

pub type Result<T> = std::result::Result<T, SessionError>;
