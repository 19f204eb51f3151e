//! Rave Core
//!
//! Client side of the chat exchange: the composer owns all conversation
//! state, the transport talks to the proxy, and rendering is a pure
//! projection over the composer's state.

mod composer;
mod config;
mod error;
mod message;
mod render;
mod transport;

pub use composer::{Composer, ComposerState, RejectReason, SendOutcome, CONNECTION_ERROR_TEXT};
pub use config::ClientConfig;
pub use error::CoreError;
pub use message::{Message, Role, WELCOME_ID};
pub use render::{render, ChatView, ViewEntry};
pub use transport::{extract_reply, ChatRequest, ChatTransport, HttpTransport};

// Re-export the pieces callers need to build a composer
pub use rave_capture::{Attachment, CaptureError, RecorderState};
pub use rave_session::{SessionError, SessionIdStore};
pub use rave_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
