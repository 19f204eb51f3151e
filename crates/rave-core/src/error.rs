//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] rave_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] rave_session::SessionError),

    #[error("Capture error: {0}")]
    Capture(#[from] rave_capture::CaptureError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {details}")]
    Backend { status: u16, details: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("An exchange is already in flight")]
    Busy,
}
