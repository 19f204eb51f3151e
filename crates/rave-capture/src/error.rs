//! Capture error types

use thiserror::Error;

use crate::recorder::RecorderState;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported attachment type: {0}")]
    UnsupportedType(String),

    #[error("Invalid recorder transition: {from} -> {to}")]
    InvalidTransition {
        from: RecorderState,
        to: RecorderState,
    },

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
}
