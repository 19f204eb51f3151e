//! Rave Attachment Capture
//!
//! Two acquisition paths produce the same [`Attachment`]:
//! - a single image or audio file picked from disk
//! - a voice recording, encoded as WAV when the recorder stops

mod attachment;
mod error;
mod recorder;

pub use attachment::{Attachment, AUDIO_WAV};
pub use error::CaptureError;
pub use recorder::{RecorderState, VoiceRecorder, DEFAULT_SAMPLE_RATE};

pub type Result<T> = std::result::Result<T, CaptureError>;
