//! Attachment data structure

use std::fmt;
use std::path::Path;

use crate::error::CaptureError;
use crate::Result;

pub const AUDIO_WAV: &str = "audio/wav";

/// A single binary payload staged for the next send.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Load one file picked from disk.
    ///
    /// Only `image/*` and `audio/*` are accepted, judged by extension.
    /// There is no size limit.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .ok_or_else(|| CaptureError::UnsupportedType(path.display().to_string()))?;

        if !is_accepted_mime(&mime) {
            return Err(CaptureError::UnsupportedType(mime));
        }

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());

        tracing::debug!(name = %name, mime_type = %mime, size = bytes.len(), "Selected file");

        Ok(Self::new(name, mime, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

// Payloads can be large; keep them out of debug output.
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn is_accepted_mime(mime: &str) -> bool {
    mime.starts_with("image/") || mime.starts_with("audio/")
}
