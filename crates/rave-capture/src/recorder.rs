//! Voice recorder state machine
//!
//! ```text
//! Idle --start--> Recording --stop--> Idle
//! ```
//!
//! Samples pushed while recording are encoded as 16-bit mono WAV on stop.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::attachment::{Attachment, AUDIO_WAV};
use crate::error::CaptureError;
use crate::Result;

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    Idle,
    Recording,
}

impl RecorderState {
    pub fn can_transition_to(&self, target: RecorderState) -> bool {
        matches!(
            (self, target),
            (RecorderState::Idle, RecorderState::Recording)
                | (RecorderState::Recording, RecorderState::Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
        }
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub struct VoiceRecorder {
    state: RecorderState,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl VoiceRecorder {
    pub fn new() -> Self {
        Self::with_sample_rate(DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            state: RecorderState::Idle,
            sample_rate,
            samples: Vec::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn transition(&mut self, target: RecorderState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(CaptureError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.transition(RecorderState::Recording)?;
        self.samples.clear();
        Ok(())
    }

    /// Append captured PCM samples. Returns false when not recording.
    pub fn push_samples(&mut self, samples: &[f32]) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.samples.extend_from_slice(samples);
        true
    }

    /// Stop recording and materialize the captured audio as a WAV attachment.
    pub fn stop(&mut self) -> Result<Attachment> {
        self.transition(RecorderState::Idle)?;
        let samples = std::mem::take(&mut self.samples);
        let bytes = encode_wav(&samples, self.sample_rate)?;
        let name = format!("voice-message-{}.wav", Utc::now().timestamp_millis());

        tracing::debug!(
            name = %name,
            samples = samples.len(),
            size = bytes.len(),
            "Voice recording stopped"
        );

        Ok(Attachment::new(name, AUDIO_WAV, bytes))
    }
}

impl Default for VoiceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            let clamped = s.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32).round() as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
