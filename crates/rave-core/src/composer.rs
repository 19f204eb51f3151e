//! Message Composer
//!
//! Owns the ordered message sequence and the pending input. All mutation
//! goes through the operations here; at most one exchange is in flight.

use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use rave_capture::{Attachment, RecorderState, VoiceRecorder};
use rave_session::SessionIdStore;
use rave_storage::{Database, KeyValueStore, MemoryStore};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::message::Message;
use crate::render::{render, ChatView};
use crate::transport::{extract_reply, ChatRequest, ChatTransport, HttpTransport};
use crate::Result;

pub const CONNECTION_ERROR_TEXT: &str = "Sorry, I encountered an error connecting to the server.";

#[derive(Debug)]
pub struct ComposerState {
    pub messages: Vec<Message>,
    pub draft: String,
    pub pending: Option<Attachment>,
    pub busy: bool,
    pub recorder: VoiceRecorder,
}

impl ComposerState {
    fn new(greeting: Option<&str>) -> Self {
        Self {
            messages: greeting.map(Message::welcome).into_iter().collect(),
            draft: String::new(),
            pending: None,
            busy: false,
            recorder: VoiceRecorder::new(),
        }
    }

    /// True when a send would be accepted right now
    pub fn can_send(&self) -> bool {
        !self.busy && (!self.draft.trim().is_empty() || self.pending.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Trimmed draft is empty and nothing is attached
    Empty,
    /// Another exchange is still in flight
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(RejectReason),
    /// The assistant's reply was appended
    Replied(Message),
    /// The exchange failed and the fixed error message was appended
    Failed(Message),
}

struct BusyGuard {
    state: Arc<RwLock<ComposerState>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.write().busy = false;
    }
}

pub struct Composer {
    state: Arc<RwLock<ComposerState>>,
    transport: Arc<dyn ChatTransport>,
    sessions: SessionIdStore,
}

impl Composer {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn ChatTransport>,
        sessions: SessionIdStore,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ComposerState::new(config.greeting.as_deref()))),
            transport,
            sessions,
        }
    }

    /// Wire up the HTTP transport and the configured session slot.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.session_db {
            Some(path) => Arc::new(Database::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let transport = HttpTransport::new(config)?;

        tracing::info!(endpoint = %transport.endpoint(), "Chat composer ready");

        Ok(Self::new(
            config,
            Arc::new(transport),
            SessionIdStore::new(store),
        ))
    }

    pub fn update_draft(&self, text: impl Into<String>) {
        self.state.write().draft = text.into();
    }

    /// Stage an attachment, replacing any pending one.
    pub fn attach(&self, attachment: Attachment) {
        let mut state = self.state.write();
        if let Some(previous) = state.pending.replace(attachment) {
            tracing::debug!(
                replaced = %previous.name,
                replaced_size = previous.size(),
                "Pending attachment overwritten"
            );
        }
    }

    pub fn attach_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let attachment = Attachment::from_path(path)?;
        self.attach(attachment);
        Ok(())
    }

    pub fn clear_attachment(&self) {
        self.state.write().pending = None;
    }

    pub fn start_recording(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.busy {
            return Err(CoreError::Busy);
        }
        state.recorder.start()?;
        tracing::debug!(sample_rate = state.recorder.sample_rate(), "Recording voice message");
        Ok(())
    }

    pub fn push_audio(&self, samples: &[f32]) -> bool {
        self.state.write().recorder.push_samples(samples)
    }

    /// Stop recording and stage the WAV, replacing any selected file.
    pub fn stop_recording(&self) -> Result<()> {
        let attachment = self.state.write().recorder.stop()?;
        self.attach(attachment);
        Ok(())
    }

    pub async fn send(&self) -> Result<SendOutcome> {
        let request = {
            let mut state = self.state.write();
            if state.busy {
                return Ok(SendOutcome::Rejected(RejectReason::Busy));
            }

            let text = state.draft.trim().to_string();
            if text.is_empty() && state.pending.is_none() {
                return Ok(SendOutcome::Rejected(RejectReason::Empty));
            }

            let session_id = self.sessions.get_or_create_session_id()?;

            let attachment = state.pending.take();
            let content = match &attachment {
                Some(a) if text.is_empty() => format!("[Attachment: {}]", a.name),
                Some(a) => format!("[Attachment: {}] {}", a.name, text),
                None => text.clone(),
            };

            state.messages.push(Message::user(content));
            state.draft.clear();
            state.busy = true;

            ChatRequest {
                message: text,
                session_id,
                attachment,
            }
        };

        tracing::debug!(
            session_id = %request.session_id,
            has_attachment = request.attachment.is_some(),
            "Sending chat message"
        );

        // Clears busy even if this future is dropped mid-exchange
        let _busy = BusyGuard {
            state: Arc::clone(&self.state),
        };
        let result = self.transport.send(request).await;

        let mut state = self.state.write();
        let outcome = match result {
            Ok(reply) => {
                let message = Message::assistant(extract_reply(&reply));
                state.messages.push(message.clone());
                SendOutcome::Replied(message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error sending message");
                let message = Message::assistant(CONNECTION_ERROR_TEXT);
                state.messages.push(message.clone());
                SendOutcome::Failed(message)
            }
        };
        drop(state);

        Ok(outcome)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.read().messages.clone()
    }

    pub fn draft(&self) -> String {
        self.state.read().draft.clone()
    }

    pub fn pending_attachment(&self) -> Option<Attachment> {
        self.state.read().pending.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.read().busy
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.state.read().recorder.state()
    }

    pub fn session_id(&self) -> Result<String> {
        Ok(self.sessions.get_or_create_session_id()?)
    }

    pub fn view(&self) -> ChatView {
        render(&self.state.read())
    }
}

impl Clone for Composer {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            transport: Arc::clone(&self.transport),
            sessions: self.sessions.clone(),
        }
    }
}
