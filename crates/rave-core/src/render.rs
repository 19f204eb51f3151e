//! Response rendering
//!
//! A pure projection of composer state; holds no state of its own.

use std::fmt;

use crate::composer::ComposerState;
use crate::message::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub id: String,
    pub role: Role,
    pub label: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub entries: Vec<ViewEntry>,
    /// Show the loading placeholder
    pub loading: bool,
    pub can_send: bool,
    pub can_record: bool,
    pub recording: bool,
    /// Name of the staged attachment, if any
    pub pending_attachment: Option<String>,
}

pub fn render(state: &ComposerState) -> ChatView {
    let entries = state
        .messages
        .iter()
        .map(|m| ViewEntry {
            id: m.id.clone(),
            role: m.role,
            label: m.role.label(),
            content: m.content.clone(),
        })
        .collect();

    ChatView {
        entries,
        loading: state.busy,
        can_send: state.can_send(),
        can_record: !state.busy,
        recording: state.recorder.is_recording(),
        pending_attachment: state.pending.as_ref().map(|a| a.name.clone()),
    }
}

impl fmt::Display for ChatView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.label, entry.content)?;
        }
        if self.loading {
            writeln!(f, "{}: …", Role::Assistant.label())?;
        }
        if self.recording {
            writeln!(f, "(recording)")?;
        }
        if let Some(name) = &self.pending_attachment {
            writeln!(f, "(attached: {})", name)?;
        }
        Ok(())
    }
}
