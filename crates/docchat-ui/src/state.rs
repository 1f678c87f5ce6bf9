//! UI-level state that drives rendering.
//! This is a read-only projection of the client core, updated each frame
//! by draining the EventBus.

use docchat_core::gate::{decide_gate_state, GateState};
use docchat_types::{
    document::UploadFile,
    event::ClientEvent,
    message::Message,
    session::Session,
};
use uuid::Uuid;

/// Something the user asked for; the app turns it into a core call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    NewChat,
    Select(String),
    Delete(String),
    Send(String),
    /// Re-send a failed message by correlation id
    Retry(Uuid),
    Upload(UploadFile),
}

/// State visible to UI panels
pub struct UiState {
    /// Directory, most recent first
    pub sessions: Vec<Session>,
    pub active: Option<String>,
    /// Messages of the active session
    pub messages: Vec<Message>,
    pub sending: bool,
    /// File currently being uploaded to the active session
    pub uploading: Option<String>,
    /// Input field content
    pub input_text: String,
    /// Status line text
    pub status_text: String,
    /// Last error, shown until dismissed
    pub error: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            messages: Vec::new(),
            sending: false,
            uploading: None,
            input_text: String::new(),
            status_text: "Ready".to_string(),
            error: None,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ClientEvent>) {
        for event in events {
            match event {
                ClientEvent::DirectoryChanged { sessions } => {
                    self.sessions = sessions;
                }
                ClientEvent::SelectionChanged { session_id } => {
                    if self.active != session_id {
                        self.messages.clear();
                        self.sending = false;
                        self.uploading = None;
                    }
                    self.active = session_id;
                }
                ClientEvent::MessagesChanged {
                    session_id,
                    messages,
                    sending,
                } => {
                    if self.active.as_deref() == Some(session_id.as_str()) {
                        self.messages = messages;
                        self.sending = sending;
                        self.status_text = if sending {
                            "Thinking...".to_string()
                        } else {
                            "Ready".to_string()
                        };
                    }
                }
                ClientEvent::UploadStarted {
                    session_id,
                    file_name,
                } => {
                    if self.active.as_deref() == Some(session_id.as_str()) {
                        self.status_text = format!("Processing {}...", file_name);
                        self.uploading = Some(file_name);
                    }
                }
                ClientEvent::UploadFinished {
                    session_id,
                    success,
                } => {
                    if self.active.as_deref() == Some(session_id.as_str()) {
                        self.uploading = None;
                        self.status_text = if success {
                            "Ready".to_string()
                        } else {
                            "Upload failed".to_string()
                        };
                    }
                }
                // Routing is handled by the app shell.
                ClientEvent::Navigate { .. } => {}
                ClientEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                    self.error = Some(message);
                }
            }
        }
    }

    pub fn active_session(&self) -> Option<&Session> {
        let active = self.active.as_deref()?;
        self.sessions.iter().find(|s| s.id == active)
    }

    /// `None` while nothing is selected or the directory has not caught up.
    pub fn gate_state(&self) -> Option<GateState> {
        self.active_session().map(decide_gate_state)
    }

    pub fn is_busy(&self) -> bool {
        self.sending || self.uploading.is_some()
    }

    pub fn can_send(&self) -> bool {
        !self.input_text.trim().is_empty()
            && !self.sending
            && self.gate_state() == Some(GateState::Ready)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
