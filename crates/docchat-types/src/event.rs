use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::route::Route;
use crate::session::Session;

/// Events emitted by the orchestration layer.
/// The presentation layer drains these to update its projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientEvent {
    /// The directory was replaced or patched
    DirectoryChanged { sessions: Vec<Session> },

    /// The active selection changed (`None` = entry point)
    SelectionChanged { session_id: Option<String> },

    /// The displayed message sequence of the bound session changed
    MessagesChanged {
        session_id: String,
        messages: Vec<Message>,
        sending: bool,
    },

    UploadStarted { session_id: String, file_name: String },

    UploadFinished { session_id: String, success: bool },

    /// The core redirected; the shell should reflect this in the URL
    Navigate { route: Route },

    /// An operation failed
    Error { message: String },
}
