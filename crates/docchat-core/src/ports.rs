//! Port trait: the hexagonal architecture boundary.
//!
//! The trait is defined here in `docchat-core` (pure Rust).
//! The browser implementation lives in `docchat-platform`.
//! Implementations normalize every payload into the canonical types
//! before returning, and report timeouts as `ClientError::Transport`.

use async_trait::async_trait;
use docchat_types::{
    Result,
    document::{UploadFile, UploadReceipt},
    message::Message,
    session::Session,
};

/// The assistant's direct answer to a chat request.
/// Only logged; the history is reloaded instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
}

#[async_trait(?Send)]
pub trait SessionApiPort {
    /// GET /sessions
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// POST /sessions
    async fn create_session(&self, title: &str) -> Result<Session>;

    /// DELETE /sessions/{id}
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// GET /sessions/{id}/messages, in conversation order
    async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>>;

    /// POST /sessions/{id}/chat
    async fn send_chat(&self, session_id: &str, question: &str) -> Result<ChatReply>;

    /// POST /sessions/{id}/upload as multipart
    async fn upload_document(&self, session_id: &str, file: &UploadFile) -> Result<UploadReceipt>;

    /// GET /health
    async fn health(&self) -> Result<()>;

    /// Base URL (for logging/debug)
    fn api_base(&self) -> &str;
}
