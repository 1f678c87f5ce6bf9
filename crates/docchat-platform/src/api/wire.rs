//! Wire shapes of the session service and their normalization.
//!
//! The service is loose about field names, id types and timestamp formats.
//! Everything is folded into one canonical client type here so nothing past
//! the transport boundary sees a partial object.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use docchat_types::{
    Result,
    document::UploadReceipt,
    message::{Message, Role},
    session::{Session, DEFAULT_SESSION_TITLE},
};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ─── Request bodies ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionBody<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub question: &'a str,
}

// ─── Response bodies ─────────────────────────────────────────

/// Numeric or string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireSession {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "attachedDocument", alias = "attached_document")]
    pub file_name: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl WireSession {
    pub fn into_session(self) -> Session {
        let id = self.id.into_string();
        let created_at = parse_timestamp(self.created_at.as_deref());
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());
        Session::new(id, title, non_blank(self.file_name), created_at)
    }
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    pub id: WireId,
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl WireMessage {
    pub fn into_message(self) -> Message {
        Message::from_server(
            self.id.into_string(),
            parse_role(&self.role),
            self.content.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct WireChatReply {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct WireUpload {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "attachedDocument", alias = "attached_document")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub chunks: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WireUpload {
    /// `session_id` is the one the upload was addressed to; used when the
    /// response carries no id of its own.
    pub fn into_receipt(self, session_id: &str) -> UploadReceipt {
        let attached_document = non_blank(self.file_name);
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| attached_document.clone())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());
        UploadReceipt {
            session_id: self
                .id
                .map(WireId::into_string)
                .unwrap_or_else(|| session_id.to_string()),
            title,
            attached_document,
            chunks: self.chunks,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireHealth {
    #[serde(default)]
    pub status: String,
}

// ─── Normalization helpers ───────────────────────────────────

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

pub fn decode_sessions(body: &str) -> Result<Vec<Session>> {
    let wire: Vec<WireSession> = decode(body)?;
    Ok(wire.into_iter().map(WireSession::into_session).collect())
}

pub fn decode_messages(body: &str) -> Result<Vec<Message>> {
    let wire: Vec<WireMessage> = decode(body)?;
    Ok(wire.into_iter().map(WireMessage::into_message).collect())
}

pub fn parse_role(raw: &str) -> Role {
    match raw.trim().to_ascii_lowercase().as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        other => {
            log::warn!("Unknown message role {:?}, treating as assistant", other);
            Role::Assistant
        }
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC. Anything else
/// becomes the Unix epoch.
pub fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        log::warn!("Session without created_at, using the epoch");
        return DateTime::UNIX_EPOCH;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }
    log::warn!("Unparseable created_at {:?}, using the epoch", raw);
    DateTime::UNIX_EPOCH
}

/// Human-readable reason from an error response body.
///
/// The service answers errors with `{"detail": ...}`; anything else is
/// passed through trimmed.
pub fn error_detail(body: &str) -> String {
    let body = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    if body.is_empty() {
        "unknown error".to_string()
    } else {
        body.to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
