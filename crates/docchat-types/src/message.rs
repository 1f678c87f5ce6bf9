use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Identity of a message: server-issued, or a local correlation token
/// that lives only until the server echo replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MessageId {
    Server(String),
    Local(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Acknowledged by the server
    Confirmed,
    /// Shown optimistically, reply outstanding
    Pending,
    /// The send failed; the message stays in place and can be retried
    Failed,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Opaque to the client; may contain markdown
    pub content: String,
    pub status: DeliveryStatus,
}

impl Message {
    pub fn from_server(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::Server(id.into()),
            role,
            content: content.into(),
            status: DeliveryStatus::Confirmed,
        }
    }

    /// A user message displayed before the server has seen it.
    pub fn pending(correlation: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::Local(correlation),
            role: Role::User,
            content: content.into(),
            status: DeliveryStatus::Pending,
        }
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        match self.id {
            MessageId::Local(id) => Some(id),
            MessageId::Server(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeliveryStatus::Pending
    }

    pub fn is_failed(&self) -> bool {
        self.status == DeliveryStatus::Failed
    }
}
