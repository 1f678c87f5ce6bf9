use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// A server-tracked conversation bound to at most one uploaded document.
///
/// Sessions are built from server payloads. The client never attaches a
/// document itself; an upload is observed on the next directory refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    /// `None` while the session is awaiting an upload
    pub attached_document: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        attached_document: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            attached_document,
            created_at,
        }
    }

    pub fn has_document(&self) -> bool {
        self.attached_document.is_some()
    }

    /// Title for display; blank titles fall back to the default.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_SESSION_TITLE
        } else {
            &self.title
        }
    }
}

/// Sort most-recent-first. Stable, so equal timestamps keep server order.
pub fn sort_most_recent_first(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
