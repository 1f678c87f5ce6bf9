use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;
use crate::session::DEFAULT_SESSION_TITLE;
use crate::{ClientError, Result};

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the session/chat API, without trailing slash
    pub api_base: String,
    pub request_timeout_ms: u64,
    /// Uploads are parsed and embedded before the server answers
    pub upload_timeout_ms: u64,
    pub default_session_title: String,
    pub accepted_documents: Vec<DocumentKind>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 30_000,
            upload_timeout_ms: 300_000,
            default_session_title: DEFAULT_SESSION_TITLE.to_string(),
            accepted_documents: DocumentKind::all().to_vec(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base.is_empty() {
            return Err(ClientError::Validation("api_base is empty".to_string()));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ClientError::Validation(format!(
                "api_base must be an http(s) URL: {}",
                self.api_base
            )));
        }
        if self.request_timeout_ms == 0 || self.upload_timeout_ms == 0 {
            return Err(ClientError::Validation("timeouts must be non-zero".to_string()));
        }
        if self.accepted_documents.is_empty() {
            return Err(ClientError::Validation(
                "at least one document kind must be accepted".to_string(),
            ));
        }
        Ok(())
    }
}

const DEFAULT_API_BASE: &str = "http://localhost:8000";
