use docchat_types::route::encode_segment;

mod http;
pub mod wire;

pub use http::HttpSessionApi;

/// URL builder for the session service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn sessions(&self) -> String {
        format!("{}/sessions", self.base)
    }

    pub fn session(&self, session_id: &str) -> String {
        format!("{}/sessions/{}", self.base, encode_segment(session_id))
    }

    pub fn messages(&self, session_id: &str) -> String {
        format!("{}/messages", self.session(session_id))
    }

    pub fn chat(&self, session_id: &str) -> String {
        format!("{}/chat", self.session(session_id))
    }

    pub fn upload(&self, session_id: &str) -> String {
        format!("{}/upload", self.session(session_id))
    }

    pub fn health(&self) -> String {
        format!("{}/health", self.base)
    }
}
