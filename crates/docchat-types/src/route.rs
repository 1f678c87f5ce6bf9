use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

const CHAT_PREFIX: &str = "/chat/";

/// Unreserved characters stay literal; everything else in a segment is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode `raw` as a single URL path segment.
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Externally visible location of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// No session displayed
    Entry,
    Chat { session_id: String },
}

impl Route {
    pub fn chat(session_id: impl Into<String>) -> Self {
        Route::Chat {
            session_id: session_id.into(),
        }
    }

    /// Parse a URL path. Anything that is not `/chat/{id}` is the entry point.
    /// The id segment is percent-decoded.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let Some(rest) = path.strip_prefix(CHAT_PREFIX) else {
            return Route::Entry;
        };
        let segment = rest.trim_end_matches('/');
        if segment.contains('/') {
            return Route::Entry;
        }
        match percent_decode_str(segment).decode_utf8() {
            Ok(id) if !id.is_empty() && id != "." && id != ".." => Route::chat(id),
            _ => Route::Entry,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Entry => "/".to_string(),
            Route::Chat { session_id } => {
                format!("{}{}", CHAT_PREFIX, encode_segment(session_id))
            }
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Route::Entry => None,
            Route::Chat { session_id } => Some(session_id),
        }
    }
}
