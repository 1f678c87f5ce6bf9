//! WASM-target tests for docchat-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chrono::{TimeZone, Utc};
use docchat_types::config::*;
use docchat_types::document::*;
use docchat_types::error::*;
use docchat_types::event::*;
use docchat_types::message::*;
use docchat_types::route::*;
use docchat_types::session::*;

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn session_without_document() {
    let s = Session::new("a", "", None, Utc.timestamp_opt(10, 0).unwrap());
    assert!(!s.has_document());
    assert_eq!(s.display_title(), DEFAULT_SESSION_TITLE);
}

#[wasm_bindgen_test]
fn session_sort_most_recent_first() {
    let mut sessions = vec![
        Session::new("old", "Old", None, Utc.timestamp_opt(1, 0).unwrap()),
        Session::new("new", "New", None, Utc.timestamp_opt(5, 0).unwrap()),
    ];
    sort_most_recent_first(&mut sessions);
    assert_eq!(sessions[0].id, "new");
}

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_pending_is_user() {
    let msg = Message::pending(uuid::Uuid::new_v4(), "Hello");
    assert_eq!(msg.role, Role::User);
    assert!(msg.is_pending());
    assert!(msg.correlation_id().is_some());
}

#[wasm_bindgen_test]
fn message_from_server_is_confirmed() {
    let msg = Message::from_server("7", Role::Assistant, "Hi");
    assert_eq!(msg.status, DeliveryStatus::Confirmed);
    assert!(msg.correlation_id().is_none());
}

// ─── Document Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn document_kind_from_extension() {
    assert_eq!(DocumentKind::from_file_name("Report.PDF"), Some(DocumentKind::Pdf));
    assert_eq!(DocumentKind::from_file_name("sheet.xlsx"), Some(DocumentKind::Xlsx));
    assert_eq!(DocumentKind::from_file_name("notes.txt"), None);
}

#[wasm_bindgen_test]
fn upload_file_falls_back_to_media_type() {
    let file = UploadFile::new("blob", Some("text/csv".to_string()), b"a,b".to_vec());
    assert_eq!(file.declared_kind(), Some(DocumentKind::Csv));
    assert_eq!(file.len(), 3);
}

// ─── Route Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn route_parse_chat() {
    assert_eq!(Route::parse("/chat/abc"), Route::chat("abc"));
    assert_eq!(Route::parse("/chat/abc/?x=1"), Route::chat("abc"));
    assert_eq!(Route::parse("/"), Route::Entry);
    assert_eq!(Route::chat("abc").path(), "/chat/abc");
}

// ─── Config & Error Tests ────────────────────────────────

#[wasm_bindgen_test]
fn config_default_is_valid() {
    let config = ClientConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.accepted_documents.contains(&DocumentKind::Docx));
}

#[wasm_bindgen_test]
fn config_rejects_non_http_base() {
    let config = ClientConfig::default().with_api_base("ftp://example.com");
    assert!(config.validate().unwrap_err().is_validation());
}

#[wasm_bindgen_test]
fn error_display() {
    assert_eq!(
        ClientError::http_status(404, "Session not found").to_string(),
        "Transport error: HTTP 404: Session not found"
    );
    assert!(ClientError::timeout(100).is_transport());
}

// ─── Event Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn event_serde_roundtrip() {
    let event = ClientEvent::Navigate { route: Route::chat("a") };
    let json = serde_json::to_string(&event).unwrap();
    let back: ClientEvent = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, ClientEvent::Navigate { route } if route == Route::chat("a")));
}
