//! WASM-target tests for docchat-core.
//!
//! Runs EventBus, SessionDirectory, Conversation, UploadGate and
//! SelectionController tests under wasm32-unknown-unknown via
//! `wasm-pack test --node`.

use wasm_bindgen_test::*;

use docchat_core::conversation::{Completion, ConversationState};
use docchat_core::directory::Acquired;
use docchat_core::event_bus::EventBus;
use docchat_core::gate::GateState;
use docchat_core::ports::*;
use docchat_core::selection::{Redirect, SelectionController};
use docchat_types::config::ClientConfig;
use docchat_types::document::*;
use docchat_types::event::ClientEvent;
use docchat_types::message::*;
use docchat_types::route::Route;
use docchat_types::session::Session;
use docchat_types::{ClientError, Result};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// ─── Mock API ────────────────────────────────────────────

struct MockApi {
    sessions: RefCell<Vec<Session>>,
    messages: RefCell<HashMap<String, Vec<Message>>>,
    next_id: Cell<u32>,
    fail_chat: Cell<bool>,
}

impl MockApi {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            sessions: RefCell::new(Vec::new()),
            messages: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            fail_chat: Cell::new(false),
        })
    }

    fn seed(&self, id: &str, created: i64, document: Option<&str>) {
        self.sessions.borrow_mut().push(Session::new(
            id,
            document.unwrap_or("New Chat"),
            document.map(String::from),
            Utc.timestamp_opt(created, 0).unwrap(),
        ));
    }

    fn fresh_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }
}

#[async_trait(?Send)]
impl SessionApiPort for MockApi {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.sessions.borrow().clone())
    }

    async fn create_session(&self, title: &str) -> Result<Session> {
        let session = Session::new(
            format!("s{}", self.fresh_id()),
            title,
            None,
            Utc.timestamp_opt(1_000, 0).unwrap(),
        );
        self.sessions.borrow_mut().insert(0, session.clone());
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.sessions.borrow_mut().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        Ok(self.messages.borrow().get(session_id).cloned().unwrap_or_default())
    }

    async fn send_chat(&self, session_id: &str, question: &str) -> Result<ChatReply> {
        if self.fail_chat.get() {
            return Err(ClientError::Transport("connection reset".to_string()));
        }
        let answer = format!("echo: {}", question);
        let user = Message::from_server(self.fresh_id(), Role::User, question);
        let bot = Message::from_server(self.fresh_id(), Role::Assistant, answer.clone());
        let mut all = self.messages.borrow_mut();
        let history = all.entry(session_id.to_string()).or_default();
        history.push(user);
        history.push(bot);
        Ok(ChatReply { answer })
    }

    async fn upload_document(&self, session_id: &str, file: &UploadFile) -> Result<UploadReceipt> {
        for s in self.sessions.borrow_mut().iter_mut().filter(|s| s.id == session_id) {
            s.title = file.file_name.clone();
            s.attached_document = Some(file.file_name.clone());
        }
        Ok(UploadReceipt {
            session_id: session_id.to_string(),
            title: file.file_name.clone(),
            attached_document: Some(file.file_name.clone()),
            chunks: None,
        })
    }

    async fn health(&self) -> Result<()> {
        Ok(())
    }

    fn api_base(&self) -> &str {
        "mock://"
    }
}

fn controller(api: &Rc<MockApi>) -> (SelectionController, EventBus) {
    let bus = EventBus::new();
    let ctl = SelectionController::assemble(api.clone(), &ClientConfig::default(), bus.clone());
    (ctl, bus)
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(ClientEvent::SelectionChanged { session_id: None });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

// ─── Directory Tests ─────────────────────────────────────

#[wasm_bindgen_test]
async fn directory_lists_most_recent_first() {
    let api = MockApi::new();
    api.seed("old", 1, None);
    api.seed("new", 9, None);
    let (ctl, _bus) = controller(&api);

    let sessions = ctl.refresh_directory().await.unwrap();
    assert_eq!(sessions[0].id, "new");
    assert_eq!(sessions[1].id, "old");
}

#[wasm_bindgen_test]
async fn start_new_conversation_reuses_empty_session() {
    let api = MockApi::new();
    let (ctl, _bus) = controller(&api);

    let first = ctl.start_new_conversation().await.unwrap();
    assert!(first.was_created());
    let second = ctl.start_new_conversation().await.unwrap();
    assert_eq!(second, Acquired::Reused(first.session_id().to_string()));
    assert_eq!(ctl.directory().sessions().len(), 1);
}

// ─── Conversation Tests ──────────────────────────────────

#[wasm_bindgen_test]
async fn send_reconciles_with_server() {
    let api = MockApi::new();
    api.seed("a", 1, Some("a.pdf"));
    let (ctl, _bus) = controller(&api);
    ctl.open(&Route::chat("a")).await.unwrap();

    assert_eq!(ctl.send("hello").await.unwrap(), Completion::Applied);
    let msgs = ctl.conversation().messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[1].content, "echo: hello");
    assert_eq!(ctl.conversation().state(), ConversationState::Loaded);
}

#[wasm_bindgen_test]
async fn send_failure_then_retry() {
    let api = MockApi::new();
    api.seed("a", 1, Some("a.pdf"));
    let (ctl, _bus) = controller(&api);
    ctl.select("a").await.unwrap();

    api.fail_chat.set(true);
    assert!(ctl.send("hello").await.unwrap_err().is_transport());
    let failed = ctl.conversation().messages()[0].clone();
    assert!(failed.is_failed());

    api.fail_chat.set(false);
    let correlation = failed.correlation_id().unwrap();
    assert_eq!(ctl.retry(correlation).await.unwrap(), Completion::Applied);
    assert!(ctl.conversation().messages().iter().all(|m| !m.is_failed()));
}

#[wasm_bindgen_test]
async fn blank_send_is_rejected() {
    let api = MockApi::new();
    let (ctl, _bus) = controller(&api);
    ctl.select("a").await.unwrap();
    assert!(ctl.send("   ").await.unwrap_err().is_validation());
    assert!(ctl.conversation().messages().is_empty());
}

// ─── Gate Tests ──────────────────────────────────────────

#[wasm_bindgen_test]
async fn upload_opens_gate() {
    let api = MockApi::new();
    api.seed("a", 1, None);
    let (ctl, bus) = controller(&api);
    ctl.open(&Route::chat("a")).await.unwrap();
    assert_eq!(ctl.gate_state(), Some(GateState::AwaitingUpload));

    let file = UploadFile::new("q3.xlsx", None, vec![0x50, 0x4b]);
    ctl.upload(file).await.unwrap();
    assert_eq!(ctl.gate_state(), Some(GateState::Ready));

    let events = bus.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, ClientEvent::UploadFinished { success: true, .. })));
}

#[wasm_bindgen_test]
async fn upload_rejects_unsupported_file() {
    let api = MockApi::new();
    api.seed("a", 1, None);
    let (ctl, _bus) = controller(&api);
    ctl.select("a").await.unwrap();

    let file = UploadFile::new("slides.pptx", None, vec![1]);
    assert!(ctl.upload(file).await.unwrap_err().is_validation());
}

// ─── Selection Tests ─────────────────────────────────────

#[wasm_bindgen_test]
async fn deleting_active_session_redirects() {
    let api = MockApi::new();
    api.seed("a", 2, Some("a.pdf"));
    api.seed("b", 1, Some("b.pdf"));
    let (ctl, _bus) = controller(&api);
    ctl.open(&Route::chat("a")).await.unwrap();

    assert_eq!(
        ctl.delete_session("a").await.unwrap(),
        Redirect::Selected("b".to_string())
    );
    assert_eq!(
        ctl.delete_session("b").await.unwrap(),
        Redirect::EntryPoint
    );
    assert_eq!(ctl.active(), None);
}

#[wasm_bindgen_test]
async fn open_unknown_session_falls_back_to_entry() {
    let api = MockApi::new();
    api.seed("a", 1, Some("a.pdf"));
    let (ctl, _bus) = controller(&api);

    assert!(ctl.open(&Route::chat("gone")).await.unwrap_err().is_validation());
    assert_eq!(ctl.active(), None);
}
