//! Selection controller and view router.
//!
//! Owns the active selection and is the only component that rebinds the
//! conversation. All cross-component effects (redirect after delete,
//! redirect after create, refresh after upload) go through here or through
//! the documented calls on the components it was constructed with.

use std::cell::RefCell;
use std::rc::Rc;

use docchat_types::{
    ClientError, Result,
    config::ClientConfig,
    document::{UploadFile, UploadReceipt},
    event::ClientEvent,
    route::Route,
    session::Session,
};
use uuid::Uuid;

use crate::conversation::{Completion, Conversation};
use crate::directory::{Acquired, SessionDirectory};
use crate::event_bus::EventBus;
use crate::gate::{decide_gate_state, GateState, UploadGate};
use crate::ports::SessionApiPort;

/// What happened to the active selection after a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// The deleted session was not the active one
    Unchanged,
    Selected(String),
    /// Nothing left to show
    EntryPoint,
}

pub struct SelectionController {
    directory: Rc<SessionDirectory>,
    conversation: Rc<Conversation>,
    gate: Rc<UploadGate>,
    event_bus: EventBus,
    default_title: String,
    active: RefCell<Option<String>>,
}

impl SelectionController {
    pub fn new(
        directory: Rc<SessionDirectory>,
        conversation: Rc<Conversation>,
        gate: Rc<UploadGate>,
        event_bus: EventBus,
        default_title: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            conversation,
            gate,
            event_bus,
            default_title: default_title.into(),
            active: RefCell::new(None),
        }
    }

    /// Build the whole component graph around one transport.
    pub fn assemble(api: Rc<dyn SessionApiPort>, config: &ClientConfig, event_bus: EventBus) -> Self {
        let directory = Rc::new(SessionDirectory::new(api.clone(), event_bus.clone()));
        let conversation = Rc::new(Conversation::new(api.clone(), event_bus.clone()));
        let gate = Rc::new(UploadGate::new(
            api,
            directory.clone(),
            event_bus.clone(),
            config.accepted_documents.clone(),
        ));
        Self::new(
            directory,
            conversation,
            gate,
            event_bus,
            config.default_session_title.clone(),
        )
    }

    pub fn active(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    pub fn active_session(&self) -> Option<Session> {
        self.active().and_then(|id| self.directory.get(&id))
    }

    /// Gate of the active session; `None` until the directory knows it.
    pub fn gate_state(&self) -> Option<GateState> {
        self.active_session().map(|s| decide_gate_state(&s))
    }

    pub fn upload_in_progress(&self) -> bool {
        self.active()
            .map(|id| self.gate.in_progress(&id))
            .unwrap_or(false)
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Make `session_id` the active selection and load its messages.
    ///
    /// Selecting the session that is already active only reloads it, so a
    /// reply still in flight for it is reconciled rather than dropped.
    pub async fn select(&self, session_id: &str) -> Result<Completion> {
        let reselected = self.active().as_deref() == Some(session_id)
            && self.conversation.bound_session().as_deref() == Some(session_id);
        if reselected {
            log::debug!("Session {} already selected, reloading", session_id);
            return self.conversation.load_messages().await;
        }

        *self.active.borrow_mut() = Some(session_id.to_string());
        self.conversation.bind(Some(session_id.to_string()));
        self.event_bus.emit(ClientEvent::SelectionChanged {
            session_id: Some(session_id.to_string()),
        });
        log::debug!("Selected session {}", session_id);
        self.conversation.load_messages().await
    }

    pub async fn navigate(&self, route: &Route) -> Result<Completion> {
        match route {
            Route::Entry => {
                self.clear_selection();
                Ok(Completion::Applied)
            }
            Route::Chat { session_id } => self.select(session_id).await,
        }
    }

    /// Initial load: refresh the directory and honour the route concurrently.
    ///
    /// A route naming a session the fresh directory does not contain (a stale
    /// bookmark, say) falls back to the entry point.
    pub async fn open(&self, route: &Route) -> Result<Completion> {
        let (listed, navigated) = futures::join!(self.directory.list(), self.navigate(route));

        if let (Ok(_), Route::Chat { session_id }) = (&listed, route) {
            let still_active = self.active().as_deref() == Some(session_id.as_str());
            if still_active && !self.directory.contains(session_id) {
                log::warn!("Session {} from the location does not exist", session_id);
                self.clear_selection();
                self.event_bus.emit(ClientEvent::Navigate { route: Route::Entry });
                return Err(ClientError::Validation(format!(
                    "session {} does not exist",
                    session_id
                )));
            }
        }

        let completion = navigated?;
        listed?;
        Ok(completion)
    }

    pub async fn refresh_directory(&self) -> Result<Vec<Session>> {
        self.directory.list().await
    }

    /// Reuse an empty session or create one, then redirect to it.
    pub async fn start_new_conversation(&self) -> Result<Acquired> {
        let acquired = self.directory.reuse_or_create(&self.default_title).await?;
        let session_id = acquired.session_id().to_string();
        log::debug!(
            "Starting conversation in {} session {}",
            if acquired.was_created() { "new" } else { "empty" },
            session_id
        );
        self.event_bus.emit(ClientEvent::Navigate {
            route: Route::chat(&session_id),
        });
        self.select(&session_id).await?;
        Ok(acquired)
    }

    /// Delete a session; redirect only once the server has confirmed.
    pub async fn delete_session(&self, session_id: &str) -> Result<Redirect> {
        self.directory.delete(session_id).await?;
        self.on_session_deleted(session_id).await
    }

    pub async fn on_session_deleted(&self, deleted_id: &str) -> Result<Redirect> {
        if self.active.borrow().as_deref() != Some(deleted_id) {
            return Ok(Redirect::Unchanged);
        }

        let next = self
            .directory
            .sessions()
            .into_iter()
            .find(|s| s.id != deleted_id);

        match next {
            Some(next) => {
                log::info!("Active session {} deleted, redirecting to {}", deleted_id, next.id);
                self.event_bus.emit(ClientEvent::Navigate {
                    route: Route::chat(&next.id),
                });
                self.select(&next.id).await?;
                Ok(Redirect::Selected(next.id))
            }
            None => {
                log::info!("Active session {} deleted, returning to entry", deleted_id);
                self.clear_selection();
                self.event_bus.emit(ClientEvent::Navigate { route: Route::Entry });
                Ok(Redirect::EntryPoint)
            }
        }
    }

    pub async fn send(&self, content: &str) -> Result<Completion> {
        self.conversation.send(content).await
    }

    pub async fn retry(&self, correlation: Uuid) -> Result<Completion> {
        self.conversation.retry(correlation).await
    }

    pub async fn upload(&self, file: UploadFile) -> Result<UploadReceipt> {
        let session_id = self
            .active()
            .ok_or_else(|| ClientError::Validation("no session selected".to_string()))?;
        self.gate.upload(&session_id, file).await
    }

    fn clear_selection(&self) {
        *self.active.borrow_mut() = None;
        self.conversation.bind(None);
        self.event_bus
            .emit(ClientEvent::SelectionChanged { session_id: None });
    }
}
