//! Session directory: the client's ordered view of known sessions.
//!
//! The directory is replaced wholesale by `list()` and patched only by
//! confirmed creates and deletes. Lists and mutations may overlap, so every
//! confirmed mutation is stamped on a logical clock and replayed over any
//! list result that was requested before it.

use std::cell::RefCell;
use std::rc::Rc;

use docchat_types::{
    Result,
    event::ClientEvent,
    session::{sort_most_recent_first, Session},
};

use crate::event_bus::EventBus;
use crate::ports::SessionApiPort;

/// Outcome of the "start a new conversation" reuse policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    /// An existing session without a document was picked
    Reused(String),
    Created(String),
}

impl Acquired {
    pub fn session_id(&self) -> &str {
        match self {
            Acquired::Reused(id) | Acquired::Created(id) => id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Acquired::Created(_))
    }
}

#[derive(Debug, Clone)]
enum Change {
    Created(Session),
    Deleted(String),
}

impl Change {
    fn replay(&self, sessions: &mut Vec<Session>) {
        match self {
            Change::Created(session) => {
                if !sessions.iter().any(|s| s.id == session.id) {
                    sessions.insert(0, session.clone());
                }
            }
            Change::Deleted(id) => sessions.retain(|s| &s.id != id),
        }
    }
}

#[derive(Default)]
struct DirectoryState {
    sessions: Vec<Session>,
    clock: u64,
    /// Clock value at which the currently applied list was issued
    applied_list: u64,
    lists_in_flight: usize,
    journal: Vec<(u64, Change)>,
}

impl DirectoryState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn commit(&mut self, change: Change) {
        change.replay(&mut self.sessions);
        let seq = self.tick();
        if self.lists_in_flight > 0 {
            self.journal.push((seq, change));
        }
    }
}

pub struct SessionDirectory {
    api: Rc<dyn SessionApiPort>,
    event_bus: EventBus,
    state: RefCell<DirectoryState>,
}

impl SessionDirectory {
    pub fn new(api: Rc<dyn SessionApiPort>, event_bus: EventBus) -> Self {
        Self {
            api,
            event_bus,
            state: RefCell::new(DirectoryState::default()),
        }
    }

    /// Fetch the full set of sessions and replace the directory.
    ///
    /// On failure the directory is left as it was. A result overtaken by a
    /// later-issued list is dropped and the current directory returned.
    pub async fn list(&self) -> Result<Vec<Session>> {
        let ticket = {
            let mut state = self.state.borrow_mut();
            state.lists_in_flight += 1;
            state.tick()
        };

        let fetched = self.api.list_sessions().await;

        let mut changed = false;
        let result = {
            let mut state = self.state.borrow_mut();
            state.lists_in_flight -= 1;

            let result = match fetched {
                Ok(mut sessions) => {
                    if ticket < state.applied_list {
                        log::debug!(
                            "Dropping session list {} (list {} already applied)",
                            ticket,
                            state.applied_list
                        );
                    } else {
                        sort_most_recent_first(&mut sessions);
                        for (_, change) in state.journal.iter().filter(|(seq, _)| *seq > ticket) {
                            change.replay(&mut sessions);
                        }
                        state.sessions = sessions;
                        state.applied_list = ticket;
                        changed = true;
                    }
                    Ok(state.sessions.clone())
                }
                Err(e) => {
                    log::warn!("Listing sessions failed: {}", e);
                    Err(e)
                }
            };

            if state.lists_in_flight == 0 {
                state.journal.clear();
            }
            result
        };

        if changed {
            self.emit_changed();
        }
        result
    }

    /// Create a session (no document attached) and put it at the front.
    pub async fn create(&self, title: &str) -> Result<String> {
        let session = self.api.create_session(title).await?;
        let id = session.id.clone();

        self.state.borrow_mut().commit(Change::Created(session));
        log::info!("Created session {}", id);
        self.emit_changed();
        Ok(id)
    }

    /// Delete a session. The entry is removed only after the server confirms.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.api.delete_session(session_id).await?;

        self.state
            .borrow_mut()
            .commit(Change::Deleted(session_id.to_string()));
        log::info!("Deleted session {}", session_id);
        self.emit_changed();
        Ok(())
    }

    /// Reuse a session still awaiting its upload, or create one.
    ///
    /// Not transactional: two concurrent calls may both pick the same empty
    /// session, which is harmless.
    pub async fn reuse_or_create(&self, title: &str) -> Result<Acquired> {
        let sessions = self.list().await?;
        if let Some(empty) = sessions.iter().find(|s| !s.has_document()) {
            log::info!("Reusing empty session {}", empty.id);
            return Ok(Acquired::Reused(empty.id.clone()));
        }
        let id = self.create(title).await?;
        Ok(Acquired::Created(id))
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state.borrow().sessions.clone()
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.state
            .borrow()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.state.borrow().sessions.iter().any(|s| s.id == session_id)
    }

    fn emit_changed(&self) {
        self.event_bus.emit(ClientEvent::DirectoryChanged {
            sessions: self.sessions(),
        });
    }
}
