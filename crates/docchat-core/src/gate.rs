//! Upload gate. Decides whether a session still needs its document and
//! mediates the upload itself.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use docchat_types::{
    ClientError, Result,
    document::{DocumentKind, UploadFile, UploadReceipt},
    event::ClientEvent,
    session::Session,
};

use crate::directory::SessionDirectory;
use crate::event_bus::EventBus;
use crate::ports::SessionApiPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingUpload,
    Ready,
}

/// Pure: no network access.
pub fn decide_gate_state(session: &Session) -> GateState {
    if session.has_document() {
        GateState::Ready
    } else {
        GateState::AwaitingUpload
    }
}

pub struct UploadGate {
    api: Rc<dyn SessionApiPort>,
    directory: Rc<SessionDirectory>,
    event_bus: EventBus,
    accepted: Vec<DocumentKind>,
    in_flight: RefCell<HashSet<String>>,
}

/// Clears the in-progress flag however the upload ends.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<String>>,
    session_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.session_id);
    }
}

impl UploadGate {
    pub fn new(
        api: Rc<dyn SessionApiPort>,
        directory: Rc<SessionDirectory>,
        event_bus: EventBus,
        accepted: Vec<DocumentKind>,
    ) -> Self {
        Self {
            api,
            directory,
            event_bus,
            accepted,
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    pub fn in_progress(&self, session_id: &str) -> bool {
        self.in_flight.borrow().contains(session_id)
    }

    pub fn accepted(&self) -> &[DocumentKind] {
        &self.accepted
    }

    /// Check a file against the accepted set without touching the network.
    pub fn validate(&self, file: &UploadFile) -> Result<DocumentKind> {
        let kind = file
            .declared_kind()
            .filter(|kind| self.accepted.contains(kind))
            .ok_or_else(|| {
                let labels: Vec<&str> = self.accepted.iter().map(|k| k.label()).collect();
                ClientError::Validation(format!(
                    "{} is not a supported document (accepted: {})",
                    file.file_name,
                    labels.join(", ")
                ))
            })?;
        if file.is_empty() {
            return Err(ClientError::Validation(format!("{} is empty", file.file_name)));
        }
        Ok(kind)
    }

    /// Upload `file` to `session_id`, then refresh the directory so the
    /// attached document and new title become visible.
    ///
    /// Single-flight per session: a second call while one is running fails
    /// with `Busy` and sends nothing.
    pub async fn upload(&self, session_id: &str, file: UploadFile) -> Result<UploadReceipt> {
        let kind = self.validate(&file)?;
        let _flight = self.begin(session_id)?;

        log::info!(
            "Uploading {} ({}, {} bytes) to session {}",
            file.file_name,
            kind.label(),
            file.len(),
            session_id
        );
        self.event_bus.emit(ClientEvent::UploadStarted {
            session_id: session_id.to_string(),
            file_name: file.file_name.clone(),
        });

        let receipt = match self.api.upload_document(session_id, &file).await {
            Ok(receipt) => receipt,
            Err(e) => {
                log::warn!("Upload to {} failed: {}", session_id, e);
                self.finish(session_id, false);
                return Err(e);
            }
        };
        if let Some(chunks) = receipt.chunks {
            log::info!("Session {} indexed {} chunks", session_id, chunks);
        }

        let refreshed = self.directory.list().await;
        self.finish(session_id, true);
        if let Err(e) = refreshed {
            log::warn!(
                "Document attached to {} but the directory refresh failed: {}",
                session_id,
                e
            );
            return Err(e);
        }
        Ok(receipt)
    }

    fn begin(&self, session_id: &str) -> Result<InFlight<'_>> {
        let mut set = self.in_flight.borrow_mut();
        if !set.insert(session_id.to_string()) {
            return Err(ClientError::Busy(format!(
                "an upload to session {} is already in progress",
                session_id
            )));
        }
        Ok(InFlight {
            set: &self.in_flight,
            session_id: session_id.to_string(),
        })
    }

    fn finish(&self, session_id: &str, success: bool) {
        self.event_bus.emit(ClientEvent::UploadFinished {
            session_id: session_id.to_string(),
            success,
        });
    }
}
