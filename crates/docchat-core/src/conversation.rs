//! Conversation state machine for the currently bound session.
//!
//! ```text
//!   bind ──► Idle ──load──► Loaded ──send──► Sending ──reply+reload──► Loaded
//!                                              └──────failure──────────► Loaded
//! ```
//!
//! Every `bind` advances a generation counter. Each network completion
//! compares the generation it was issued under with the current one and is
//! dropped on mismatch, so a slow response for session A can never land in
//! session B's display.

use std::cell::RefCell;
use std::rc::Rc;

use docchat_types::{
    ClientError, Result,
    event::ClientEvent,
    message::{DeliveryStatus, Message},
};
use uuid::Uuid;

use crate::event_bus::EventBus;
use crate::ports::SessionApiPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Nothing loaded for this binding yet
    Idle,
    /// Messages reflect the last successful fetch
    Loaded,
    /// An optimistic message is displayed and its reply is pending
    Sending,
}

/// Whether an asynchronous result was applied to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The binding changed, or a newer fetch already won
    Discarded,
}

struct Binding {
    session_id: Option<String>,
    generation: u64,
    messages: Vec<Message>,
    state: ConversationState,
    loads_issued: u64,
    load_applied: u64,
}

pub struct Conversation {
    api: Rc<dyn SessionApiPort>,
    event_bus: EventBus,
    binding: RefCell<Binding>,
}

impl Conversation {
    pub fn new(api: Rc<dyn SessionApiPort>, event_bus: EventBus) -> Self {
        Self {
            api,
            event_bus,
            binding: RefCell::new(Binding {
                session_id: None,
                generation: 0,
                messages: Vec::new(),
                state: ConversationState::Idle,
                loads_issued: 0,
                load_applied: 0,
            }),
        }
    }

    /// Switch to another session (or none), dropping everything local to the
    /// previous binding.
    pub fn bind(&self, session_id: Option<String>) {
        {
            let mut b = self.binding.borrow_mut();
            b.generation += 1;
            log::debug!("Binding conversation to {:?} (generation {})", session_id, b.generation);
            b.session_id = session_id;
            b.messages.clear();
            b.state = ConversationState::Idle;
            b.loads_issued = 0;
            b.load_applied = 0;
        }
        self.emit_messages();
    }

    /// Fetch the full history and replace the local sequence.
    pub async fn load_messages(&self) -> Result<Completion> {
        self.fetch_and_apply(None).await
    }

    /// Send a question with an optimistic user message, then reconcile
    /// against the server's history.
    ///
    /// On failure the optimistic message is kept and marked `Failed`.
    pub async fn send(&self, content: &str) -> Result<Completion> {
        if content.trim().is_empty() {
            return Err(ClientError::Validation("message is empty".to_string()));
        }

        let (session_id, generation, correlation) = {
            let mut b = self.binding.borrow_mut();
            let session_id = b
                .session_id
                .clone()
                .ok_or_else(|| ClientError::Validation("no session selected".to_string()))?;
            if b.state == ConversationState::Sending {
                return Err(ClientError::Busy("a message is already being sent".to_string()));
            }
            let correlation = Uuid::new_v4();
            b.messages.push(Message::pending(correlation, content));
            b.state = ConversationState::Sending;
            (session_id, b.generation, correlation)
        };
        self.emit_messages();

        self.deliver(session_id, generation, correlation, content.to_string())
            .await
    }

    /// Re-send a message whose earlier send failed. The message keeps its
    /// position; only its status changes.
    pub async fn retry(&self, correlation: Uuid) -> Result<Completion> {
        let (session_id, generation, content) = {
            let mut b = self.binding.borrow_mut();
            let session_id = b
                .session_id
                .clone()
                .ok_or_else(|| ClientError::Validation("no session selected".to_string()))?;
            if b.state == ConversationState::Sending {
                return Err(ClientError::Busy("a message is already being sent".to_string()));
            }
            let message = b
                .messages
                .iter_mut()
                .find(|m| m.correlation_id() == Some(correlation) && m.is_failed())
                .ok_or_else(|| {
                    ClientError::Validation(format!("no failed message {}", correlation))
                })?;
            message.status = DeliveryStatus::Pending;
            let content = message.content.clone();
            b.state = ConversationState::Sending;
            (session_id, b.generation, content)
        };
        self.emit_messages();

        self.deliver(session_id, generation, correlation, content).await
    }

    pub fn messages(&self) -> Vec<Message> {
        self.binding.borrow().messages.clone()
    }

    pub fn state(&self) -> ConversationState {
        self.binding.borrow().state
    }

    pub fn bound_session(&self) -> Option<String> {
        self.binding.borrow().session_id.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.state() == ConversationState::Sending
    }

    async fn deliver(
        &self,
        session_id: String,
        generation: u64,
        correlation: Uuid,
        content: String,
    ) -> Result<Completion> {
        let reply = self.api.send_chat(&session_id, &content).await;

        if self.binding.borrow().generation != generation {
            log::debug!("Dropping chat reply for {}: binding changed", session_id);
            return reply.map(|_| Completion::Discarded);
        }

        match reply {
            Ok(reply) => {
                log::debug!(
                    "Chat reply for {} ({} chars), reconciling",
                    session_id,
                    reply.answer.len()
                );
                self.fetch_and_apply(Some(correlation)).await
            }
            Err(e) => {
                log::warn!("Sending to {} failed: {}", session_id, e);
                self.settle(correlation, DeliveryStatus::Failed);
                Err(e)
            }
        }
    }

    /// `reconciling` carries the correlation id when this fetch completes a send.
    async fn fetch_and_apply(&self, reconciling: Option<Uuid>) -> Result<Completion> {
        let (session_id, generation, ticket) = {
            let mut b = self.binding.borrow_mut();
            let session_id = b
                .session_id
                .clone()
                .ok_or_else(|| ClientError::Validation("no session selected".to_string()))?;
            b.loads_issued += 1;
            (session_id, b.generation, b.loads_issued)
        };

        let fetched = self.api.get_messages(&session_id).await;

        {
            let mut b = self.binding.borrow_mut();
            if b.generation != generation {
                log::debug!("Dropping messages for {}: binding changed", session_id);
                return fetched.map(|_| Completion::Discarded);
            }

            let messages = match fetched {
                Ok(messages) => messages,
                Err(e) => {
                    drop(b);
                    log::warn!("Loading messages for {} failed: {}", session_id, e);
                    if let Some(correlation) = reconciling {
                        // The server accepted the question; only the reload failed.
                        self.settle(correlation, DeliveryStatus::Confirmed);
                    }
                    return Err(e);
                }
            };

            if ticket < b.load_applied {
                log::debug!("Dropping messages for {}: newer fetch applied", session_id);
                return Ok(Completion::Discarded);
            }

            if reconciling.is_none() && b.state == ConversationState::Sending {
                // The send in flight reconciles on its own; keep its bubble
                // after the fetched history.
                let pending: Vec<Message> =
                    b.messages.iter().filter(|m| m.is_pending()).cloned().collect();
                log::debug!(
                    "Applying messages for {} under {} pending",
                    session_id,
                    pending.len()
                );
                b.messages = messages;
                b.messages.extend(pending);
            } else {
                b.messages = messages;
                b.state = ConversationState::Loaded;
            }
            b.load_applied = ticket;
        }

        self.emit_messages();
        Ok(Completion::Applied)
    }

    /// Leave Sending, marking the optimistic message with `status`.
    fn settle(&self, correlation: Uuid, status: DeliveryStatus) {
        {
            let mut b = self.binding.borrow_mut();
            if let Some(message) = b
                .messages
                .iter_mut()
                .find(|m| m.correlation_id() == Some(correlation))
            {
                message.status = status;
            }
            b.state = ConversationState::Loaded;
        }
        self.emit_messages();
    }

    fn emit_messages(&self) {
        let b = self.binding.borrow();
        if let Some(session_id) = &b.session_id {
            self.event_bus.emit(ClientEvent::MessagesChanged {
                session_id: session_id.clone(),
                messages: b.messages.clone(),
                sending: b.state == ConversationState::Sending,
            });
        }
    }
}
