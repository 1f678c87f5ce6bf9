//! Session & conversation orchestration for the DocChat client.
//!
//! Everything here is platform-free: the network is reached only through
//! [`ports::SessionApiPort`], and results flow out through the
//! [`event_bus::EventBus`].

pub mod conversation;
pub mod directory;
pub mod event_bus;
pub mod gate;
pub mod ports;
pub mod selection;


pub use conversation::{Completion, Conversation, ConversationState};
pub use directory::{Acquired, SessionDirectory};
pub use event_bus::EventBus;
pub use gate::{decide_gate_state, GateState, UploadGate};
pub use ports::{ChatReply, SessionApiPort};
pub use selection::{Redirect, SelectionController};
