//! Chat session state: the message list and the single-flight gate.

mod conversation;
mod message;

pub use conversation::{Conversation, ERROR_REPLY, PendingTurn, exchange};
pub use message::{ConnectionStatus, Message, MessageId, Role};
