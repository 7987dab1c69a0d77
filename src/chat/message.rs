use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::components::force_graph::SyntaxGraph;

/// Position of a message within its conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) u64);

/// Who wrote a message. Serialized as `"user"` or `"ai"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Typed by the person at the keyboard.
	User,
	/// Produced by the model, or the fixed error reply.
	Ai,
}

impl Role {
	/// `"user"` or `"ai"`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Ai => "ai",
		}
	}
}

/// One chat entry. Never changed after it is appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
	/// Unique within the session.
	pub id: MessageId,
	/// Author.
	pub role: Role,
	/// Text as typed or as returned.
	pub content: String,
	/// Creation time.
	pub timestamp: DateTime<Utc>,
	/// Word graph; only AI replies carry one.
	pub graph: Option<SyntaxGraph>,
}

impl Message {
	/// True for model replies and error notices.
	pub fn is_ai(&self) -> bool {
		self.role == Role::Ai
	}

	/// Graph worth drawing: present and with at least one node.
	pub fn visible_graph(&self) -> Option<&SyntaxGraph> {
		self.graph.as_ref().filter(|graph| !graph.is_empty())
	}

	/// `HH:MM` in the viewer's time zone.
	pub fn local_time(&self) -> String {
		self.timestamp
			.with_timezone(&Local)
			.format("%H:%M")
			.to_string()
	}
}

/// Request state shown in the UI; gates the input while a reply is pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
	/// Ready for input.
	#[default]
	Idle,
	/// Waiting on the remote model.
	Thinking,
	/// The last request failed. Does not block the next one.
	Error,
}
