use chrono::Utc;
use log::{debug, error, info};

use super::message::{ConnectionStatus, Message, MessageId, Role};
use crate::ai::{AiResponse, GenerateError, ResponseGenerator};
use crate::components::force_graph::{SyntaxGraph, SyntaxLink, SyntaxNode};

/// Shown in place of a reply when generation fails for any reason.
pub const ERROR_REPLY: &str =
	"Ошибка: Нарушение целостности математической модели. Проверьте API ключ или соединение.";

const GREETING: &str = "Привет! Я Syntactic-Ru. Моя архитектура основана на векторном анализе \
	синтаксиса. Я строю предложения, рассчитывая вес каждого слова. О чем ты хочешь поговорить?";

/// An accepted submission waiting for its reply.
///
/// Handed out by [`Conversation::submit`] and consumed by
/// [`Conversation::resolve`], so every accepted message gets exactly one answer.
#[derive(Debug, PartialEq)]
#[must_use = "a pending turn must be resolved or the conversation stays Thinking"]
pub struct PendingTurn {
	prompt: String,
	question: MessageId,
}

impl PendingTurn {
	/// Text to send to the model.
	pub fn prompt(&self) -> &str {
		&self.prompt
	}

	/// The user message this turn answers.
	pub fn question(&self) -> MessageId {
		self.question
	}
}

/// Append-only message list plus the request status.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
	messages: Vec<Message>,
	status: ConnectionStatus,
	next_id: u64,
}

impl Conversation {
	/// Empty conversation, Idle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Conversation opened by the assistant's introduction and a sample graph.
	pub fn with_greeting() -> Self {
		let mut conversation = Self::new();
		conversation.push(Role::Ai, GREETING.to_owned(), Some(greeting_graph()));
		conversation
	}

	/// Messages in the order they were added.
	pub fn messages(&self) -> &[Message] {
		&self.messages
	}

	/// Current request status.
	pub fn status(&self) -> ConnectionStatus {
		self.status
	}

	/// True while a reply is outstanding.
	pub fn is_thinking(&self) -> bool {
		self.status == ConnectionStatus::Thinking
	}

	/// Whether [`submit`](Self::submit) would accept `input` right now.
	pub fn can_submit(&self, input: &str) -> bool {
		!input.trim().is_empty() && !self.is_thinking()
	}

	/// Appends `input` as a user message and enters Thinking.
	///
	/// Blank input and submissions while Thinking are ignored and return
	/// `None`; nothing changes in that case.
	pub fn submit(&mut self, input: &str) -> Option<PendingTurn> {
		if input.trim().is_empty() {
			debug!("ignoring blank submission");
			return None;
		}
		if self.is_thinking() {
			debug!("ignoring submission while a reply is pending");
			return None;
		}

		let question = self.push(Role::User, input.to_owned(), None);
		self.status = ConnectionStatus::Thinking;
		info!("message {} submitted", question.0);
		Some(PendingTurn {
			prompt: input.to_owned(),
			question,
		})
	}

	/// Appends the answer for `turn`: the reply and its graph, or
	/// [`ERROR_REPLY`] when generation failed.
	pub fn resolve(&mut self, turn: PendingTurn, outcome: Result<AiResponse, GenerateError>) {
		match outcome {
			Ok(response) => {
				self.push(Role::Ai, response.text, Some(response.graph));
				self.status = ConnectionStatus::Idle;
			}
			Err(err) => {
				error!("reply to message {} failed: {err}", turn.question.0);
				self.push(Role::Ai, ERROR_REPLY.to_owned(), None);
				self.status = ConnectionStatus::Error;
			}
		}
	}

	fn push(&mut self, role: Role, content: String, graph: Option<SyntaxGraph>) -> MessageId {
		let id = MessageId(self.next_id);
		self.next_id += 1;
		self.messages.push(Message {
			id,
			role,
			content,
			timestamp: Utc::now(),
			graph,
		});
		id
	}
}

/// Asks `generator` for the answer to `turn`. This is the only await in a turn.
pub async fn exchange<G>(generator: &G, turn: &PendingTurn) -> Result<AiResponse, GenerateError>
where
	G: ResponseGenerator + ?Sized,
{
	generator.generate(turn.prompt()).await
}

fn greeting_graph() -> SyntaxGraph {
	let node = |id: &str, word: &str, role: &str, weight: f64, group: i64| SyntaxNode {
		id: id.into(),
		word: word.into(),
		role: role.into(),
		weight,
		group,
	};
	let link = |source: &str, target: &str, value: f64| SyntaxLink {
		source: source.into(),
		target: target.into(),
		value,
	};
	SyntaxGraph {
		nodes: vec![
			node("Я", "Я", "Субъект", 0.9, 1),
			node("Syntactic", "Syntactic-Ru", "Имя", 0.95, 3),
			node("строю", "строю", "Предикат", 0.8, 2),
			node("предложения", "предложения", "Объект", 0.7, 3),
		],
		links: vec![
			link("Я", "строю", 1.0),
			link("строю", "Syntactic", 0.5),
			link("строю", "предложения", 0.8),
		],
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use async_trait::async_trait;

	use super::*;

	struct StubGenerator {
		reply: Option<AiResponse>,
		calls: Cell<usize>,
	}

	impl StubGenerator {
		fn answering(response: AiResponse) -> Self {
			Self {
				reply: Some(response),
				calls: Cell::new(0),
			}
		}

		fn failing() -> Self {
			Self {
				reply: None,
				calls: Cell::new(0),
			}
		}
	}

	#[async_trait(?Send)]
	impl ResponseGenerator for StubGenerator {
		async fn generate(&self, _input: &str) -> Result<AiResponse, GenerateError> {
			self.calls.set(self.calls.get() + 1);
			self.reply.clone().ok_or(GenerateError::EmptyResponse)
		}
	}

	fn privet() -> AiResponse {
		serde_json::from_str(
			r#"{"text":"Привет","graph":{"nodes":[{"id":"A","word":"A","role":"Субъект","weight":0.9,"group":1}],"links":[]}}"#,
		)
		.unwrap()
	}

	async fn send(conversation: &mut Conversation, generator: &StubGenerator, input: &str) {
		if let Some(turn) = conversation.submit(input) {
			let outcome = exchange(generator, &turn).await;
			conversation.resolve(turn, outcome);
		}
	}

	#[tokio::test]
	async fn successful_turn_appends_question_and_answer() {
		let generator = StubGenerator::answering(privet());
		let mut conversation = Conversation::new();

		send(&mut conversation, &generator, "Как дела?").await;

		let messages = conversation.messages();
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].role, Role::User);
		assert_eq!(messages[0].content, "Как дела?");
		assert_eq!(messages[1].role, Role::Ai);
		assert_eq!(messages[1].content, "Привет");
		let graph = messages[1].graph.as_ref().unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.links.is_empty());
		assert_eq!(conversation.status(), ConnectionStatus::Idle);
		assert_eq!(generator.calls.get(), 1);
	}

	#[tokio::test]
	async fn failed_turn_appends_fixed_error_reply() {
		let generator = StubGenerator::failing();
		let mut conversation = Conversation::new();

		send(&mut conversation, &generator, "Как дела?").await;

		let messages = conversation.messages();
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].content, "Как дела?");
		assert_eq!(messages[1].role, Role::Ai);
		assert_eq!(messages[1].content, ERROR_REPLY);
		assert!(messages[1].graph.is_none());
		assert_eq!(conversation.status(), ConnectionStatus::Error);
	}

	#[tokio::test]
	async fn error_status_does_not_block_next_submission() {
		let mut conversation = Conversation::new();
		send(&mut conversation, &StubGenerator::failing(), "раз").await;
		assert_eq!(conversation.status(), ConnectionStatus::Error);

		send(&mut conversation, &StubGenerator::answering(privet()), "два").await;
		assert_eq!(conversation.messages().len(), 4);
		assert_eq!(conversation.status(), ConnectionStatus::Idle);
	}

	#[test]
	fn blank_input_is_a_no_op() {
		let mut conversation = Conversation::new();
		for input in ["", "   ", "\n\t"] {
			assert!(!conversation.can_submit(input));
			assert!(conversation.submit(input).is_none());
		}
		assert!(conversation.messages().is_empty());
		assert_eq!(conversation.status(), ConnectionStatus::Idle);
	}

	#[test]
	fn submission_while_thinking_is_rejected() {
		let mut conversation = Conversation::new();
		let turn = conversation.submit("первый").unwrap();
		assert!(conversation.is_thinking());
		assert!(!conversation.can_submit("второй"));

		assert!(conversation.submit("второй").is_none());
		assert_eq!(conversation.messages().len(), 1);
		assert_eq!(conversation.status(), ConnectionStatus::Thinking);

		conversation.resolve(turn, Ok(privet()));
		assert_eq!(conversation.messages().len(), 2);
	}

	#[test]
	fn user_message_is_appended_before_the_reply() {
		let mut conversation = Conversation::new();
		let turn = conversation.submit("  с пробелами ").unwrap();

		assert_eq!(turn.prompt(), "  с пробелами ");
		assert_eq!(conversation.messages().len(), 1);
		assert_eq!(conversation.messages()[0].id, turn.question());
		assert_eq!(conversation.messages()[0].content, "  с пробелами ");
	}

	#[test]
	fn message_ids_are_unique_and_ordered() {
		let mut conversation = Conversation::with_greeting();
		for text in ["a", "b", "c"] {
			let turn = conversation.submit(text).unwrap();
			conversation.resolve(turn, Ok(privet()));
		}
		let ids: Vec<_> = conversation.messages().iter().map(|m| m.id).collect();
		assert_eq!(ids.len(), 7);
		assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[test]
	fn greeting_carries_sample_graph() {
		let conversation = Conversation::with_greeting();
		let greeting = &conversation.messages()[0];
		assert!(greeting.is_ai());
		let graph = greeting.visible_graph().unwrap();
		assert_eq!(graph.nodes.len(), 4);
		assert_eq!(graph.links.len(), 3);
		assert_eq!(conversation.status(), ConnectionStatus::Idle);
	}
}
