use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::GenerateError;
use super::schema::{SYSTEM_INSTRUCTION, response_schema};
use super::transport::{FetchTransport, Transport};
use super::{AiResponse, ResponseGenerator};
use crate::config::ClientConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
	contents: Vec<Content<'a>>,
	system_instruction: Content<'a>,
	generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	role: Option<&'static str>,
	parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	response_mime_type: &'static str,
	response_schema: Value,
	temperature: f32,
}

impl<'a> GenerateContentRequest<'a> {
	fn new(input: &'a str, temperature: f32) -> Self {
		Self {
			contents: vec![Content {
				role: Some("user"),
				parts: vec![Part { text: input }],
			}],
			system_instruction: Content {
				role: None,
				parts: vec![Part {
					text: SYSTEM_INSTRUCTION,
				}],
			},
			generation_config: GenerationConfig {
				response_mime_type: "application/json",
				response_schema: response_schema(),
				temperature,
			},
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
	#[serde(default)]
	prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	#[serde(default)]
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
	#[serde(default)]
	text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
	#[serde(default)]
	block_reason: Option<String>,
}

impl GenerateContentResponse {
	/// Text parts of the first candidate, joined.
	fn text(&self) -> Option<String> {
		let content = self.candidates.first()?.content.as_ref()?;
		let text: String = content
			.parts
			.iter()
			.filter_map(|part| part.text.as_deref())
			.collect();
		(!text.trim().is_empty()).then_some(text)
	}

	fn block_reason(&self) -> Option<&str> {
		self.prompt_feedback.as_ref()?.block_reason.as_deref()
	}
}

/// [`ResponseGenerator`] backed by the Gemini `generateContent` endpoint.
///
/// One request per call: no retries, no streaming, no timeout.
pub struct GeminiClient<T = FetchTransport> {
	config: ClientConfig,
	transport: T,
}

impl GeminiClient<FetchTransport> {
	/// Client that talks through the browser's `fetch`.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_transport(config, FetchTransport)
	}
}

impl<T: Transport> GeminiClient<T> {
	/// Client over a caller-supplied transport.
	pub fn with_transport(config: ClientConfig, transport: T) -> Self {
		Self { config, transport }
	}

	/// Settings this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	async fn request(&self, input: &str) -> Result<AiResponse, GenerateError> {
		let api_key = self.config.api_key().ok_or(GenerateError::MissingApiKey)?;

		let body = serde_json::to_string(&GenerateContentRequest::new(
			input,
			self.config.temperature(),
		))?;
		debug!("sending {} chars to {}", input.len(), self.config.model());
		let reply = self
			.transport
			.post_json(
				&self.config.endpoint_url(),
				&[(API_KEY_HEADER, api_key)],
				body,
			)
			.await?;
		if !reply.is_success() {
			return Err(GenerateError::Status {
				status: reply.status,
				body: reply.body,
			});
		}

		let envelope: GenerateContentResponse = serde_json::from_str(&reply.body)?;
		let Some(text) = envelope.text() else {
			return Err(match envelope.block_reason() {
				Some(reason) => GenerateError::Blocked(reason.to_owned()),
				None => GenerateError::EmptyResponse,
			});
		};
		Ok(serde_json::from_str(&text)?)
	}
}

#[async_trait(?Send)]
impl<T: Transport> ResponseGenerator for GeminiClient<T> {
	async fn generate(&self, input: &str) -> Result<AiResponse, GenerateError> {
		self.request(input).await.inspect_err(|err| {
			error!("Gemini API error: {err}");
		})
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use serde_json::json;

	use super::*;
	use crate::ai::error::TransportError;
	use crate::ai::transport::HttpReply;

	#[derive(Debug)]
	struct Call {
		url: String,
		headers: Vec<(String, String)>,
		body: String,
	}

	struct RecordingTransport {
		reply: Result<HttpReply, TransportError>,
		calls: RefCell<Vec<Call>>,
	}

	impl RecordingTransport {
		fn replying(status: u16, body: impl Into<String>) -> Self {
			Self {
				reply: Ok(HttpReply {
					status,
					body: body.into(),
				}),
				calls: RefCell::new(Vec::new()),
			}
		}

		fn failing(message: &str) -> Self {
			Self {
				reply: Err(TransportError::Request(message.into())),
				calls: RefCell::new(Vec::new()),
			}
		}

		fn call_count(&self) -> usize {
			self.calls.borrow().len()
		}
	}

	#[async_trait(?Send)]
	impl Transport for &RecordingTransport {
		async fn post_json(
			&self,
			url: &str,
			headers: &[(&str, &str)],
			body: String,
		) -> Result<HttpReply, TransportError> {
			self.calls.borrow_mut().push(Call {
				url: url.to_owned(),
				headers: headers
					.iter()
					.map(|(k, v)| (k.to_string(), v.to_string()))
					.collect(),
				body,
			});
			self.reply.clone()
		}
	}

	fn envelope(inner: &str) -> String {
		json!({
			"candidates": [{ "content": { "role": "model", "parts": [{ "text": inner }] } }]
		})
		.to_string()
	}

	const GREETING: &str = r#"{"text":"Привет","graph":{"nodes":[{"id":"A","word":"A","role":"Субъект","weight":0.9,"group":1}],"links":[]}}"#;

	fn keyed() -> ClientConfig {
		ClientConfig::default()
			.with_api_key("test-key")
			.with_base_url("http://model.test/v1beta")
	}

	#[tokio::test]
	async fn missing_key_fails_before_any_request() {
		let transport = RecordingTransport::replying(200, envelope(GREETING));
		let client = GeminiClient::with_transport(ClientConfig::default(), &transport);

		let err = client.generate("Привет").await.unwrap_err();
		assert!(matches!(err, GenerateError::MissingApiKey));
		assert!(err.is_precondition());
		assert_eq!(transport.call_count(), 0);
	}

	#[tokio::test]
	async fn blank_key_fails_before_any_request() {
		let transport = RecordingTransport::replying(200, envelope(GREETING));
		let config = ClientConfig::default().with_api_key("   ");
		let client = GeminiClient::with_transport(config, &transport);

		assert!(matches!(
			client.generate("Привет").await,
			Err(GenerateError::MissingApiKey)
		));
		assert_eq!(transport.call_count(), 0);
	}

	#[tokio::test]
	async fn decodes_structured_reply() {
		let transport = RecordingTransport::replying(200, envelope(GREETING));
		let client = GeminiClient::with_transport(keyed(), &transport);

		let response = client.generate("Привет").await.unwrap();
		assert_eq!(response.text, "Привет");
		assert_eq!(response.graph.nodes.len(), 1);
		assert!(response.graph.links.is_empty());
		assert_eq!(response.graph.nodes[0].role, "Субъект");
		assert_eq!(transport.call_count(), 1);
	}

	#[tokio::test]
	async fn sends_schema_persona_and_temperature() {
		let transport = RecordingTransport::replying(200, envelope(GREETING));
		let client = GeminiClient::with_transport(keyed(), &transport);
		client.generate("Как дела?").await.unwrap();

		let calls = transport.calls.borrow();
		let call = &calls[0];
		assert_eq!(
			call.url,
			"http://model.test/v1beta/models/gemini-3-flash-preview:generateContent"
		);
		assert!(
			call.headers
				.contains(&(API_KEY_HEADER.to_owned(), "test-key".to_owned()))
		);

		let body: Value = serde_json::from_str(&call.body).unwrap();
		assert_eq!(body["contents"][0]["parts"][0]["text"], "Как дела?");
		assert_eq!(
			body["systemInstruction"]["parts"][0]["text"],
			SYSTEM_INSTRUCTION
		);
		let generation = &body["generationConfig"];
		assert_eq!(generation["responseMimeType"], "application/json");
		assert_eq!(generation["responseSchema"], response_schema());
		let temperature = generation["temperature"].as_f64().unwrap();
		assert!((temperature - 0.7).abs() < 1e-6);
	}

	#[tokio::test]
	async fn joins_split_text_parts() {
		let (head, tail) = GREETING.split_at(5);
		let body = json!({
			"candidates": [{ "content": { "parts": [{ "text": head }, { "text": tail }] } }]
		})
		.to_string();
		let transport = RecordingTransport::replying(200, body);
		let client = GeminiClient::with_transport(keyed(), &transport);

		assert_eq!(client.generate("x").await.unwrap().text, "Привет");
	}

	#[tokio::test]
	async fn empty_candidates_is_an_error() {
		let transport = RecordingTransport::replying(200, r#"{"candidates":[]}"#);
		let client = GeminiClient::with_transport(keyed(), &transport);

		assert!(matches!(
			client.generate("x").await,
			Err(GenerateError::EmptyResponse)
		));
	}

	#[tokio::test]
	async fn blocked_prompt_reports_reason() {
		let transport =
			RecordingTransport::replying(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
		let client = GeminiClient::with_transport(keyed(), &transport);

		match client.generate("x").await {
			Err(GenerateError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
			other => panic!("expected Blocked, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn non_conforming_json_is_malformed() {
		let transport =
			RecordingTransport::replying(200, envelope(r#"{"text":"Привет","graph":{"nodes":[]}}"#));
		let client = GeminiClient::with_transport(keyed(), &transport);

		assert!(matches!(
			client.generate("x").await,
			Err(GenerateError::Malformed(_))
		));
	}

	#[tokio::test]
	async fn non_json_text_is_malformed() {
		let transport = RecordingTransport::replying(200, envelope("Привет, как дела?"));
		let client = GeminiClient::with_transport(keyed(), &transport);

		assert!(matches!(
			client.generate("x").await,
			Err(GenerateError::Malformed(_))
		));
	}

	#[tokio::test]
	async fn http_error_status_is_reported() {
		let transport = RecordingTransport::replying(403, "forbidden");
		let client = GeminiClient::with_transport(keyed(), &transport);

		match client.generate("x").await {
			Err(GenerateError::Status { status, body }) => {
				assert_eq!(status, 403);
				assert_eq!(body, "forbidden");
			}
			other => panic!("expected Status, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn transport_failure_propagates() {
		let transport = RecordingTransport::failing("connection reset");
		let client = GeminiClient::with_transport(keyed(), &transport);

		assert!(matches!(
			client.generate("x").await,
			Err(GenerateError::Transport(_))
		));
		assert_eq!(transport.call_count(), 1);
	}
}
