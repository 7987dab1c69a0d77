//! Remote response generation: one structured completion per user message.

mod client;
mod error;
mod schema;
mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::GeminiClient;
pub use error::{GenerateError, TransportError};
pub use schema::{SYSTEM_INSTRUCTION, response_schema};
pub use transport::{FetchTransport, HttpReply, Transport};

use crate::components::force_graph::SyntaxGraph;

/// Reply text plus its word graph. Both fields are required on decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
	/// Natural-language answer.
	pub text: String,
	/// Word/role graph for the answer.
	pub graph: SyntaxGraph,
}

/// Produces an [`AiResponse`] for one user message.
///
/// Calls are independent; nothing is remembered between them.
#[async_trait(?Send)]
pub trait ResponseGenerator {
	/// Answers `input`, or fails without a partial result.
	async fn generate(&self, input: &str) -> Result<AiResponse, GenerateError>;
}

/// Generator handle shared by the UI.
pub type SharedGenerator = Arc<dyn ResponseGenerator + Send + Sync>;
