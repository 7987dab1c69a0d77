use async_trait::async_trait;
use gloo_net::http::Request;

use super::error::TransportError;

/// Status and body of an HTTP reply.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Body as text.
	pub body: String,
}

impl HttpReply {
	/// 2xx.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends one JSON POST. Swapped out in tests.
#[async_trait(?Send)]
pub trait Transport {
	/// POSTs `body` to `url` with `content-type: application/json` plus `headers`.
	async fn post_json(
		&self,
		url: &str,
		headers: &[(&str, &str)],
		body: String,
	) -> Result<HttpReply, TransportError>;
}

/// Browser `fetch` via `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
	async fn post_json(
		&self,
		url: &str,
		headers: &[(&str, &str)],
		body: String,
	) -> Result<HttpReply, TransportError> {
		let mut builder = Request::post(url).header("content-type", "application/json");
		for (name, value) in headers {
			builder = builder.header(name, value);
		}
		let response = builder.body(body)?.send().await?;
		let status = response.status();
		let body = response.text().await?;
		Ok(HttpReply { status, body })
	}
}
