//! Settings for the remote model client.
//!
//! A browser tab has no process environment, so [`ClientConfig::from_env`]
//! reads variables at build time (`API_KEY=... trunk build`).

use std::fmt;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
/// Gemini REST root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Connection settings for [`GeminiClient`](crate::ai::GeminiClient).
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
	api_key: Option<String>,
	model: String,
	base_url: String,
	temperature: f32,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			model: DEFAULT_MODEL.to_owned(),
			base_url: DEFAULT_BASE_URL.to_owned(),
			temperature: DEFAULT_TEMPERATURE,
		}
	}
}

impl ClientConfig {
	/// Defaults plus `API_KEY` (or `GEMINI_API_KEY`) and `GEMINI_MODEL`
	/// captured when the crate was compiled. A missing key is not an error
	/// here; the client refuses to send without one.
	pub fn from_env() -> Self {
		Self {
			api_key: option_env!("API_KEY")
				.or(option_env!("GEMINI_API_KEY"))
				.map(str::to_owned),
			model: option_env!("GEMINI_MODEL")
				.unwrap_or(DEFAULT_MODEL)
				.to_owned(),
			..Self::default()
		}
	}

	/// Sets the access key.
	pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the model name.
	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	/// Sets the REST root, without trailing slash.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Sets the sampling temperature.
	pub fn with_temperature(mut self, temperature: f32) -> Self {
		self.temperature = temperature;
		self
	}

	/// The key, if one is set and not blank.
	pub fn api_key(&self) -> Option<&str> {
		self.api_key
			.as_deref()
			.map(str::trim)
			.filter(|key| !key.is_empty())
	}

	/// Model name.
	pub fn model(&self) -> &str {
		&self.model
	}

	/// Sampling temperature.
	pub fn temperature(&self) -> f32 {
		self.temperature
	}

	/// `generateContent` URL for the configured model.
	pub fn endpoint_url(&self) -> String {
		format!(
			"{}/models/{}:generateContent",
			self.base_url.trim_end_matches('/'),
			self.model
		)
	}
}

impl fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientConfig")
			.field("api_key", &self.api_key().map(|_| "<redacted>"))
			.field("model", &self.model)
			.field("base_url", &self.base_url)
			.field("temperature", &self.temperature)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_key_counts_as_missing() {
		assert_eq!(ClientConfig::default().api_key(), None);
		assert_eq!(ClientConfig::default().with_api_key("  ").api_key(), None);
		assert_eq!(
			ClientConfig::default().with_api_key("k-123").api_key(),
			Some("k-123")
		);
	}

	#[test]
	fn endpoint_includes_model() {
		let config = ClientConfig::default()
			.with_base_url("http://localhost:9000/v1beta/")
			.with_model("test-model");
		assert_eq!(
			config.endpoint_url(),
			"http://localhost:9000/v1beta/models/test-model:generateContent"
		);
	}

	#[test]
	fn debug_hides_key() {
		let config = ClientConfig::default().with_api_key("secret-key");
		let printed = format!("{config:?}");
		assert!(!printed.contains("secret-key"));
		assert!(printed.contains("<redacted>"));
	}
}
