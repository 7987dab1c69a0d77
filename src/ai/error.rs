/// Failure below the HTTP status line: DNS, CORS, connection reset, body read.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransportError {
	/// The request could not be built, sent, or read back.
	#[error("request failed: {0}")]
	Request(String),
}

impl From<gloo_net::Error> for TransportError {
	fn from(err: gloo_net::Error) -> Self {
		Self::Request(err.to_string())
	}
}

/// Why a reply could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
	/// No access key configured. Raised before any request is made.
	#[error("API key is missing")]
	MissingApiKey,

	/// Network-level failure.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The endpoint answered with a non-success status.
	#[error("model endpoint returned HTTP {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},

	/// The reply carried no text.
	#[error("no response from model")]
	EmptyResponse,

	/// The service refused the prompt.
	#[error("prompt blocked: {0}")]
	Blocked(String),

	/// The reply was not valid JSON of the expected shape.
	#[error("malformed model response: {0}")]
	Malformed(#[from] serde_json::Error),
}

impl GenerateError {
	/// True for failures detected before contacting the service.
	pub fn is_precondition(&self) -> bool {
		matches!(self, Self::MissingApiKey)
	}
}
