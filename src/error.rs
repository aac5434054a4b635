//! SDK-level error types shared by the configuration store, request builder, and connector.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Path-annotated JSON parsing failure.
pub type JsonError = serde_path_to_error::Error<serde_json::Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authentication header could not be computed.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Verb outside the supported set.
	#[error("Method not supported: {method}.")]
	UnsupportedMethod {
		/// Verb exactly as supplied by the caller.
		method: String,
	},
	/// Payload cannot be encoded for the selected verb.
	#[error("Request payload is invalid: {reason}.")]
	InvalidPayload {
		/// Human-readable description of the rejected payload.
		reason: String,
	},
	/// Response body is a string that is not valid JSON.
	#[error("Service returned a malformed JSON body (HTTP {status}).")]
	MalformedResponse {
		/// HTTP status code of the offending response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonError,
	},
}
impl Error {
	/// Returns the kind tag for this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Configuration,
			Self::Signing(_) => ErrorKind::Signing,
			Self::Transport(_) => ErrorKind::Transport,
			Self::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
			Self::InvalidPayload { .. } => ErrorKind::InvalidPayload,
			Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
		}
	}

	pub(crate) fn unsupported_method(method: impl Into<String>) -> Self {
		Self::UnsupportedMethod { method: method.into() }
	}

	pub(crate) fn invalid_payload(reason: impl Into<String>) -> Self {
		Self::InvalidPayload { reason: reason.into() }
	}
}

/// Flat classification of [`Error`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The SDK is not configured or was configured with invalid options.
	Configuration,
	/// The verb is outside the supported set.
	UnsupportedMethod,
	/// Credentials could not be turned into an authentication header.
	Signing,
	/// The payload does not fit the verb's encoding.
	InvalidPayload,
	/// The transport failed before a response arrived.
	Transport,
	/// The response body could not be parsed.
	MalformedResponse,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Configuration => "configuration",
			ErrorKind::UnsupportedMethod => "unsupported_method",
			ErrorKind::Signing => "signing",
			ErrorKind::InvalidPayload => "invalid_payload",
			ErrorKind::Transport => "transport",
			ErrorKind::MalformedResponse => "malformed_response",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A verb was called before `init` supplied a base URL.
	#[error(
		"Please configure the Penneo SDK before calling any methods; call `Connector::init` with a base URL first."
	)]
	NotConfigured,
	/// The base URL is not an absolute URL.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected base URL.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// JSON options contain unknown keys or mistyped values.
	#[error("SDK options are invalid.")]
	InvalidOptions {
		/// Path-annotated parsing failure.
		#[source]
		source: JsonError,
	},
}

/// Failures raised while computing an authentication header.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum SigningError {
	/// The API key is empty.
	#[error("API key must not be empty.")]
	EmptyKey,
	/// The API secret is empty.
	#[error("API secret must not be empty.")]
	EmptySecret,
	/// A credential contains characters that cannot be carried in the header.
	#[error("The {field} contains characters that cannot be sent in an authentication header.")]
	InvalidCharacters {
		/// Which credential field failed validation.
		field: &'static str,
	},
	/// The creation timestamp could not be formatted.
	#[error("Unable to format the signature timestamp.")]
	Timestamp,
}

/// Transport-level failures (network, IO, request construction).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Penneo API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The descriptor could not be turned into a transport request.
	#[error("Request could not be constructed: {message}.")]
	Request {
		/// Human-readable reason.
		message: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Penneo API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() {
			Self::Request { message: e.to_string() }
		} else {
			Self::network(e)
		}
	}
}

/// Parses exactly one JSON document; anything after it is an error.
pub(crate) fn parse_json<T>(raw: &str) -> Result<T, JsonError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_str(raw);
	let value = serde_path_to_error::deserialize(&mut de)?;

	de.end().map_err(|e| JsonError::new(serde_path_to_error::Track::new().path(), e))?;

	Ok(value)
}
