//! Raw transport responses and their normalization into [`ResponseEnvelope`] values.

// crates.io
use http::HeaderMap;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error, request::Payload};

/// Body as delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawBody {
	/// The response carried no body.
	Empty,
	/// Undecoded text that should contain JSON.
	Text(String),
	/// Body the transport already parsed.
	Json(Payload),
}

/// Response exactly as the transport produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Response body.
	pub body: RawBody,
}
impl RawResponse {
	/// Creates a body-less response with the given status.
	pub fn new(status: u16) -> Self {
		Self { status, headers: HeaderMap::new(), body: RawBody::Empty }
	}

	/// Attaches a text body.
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.body = RawBody::Text(text.into());

		self
	}

	/// Attaches an already parsed body.
	pub fn with_json(mut self, value: Payload) -> Self {
		self.body = RawBody::Json(value);

		self
	}

	/// Replaces the headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}
}

/// Uniform `{ body, raw, status }` result of a completed call.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
	/// Parsed body; an empty object when the response had none.
	pub body: Payload,
	/// Original transport response.
	pub raw: RawResponse,
	/// HTTP status code.
	pub status: u16,
}
impl ResponseEnvelope {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Deserializes the body into a typed model.
	pub fn deserialize<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(&self.body)
			.map_err(|source| Error::MalformedResponse { status: self.status, source })
	}
}

/// Converts a raw response into an envelope.
///
/// Missing or empty bodies become `{}`, text bodies are parsed as JSON, and pre-parsed bodies
/// pass through untouched.
pub fn normalize(raw: RawResponse) -> Result<ResponseEnvelope> {
	let status = raw.status;
	let body = match &raw.body {
		RawBody::Empty => Payload::Object(Default::default()),
		RawBody::Text(text) if text.is_empty() => Payload::Object(Default::default()),
		RawBody::Text(text) => error::parse_json::<Payload>(text)
			.map_err(|source| Error::MalformedResponse { status, source })?,
		RawBody::Json(value) => value.clone(),
	};

	Ok(ResponseEnvelope { body, raw, status })
}
