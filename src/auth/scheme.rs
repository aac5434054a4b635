//! Authentication scheme selection and header resolution.

// crates.io
use http::{
	HeaderMap, HeaderValue,
	header::{ACCEPT, AUTHORIZATION, HeaderName},
};
// self
use crate::{
	auth::{Secret, UsernameToken, WsseCredentials},
	config::Credentials,
	error::SigningError,
};

/// Header carrying the WSSE `UsernameToken`.
pub const X_WSSE: HeaderName = HeaderName::from_static("x-wsse");
/// Header carrying the bearer token.
pub const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");
/// Charset negotiation header sent with every request.
pub const ACCEPT_CHARSET: HeaderName = HeaderName::from_static("accept-charset");
/// Marker header sent alongside session credentials.
pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Authentication scheme derived from the configured credentials.
///
/// Selection is ordered: a bearer token wins over a key/secret pair, which wins over a
/// session credential. Mixed configurations are therefore legal and resolve deterministically.
/// Empty values count as unset, and a key without its secret (or the reverse) is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthScheme {
	/// No credentials are configured.
	Unauthenticated,
	/// Per-request WSSE signature derived from a key/secret pair.
	SignedRequest(WsseCredentials),
	/// Static token sent verbatim.
	BearerToken(Secret),
	/// Pre-formed `Authorization` value supplied by the caller.
	Session(Secret),
}
impl AuthScheme {
	/// Classifies the provided credentials.
	pub fn select(credentials: &Credentials) -> Self {
		if let Some(token) = credentials.bearer_token() {
			return Self::BearerToken(token.clone());
		}
		if let Some(pair) = credentials.wsse() {
			return Self::SignedRequest(pair);
		}
		if let Some(session) = credentials.session() {
			return Self::Session(session.clone());
		}

		Self::Unauthenticated
	}

	/// Returns a stable label suitable for span fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Unauthenticated => "unauthenticated",
			Self::SignedRequest(_) => "signed_request",
			Self::BearerToken(_) => "bearer_token",
			Self::Session(_) => "session",
		}
	}
}

/// Computes the authentication and content-negotiation headers for one request.
///
/// WSSE tokens embed a fresh nonce, so two calls with the same credentials yield different
/// `X-WSSE` values.
pub fn resolve_headers(credentials: &Credentials) -> Result<HeaderMap, SigningError> {
	let mut headers = HeaderMap::new();

	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
	headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));

	match AuthScheme::select(credentials) {
		AuthScheme::Unauthenticated => {},
		AuthScheme::BearerToken(token) => {
			headers.insert(X_AUTH_TOKEN, sensitive_value(token.expose(), "bearer token")?);
		},
		AuthScheme::SignedRequest(pair) => {
			let token = UsernameToken::generate(&pair)?;

			headers.insert(X_WSSE, sensitive_value(&token.header_value(), "API key")?);
		},
		AuthScheme::Session(session) => {
			headers.insert(AUTHORIZATION, sensitive_value(session.expose(), "session credential")?);
			headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XHttpRequest"));
		},
	}

	Ok(headers)
}

fn sensitive_value(raw: &str, field: &'static str) -> Result<HeaderValue, SigningError> {
	let mut value =
		HeaderValue::from_str(raw).map_err(|_| SigningError::InvalidCharacters { field })?;

	value.set_sensitive(true);

	Ok(value)
}
