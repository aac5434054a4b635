//! WSSE `UsernameToken` signing for key/secret credentials.
//!
//! Each request carries a fresh token: a random nonce and a creation timestamp are
//! hashed together with the API secret (`base64(sha1(nonce + created + secret))`), so the
//! secret itself never leaves the process. The header value has the shape
//! `UsernameToken Username="..", PasswordDigest="..", Nonce="..", Created=".."` with the
//! nonce base64-encoded.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, auth::Secret, error::SigningError};

const NONCE_LEN: usize = 32;
const CREATED_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// API key/secret pair used by the signed-request scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct WsseCredentials {
	/// Public API key, sent as the token username.
	pub key: String,
	/// API secret; only its digest is transmitted.
	pub secret: Secret,
}
impl WsseCredentials {
	/// Creates a new key/secret pair.
	pub fn new(key: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { key: key.into(), secret: secret.into() }
	}

	fn validate(&self) -> Result<(), SigningError> {
		if self.key.is_empty() {
			return Err(SigningError::EmptyKey);
		}
		if self.secret.is_empty() {
			return Err(SigningError::EmptySecret);
		}
		if !self.key.chars().all(|c| c == ' ' || (c.is_ascii_graphic() && c != '"')) {
			return Err(SigningError::InvalidCharacters { field: "API key" });
		}

		Ok(())
	}
}
impl Debug for WsseCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WsseCredentials")
			.field("key", &self.key)
			.field("secret", &self.secret)
			.finish()
	}
}

/// One-shot WSSE token derived from [`WsseCredentials`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsernameToken {
	username: String,
	nonce: String,
	created: String,
	password_digest: String,
}
impl UsernameToken {
	/// Generates a token with a random nonce and the current UTC time.
	pub fn generate(credentials: &WsseCredentials) -> Result<Self, SigningError> {
		Self::with_parts(credentials, random_nonce(), OffsetDateTime::now_utc())
	}

	/// Builds a token from an explicit nonce and creation instant.
	pub fn with_parts(
		credentials: &WsseCredentials,
		nonce: impl Into<String>,
		created: OffsetDateTime,
	) -> Result<Self, SigningError> {
		credentials.validate()?;

		let nonce = nonce.into();
		let created = created
			.to_offset(time::UtcOffset::UTC)
			.format(CREATED_FORMAT)
			.map_err(|_| SigningError::Timestamp)?;
		let password_digest = digest(&nonce, &created, credentials.secret.expose());

		Ok(Self { username: credentials.key.clone(), nonce, created, password_digest })
	}

	/// Returns the base64 password digest.
	pub fn password_digest(&self) -> &str {
		&self.password_digest
	}

	/// Returns the formatted creation timestamp.
	pub fn created(&self) -> &str {
		&self.created
	}

	/// Renders the `X-WSSE` header value.
	pub fn header_value(&self) -> String {
		format!(
			"UsernameToken Username=\"{}\", PasswordDigest=\"{}\", Nonce=\"{}\", Created=\"{}\"",
			self.username,
			self.password_digest,
			STANDARD.encode(self.nonce.as_bytes()),
			self.created,
		)
	}
}

fn random_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

fn digest(nonce: &str, created: &str, secret: &str) -> String {
	let mut hasher = Sha1::new();

	hasher.update(nonce.as_bytes());
	hasher.update(created.as_bytes());
	hasher.update(secret.as_bytes());

	STANDARD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn credentials() -> WsseCredentials {
		WsseCredentials::new("api-key", "api-secret")
	}

	#[test]
	fn header_value_has_expected_shape() {
		let token = UsernameToken::with_parts(&credentials(), "abc", datetime!(2024-03-01 12:30:00 UTC))
			.expect("Token should build from valid credentials.");
		let header = token.header_value();

		assert_eq!(token.created(), "2024-03-01T12:30:00Z");
		assert!(header.starts_with("UsernameToken Username=\"api-key\", PasswordDigest=\""));
		assert!(header.contains("Nonce=\"YWJj\""));
		assert!(header.ends_with("Created=\"2024-03-01T12:30:00Z\""));
	}

	#[test]
	fn digest_matches_sha1_of_concatenation() {
		let token = UsernameToken::with_parts(&credentials(), "abc", datetime!(2024-03-01 12:30:00 UTC))
			.expect("Token should build from valid credentials.");
		let mut hasher = Sha1::new();

		hasher.update(b"abc2024-03-01T12:30:00Zapi-secret");

		assert_eq!(token.password_digest(), STANDARD.encode(hasher.finalize()));
	}

	#[test]
	fn non_utc_instants_are_normalized() {
		let token =
			UsernameToken::with_parts(&credentials(), "n", datetime!(2024-03-01 14:30:00 +02:00))
				.expect("Token should build from valid credentials.");

		assert_eq!(token.created(), "2024-03-01T12:30:00Z");
	}

	#[test]
	fn generated_tokens_use_fresh_nonces() {
		let first = UsernameToken::generate(&credentials()).expect("First token should build.");
		let second = UsernameToken::generate(&credentials()).expect("Second token should build.");

		assert_eq!(first.nonce.len(), NONCE_LEN);
		assert_ne!(first.nonce, second.nonce);
	}

	#[test]
	fn malformed_credentials_are_rejected() {
		let now = OffsetDateTime::now_utc();

		assert_eq!(
			UsernameToken::with_parts(&WsseCredentials::new("", "s"), "n", now),
			Err(SigningError::EmptyKey)
		);
		assert_eq!(
			UsernameToken::with_parts(&WsseCredentials::new("k", ""), "n", now),
			Err(SigningError::EmptySecret)
		);
		assert_eq!(
			UsernameToken::with_parts(&WsseCredentials::new("k\"ey", "s"), "n", now),
			Err(SigningError::InvalidCharacters { field: "API key" })
		);
		assert_eq!(
			UsernameToken::with_parts(&WsseCredentials::new("kéy", "s"), "n", now),
			Err(SigningError::InvalidCharacters { field: "API key" })
		);
	}

	#[test]
	fn debug_redacts_secret() {
		let rendered = format!("{:?}", credentials());

		assert!(rendered.contains("api-key"));
		assert!(!rendered.contains("api-secret"));
	}
}
