//! Connection configuration: the base URL plus the credential set used to authenticate.
//!
//! The record has a closed field set. [`ConfigUpdate`] is the only way to change it and
//! overwrites just the fields it carries; JSON options with unknown keys are rejected.
//! [`SharedConfig`] lets a connector and its clones observe the same record while every
//! call works from a snapshot taken before the request is built.

// self
use crate::{
	_prelude::*,
	auth::{AuthScheme, Secret, WsseCredentials},
	error::{self, ConfigError},
};

/// Credential fields recognized by the SDK.
///
/// `key` and `secret` are merged independently and only form a signed-request credential set
/// once both are present. Several credential sets may be present at once;
/// [`AuthScheme::select`] decides which one is used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
	/// API key for the signed-request scheme.
	pub key: Option<String>,
	/// API secret for the signed-request scheme.
	pub secret: Option<Secret>,
	/// Bearer token sent as `X-Auth-Token`.
	pub token: Option<Secret>,
	/// Pre-formed `Authorization` value.
	pub session_auth: Option<Secret>,
}
impl Credentials {
	/// Returns the key/secret pair when both halves are set and non-empty.
	pub fn wsse(&self) -> Option<WsseCredentials> {
		let key = self.key.as_deref().filter(|key| !key.is_empty())?;
		let secret = self.secret.as_ref().filter(|secret| !secret.is_empty())?;

		Some(WsseCredentials::new(key, secret.clone()))
	}

	/// Returns the bearer token unless it is unset or empty.
	pub fn bearer_token(&self) -> Option<&Secret> {
		self.token.as_ref().filter(|token| !token.is_empty())
	}

	/// Returns the session credential unless it is unset or empty.
	pub fn session(&self) -> Option<&Secret> {
		self.session_auth.as_ref().filter(|session| !session.is_empty())
	}
}

/// Connection parameters consulted by every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
	/// Service root that resource paths are appended to.
	pub base_url: Option<String>,
	/// Configured credentials.
	pub credentials: Credentials,
}
impl Config {
	/// Returns `true` once a non-empty base URL is set.
	///
	/// Credentials are not required: every auth scheme is optional, and unauthenticated calls
	/// are legal.
	pub fn is_configured(&self) -> bool {
		self.base_url.as_deref().is_some_and(|url| !url.is_empty())
	}

	/// Returns the authentication scheme the current credentials resolve to.
	pub fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::select(&self.credentials)
	}

	/// Merges `update` into the record, leaving absent fields untouched.
	///
	/// The base URL is validated before anything is written, so a rejected update leaves the
	/// record unchanged.
	pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), ConfigError> {
		let ConfigUpdate { base_url, key, secret, token, session_auth } = update;

		if let Some(value) = base_url.as_deref() {
			Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
				value: value.to_owned(),
				source,
			})?;
		}
		if base_url.is_some() {
			self.base_url = base_url;
		}
		if key.is_some() {
			self.credentials.key = key;
		}
		if secret.is_some() {
			self.credentials.secret = secret;
		}
		if token.is_some() {
			self.credentials.token = token;
		}
		if session_auth.is_some() {
			self.credentials.session_auth = session_auth;
		}

		Ok(())
	}
}

/// Partial configuration accepted by [`SharedConfig::update`] and `Connector::init`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConfigUpdate {
	/// Service root, e.g. `https://app.penneo.com/api/v1/`.
	pub base_url: Option<String>,
	/// API key.
	pub key: Option<String>,
	/// API secret.
	pub secret: Option<Secret>,
	/// Bearer token.
	pub token: Option<Secret>,
	/// Pre-formed `Authorization` value.
	pub session_auth: Option<Secret>,
}
impl ConfigUpdate {
	/// Creates an empty update.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses JSON options such as `{"baseUrl": "...", "token": "..."}`.
	///
	/// Unknown keys are rejected and the error names the offending path.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		error::parse_json(raw).map_err(|source| ConfigError::InvalidOptions { source })
	}

	/// Sets the base URL.
	pub fn base_url(mut self, value: impl Into<String>) -> Self {
		self.base_url = Some(value.into());

		self
	}

	/// Sets the API key.
	pub fn key(mut self, value: impl Into<String>) -> Self {
		self.key = Some(value.into());

		self
	}

	/// Sets the API secret.
	pub fn secret(mut self, value: impl Into<Secret>) -> Self {
		self.secret = Some(value.into());

		self
	}

	/// Sets the bearer token.
	pub fn token(mut self, value: impl Into<Secret>) -> Self {
		self.token = Some(value.into());

		self
	}

	/// Sets the pre-formed `Authorization` value.
	pub fn session_auth(mut self, value: impl Into<Secret>) -> Self {
		self.session_auth = Some(value.into());

		self
	}
}

/// Thread-safe handle to a [`Config`] record.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig(Arc<RwLock<Config>>);
impl SharedConfig {
	/// Wraps an existing record.
	pub fn new(config: Config) -> Self {
		Self(Arc::new(RwLock::new(config)))
	}

	/// Merges `update` into the shared record.
	pub fn update(&self, update: ConfigUpdate) -> Result<(), ConfigError> {
		self.0.write().apply(update)
	}

	/// Returns a copy of the current record.
	pub fn snapshot(&self) -> Config {
		self.0.read().clone()
	}

	/// Reports whether the shared record has a base URL.
	pub fn is_configured(&self) -> bool {
		self.0.read().is_configured()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn fresh_config_is_unconfigured() {
		let config = Config::default();

		assert!(!config.is_configured());
		assert_eq!(config.auth_scheme(), AuthScheme::Unauthenticated);
	}

	#[test]
	fn base_url_alone_is_enough() {
		let mut config = Config::default();

		config
			.apply(ConfigUpdate::new().base_url("https://api.example.com"))
			.expect("Valid base URL should apply.");

		assert!(config.is_configured());
	}

	#[test]
	fn updates_merge_only_present_fields() {
		let mut config = Config::default();

		config
			.apply(ConfigUpdate::new().base_url("https://api.example.com").key("k").secret("s"))
			.expect("Initial update should apply.");
		config.apply(ConfigUpdate::new().token("abc")).expect("Token update should apply.");

		assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
		assert_eq!(config.credentials.key.as_deref(), Some("k"));
		assert_eq!(config.credentials.secret.as_ref().map(Secret::expose), Some("s"));
		assert_eq!(config.credentials.token.as_ref().map(Secret::expose), Some("abc"));
	}

	#[test]
	fn invalid_base_url_leaves_record_untouched() {
		let mut config = Config::default();
		let err = config
			.apply(ConfigUpdate::new().base_url("not a url").token("abc"))
			.expect_err("Relative base URL should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
		assert_eq!(config, Config::default());
	}

	#[test]
	fn json_options_use_camel_case() {
		let update = ConfigUpdate::from_json(
			r#"{"baseUrl":"https://api.example.com/","sessionAuth":"Bearer x"}"#,
		)
		.expect("Known keys should parse.");

		assert_eq!(update.base_url.as_deref(), Some("https://api.example.com/"));
		assert_eq!(update.session_auth.as_ref().map(Secret::expose), Some("Bearer x"));
	}

	#[test]
	fn json_options_reject_unknown_keys() {
		let err = ConfigUpdate::from_json(r#"{"baseUrl":"https://x.test","update":"nope"}"#)
			.expect_err("Unknown keys should be rejected.");

		assert!(matches!(err, ConfigError::InvalidOptions { .. }));
	}

	#[test]
	fn json_options_report_mistyped_path() {
		let err = ConfigUpdate::from_json(r#"{"token":42}"#)
			.expect_err("Mistyped values should be rejected.");

		match err {
			ConfigError::InvalidOptions { source } => assert_eq!(source.path().to_string(), "token"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn json_options_reject_trailing_content() {
		let err = ConfigUpdate::from_json(r#"{"baseUrl":"https://x.test"} {"token":"t"}"#)
			.expect_err("Trailing content should be rejected.");

		assert!(matches!(err, ConfigError::InvalidOptions { .. }));
	}

	#[test]
	fn key_pair_forms_once_both_halves_arrive() {
		let mut config = Config::default();

		config.apply(ConfigUpdate::new().key("k")).expect("Key update should apply.");

		assert_eq!(config.credentials.wsse(), None);

		config.apply(ConfigUpdate::new().secret("s")).expect("Secret update should apply.");

		let pair = config.credentials.wsse().expect("Both halves should form a pair.");

		assert_eq!(pair.key, "k");
		assert_eq!(pair.secret.expose(), "s");
		assert_eq!(config.auth_scheme().as_str(), "signed_request");
	}

	#[test]
	fn shared_snapshot_is_detached() {
		let shared = SharedConfig::default();

		shared
			.update(ConfigUpdate::new().base_url("https://api.example.com"))
			.expect("Update should apply.");

		let snapshot = shared.snapshot();

		shared
			.update(ConfigUpdate::new().base_url("https://other.example.com"))
			.expect("Second update should apply.");

		assert_eq!(snapshot.base_url.as_deref(), Some("https://api.example.com"));
		assert!(shared.is_configured());
	}
}
