//! Authenticated request orchestration.
//!
//! A [`Connector`] owns a [`SharedConfig`] and an [`HttpTransport`]. Every verb runs the same
//! per-call sequence: refuse to start while unconfigured, snapshot the configuration, build a
//! [`RequestDescriptor`], dispatch it once, and normalize the response. Failures before
//! dispatch (missing base URL, unsupported verb, signing, payload encoding) never reach the
//! transport. Nothing is retried, cached, or cancelled by the connector.

// self
use crate::{
	_prelude::*,
	config::{Config, ConfigUpdate, SharedConfig},
	entity::CaseFiles,
	error::ConfigError,
	http::HttpTransport,
	obs::{self, CallOutcome, CallSpan},
	request::{self, Payload, RequestDescriptor, UploadFile, Verb},
	response::{self, ResponseEnvelope},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport.
pub type ReqwestConnector = Connector<ReqwestTransport>;

/// Entry point for Penneo API calls.
///
/// Clones share both the configuration and the transport, so `init` on one clone is visible
/// to all of them. Independent connectors (for example one per tenant) each get their own
/// configuration.
pub struct Connector<T>
where
	T: ?Sized + HttpTransport,
{
	config: SharedConfig,
	transport: Arc<T>,
}
impl<T> Connector<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an unconfigured connector that dispatches through `transport`.
	pub fn with_transport(transport: impl Into<Arc<T>>) -> Self {
		Self::with_shared_config(SharedConfig::default(), transport)
	}

	/// Creates a connector over an existing configuration handle.
	pub fn with_shared_config(config: SharedConfig, transport: impl Into<Arc<T>>) -> Self {
		Self { config, transport: transport.into() }
	}

	/// Merges `options` into the configuration; must run before any verb.
	pub fn init(&self, options: ConfigUpdate) -> Result<()> {
		self.config.update(options)?;

		Ok(())
	}

	/// Returns the shared configuration handle.
	pub fn config(&self) -> &SharedConfig {
		&self.config
	}

	/// Returns the transport.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Reports whether a base URL has been configured.
	pub fn is_configured(&self) -> bool {
		self.config.is_configured()
	}

	/// Returns the case-file resource helpers.
	pub fn casefiles(&self) -> CaseFiles<'_, T> {
		CaseFiles::new(self)
	}

	/// Builds the descriptor a verb call would dispatch, without sending it.
	pub fn prepare(
		&self,
		verb: Verb,
		resource: &str,
		payload: Option<&Payload>,
	) -> Result<RequestDescriptor> {
		self.prepare_with(|config| request::build(verb, resource, payload, config))
	}

	/// Issues a `GET`; `params` become query parameters.
	pub async fn get(&self, resource: &str, params: Option<Payload>) -> Result<ResponseEnvelope> {
		self.send(Verb::Get, resource, params).await
	}

	/// Issues a `POST` with a JSON body.
	pub async fn post(&self, resource: &str, data: Option<Payload>) -> Result<ResponseEnvelope> {
		self.send(Verb::Post, resource, data).await
	}

	/// Issues a `PUT` with a JSON body.
	pub async fn put(&self, resource: &str, data: Option<Payload>) -> Result<ResponseEnvelope> {
		self.send(Verb::Put, resource, data).await
	}

	/// Issues a `PATCH` with a JSON body.
	pub async fn patch(&self, resource: &str, data: Option<Payload>) -> Result<ResponseEnvelope> {
		self.send(Verb::Patch, resource, data).await
	}

	/// Issues a `DELETE`.
	pub async fn delete(&self, resource: &str) -> Result<ResponseEnvelope> {
		self.send(Verb::Delete, resource, None).await
	}

	/// Uploads files as a multipart `POST`, one part per field.
	pub async fn file<I, K>(&self, resource: &str, files: I) -> Result<ResponseEnvelope>
	where
		I: IntoIterator<Item = (K, UploadFile)>,
		K: Into<String>,
	{
		self.file_with(Verb::Post, resource, files).await
	}

	/// Uploads files as a multipart request using `verb` (`POST`, `PUT`, or `PATCH`).
	pub async fn file_with<I, K>(
		&self,
		verb: Verb,
		resource: &str,
		files: I,
	) -> Result<ResponseEnvelope>
	where
		I: IntoIterator<Item = (K, UploadFile)>,
		K: Into<String>,
	{
		self.dispatch(verb, resource, |config| request::build_upload(verb, resource, files, config))
			.await
	}

	/// Issues a request for a verb given by name, e.g. `"patch"`.
	///
	/// Unknown verbs fail with [`Error::UnsupportedMethod`] before anything is built.
	pub async fn request(
		&self,
		method: &str,
		resource: &str,
		payload: Option<Payload>,
	) -> Result<ResponseEnvelope> {
		let verb = method.parse::<Verb>()?;

		self.send(verb, resource, payload).await
	}

	async fn send(
		&self,
		verb: Verb,
		resource: &str,
		payload: Option<Payload>,
	) -> Result<ResponseEnvelope> {
		self.dispatch(verb, resource, |config| {
			request::build(verb, resource, payload.as_ref(), config)
		})
		.await
	}

	async fn dispatch<B>(&self, verb: Verb, resource: &str, build: B) -> Result<ResponseEnvelope>
	where
		B: FnOnce(&Config) -> Result<RequestDescriptor>,
	{
		let span = CallSpan::new(verb.as_str(), resource);

		obs::record_call_outcome(verb.as_str(), CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let descriptor = self.prepare_with(build)?;
				let raw = self.transport.send(descriptor).await?;

				response::normalize(raw)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(verb.as_str(), CallOutcome::Success),
			Err(e) => {
				span.record_error(e);
				obs::record_call_outcome(verb.as_str(), CallOutcome::Failure);
			},
		}

		result
	}

	fn prepare_with<B>(&self, build: B) -> Result<RequestDescriptor>
	where
		B: FnOnce(&Config) -> Result<RequestDescriptor>,
	{
		let config = self.config.snapshot();

		if !config.is_configured() {
			return Err(ConfigError::NotConfigured.into());
		}

		build(&config)
	}
}
#[cfg(feature = "reqwest")]
impl Connector<ReqwestTransport> {
	/// Creates an unconfigured connector backed by a default reqwest client.
	pub fn new() -> Self {
		Self::with_transport(ReqwestTransport::default())
	}
}
#[cfg(feature = "reqwest")]
impl Default for Connector<ReqwestTransport> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T> Clone for Connector<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), transport: Arc::clone(&self.transport) }
	}
}
impl<T> Debug for Connector<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let config = self.config.snapshot();

		f.debug_struct("Connector")
			.field("base_url", &config.base_url)
			.field("auth_scheme", &config.auth_scheme().as_str())
			.finish()
	}
}
