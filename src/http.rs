//! Transport primitives for Penneo API calls.
//!
//! [`HttpTransport`] is the connector's only dependency on an HTTP stack. It receives a fully
//! built [`RequestDescriptor`] and resolves to a [`RawResponse`] or a [`TransportError`];
//! response normalization stays in the connector. Implementations must not retry: each
//! descriptor is dispatched once. The default [`ReqwestTransport`] is available behind the
//! `reqwest` feature, and tests or embedders can inject their own implementation through
//! `Connector::with_transport`.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	RequestBuilder,
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, error::TransportError, request::RequestDescriptor, response::RawResponse};
#[cfg(feature = "reqwest")]
use crate::{
	request::{FilePart, RequestBody},
	response::RawBody,
};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one [`RequestDescriptor`].
///
/// Implementations must be `Send + Sync + 'static` so a connector can share them across
/// clones and tasks, and the returned future must be `Send` so calls can hop executors.
/// Non-2xx statuses are successful completions; only failures that prevent a response
/// from arriving belong in [`TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` exactly once.
	fn send(&self, request: RequestDescriptor) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies, and TLS settings are whatever the wrapped client was built with.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: RequestDescriptor) -> TransportFuture<'_> {
		Box::pin(async move {
			#[cfg(feature = "tracing")]
			tracing::debug!(
				method = request.method.as_str(),
				url = %request.url,
				multipart = request.is_multipart(),
				"Dispatching Penneo API request."
			);

			let builder = into_reqwest(&self.0, request)?;
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response.headers().to_owned();
			let text = response.text().await?;

			#[cfg(feature = "tracing")]
			tracing::debug!(status, len = text.len(), "Penneo API responded.");

			let body = if text.is_empty() { RawBody::Empty } else { RawBody::Text(text) };

			Ok(RawResponse { status, headers, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn into_reqwest(
	client: &ReqwestClient,
	request: RequestDescriptor,
) -> Result<RequestBuilder, TransportError> {
	let RequestDescriptor { method, url, headers, query, body } = request;
	let mut builder = client.request(method.into(), url).headers(headers);

	if !query.is_empty() {
		builder = builder.query(&query);
	}

	let builder = match body {
		RequestBody::Empty => builder,
		RequestBody::Json(bytes) => builder.body(bytes),
		RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
	};

	Ok(builder)
}

#[cfg(feature = "reqwest")]
fn multipart_form(parts: Vec<FilePart>) -> Result<Form, TransportError> {
	let mut form = Form::new();

	for FilePart { field, file } in parts {
		let mut part = Part::bytes(file.bytes).file_name(file.file_name);

		if let Some(content_type) = file.content_type.as_deref() {
			part = part.mime_str(content_type)?;
		}

		form = form.part(field, part);
	}

	Ok(form)
}
