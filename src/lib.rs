//! Async client for the Penneo document-signing API: WSSE, bearer-token, and session
//! authentication behind one connector, with uniform `{ body, raw, status }` envelopes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod connector;
pub mod entity;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::io::{Error as IoError, ErrorKind as IoErrorKind};
	// self
	use crate::{
		error::TransportError,
		http::{HttpTransport, TransportFuture},
		request::RequestDescriptor,
		response::RawResponse,
	};

	#[derive(Clone, Debug)]
	enum Reply {
		Respond(RawResponse),
		Refuse(String),
	}

	/// Spy transport that records every dispatched descriptor and replies with a canned result.
	#[derive(Debug)]
	pub struct RecordingTransport {
		reply: Reply,
		requests: Mutex<Vec<RequestDescriptor>>,
	}
	impl RecordingTransport {
		/// Replies to every request with `response`.
		pub fn replying(response: RawResponse) -> Self {
			Self { reply: Reply::Respond(response), requests: Default::default() }
		}

		/// Fails every request with a connection-refused network error.
		pub fn refusing(message: impl Into<String>) -> Self {
			Self { reply: Reply::Refuse(message.into()), requests: Default::default() }
		}

		/// Number of descriptors dispatched so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}

		/// All dispatched descriptors in order.
		pub fn requests(&self) -> Vec<RequestDescriptor> {
			self.requests.lock().clone()
		}

		/// Most recently dispatched descriptor.
		pub fn last(&self) -> Option<RequestDescriptor> {
			self.requests.lock().last().cloned()
		}
	}
	impl Default for RecordingTransport {
		fn default() -> Self {
			Self::replying(RawResponse::new(200))
		}
	}
	impl HttpTransport for RecordingTransport {
		fn send(&self, request: RequestDescriptor) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			let reply = self.reply.clone();

			Box::pin(async move {
				match reply {
					Reply::Respond(response) => Ok(response),
					Reply::Refuse(message) =>
						Err(TransportError::network(IoError::new(IoErrorKind::ConnectionRefused, message))),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use crate::{
	auth::{AuthScheme, Secret, UsernameToken, WsseCredentials},
	config::{Config, ConfigUpdate, Credentials, SharedConfig},
	connector::Connector,
	error::{Error, ErrorKind, Result},
	http::HttpTransport,
	request::{Payload, RequestBody, RequestDescriptor, UploadFile, Verb},
	response::{RawBody, RawResponse, ResponseEnvelope},
};
#[cfg(feature = "reqwest")] pub use crate::{connector::ReqwestConnector, http::ReqwestTransport};
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
#[cfg(test)] use {color_eyre as _, httpmock as _};
