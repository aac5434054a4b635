//! Demonstrates plugging a custom transport into the connector.
//!
//! 1. Implement [`HttpTransport`] so it turns a [`RequestDescriptor`] into a [`RawResponse`].
//! 2. Wrap it in `Arc` and pass it to [`Connector::with_transport`].
//! 3. Failures the transport reports surface as [`TransportError`] values.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
// self
use penneo_sdk::{
	ConfigUpdate, Connector, HttpTransport, RawResponse, RequestBody, RequestDescriptor,
	error::TransportError, http::TransportFuture, serde_json::json,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let connector: Connector<OfflineTransport> =
		Connector::with_transport(Arc::new(OfflineTransport::Online));

	connector.init(ConfigUpdate::new().base_url("https://sandbox.penneo.com/api/v3/").token("demo"))?;

	let envelope = connector.post("casefiles", Some(json!({ "title": "Lease agreement" }))).await?;

	println!("Offline transport answered HTTP {}: {}.", envelope.status, envelope.body);

	let failing: Connector<OfflineTransport> =
		Connector::with_transport(Arc::new(OfflineTransport::Down { host: "sandbox.penneo.com" }));

	failing.init(ConfigUpdate::new().base_url("https://sandbox.penneo.com/api/v3/"))?;

	match failing.get("casefiles", None).await {
		Ok(_) => println!("Offline transport unexpectedly succeeded."),
		Err(e) => println!("Transport failure surfaced as {}: {e}.", e.kind()),
	}

	Ok(())
}

#[derive(Debug)]
struct DnsFailure {
	host: &'static str,
}
impl Display for DnsFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DNS lookup failed for {}", self.host)
	}
}
impl StdError for DnsFailure {}

enum OfflineTransport {
	Online,
	Down { host: &'static str },
}
impl HttpTransport for OfflineTransport {
	fn send(&self, request: RequestDescriptor) -> TransportFuture<'_> {
		Box::pin(async move {
			match self {
				Self::Online => {
					let echoed = match &request.body {
						RequestBody::Json(bytes) => String::from_utf8_lossy(bytes).into_owned(),
						_ => "{}".to_owned(),
					};

					Ok(RawResponse::new(201).with_text(echoed))
				},
				Self::Down { host } => Err(TransportError::network(DnsFailure { host: *host })),
			}
		})
	}
}
