//! Resource helpers that forward fixed verbs and paths to a [`Connector`].

// self
use crate::{_prelude::*, connector::Connector, http::HttpTransport, response::ResponseEnvelope};

/// Case-file endpoints.
pub struct CaseFiles<'a, T>
where
	T: ?Sized + HttpTransport,
{
	connector: &'a Connector<T>,
}
impl<'a, T> CaseFiles<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(connector: &'a Connector<T>) -> Self {
		Self { connector }
	}

	/// Lists case files (`GET casefiles`).
	pub async fn list(&self) -> Result<ResponseEnvelope> {
		self.connector.get("casefiles", None).await
	}

	/// Looks up one case file (`GET casefile/{id}`).
	pub async fn find(&self, id: impl Display) -> Result<ResponseEnvelope> {
		self.connector.get(&format!("casefile/{id}"), None).await
	}
}
impl<T> Debug for CaseFiles<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CaseFiles").field("connector", self.connector).finish()
	}
}
