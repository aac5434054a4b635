//! Optional observability helpers for connector calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `penneo_sdk.call` with the `method` and
//!   `resource` fields.
//! - Enable `metrics` to increment the `penneo_sdk_call_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a connector verb.
	Attempt,
	/// Envelope delivered to the caller.
	Success,
	/// Error delivered to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
