// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by connector calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the method and resource path.
	pub fn new(method: &'static str, resource: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("penneo_sdk.call", method, resource);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, resource);

			Self {}
		}
	}

	/// Records a failure kind on the span.
	pub fn record_error(&self, error: &Error) {
		#[cfg(feature = "tracing")]
		{
			let _guard = self.span.enter();

			tracing::warn!(kind = error.kind().as_str(), error = %error, "Penneo API call failed.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = error;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn call_span_noop_without_tracing() {
		let span = CallSpan::new("GET", "casefiles");

		span.record_error(&Error::unsupported_method("PATCHX"));
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new("POST", "casefiles");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
