// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by gateway calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("cf_gateway.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments a future without holding a guard across `.await` points.
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

/// Logs a connect failure that is about to be retried.
pub fn connect_retry(host: &str, attempt: u32, max_attempts: u32, err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::debug!(host, attempt, max_attempts, error = %err, "connection failed; retrying");
	#[cfg(not(feature = "tracing"))]
	let _ = (host, attempt, max_attempts, err);
}

/// Logs the start of a re-authentication for a rejected token.
pub fn reauthenticating(host: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(host, "access token rejected; refreshing before replay");
	#[cfg(not(feature = "tracing"))]
	let _ = host;
}

/// Logs a refresh failure; the original invalid-token error is surfaced instead.
pub fn refresh_failed(err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %err, "token refresh failed");
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

/// Logs one job status poll.
pub fn job_polled(job_url: &str, state: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(job_url, state, "polled async job");
	#[cfg(not(feature = "tracing"))]
	let _ = (job_url, state);
}
