//! Optional observability helpers for gateway calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `cf_gateway.call` with the
//!   `call` and `stage` fields, plus debug events carrying sanitized request/response dumps.
//! - Enable `metrics` to increment the `cf_gateway_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`, and `cf_gateway_call_error_total`
//!   for every failure, labeled by `call` + `error` (the taxonomy tag).

mod dump;
mod metrics;
mod tracing;

pub use dump::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gateway call kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Plain request execution (with re-authentication).
	Request,
	/// Multi-page listing.
	Pagination,
	/// Async job polling.
	JobPoll,
	/// Refresh-token grant.
	TokenRefresh,
	/// Password grant.
	PasswordGrant,
	/// One-time code authorization.
	Authorize,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Request => "request",
			CallKind::Pagination => "pagination",
			CallKind::JobPoll => "job_poll",
			CallKind::TokenRefresh => "token_refresh",
			CallKind::PasswordGrant => "password_grant",
			CallKind::Authorize => "authorize",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a gateway helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
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

/// Runs `fut` inside a call span and records attempt + outcome.
pub(crate) async fn observe_call<T, Fut>(kind: CallKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, stage);

	record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_call_outcome(kind, CallOutcome::Success),
		Err(err) => {
			record_call_outcome(kind, CallOutcome::Failure);
			record_call_error(kind, err);
		},
	}

	result
}
