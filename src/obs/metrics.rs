// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

/// Counts calls per kind and outcome in `cf_gateway_call_total` (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"cf_gateway_call_total",
		"call" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts failed calls per taxonomy tag in `cf_gateway_call_error_total` (when enabled).
pub fn record_call_error(kind: CallKind, err: &Error) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"cf_gateway_call_error_total",
		"call" => kind.as_str(),
		"error" => err.kind_label()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, err);
}
