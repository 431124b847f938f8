//! Collector for non-fatal `X-Cf-Warnings` advisories.

// crates.io
use percent_encoding::percent_decode_str;
// self
use crate::_prelude::*;

/// Response header carrying URL-encoded, comma-separated warnings.
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Session-scoped, ordered warning accumulator.
///
/// The collector is shared (usually behind an `Arc`) by every gateway of a session, so
/// warnings from the Cloud Controller and the identity service land in one list in arrival
/// order.
#[derive(Debug, Default)]
pub struct WarningsCollector {
	seen: Mutex<Vec<String>>,
	strict: bool,
}
impl WarningsCollector {
	/// Creates a collector that reports warnings on [`flush`](Self::flush).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a collector that turns any warning into an error on flush.
	pub fn strict() -> Self {
		Self { seen: Mutex::default(), strict: true }
	}

	/// Whether flush fails when warnings were observed.
	pub fn is_strict(&self) -> bool {
		self.strict
	}

	/// Records raw header values in arrival order.
	pub fn observe<'a>(&self, values: impl IntoIterator<Item = &'a str>) {
		let decoded = values
			.into_iter()
			.flat_map(|value| value.split(','))
			.map(str::trim)
			.filter(|raw| !raw.is_empty())
			.map(decode_warning)
			.collect::<Vec<_>>();

		if decoded.is_empty() {
			return;
		}

		self.seen.lock().extend(decoded);
	}

	/// Returns the de-duplicated warnings in first-seen order without clearing them.
	pub fn flush(&self) -> Result<Vec<String>> {
		let warnings = self.snapshot();

		if self.strict && !warnings.is_empty() {
			return Err(Error::Warnings { warnings });
		}

		Ok(warnings)
	}

	/// Returns the de-duplicated warnings regardless of strict mode.
	pub fn snapshot(&self) -> Vec<String> {
		let seen = self.seen.lock();
		let mut unique = Vec::with_capacity(seen.len());

		for warning in seen.iter() {
			if !unique.contains(warning) {
				unique.push(warning.clone());
			}
		}

		unique
	}

	/// Clears the session.
	pub fn reset(&self) {
		self.seen.lock().clear();
	}
}

// Warnings are query-escaped, so `+` means space and `%XX` sequences must be decoded.
fn decode_warning(raw: &str) -> String {
	percent_decode_str(&raw.replace('+', " ")).decode_utf8_lossy().into_owned()
}
