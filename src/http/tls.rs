//! Trust-root inputs and certificate failure classification.

// self
use crate::{_prelude::*, error::SslReason};

/// Extra root certificate trusted in addition to the built-in roots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrustedCert {
	/// PEM-encoded certificate.
	Pem(Vec<u8>),
	/// DER-encoded certificate.
	Der(Vec<u8>),
}

/// Walks an error chain and reports why the peer certificate was rejected, if it was.
///
/// rustls reports certificate problems as `invalid peer certificate: <kind>` deep inside the
/// connector's error chain; only the rendered chain is stable across versions.
pub fn classify_certificate_failure(err: &(dyn StdError + 'static)) -> Option<SslReason> {
	let mut rendered = String::new();
	let mut current = Some(err);

	while let Some(layer) = current {
		rendered.push_str(&layer.to_string());
		rendered.push('\n');

		current = layer.source();
	}

	classify_rendered(&rendered)
}

fn classify_rendered(rendered: &str) -> Option<SslReason> {
	if rendered.contains("UnknownIssuer") || rendered.contains("unknown issuer") {
		return Some(SslReason::UnknownAuthority);
	}
	if rendered.contains("NotValidForName") || rendered.contains("not valid for name") {
		return Some(SslReason::HostnameMismatch);
	}
	if ["certificate expired", "not valid yet", "Expired", "NotValidYet"]
		.iter()
		.any(|needle| rendered.contains(needle))
	{
		return Some(SslReason::Expired);
	}

	rendered
		.lines()
		.find(|line| line.contains("invalid peer certificate"))
		.map(|line| SslReason::Other(line.trim().to_owned()))
}
