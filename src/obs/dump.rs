//! Sanitized request/response dumps for debug logging.

// crates.io
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	http::{RawRequest, RawResponse},
};

/// Replacement written in place of secrets.
pub const PRIVATE_DATA_PLACEHOLDER: &str = "[PRIVATE DATA HIDDEN]";

const SENSITIVE_KEYS: &[&str] = &[
	"access_token",
	"refresh_token",
	"password",
	"oldpassword",
	"token",
	"credentials",
	"client_secret",
];

/// Renders a request with `Authorization` and body secrets redacted.
pub fn render_request(request: &RawRequest) -> String {
	let mut out = format!("REQUEST:\n{} {}\n", request.method, request.url);

	for (name, value) in &request.headers {
		let shown = if name == AUTHORIZATION {
			PRIVATE_DATA_PLACEHOLDER.into()
		} else {
			String::from_utf8_lossy(value.as_bytes()).into_owned()
		};

		out.push_str(&format!("{name}: {shown}\n"));
	}
	if let Some(body) = &request.body {
		let content_type = request.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

		out.push('\n');
		out.push_str(&sanitize_body(content_type, body));
	}

	out
}

/// Renders a response with body secrets redacted.
pub fn render_response(response: &RawResponse) -> String {
	let mut out = format!("RESPONSE:\n{}\n", response.status);

	for (name, value) in &response.headers {
		out.push_str(&format!("{name}: {}\n", String::from_utf8_lossy(value.as_bytes())));
	}

	let content_type = response.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

	out.push('\n');
	out.push_str(&sanitize_body(content_type, &response.body));

	out
}

/// Redacts secrets from a JSON or form-encoded body; other bodies pass through.
pub fn sanitize_body(content_type: Option<&str>, body: &[u8]) -> String {
	if let Ok(mut value) = serde_json::from_slice::<Value>(body) {
		redact_json(&mut value);

		return value.to_string();
	}
	if content_type.is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded")) {
		return form_urlencoded::Serializer::new(String::new())
			.extend_pairs(form_urlencoded::parse(body).map(|(key, value)| {
				if is_sensitive(&key) {
					(key, PRIVATE_DATA_PLACEHOLDER.into())
				} else {
					(key, value)
				}
			}))
			.finish();
	}

	String::from_utf8_lossy(body).into_owned()
}

/// Emits a sanitized request dump at debug level.
pub fn dump_request(request: &RawRequest) {
	#[cfg(feature = "tracing")]
	if ::tracing::enabled!(::tracing::Level::DEBUG) {
		::tracing::debug!(dump = %render_request(request), "outbound request");
	}
	#[cfg(not(feature = "tracing"))]
	let _ = request;
}

/// Emits a sanitized response dump at debug level.
pub fn dump_response(response: &RawResponse) {
	#[cfg(feature = "tracing")]
	if ::tracing::enabled!(::tracing::Level::DEBUG) {
		::tracing::debug!(dump = %render_response(response), "inbound response");
	}
	#[cfg(not(feature = "tracing"))]
	let _ = response;
}

fn redact_json(value: &mut Value) {
	match value {
		Value::Object(map) =>
			for (key, entry) in map.iter_mut() {
				if is_sensitive(key) && !entry.is_object() && !entry.is_array() {
					*entry = Value::String(PRIVATE_DATA_PLACEHOLDER.into());
				} else {
					redact_json(entry);
				}
			},
		Value::Array(items) => items.iter_mut().for_each(redact_json),
		_ => {},
	}
}

fn is_sensitive(key: &str) -> bool {
	let lowered = key.to_ascii_lowercase();

	SENSITIVE_KEYS.contains(&lowered.as_str())
}
