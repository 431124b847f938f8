//! Outbound gateway requests with replayable bodies.

// std
use std::io::{Cursor, Read, Seek, SeekFrom};
// crates.io
use http::{
	HeaderMap, HeaderValue, Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
};
// self
use crate::{_prelude::*, error::ConfigError, http::RawRequest};

/// Content type sent (and accepted) by every gateway request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

trait ReadSeek: Read + Seek + Send {}
impl<T> ReadSeek for T where T: Read + Seek + Send {}

/// Request body that can be rewound and re-read.
///
/// A request may be sent twice when the first attempt fails with an invalid token, so the
/// body must be positioned back at its start before every send.
pub struct SeekableBody(Box<dyn ReadSeek>);
impl SeekableBody {
	/// Wraps any seekable reader (in-memory buffer, open file, ...).
	pub fn new(reader: impl 'static + Read + Seek + Send) -> Self {
		Self(Box::new(reader))
	}

	/// Wraps an owned byte buffer.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self::new(Cursor::new(bytes.into()))
	}

	/// Serializes `value` as JSON.
	pub fn json(value: &impl Serialize) -> Result<Self> {
		let bytes = serde_json::to_vec(value).map_err(ConfigError::from)?;

		Ok(Self::from_bytes(bytes))
	}

	/// Seeks to the start and reads the whole body.
	pub fn rewind_and_read(&mut self) -> std::io::Result<Vec<u8>> {
		let mut buf = Vec::new();

		self.0.seek(SeekFrom::Start(0))?;
		self.0.read_to_end(&mut buf)?;

		Ok(buf)
	}
}
impl Debug for SeekableBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SeekableBody(..)")
	}
}

/// Outbound HTTP request plus its optional seekable body.
#[derive(Debug)]
pub struct Request {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Optional replayable body.
	pub body: Option<SeekableBody>,
}
impl Request {
	/// Builds a request with the gateway's standard headers.
	///
	/// `Authorization` is set verbatim (e.g. `bearer abc`) when `access_token` is non-empty.
	pub fn new(
		method: Method,
		url: &str,
		access_token: &str,
		body: Option<SeekableBody>,
		user_agent: &str,
	) -> Result<Self> {
		let url = Url::parse(url)
			.map_err(|source| ConfigError::InvalidUrl { url: url.to_owned(), source })?;
		let mut request = Self { method, url, headers: HeaderMap::new(), body };

		request.headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
		request.headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
		request.set_header(USER_AGENT, "user-agent", user_agent)?;

		if !access_token.is_empty() {
			request.set_access_token(access_token)?;
		}

		Ok(request)
	}

	/// Current `Authorization` header value, if any.
	pub fn access_token(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}

	/// Replaces the `Authorization` header.
	pub fn set_access_token(&mut self, token: &str) -> Result<()> {
		let mut value = HeaderValue::from_str(token)
			.map_err(|source| ConfigError::InvalidHeader { name: "authorization", source })?;

		value.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, value);

		Ok(())
	}

	/// Appends a query parameter to the URL.
	pub fn append_query_pair(&mut self, key: &str, value: &str) {
		self.url.query_pairs_mut().append_pair(key, value);
	}

	/// Materializes the request for one send, rewinding the body to its start.
	pub fn snapshot(&mut self) -> std::io::Result<RawRequest> {
		let body = match self.body.as_mut() {
			Some(body) => Some(body.rewind_and_read()?),
			None => None,
		};

		Ok(RawRequest {
			method: self.method.clone(),
			url: self.url.clone(),
			headers: self.headers.clone(),
			body,
		})
	}

	fn set_header(
		&mut self,
		header: http::HeaderName,
		name: &'static str,
		value: &str,
	) -> Result<()> {
		let value = HeaderValue::from_str(value)
			.map_err(|source| ConfigError::InvalidHeader { name, source })?;

		self.headers.insert(header, value);

		Ok(())
	}
}
