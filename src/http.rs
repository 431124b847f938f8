//! Transport primitives for gateway calls.
//!
//! The module exposes [`HttpTransport`] alongside the plain [`RawRequest`] and
//! [`RawResponse`] snapshots so callers can plug in their own HTTP stack (or a scripted fake
//! in tests) without losing the gateway's retry, re-authentication, and classification
//! logic. A transport performs exactly one attempt per [`HttpTransport::send`]; retries are
//! the gateway's business.

pub mod tls;

pub use tls::TrustedCert;

// crates.io
use http::{HeaderMap, Method, StatusCode, header::LOCATION};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute one gateway request attempt.
///
/// Implementations must never follow redirects: the authorize flow treats the redirect
/// itself as its answer.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request once. Any received response, whatever its status, is `Ok`.
	fn send(&self, request: RawRequest) -> TransportFuture<'_>;

	/// Replaces the trusted root certificates used for server validation.
	///
	/// Called during configuration, before the transport is shared across tasks.
	fn set_trusted_certs(&mut self, certs: Vec<TrustedCert>) -> Result<()>;
}

/// Fully materialized outbound request handed to a transport.
#[derive(Clone, Debug)]
pub struct RawRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Body bytes, read from the start of the seekable body.
	pub body: Option<Vec<u8>>,
}
impl RawRequest {
	/// `host[:port]` label used in network and certificate errors.
	pub fn host_label(&self) -> String {
		host_label(&self.url)
	}
}

/// Received HTTP response with a fully buffered body.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response with no headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Returns every value of the named header that is valid UTF-8.
	pub fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
		self.headers.get_all(name).into_iter().filter_map(|value| value.to_str().ok())
	}

	/// Returns the `Location` header, if any.
	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|value| value.to_str().ok())
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Whether the body holds nothing but whitespace.
	pub fn is_blank(&self) -> bool {
		self.body.iter().all(u8::is_ascii_whitespace)
	}
}

pub(crate) fn host_label(url: &Url) -> String {
	match (url.host_str(), url.port()) {
		(Some(host), Some(port)) => format!("{host}:{port}"),
		(Some(host), None) => host.to_owned(),
		(None, _) => url.as_str().to_owned(),
	}
}

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
#[cfg(feature = "reqwest")]
mod reqwest_transport {
	// std
	use std::sync::OnceLock;
	// crates.io
	use reqwest::{Certificate, redirect::Policy};
	// self
	use super::*;
	use crate::{
		error::{ConfigError, TransportError},
		http::tls,
	};

	const TCP_KEEPALIVE: StdDuration = StdDuration::from_secs(30);

	/// Default transport backed by reqwest with rustls.
	///
	/// The underlying client is built on first use and reused afterwards; replacing the trusted
	/// roots swaps in a freshly built client. Idle connections are never pooled, redirects are
	/// never followed, and the connect phase is bounded by the configured dial timeout.
	#[derive(Debug)]
	pub struct ReqwestTransport {
		connect_timeout: StdDuration,
		ssl_disabled: bool,
		trusted_certs: Vec<Certificate>,
		client: OnceLock<ReqwestClient>,
	}
	impl ReqwestTransport {
		/// Creates a transport; `ssl_disabled` trusts every server certificate.
		pub fn new(connect_timeout: StdDuration, ssl_disabled: bool) -> Self {
			Self { connect_timeout, ssl_disabled, trusted_certs: Vec::new(), client: OnceLock::new() }
		}

		/// Whether certificate validation is disabled.
		pub fn is_ssl_disabled(&self) -> bool {
			self.ssl_disabled
		}

		fn client(&self) -> Result<ReqwestClient, TransportError> {
			if let Some(client) = self.client.get() {
				return Ok(client.clone());
			}

			let built = self
				.build_client(&self.trusted_certs)
				.map_err(|source| TransportError::Setup { source: Box::new(source) })?;

			Ok(self.client.get_or_init(|| built).clone())
		}

		fn build_client(&self, certs: &[Certificate]) -> Result<ReqwestClient, ReqwestError> {
			let mut builder = ReqwestClient::builder()
				.pool_max_idle_per_host(0)
				.connect_timeout(self.connect_timeout)
				.tcp_keepalive(TCP_KEEPALIVE)
				.redirect(Policy::none())
				.danger_accept_invalid_certs(self.ssl_disabled);

			for cert in certs {
				builder = builder.add_root_certificate(cert.clone());
			}

			builder.build()
		}

		async fn send_once(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
			let client = self.client()?;
			let mut builder = client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(map_reqwest_error)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

			Ok(RawResponse { status, headers, body })
		}
	}
	impl Default for ReqwestTransport {
		fn default() -> Self {
			Self::new(StdDuration::from_secs(5), false)
		}
	}
	impl HttpTransport for ReqwestTransport {
		fn send(&self, request: RawRequest) -> TransportFuture<'_> {
			Box::pin(self.send_once(request))
		}

		// rustls parses roots when the client is built, so the replacement client is built
		// here and a bad certificate leaves the previous roots in place.
		fn set_trusted_certs(&mut self, certs: Vec<TrustedCert>) -> Result<()> {
			let parsed = certs
				.iter()
				.map(|cert| match cert {
					TrustedCert::Pem(bytes) => Certificate::from_pem(bytes),
					TrustedCert::Der(bytes) => Certificate::from_der(bytes),
				})
				.collect::<Result<Vec<_>, _>>()
				.map_err(ConfigError::invalid_certificate)?;
			let client = self.build_client(&parsed).map_err(ConfigError::invalid_certificate)?;

			self.trusted_certs = parsed;
			self.client = OnceLock::from(client);

			Ok(())
		}
	}

	fn map_reqwest_error(err: ReqwestError) -> TransportError {
		if let Some(reason) = tls::classify_certificate_failure(&err) {
			return TransportError::Tls { reason, source: Box::new(err) };
		}
		// A connect timeout reports both flags and must stay retryable.
		if err.is_connect() {
			return TransportError::connect(err);
		}
		if err.is_timeout() {
			return TransportError::Timeout { source: Box::new(err) };
		}

		TransportError::network(err)
	}
}
