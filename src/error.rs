//! Gateway error taxonomy shared by every layer built on top of the gateway.
//!
//! Every non-2xx response and every transport failure resolves to exactly one [`Error`]
//! variant. Callers branch on the variant (or on helpers such as [`Error::is_not_found`])
//! instead of inspecting raw transport errors.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The access token was rejected; a refresh should be attempted.
	#[error("Invalid auth token: {description}")]
	InvalidToken {
		/// Server-supplied description.
		description: String,
	},
	/// The server answered with a non-2xx status.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// No response was received from the host.
	#[error("Error performing request to {host}: {source}")]
	Network {
		/// Host (and port) the request targeted.
		host: String,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The server certificate failed validation.
	#[error("Received invalid SSL certificate from {host}: {reason}")]
	Ssl {
		/// Host (and port) presenting the certificate.
		host: String,
		/// Human-readable validation failure.
		reason: SslReason,
	},
	/// An async job did not reach a terminal state before the timeout elapsed.
	#[error("Timed out waiting for async job '{job_url}' to finish.")]
	AsyncTimeout {
		/// Job URL that can be inspected out-of-band.
		job_url: String,
	},
	/// An async job reached the `failed` state.
	#[error("{description}")]
	JobFailed {
		/// Server-supplied failure description.
		description: String,
	},
	/// The request body could not be rewound for a replay.
	#[error("Unable to rewind the request body for sending.")]
	ReplayFailed {
		/// Underlying seek/read failure.
		#[source]
		source: std::io::Error,
	},
	/// A successful response carried a body that is not valid JSON for the target type.
	#[error("Invalid JSON response from server.")]
	InvalidResponse {
		/// HTTP status of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Strict warning mode is enabled and the server reported warnings.
	#[error("Server reported warnings: {}", warnings.join("; "))]
	Warnings {
		/// De-duplicated warnings in first-seen order.
		warnings: Vec<String>,
	},
	/// Identity-service interaction failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns `true` for [`Error::InvalidToken`].
	pub fn is_invalid_token(&self) -> bool {
		matches!(self, Self::InvalidToken { .. })
	}

	/// Returns `true` when the server answered 404.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Http(err) if err.is_not_found())
	}

	/// Stable snake_case tag of the variant, used as a metric label.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Self::InvalidToken { .. } => "invalid_token",
			Self::Http(_) => "http",
			Self::Network { .. } => "network",
			Self::Ssl { .. } => "ssl",
			Self::AsyncTimeout { .. } => "async_timeout",
			Self::JobFailed { .. } => "job_failed",
			Self::ReplayFailed { .. } => "replay_failed",
			Self::InvalidResponse { .. } => "invalid_response",
			Self::Warnings { .. } => "warnings",
			Self::Auth(_) => "auth",
			Self::Config(_) => "config",
		}
	}

	/// HTTP status associated with the error, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Http(err) => Some(err.status),
			Self::InvalidResponse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Non-2xx response reduced to status, backend error code, and description.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Server error, status code: {status}, error code: {code}, message: {description}")]
pub struct HttpError {
	/// HTTP status code.
	pub status: u16,
	/// Backend-specific error code (numeric for the Cloud Controller, symbolic for UAA).
	pub code: String,
	/// Backend-supplied description.
	pub description: String,
}
impl HttpError {
	/// Creates a new HTTP error.
	pub fn new(status: u16, code: impl Into<String>, description: impl Into<String>) -> Self {
		Self { status, code: code.into(), description: description.into() }
	}

	/// Returns `true` for HTTP 404.
	pub fn is_not_found(&self) -> bool {
		self.status == 404
	}
}

/// Reason a server certificate was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SslReason {
	/// Certificate chain does not lead to a trusted root (e.g. self-signed).
	UnknownAuthority,
	/// Certificate does not cover the requested host name.
	HostnameMismatch,
	/// Certificate is expired or not yet valid.
	Expired,
	/// Any other validation failure.
	Other(String),
}
impl Display for SslReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::UnknownAuthority => f.write_str("unknown authority"),
			Self::HostnameMismatch => f.write_str("not valid for the requested host"),
			Self::Expired => f.write_str("certificate has expired or is not yet valid"),
			Self::Other(reason) => f.write_str(reason),
		}
	}
}

/// Transport-level failures; no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The connection could not be established (refused, unreachable, DNS).
	#[error("connection could not be established")]
	Connect {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The TLS handshake rejected the server certificate.
	#[error("TLS certificate validation failed: {reason}")]
	Tls {
		/// Classified validation failure.
		reason: SslReason,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The request timed out.
	#[error("request timed out")]
	Timeout {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The HTTP client could not be constructed.
	#[error("HTTP client could not be constructed")]
	Setup {
		/// Builder failure.
		#[source]
		source: BoxError,
	},
	/// Any other network failure.
	#[error("network failure")]
	Network {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a connect-phase failure.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a generic network failure.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` when no connection was established, the only retryable failure.
	pub fn is_connection_failure(&self) -> bool {
		matches!(self, Self::Connect { .. })
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A URL could not be parsed.
	#[error("Error building request: invalid URL `{url}`.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header value contains characters HTTP does not allow.
	#[error("Error building request: invalid `{name}` header value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// A trusted certificate could not be parsed.
	#[error("Trusted certificate could not be parsed.")]
	InvalidCertificate {
		/// Underlying parsing failure.
		#[source]
		source: BoxError,
	},
	/// A request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a certificate parsing failure.
	pub fn invalid_certificate(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidCertificate { source: Box::new(src) }
	}
}

/// Failures surfaced by the identity-service flows.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The password grant was rejected.
	#[error("Credentials were rejected, please try again.")]
	CredentialsRejected,
	/// The identity service answered with a server error.
	#[error("The targeted API endpoint could not be reached.")]
	EndpointUnreachable,
	/// The refresh token is no longer accepted.
	#[error(
		"Authentication has expired.  Please log back in to re-authenticate.\n\nTIP: Use `cf login -a <endpoint> -u <user> -o <org> -s <space>` to log back in and re-authenticate."
	)]
	SessionExpired,
	/// The identity service reported an error inside a successful response.
	#[error("Authentication server error: {description}")]
	Server {
		/// Server-supplied description.
		description: String,
	},
	/// The authorize endpoint answered directly instead of redirecting.
	#[error("Authorization server did not redirect with one time code")]
	NotRedirected,
	/// The redirect did not carry exactly one `code` parameter.
	#[error("Unable to acquire one time code from authorization response")]
	MissingOneTimeCode,
	/// The authorize request did not produce a response.
	#[error("Error requesting one time code from server: {source}")]
	OneTimeCodeRequest {
		/// Underlying gateway failure.
		#[source]
		source: Box<Error>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn http_error_message_names_status_code_and_description() {
		let err = Error::from(HttpError::new(400, "210003", "The host is taken: test1"));

		assert_eq!(
			err.to_string(),
			"Server error, status code: 400, error code: 210003, message: The host is taken: test1"
		);
		assert_eq!(err.status(), Some(400));
		assert!(!err.is_not_found());
		assert!(Error::from(HttpError::new(404, "10000", "Unknown request")).is_not_found());
	}

	#[test]
	fn ssl_error_names_host_and_reason() {
		let err = Error::Ssl { host: "api.example.com:443".into(), reason: SslReason::UnknownAuthority };

		assert_eq!(
			err.to_string(),
			"Received invalid SSL certificate from api.example.com:443: unknown authority"
		);
	}

	#[test]
	fn async_timeout_names_job_url() {
		let err = Error::AsyncTimeout { job_url: "https://api.example.com/v2/jobs/guid".into() };

		assert!(err.to_string().contains("https://api.example.com/v2/jobs/guid"));
		assert!(err.to_string().contains("Timed out"));
	}

	#[test]
	fn kind_labels_name_the_taxonomy_tag() {
		let network = Error::Network {
			host: "api.example.com".into(),
			source: TransportError::network(std::io::Error::other("reset")),
		};

		assert_eq!(Error::InvalidToken { description: String::new() }.kind_label(), "invalid_token");
		assert_eq!(Error::from(HttpError::new(404, "", "")).kind_label(), "http");
		assert_eq!(network.kind_label(), "network");
		assert_eq!(
			Error::Ssl { host: "api.example.com".into(), reason: SslReason::Expired }.kind_label(),
			"ssl"
		);
		assert_eq!(Error::AsyncTimeout { job_url: String::new() }.kind_label(), "async_timeout");
		assert_eq!(Error::from(AuthError::SessionExpired).kind_label(), "auth");
	}

	#[test]
	fn only_connect_failures_are_retryable() {
		let io = || std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");

		assert!(TransportError::connect(io()).is_connection_failure());
		assert!(!TransportError::network(io()).is_connection_failure());
		assert!(
			!TransportError::Tls { reason: SslReason::Expired, source: Box::new(io()) }
				.is_connection_failure()
		);
	}
}
