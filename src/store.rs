//! Credential store contract consulted by the gateway and written by the authenticator.

pub mod memory;

pub use memory::MemoryCredentialStore;

// self
use crate::_prelude::*;

/// Default OAuth client used for the password and refresh grants.
pub const DEFAULT_UAA_CLIENT_ID: &str = "cf";
/// Default OAuth client used to request one-time SSH codes.
pub const DEFAULT_SSH_CLIENT_ID: &str = "ssh-proxy";

/// Storage contract for the session's credentials and endpoints.
///
/// Reads happen on every gateway call, so implementations should return cheap snapshots.
/// Only the authenticator writes tokens.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns a snapshot of the current credentials.
	fn credentials(&self) -> Credentials;

	/// Persists a freshly issued access/refresh token pair.
	fn save_tokens(&self, access_token: String, refresh_token: String);

	/// Persists the UAA endpoint discovered from the login server.
	fn save_uaa_endpoint(&self, endpoint: String);

	/// Current access token, including its type prefix (e.g. `bearer abc`).
	fn access_token(&self) -> String {
		self.credentials().access_token.expose().to_owned()
	}

	/// Whether certificate validation is disabled for the session.
	fn is_ssl_disabled(&self) -> bool {
		self.credentials().ssl_disabled
	}

	/// Async job timeout in minutes; zero waits forever.
	fn async_timeout_minutes(&self) -> u32 {
		self.credentials().async_timeout_minutes
	}
}

/// Session credentials and the endpoints they are valid for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Access token with its type prefix.
	pub access_token: TokenSecret,
	/// Refresh token used by the authenticator.
	pub refresh_token: TokenSecret,
	/// Cloud Controller API endpoint.
	pub api_endpoint: String,
	/// Login/authentication server endpoint.
	pub auth_endpoint: String,
	/// UAA endpoint (may differ from the login server).
	pub uaa_endpoint: String,
	/// Skip certificate validation entirely.
	pub ssl_disabled: bool,
	/// Async job timeout in minutes; zero disables the timeout.
	pub async_timeout_minutes: u32,
	/// OAuth client for password/refresh grants.
	pub uaa_client_id: String,
	/// Secret for [`Credentials::uaa_client_id`].
	pub uaa_client_secret: TokenSecret,
	/// OAuth client for one-time SSH codes.
	pub ssh_client_id: String,
}
impl Default for Credentials {
	fn default() -> Self {
		Self {
			access_token: TokenSecret::default(),
			refresh_token: TokenSecret::default(),
			api_endpoint: String::new(),
			auth_endpoint: String::new(),
			uaa_endpoint: String::new(),
			ssl_disabled: false,
			async_timeout_minutes: 0,
			uaa_client_id: DEFAULT_UAA_CLIENT_ID.into(),
			uaa_client_secret: TokenSecret::default(),
			ssh_client_id: DEFAULT_SSH_CLIENT_ID.into(),
		}
	}
}

/// Redacted token wrapper keeping sensitive material out of logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no secret is held.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
