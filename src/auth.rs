//! Identity-service (UAA) flows: password grant, refresh grant, one-time codes, and prompts.
//!
//! [`UaaAuthenticator`] owns a gateway built with the identity-service classifier and writes
//! issued tokens to the shared [`CredentialStore`]. It also implements [`TokenRefresher`],
//! which is how the Cloud Controller gateway re-authenticates rejected requests.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use http::{HeaderValue, Method, header::CONTENT_TYPE};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::AuthError,
	gateway::{Gateway, decode_json},
	http::HttpTransport,
	obs::{self, CallKind},
	request::SeekableBody,
	store::{CredentialStore, Credentials},
};

/// Content type of OAuth token requests.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Boxed future returned by [`TokenRefresher::refresh_auth_token`].
pub type RefreshFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Source of fresh access tokens for a gateway's re-authentication path.
pub trait TokenRefresher
where
	Self: 'static + Send + Sync,
{
	/// Obtains and persists a new access token, returning it with its type prefix.
	fn refresh_auth_token(&self) -> RefreshFuture<'_>;
}

/// Outcome of a one-time code request.
///
/// The authorize endpoint answers with a redirect on success, so a redirect is the happy path
/// and a direct answer means authorization was not granted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorizeOutcome {
	/// Redirected with exactly one `code` query parameter.
	RedirectedWithCode(String),
	/// Redirected, but with no `code` or several of them.
	RedirectedWithoutCode,
	/// Answered without redirecting.
	RespondedDirectly {
		/// HTTP status of the direct answer.
		status: u16,
	},
}

/// Input kind of a login prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPromptKind {
	/// Plain text input.
	Text,
	/// Hidden input.
	Password,
}

/// Login prompt advertised by the login server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthPrompt {
	/// Input kind.
	pub kind: AuthPromptKind,
	/// Label shown to the user.
	pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: String,
	#[serde(default)]
	token_type: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	error: Option<EmbeddedError>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedError {
	#[serde(default)]
	error_description: String,
}

#[derive(Debug, Deserialize)]
struct LoginInfo {
	#[serde(default)]
	links: BTreeMap<String, String>,
	#[serde(default)]
	prompts: BTreeMap<String, Vec<String>>,
}

/// Authenticator driving the identity-service endpoints.
pub struct UaaAuthenticator<T>
where
	T: HttpTransport,
{
	gateway: Gateway<T>,
	store: Arc<dyn CredentialStore>,
}
impl<T> UaaAuthenticator<T>
where
	T: HttpTransport,
{
	/// Wraps a gateway configured with the identity-service classifier.
	pub fn new(gateway: Gateway<T>) -> Self {
		let store = gateway.store().clone();

		Self { gateway, store }
	}

	/// Gateway used for identity-service calls.
	pub fn gateway(&self) -> &Gateway<T> {
		&self.gateway
	}

	/// Exchanges the stored refresh token for a new token pair.
	///
	/// A rejected refresh token means the session is over and maps to
	/// [`AuthError::SessionExpired`].
	pub async fn refresh_auth_token(&self) -> Result<String> {
		obs::observe_call(CallKind::TokenRefresh, "refresh_auth_token", async move {
			let credentials = self.store.credentials();
			let form = [
				("grant_type", "refresh_token"),
				("refresh_token", credentials.refresh_token.expose()),
				("scope", ""),
			];

			match self.request_token(&credentials, form).await {
				Ok(()) => Ok(self.store.access_token()),
				Err(err) if err.is_invalid_token() => Err(AuthError::SessionExpired.into()),
				Err(err) => Err(err),
			}
		})
		.await
	}

	/// Runs the password grant with the prompted `credentials` (e.g. `username`, `password`).
	pub async fn authenticate(&self, credentials: &BTreeMap<String, String>) -> Result<()> {
		obs::observe_call(CallKind::PasswordGrant, "authenticate", async move {
			let stored = self.store.credentials();
			let form = [("grant_type", "password"), ("scope", "")]
				.into_iter()
				.chain(credentials.iter().map(|(key, value)| (key.as_str(), value.as_str())));

			match self.request_token(&stored, form).await {
				Ok(()) => Ok(()),
				Err(Error::InvalidToken { .. }) => Err(AuthError::CredentialsRejected.into()),
				Err(Error::Http(err)) if err.status == 401 =>
					Err(AuthError::CredentialsRejected.into()),
				Err(Error::Http(err)) if err.status >= 500 =>
					Err(AuthError::EndpointUnreachable.into()),
				Err(err) => Err(err),
			}
		})
		.await
	}

	/// Requests a one-time code for `one_time_token` without following the redirect.
	pub async fn request_authorization(&self, one_time_token: &str) -> Result<AuthorizeOutcome> {
		let credentials = self.store.credentials();
		let url = format!("{}/oauth/authorize", credentials.uaa_endpoint);
		let mut request = self.gateway.build_request(Method::GET, &url, one_time_token, None)?;

		request.append_query_pair("response_type", "code");
		request.append_query_pair("grant_type", "authorization_code");
		request.append_query_pair("client_id", &credentials.ssh_client_id);

		let response = match self.gateway.execute_raw(&mut request).await {
			Ok(response) => response,
			Err(err @ (Error::Network { .. } | Error::Ssl { .. })) =>
				return Err(AuthError::OneTimeCodeRequest { source: Box::new(err) }.into()),
			Err(err) => return Err(err),
		};

		if !response.status.is_redirection() {
			return Ok(AuthorizeOutcome::RespondedDirectly { status: response.status.as_u16() });
		}

		let codes = response
			.location()
			.and_then(|location| request.url.join(location).ok())
			.map(|location| {
				location
					.query_pairs()
					.filter(|(key, _)| key == "code")
					.map(|(_, value)| value.into_owned())
					.collect::<Vec<_>>()
			})
			.unwrap_or_default();

		match <[String; 1]>::try_from(codes) {
			Ok([code]) => Ok(AuthorizeOutcome::RedirectedWithCode(code)),
			Err(_) => Ok(AuthorizeOutcome::RedirectedWithoutCode),
		}
	}

	/// Returns the one-time code granted for `one_time_token`.
	pub async fn authorize(&self, one_time_token: &str) -> Result<String> {
		obs::observe_call(CallKind::Authorize, "authorize", async move {
			match self.request_authorization(one_time_token).await? {
				AuthorizeOutcome::RedirectedWithCode(code) => Ok(code),
				AuthorizeOutcome::RedirectedWithoutCode => Err(AuthError::MissingOneTimeCode.into()),
				AuthorizeOutcome::RespondedDirectly { .. } => Err(AuthError::NotRedirected.into()),
			}
		})
		.await
	}

	/// Fetches the login prompts and records the advertised UAA endpoint.
	///
	/// Login servers without a `links.uaa` entry are themselves the UAA.
	pub async fn login_prompts(&self) -> Result<BTreeMap<String, AuthPrompt>> {
		let credentials = self.store.credentials();
		let url = format!("{}/login", credentials.auth_endpoint);
		let mut request = self.gateway.build_request(Method::GET, &url, "", None)?;
		let response = self.gateway.execute(&mut request).await?;
		let info = decode_json::<LoginInfo>(&response)?;
		let uaa_endpoint = info
			.links
			.get("uaa")
			.filter(|endpoint| !endpoint.is_empty())
			.cloned()
			.unwrap_or(credentials.auth_endpoint);

		self.store.save_uaa_endpoint(uaa_endpoint);

		Ok(info
			.prompts
			.into_iter()
			.map(|(name, prompt)| {
				let kind = match prompt.first().map(String::as_str) {
					Some("password") => AuthPromptKind::Password,
					_ => AuthPromptKind::Text,
				};
				let display_name = prompt.get(1).cloned().unwrap_or_default();

				(name, AuthPrompt { kind, display_name })
			})
			.collect())
	}

	async fn request_token<'a>(
		&self,
		credentials: &Credentials,
		form: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Result<()> {
		let url = format!("{}/oauth/token", credentials.auth_endpoint);
		let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(form).finish();
		let mut request = self.gateway.build_request(
			Method::POST,
			&url,
			&basic_auth(credentials),
			Some(SeekableBody::from_bytes(body)),
		)?;

		request.headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

		let response = self.gateway.execute(&mut request).await?;
		let token = decode_json::<TokenResponse>(&response)?;

		if let Some(error) = token.error {
			return Err(AuthError::Server { description: error.error_description }.into());
		}

		let refresh_token = token
			.refresh_token
			.unwrap_or_else(|| credentials.refresh_token.expose().to_owned());

		self.store.save_tokens(format!("{} {}", token.token_type, token.access_token), refresh_token);

		Ok(())
	}
}
impl<T> TokenRefresher for UaaAuthenticator<T>
where
	T: HttpTransport,
{
	fn refresh_auth_token(&self) -> RefreshFuture<'_> {
		Box::pin(UaaAuthenticator::refresh_auth_token(self))
	}
}
impl<T> Debug for UaaAuthenticator<T>
where
	T: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UaaAuthenticator").field("gateway", &self.gateway).finish()
	}
}

fn basic_auth(credentials: &Credentials) -> String {
	let pair = format!("{}:{}", credentials.uaa_client_id, credentials.uaa_client_secret.expose());

	format!("Basic {}", STANDARD.encode(pair))
}
