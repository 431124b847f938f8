//! Shared HTTP gateway for Cloud Controller and identity-service calls.
//!
//! A [`Gateway`] builds requests with the standard headers, sends them through an
//! [`HttpTransport`], retries attempts that never reached the server, classifies non-2xx
//! answers through the backend's [`ErrorClassifier`], and replays a request exactly once
//! after a rejected access token has been refreshed. Every received response feeds its
//! `X-Cf-Warnings` header to the session's [`WarningsCollector`].

pub mod job;
pub mod pagination;

pub use job::*;
pub use pagination::*;

// crates.io
use http::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
// self
use crate::{
	_prelude::*,
	auth::TokenRefresher,
	classify::ErrorClassifier,
	config::GatewayConfig,
	error::TransportError,
	http::{HttpTransport, RawResponse, TrustedCert, host_label},
	obs::{self, CallKind},
	request::{Request, SeekableBody},
	store::CredentialStore,
	warnings::{WARNINGS_HEADER, WarningsCollector},
};
#[cfg(feature = "reqwest")]
use crate::{
	classify::{CloudControllerClassifier, UaaClassifier},
	http::ReqwestTransport,
};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// HTTP gateway bound to one backend.
///
/// The gateway holds no call-scoped state; it can be shared behind an `Arc` and used from
/// many tasks at once. Only [`Gateway::set_trusted_certs`] needs exclusive access, and it is
/// meant to run during configuration.
pub struct Gateway<T>
where
	T: HttpTransport,
{
	transport: T,
	classifier: Arc<dyn ErrorClassifier>,
	store: Arc<dyn CredentialStore>,
	refresher: Option<Arc<dyn TokenRefresher>>,
	warnings: Arc<WarningsCollector>,
	clock: Arc<dyn Clock>,
	config: GatewayConfig,
	reauth_guard: AsyncMutex<()>,
}
impl<T> Gateway<T>
where
	T: HttpTransport,
{
	/// Creates a gateway around a caller-provided transport and classifier.
	pub fn with_transport(
		transport: T,
		classifier: Arc<dyn ErrorClassifier>,
		store: Arc<dyn CredentialStore>,
		config: GatewayConfig,
	) -> Self {
		let warnings = if config.fail_on_warnings {
			WarningsCollector::strict()
		} else {
			WarningsCollector::new()
		};

		Self {
			transport,
			classifier,
			store,
			refresher: None,
			warnings: Arc::new(warnings),
			clock: Arc::new(SystemClock),
			config,
			reauth_guard: AsyncMutex::new(()),
		}
	}

	/// Attaches the refresher used when a request fails with an invalid token.
	pub fn with_token_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
		self.refresher = Some(refresher);

		self
	}

	/// Shares a warnings collector with other gateways of the same session.
	pub fn with_warnings(mut self, warnings: Arc<WarningsCollector>) -> Self {
		self.warnings = warnings;

		self
	}

	/// Replaces the clock used by the job poller.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Runtime configuration.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Credential store consulted on every call.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Session warnings collector.
	pub fn warnings(&self) -> &Arc<WarningsCollector> {
		&self.warnings
	}

	/// Underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Async job timeout derived from the store; zero waits forever.
	pub fn async_timeout(&self) -> Duration {
		Duration::minutes(i64::from(self.store.async_timeout_minutes()))
	}

	/// Replaces the transport's trusted roots; the next call rebuilds its client.
	pub fn set_trusted_certs(&mut self, certs: Vec<TrustedCert>) -> Result<()> {
		self.transport.set_trusted_certs(certs)
	}

	/// Builds a request carrying the gateway's standard headers.
	pub fn build_request(
		&self,
		method: Method,
		url: &str,
		access_token: &str,
		body: Option<SeekableBody>,
	) -> Result<Request> {
		Request::new(method, url, access_token, body, &self.config.user_agent)
	}

	/// Sends the request and returns whatever response arrives, without classification.
	///
	/// Attempts failing before any response are retried up to
	/// [`GatewayConfig::max_connect_attempts`] times in total when the connection could not
	/// be established. Certificate failures and received responses are never retried.
	pub async fn execute_raw(&self, request: &mut Request) -> Result<RawResponse> {
		let raw = request.snapshot().map_err(|source| Error::ReplayFailed { source })?;
		let host = raw.host_label();
		let max_attempts = self.config.max_connect_attempts.max(1);
		let mut attempt = 1;

		obs::dump_request(&raw);

		let response = loop {
			match self.transport.send(raw.clone()).await {
				Ok(response) => break response,
				Err(err) if err.is_connection_failure() && attempt < max_attempts => {
					obs::connect_retry(&host, attempt, max_attempts, &err);

					attempt += 1;
				},
				Err(err) => return Err(classify_transport_error(host, err)),
			}
		};

		obs::dump_response(&response);
		self.warnings.observe(response.header_values(WARNINGS_HEADER));

		Ok(response)
	}

	/// Sends the request once and classifies any non-2xx response.
	pub async fn execute(&self, request: &mut Request) -> Result<RawResponse> {
		let response = self.execute_raw(request).await?;

		if !response.status.is_success() {
			return Err(self.classifier.classify(response.status.as_u16(), &response.body));
		}

		Ok(response)
	}

	/// Executes the request, refreshing the token and replaying it once on `InvalidToken`.
	///
	/// Requests sent without `Authorization`, gateways without a refresher, and failed
	/// refreshes all surface the original error.
	pub async fn perform_request(&self, request: &mut Request) -> Result<RawResponse> {
		obs::observe_call(CallKind::Request, "perform_request", async move {
			let stored = self.store.access_token();
			let err = match self.execute(request).await {
				Ok(response) => return Ok(response),
				Err(err) => err,
			};

			if !err.is_invalid_token() {
				return Err(err);
			}

			let Some(refresher) =
				self.refresher.as_ref().filter(|_| request.access_token().is_some())
			else {
				return Err(err);
			};

			obs::reauthenticating(&host_label(&request.url));

			let token = match self.refreshed_token(refresher.as_ref(), &stored).await {
				Ok(token) => token,
				Err(refresh_err) => {
					obs::refresh_failed(&refresh_err);

					return Err(err);
				},
			};

			request.set_access_token(&token)?;

			self.execute(request).await
		})
		.await
	}

	/// Performs the request and returns the body as text.
	pub async fn perform_request_for_text(&self, request: &mut Request) -> Result<String> {
		let response = self.perform_request(request).await?;

		Ok(response.text())
	}

	/// GETs `url` and decodes the JSON body.
	pub async fn fetch_json<R>(&self, url: &str, access_token: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let mut request = self.build_request(Method::GET, url, access_token, None)?;
		let response = self.perform_request(&mut request).await?;

		decode_json(&response)
	}

	/// [`Gateway::fetch_json`] with the stored access token.
	pub async fn get_resource<R>(&self, url: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.fetch_json(url, &self.store.access_token()).await
	}

	/// Sends a mutating request and decodes the answer.
	///
	/// Statuses above 203 and blank bodies yield `None`. When `async_job` is set and polling
	/// is enabled, `async=true` is appended to the URL and a returned `metadata.url` pointing
	/// at a job is appended to the API endpoint (the request's origin when none is stored)
	/// and awaited with the store's async timeout before returning.
	pub async fn mutate_json<R>(
		&self,
		method: Method,
		url: &str,
		access_token: &str,
		body: Option<SeekableBody>,
		async_job: bool,
	) -> Result<Option<R>>
	where
		R: DeserializeOwned,
	{
		let mut request = self.build_request(method, url, access_token, body)?;
		let poll = async_job && self.config.polling_enabled;

		if poll {
			request.append_query_pair("async", "true");
		}

		let response = self.perform_request(&mut request).await?;

		if response.status.as_u16() > 203 || response.is_blank() {
			return Ok(None);
		}

		let decoded = decode_json::<R>(&response)?;

		if poll {
			let resource = decode_json::<AsyncResource>(&response)?;
			let mut endpoint = self.store.credentials().api_endpoint;

			if endpoint.is_empty() {
				endpoint = request.url.origin().ascii_serialization();
			}

			if let Some(job_url) = resource.job_url(&endpoint) {
				let access_token = request.access_token().unwrap_or_default().to_owned();

				self.wait_for_job(job_url.as_str(), &access_token, self.async_timeout()).await?;
			}
		}

		Ok(Some(decoded))
	}

	/// POSTs `resource` as JSON with the stored access token.
	pub async fn create_resource_from_struct(
		&self,
		url: &str,
		resource: &impl Serialize,
	) -> Result<()> {
		self.send_struct(Method::POST, url, resource).await
	}

	/// PUTs `resource` as JSON with the stored access token.
	pub async fn update_resource_from_struct(
		&self,
		url: &str,
		resource: &impl Serialize,
	) -> Result<()> {
		self.send_struct(Method::PUT, url, resource).await
	}

	/// DELETEs `url`; unless `sync` is set, a returned job is awaited.
	pub async fn delete_resource(&self, url: &str, sync: bool) -> Result<()> {
		self.mutate_json::<IgnoredAny>(Method::DELETE, url, &self.store.access_token(), None, !sync)
			.await?;

		Ok(())
	}

	async fn send_struct(&self, method: Method, url: &str, resource: &impl Serialize) -> Result<()> {
		let body = SeekableBody::json(resource)?;
		let mut request =
			self.build_request(method, url, &self.store.access_token(), Some(body))?;

		self.perform_request(&mut request).await?;

		Ok(())
	}

	// Concurrent callers share one refresh: a stored token that changed since `stored` was
	// read has been refreshed by another caller in the meantime.
	async fn refreshed_token(&self, refresher: &dyn TokenRefresher, stored: &str) -> Result<String> {
		let _singleflight = self.reauth_guard.lock().await;
		let current = self.store.access_token();

		if !current.is_empty() && current != stored {
			return Ok(current);
		}

		refresher.refresh_auth_token().await
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a Cloud Controller gateway on the default transport.
	pub fn cloud_controller(store: Arc<dyn CredentialStore>, config: GatewayConfig) -> Self {
		let transport = ReqwestTransport::new(config.dial_timeout_std(), store.is_ssl_disabled());

		Self::with_transport(transport, Arc::new(CloudControllerClassifier), store, config)
	}

	/// Creates an identity-service gateway on the default transport.
	pub fn uaa(store: Arc<dyn CredentialStore>, config: GatewayConfig) -> Self {
		let transport = ReqwestTransport::new(config.dial_timeout_std(), store.is_ssl_disabled());

		Self::with_transport(transport, Arc::new(UaaClassifier), store, config)
	}
}
impl<T> Debug for Gateway<T>
where
	T: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("config", &self.config)
			.field("refresher_set", &self.refresher.is_some())
			.field("warnings", &self.warnings)
			.finish()
	}
}

/// Decodes a response body, reporting the failing path on error.
pub fn decode_json<R>(response: &RawResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::InvalidResponse { status: response.status.as_u16(), source })
}

fn classify_transport_error(host: String, err: TransportError) -> Error {
	match err {
		TransportError::Tls { reason, .. } => Error::Ssl { host, reason },
		source => Error::Network { host, source },
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::StatusCode;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		error::{HttpError, SslReason},
	};

	#[test]
	fn build_request_rejects_malformed_urls() {
		let (gateway, _, _) = cc_gateway(Vec::new());
		let err = gateway
			.build_request(Method::GET, ":not-well-formed", "", None)
			.expect_err("Malformed URL should fail.");

		assert!(matches!(err, Error::Config(_)));
	}

	#[tokio::test]
	async fn connection_failures_are_retried_three_times() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::ConnectionRefused,
			Scripted::ConnectionRefused,
			Scripted::ConnectionRefused,
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "", None)
			.expect("Request should build.");
		let err = gateway.execute(&mut request).await.expect_err("Refused connections should fail.");

		assert!(matches!(err, Error::Network { ref host, .. } if host == "api.example.com"));
		assert_eq!(transport.sent().len(), 3);
	}

	#[tokio::test]
	async fn transient_connection_failure_recovers() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::ConnectionRefused,
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "", None)
			.expect("Request should build.");

		gateway.execute(&mut request).await.expect("Second attempt should succeed.");

		assert_eq!(transport.sent().len(), 2);
	}

	#[tokio::test]
	async fn connect_timeouts_are_retried() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::ConnectTimeout,
			Scripted::ConnectTimeout,
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "", None)
			.expect("Request should build.");

		gateway.execute(&mut request).await.expect("Third attempt should succeed.");

		assert_eq!(transport.sent().len(), 3);
	}

	#[tokio::test]
	async fn received_server_errors_are_never_retried() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::Respond(RawResponse::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				r#"{"code":10001,"description":"Something went wrong"}"#,
			)),
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "", None)
			.expect("Request should build.");
		let err = gateway.execute(&mut request).await.expect_err("500 should fail.");

		assert_eq!(
			err.to_string(),
			HttpError::new(500, "10001", "Something went wrong").to_string()
		);
		assert_eq!(transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn certificate_failures_name_host_and_reason() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::Tls(SslReason::HostnameMismatch),
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com:8443/v2/info", "", None)
			.expect("Request should build.");
		let err = gateway.execute(&mut request).await.expect_err("TLS failure should surface.");

		match err {
			Error::Ssl { host, reason } => {
				assert_eq!(host, "api.example.com:8443");
				assert_eq!(reason, SslReason::HostnameMismatch);
			},
			other => panic!("Unexpected error: {other:?}."),
		}
		assert_eq!(transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn warnings_are_collected_from_error_responses() {
		let mut response = RawResponse::new(StatusCode::BAD_REQUEST, r#"{"code":1,"description":"x"}"#);

		response.headers.insert("x-cf-warnings", "Hello,Darling".parse().expect("Header should parse."));

		let (gateway, _, _) = cc_gateway(vec![Scripted::Respond(response)]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "", None)
			.expect("Request should build.");
		let _ = gateway.execute(&mut request).await;

		assert_eq!(gateway.warnings().snapshot(), vec!["Hello", "Darling"]);
	}

	#[tokio::test]
	async fn execute_raw_returns_redirects_unclassified() {
		let mut response = RawResponse::new(StatusCode::FOUND, "");

		response
			.headers
			.insert("location", "https://example.com?code=abc".parse().expect("Header should parse."));

		let (gateway, _, _) = cc_gateway(vec![Scripted::Respond(response)]);
		let mut request = gateway
			.build_request(Method::GET, "https://uaa.example.com/oauth/authorize", "", None)
			.expect("Request should build.");
		let response = gateway.execute_raw(&mut request).await.expect("Redirect should be returned.");

		assert_eq!(response.status, StatusCode::FOUND);
		assert_eq!(response.location(), Some("https://example.com?code=abc"));
	}

	#[tokio::test]
	async fn mutate_json_ignores_blank_and_non_ok_bodies() {
		let (gateway, transport, _) = cc_gateway(vec![
			Scripted::Respond(RawResponse::new(StatusCode::NO_CONTENT, "")),
			Scripted::Respond(RawResponse::new(StatusCode::CREATED, "  ")),
		]);
		let first = gateway
			.mutate_json::<serde_json::Value>(
				Method::DELETE,
				"https://api.example.com/v2/apps/guid",
				"bearer token",
				None,
				false,
			)
			.await
			.expect("204 should succeed.");
		let second = gateway
			.mutate_json::<serde_json::Value>(
				Method::POST,
				"https://api.example.com/v2/apps",
				"bearer token",
				Some(SeekableBody::from_bytes("{}")),
				false,
			)
			.await
			.expect("Blank body should succeed.");

		assert!(first.is_none());
		assert!(second.is_none());
		assert!(transport.sent().iter().all(|request| request.url.query().is_none()));
	}

	fn invalid_token() -> Scripted {
		Scripted::Respond(RawResponse::new(
			StatusCode::UNAUTHORIZED,
			r#"{"code":1000,"description":"Invalid Auth Token"}"#,
		))
	}

	fn authorization(request: &crate::http::RawRequest) -> Option<&[u8]> {
		request.headers.get("authorization").map(|value| value.as_bytes())
	}

	#[tokio::test]
	async fn replay_sends_identical_body_with_refreshed_token() {
		let (gateway, transport, store) = cc_gateway(vec![
			invalid_token(),
			Scripted::Respond(RawResponse::new(StatusCode::CREATED, r#"{"metadata":{}}"#)),
		]);
		let refresher = Arc::new(FakeRefresher::succeeding(store.clone(), "bearer new-access"));
		let gateway = gateway.with_token_refresher(refresher.clone());
		let mut request = gateway
			.build_request(
				Method::POST,
				"https://api.example.com/v2/apps",
				"bearer old-access",
				Some(SeekableBody::from_bytes(r#"{"name":"my-app","instances":3}"#)),
			)
			.expect("Request should build.");

		gateway.perform_request(&mut request).await.expect("Replay should succeed.");

		let sent = transport.sent();

		assert_eq!(refresher.calls(), 1);
		assert_eq!(sent.len(), 2);
		assert_eq!(sent[0].body, sent[1].body);
		assert_eq!(sent[1].body.as_deref(), Some(&br#"{"name":"my-app","instances":3}"#[..]));
		assert_eq!(authorization(&sent[0]), Some(&b"bearer old-access"[..]));
		assert_eq!(authorization(&sent[1]), Some(&b"bearer new-access"[..]));
	}

	#[tokio::test]
	async fn reauthentication_happens_at_most_once() {
		let (gateway, transport, store) =
			cc_gateway(vec![invalid_token(), invalid_token(), invalid_token()]);
		let refresher = Arc::new(FakeRefresher::succeeding(store.clone(), "bearer new-access"));
		let gateway = gateway.with_token_refresher(refresher.clone());
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "bearer old-access", None)
			.expect("Request should build.");
		let err = gateway.perform_request(&mut request).await.expect_err("Replay should fail.");

		assert!(err.is_invalid_token());
		assert_eq!(refresher.calls(), 1);
		assert_eq!(transport.sent().len(), 2);
	}

	#[tokio::test]
	async fn missing_refresher_returns_original_error() {
		let (gateway, transport, _) = cc_gateway(vec![invalid_token()]);
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "bearer old-access", None)
			.expect("Request should build.");
		let err = gateway.perform_request(&mut request).await.expect_err("Request should fail.");

		assert!(matches!(
			err,
			Error::InvalidToken { ref description } if description == "Invalid Auth Token"
		));
		assert_eq!(transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn failed_refresh_returns_original_error() {
		let (gateway, transport, store) = cc_gateway(vec![invalid_token()]);
		let refresher = Arc::new(FakeRefresher::failing(store));
		let gateway = gateway.with_token_refresher(refresher.clone());
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/apps", "bearer old-access", None)
			.expect("Request should build.");
		let err = gateway.perform_request(&mut request).await.expect_err("Request should fail.");

		assert!(err.is_invalid_token());
		assert_eq!(refresher.calls(), 1);
		assert_eq!(transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn unauthenticated_requests_are_not_refreshed() {
		let (gateway, transport, store) = cc_gateway(vec![invalid_token()]);
		let refresher = Arc::new(FakeRefresher::succeeding(store, "bearer new-access"));
		let gateway = gateway.with_token_refresher(refresher.clone());
		let mut request = gateway
			.build_request(Method::GET, "https://api.example.com/v2/info", "", None)
			.expect("Request should build.");
		let err = gateway.perform_request(&mut request).await.expect_err("Request should fail.");

		assert!(err.is_invalid_token());
		assert_eq!(refresher.calls(), 0);
		assert_eq!(transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn token_refreshed_elsewhere_is_reused() {
		let (gateway, _, store) = cc_gateway(Vec::new());
		let refresher = FakeRefresher::succeeding(store.clone(), "bearer never-used");

		store.save_tokens("bearer concurrent".into(), "concurrent-refresh".into());

		let token = gateway
			.refreshed_token(&refresher, "bearer old-access")
			.await
			.expect("Stored token should be reused.");

		assert_eq!(token, "bearer concurrent");
		assert_eq!(refresher.calls(), 0);
	}

	#[tokio::test]
	async fn caller_supplied_tokens_are_refreshed() {
		let (gateway, transport, store) = cc_gateway(vec![
			invalid_token(),
			Scripted::Respond(RawResponse::new(StatusCode::OK, "{}")),
		]);
		let refresher = Arc::new(FakeRefresher::succeeding(store.clone(), "bearer new-access"));
		let gateway = gateway.with_token_refresher(refresher.clone());

		gateway
			.fetch_json::<serde_json::Value>("https://api.example.com/v2/apps", "bearer caller-token")
			.await
			.expect("Replay should succeed.");

		let sent = transport.sent();

		assert_eq!(refresher.calls(), 1);
		assert_eq!(authorization(&sent[0]), Some(&b"bearer caller-token"[..]));
		assert_eq!(authorization(&sent[1]), Some(&b"bearer new-access"[..]));
	}

	#[tokio::test]
	async fn set_trusted_certs_reaches_transport() {
		let (mut gateway, transport, _) = cc_gateway(Vec::new());
		let cert = crate::http::TrustedCert::Der(vec![0x30, 0x82]);

		gateway.set_trusted_certs(vec![cert.clone()]).expect("Fake transport accepts any cert.");

		assert_eq!(transport.trusted_certs(), vec![cert]);
	}

	#[tokio::test]
	async fn fetch_json_reports_decode_failures() {
		let (gateway, _, _) =
			cc_gateway(vec![Scripted::Respond(RawResponse::new(StatusCode::OK, "not json"))]);
		let err = gateway
			.fetch_json::<serde_json::Value>("https://api.example.com/v2/info", "")
			.await
			.expect_err("Invalid JSON should fail.");

		assert!(matches!(err, Error::InvalidResponse { status: 200, .. }));
	}
}
