#![cfg(feature = "reqwest")]

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use cf_gateway::{
	auth::{AuthPrompt, AuthPromptKind, UaaAuthenticator},
	config::GatewayConfig,
	error::{AuthError, Error},
	gateway::ReqwestGateway,
	store::{CredentialStore, Credentials, MemoryCredentialStore},
};

const BASIC_CF: &str = "Basic Y2Y6";

fn authenticator(
	auth_endpoint: &str,
) -> (UaaAuthenticator<cf_gateway::http::ReqwestTransport>, Arc<MemoryCredentialStore>) {
	let store = Arc::new(MemoryCredentialStore::new(Credentials {
		auth_endpoint: auth_endpoint.to_owned(),
		uaa_endpoint: auth_endpoint.to_owned(),
		ssh_client_id: "ssh-oauth-client".into(),
		..Credentials::default()
	}));
	let shared: Arc<dyn CredentialStore> = store.clone();

	(UaaAuthenticator::new(ReqwestGateway::uaa(shared, GatewayConfig::default())), store)
}

fn login_form() -> BTreeMap<String, String> {
	BTreeMap::from([
		("username".to_owned(), "foo@example.com".to_owned()),
		("password".to_owned(), "bar".to_owned()),
	])
}

#[tokio::test]
async fn password_grant_stores_tokens() {
	let server = MockServer::start_async().await;
	let (auth, store) = authenticator(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("authorization", BASIC_CF)
				.header("accept", "application/json")
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("grant_type=password")
				.body_includes("username=foo%40example.com")
				.body_includes("password=bar")
				.body_includes("scope=");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"my_access_token","token_type":"BEARER","refresh_token":"my_refresh_token","scope":"openid","expires_in":98765}"#,
			);
		})
		.await;

	auth.authenticate(&login_form()).await.expect("Password grant should succeed.");

	mock.assert_async().await;

	assert_eq!(store.access_token(), "BEARER my_access_token");
	assert_eq!(store.refresh_token(), "my_refresh_token");
}

#[tokio::test]
async fn password_grant_classifies_failures() {
	for (status, expected) in [
		(401, "Credentials were rejected, please try again."),
		(500, "The targeted API endpoint could not be reached."),
		(502, "The targeted API endpoint could not be reached."),
	] {
		let server = MockServer::start_async().await;
		let (auth, store) = authenticator(&server.base_url());
		let _mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth/token");
				then.status(status);
			})
			.await;
		let err = auth.authenticate(&login_form()).await.expect_err("Grant should fail.");

		assert_eq!(err.to_string(), expected);
		assert!(store.access_token().is_empty());
	}
}

#[tokio::test]
async fn expired_refresh_token_asks_for_login() {
	let server = MockServer::start_async().await;
	let (auth, _) = authenticator(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("grant_type=refresh_token");
			then.status(401).header("content-type", "application/json").body(
				r#"{"error":"invalid_token","error_description":"Invalid auth token: Invalid refresh token (expired): eyJhbGckjsdfdf"}"#,
			);
		})
		.await;
	let err = auth.refresh_auth_token().await.expect_err("Expired refresh should fail.");

	assert_eq!(
		err.to_string(),
		"Authentication has expired.  Please log back in to re-authenticate.\n\nTIP: Use `cf login -a <endpoint> -u <user> -o <org> -s <space>` to log back in and re-authenticate."
	);
}

#[tokio::test]
async fn login_prompts_record_uaa_endpoint() {
	let server = MockServer::start_async().await;
	let (auth, store) = authenticator(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"app": {"name": "UAA", "version": "1.4.7"},
					"links": {"login": "https://login.run.pivotal.io", "uaa": "https://uaa.run.pivotal.io"},
					"prompts": {"username": ["text", "Email"], "pin": ["password", "PIN Number"]}
				}"#,
			);
		})
		.await;
	let prompts = auth.login_prompts().await.expect("Login info should load.");

	assert_eq!(
		prompts,
		BTreeMap::from([
			(
				"username".to_owned(),
				AuthPrompt { kind: AuthPromptKind::Text, display_name: "Email".into() }
			),
			(
				"pin".to_owned(),
				AuthPrompt { kind: AuthPromptKind::Password, display_name: "PIN Number".into() }
			),
		])
	);
	assert_eq!(store.credentials().uaa_endpoint, "https://uaa.run.pivotal.io");
}

#[tokio::test]
async fn login_server_without_links_is_the_uaa() {
	let server = MockServer::start_async().await;
	let (auth, store) = authenticator(&server.base_url());

	store.update(|credentials| credentials.uaa_endpoint.clear());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/login");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"prompts": {"username": ["text", "Email"]}}"#);
		})
		.await;

	auth.login_prompts().await.expect("Login info should load.");

	assert_eq!(store.credentials().uaa_endpoint, server.base_url());
}

#[tokio::test]
async fn failing_login_info_returns_error() {
	let server = MockServer::start_async().await;
	let (auth, _) = authenticator(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/login");
			then.status(500);
		})
		.await;
	let err = auth.login_prompts().await.expect_err("Failing login info should fail.");

	assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn authorize_returns_one_time_code_from_redirect() {
	let server = MockServer::start_async().await;
	let (auth, _) = authenticator(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth/authorize")
				.header("authorization", "auth-token")
				.query_param("response_type", "code")
				.query_param("grant_type", "authorization_code")
				.query_param("client_id", "ssh-oauth-client");
			then.status(302).header("location", "https://www.cloudfoundry.example.com?code=F45jH");
		})
		.await;
	let code = auth.authorize("auth-token").await.expect("Authorize should succeed.");

	mock.assert_async().await;

	assert_eq!(code, "F45jH");
}

#[tokio::test]
async fn authorize_without_redirect_fails() {
	let server = MockServer::start_async().await;
	let (auth, _) = authenticator(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/authorize");
			then.status(200);
		})
		.await;
	let err = auth.authorize("auth-token").await.expect_err("Direct answer should fail.");

	assert_eq!(err.to_string(), "Authorization server did not redirect with one time code");
}

#[tokio::test]
async fn authorize_with_several_codes_fails() {
	let server = MockServer::start_async().await;
	let (auth, _) = authenticator(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/authorize");
			then.status(302)
				.header("location", "https://www.cloudfoundry.example.com?code=F45jH&code=LLLLL");
		})
		.await;
	let err = auth.authorize("auth-token").await.expect_err("Ambiguous codes should fail.");

	assert!(matches!(err, Error::Auth(AuthError::MissingOneTimeCode)));
	assert_eq!(err.to_string(), "Unable to acquire one time code from authorization response");
}

#[tokio::test]
async fn authorize_against_unreachable_server_fails() {
	let (auth, _) = authenticator("https://127.0.0.1:1");
	let err = auth.authorize("auth-token").await.expect_err("Unreachable UAA should fail.");

	assert!(err.to_string().contains("Error requesting one time code from server"));
}
