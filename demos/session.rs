//! Demonstrates a full session against mock servers: password login, a listing that survives an
//! expired access token, and the warnings collected along the way.

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use cf_gateway::{
	auth::UaaAuthenticator,
	config::GatewayConfig,
	gateway::ReqwestGateway,
	store::{CredentialStore, Credentials, MemoryCredentialStore},
	warnings::WarningsCollector,
};

#[derive(Debug, Deserialize)]
struct Org {
	entity: OrgEntity,
}

#[derive(Debug, Deserialize)]
struct OrgEntity {
	name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let api = MockServer::start_async().await;
	let uaa = MockServer::start_async().await;
	let login = uaa
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("grant_type=password");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"stale","token_type":"bearer","refresh_token":"demo-refresh"}"#,
			);
		})
		.await;
	let refresh = uaa
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("grant_type=refresh_token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"fresh","token_type":"bearer","refresh_token":"demo-refresh-2"}"#,
			);
		})
		.await;
	let rejected = api
		.mock_async(|when, then| {
			when.method(GET).path("/v2/organizations").header("authorization", "bearer stale");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"code":1000,"description":"Invalid Auth Token"}"#);
		})
		.await;
	let listed = api
		.mock_async(|when, then| {
			when.method(GET).path("/v2/organizations").header("authorization", "bearer fresh");
			then.status(200)
				.header("content-type", "application/json")
				.header("x-cf-warnings", "Org+quota+is+almost+exhausted")
				.body(r#"{"next_url":null,"resources":[{"entity":{"name":"demo-org"}}]}"#);
		})
		.await;
	let store = Arc::new(MemoryCredentialStore::new(Credentials {
		api_endpoint: api.base_url(),
		auth_endpoint: uaa.base_url(),
		uaa_endpoint: uaa.base_url(),
		..Credentials::default()
	}));
	let shared: Arc<dyn CredentialStore> = store.clone();
	let config = GatewayConfig::from_env();
	let warnings = Arc::new(WarningsCollector::new());
	let authenticator = Arc::new(UaaAuthenticator::new(
		ReqwestGateway::uaa(shared.clone(), config.clone()).with_warnings(warnings.clone()),
	));

	authenticator
		.authenticate(&BTreeMap::from([
			("username".to_owned(), "demo@example.com".to_owned()),
			("password".to_owned(), "demo".to_owned()),
		]))
		.await?;

	let gateway = ReqwestGateway::cloud_controller(shared.clone(), config)
		.with_warnings(warnings.clone())
		.with_token_refresher(authenticator);

	gateway
		.list_pages::<Org, _>(&api.base_url(), &shared.access_token(), "/v2/organizations", |orgs| {
			for org in orgs {
				println!("Organization: {}.", org.entity.name);
			}

			true
		})
		.await?;

	for warning in warnings.flush()? {
		println!("Warning: {warning}.");
	}

	login.assert_async().await;
	refresh.assert_async().await;
	rejected.assert_async().await;
	listed.assert_async().await;

	Ok(())
}
