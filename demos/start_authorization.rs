//! Walks through a full three-legged authorization against a local mock provider: temporary
//! token, browser redirect, verifier exchange, and the first signed header.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth1_broker::{
	auth::{ConsumerCredentials, ProviderId},
	flows::ReqwestAuthenticator,
	provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderQuirks, ProviderStrategy},
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let request_token = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/request_token");
			then.status(200).body(
				"oauth_token=demo-temp&oauth_token_secret=demo-temp-secret&oauth_callback_confirmed=true",
			);
		})
		.await;
	let access_token = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/access_token");
			then.status(200).body("oauth_token=demo-access&oauth_token_secret=demo-access-secret");
		})
		.await;
	let _verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(200);
		})
		.await;
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy::new("demo"));
	let descriptor = ProviderDescriptor::builder(ProviderId::new("demo-provider")?)
		.request_token_endpoint(Url::parse(&server.url("/oauth/request_token"))?)
		.access_token_endpoint(Url::parse(&server.url("/oauth/access_token"))?)
		.authorize_endpoint(Url::parse(&server.url("/oauth/authorize"))?)
		.verify_endpoint(Url::parse(&server.url("/oauth/verify"))?)
		.redirect_uri(Url::parse(&server.url("/oauth/callback"))?)
		.quirks(ProviderQuirks { allow_insecure_endpoints: true, ..Default::default() })
		.build()?;
	let authenticator = ReqwestAuthenticator::new(
		store,
		descriptor,
		strategy,
		ConsumerCredentials::new("demo-consumer").with_client_secret("demo-consumer-secret"),
	)?;
	let session = authenticator
		.begin_authorization(&Url::parse(
			"https://app.example.com/api/oauth/authenticate?oauth_provider=demo&userId=user-123",
		)?)
		.await?;

	request_token.assert_async().await;

	println!("Send your user to {}.", &session.authorize_url);

	// Simulate the provider redirecting the browser back with a verifier.
	let mut callback = session.callback_url.clone();

	callback
		.query_pairs_mut()
		.append_pair("oauth_token", &session.temporary_token)
		.append_pair("oauth_verifier", "demo-verifier");

	let user = authenticator.complete_authorization(&callback).await?;

	access_token.assert_async().await;

	println!("Stored credentials for {user}.");

	if let Some(header) = authenticator
		.authorization_header_for(&user, "GET", &Url::parse("https://api.example.com/1/me")?, &[])
		.await?
	{
		println!("Authorization: {header}");
	}

	Ok(())
}
