//! Signs an outbound [`http::Request`] on behalf of a user whose credentials are already stored.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth1_broker::{
	auth::{ConsumerCredentials, Credentials, ProviderId, UserId},
	flows::ReqwestAuthenticator,
	http::HttpRequest,
	provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderQuirks},
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::default());
	let user = UserId::new("user-123")?;

	store.save(user.clone(), Credentials::new("demo-access", "demo-access-secret")).await?;

	let descriptor = ProviderDescriptor::builder(ProviderId::new("demo-provider")?)
		.request_token_endpoint(Url::parse("https://provider.example.com/oauth/request_token")?)
		.access_token_endpoint(Url::parse("https://provider.example.com/oauth/access_token")?)
		.authorize_endpoint(Url::parse("https://provider.example.com/oauth/authorize")?)
		.verify_endpoint(Url::parse("https://provider.example.com/oauth/verify")?)
		.redirect_uri(Url::parse("https://app.example.com/oauth/callback")?)
		.quirks(ProviderQuirks { verify_before_signing: false, ..Default::default() })
		.build()?;
	let authenticator = ReqwestAuthenticator::new(
		store,
		descriptor,
		Arc::new(DefaultProviderStrategy::new("demo")),
		ConsumerCredentials::new("demo-consumer").with_client_secret("demo-consumer-secret"),
	)?;
	let request: HttpRequest = http::Request::builder()
		.method("POST")
		.uri("https://api.example.com/1/statuses/update")
		.header("content-type", "application/x-www-form-urlencoded")
		.body(b"status=Hello%20Ladies%20%2B%20Gentlemen".to_vec())?;

	match authenticator.sign_http_request(&user, request).await? {
		Some(signed) => println!("Authorization: {:?}", signed.headers().get("authorization")),
		None => eprintln!("No credentials are stored for {user}."),
	}

	Ok(())
}
