// crates.io
use httpmock::prelude::*;
// self
use oauth1_broker::{
	_preludet::*,
	auth::{ConsumerCredentials, Credentials, TokenSecret, UserId},
	flows::TokenValidity,
	http::HttpRequest,
	provider::{DefaultProviderStrategy, ProviderQuirks},
	signer::{OAuthParameters, SignatureMethod, SigningMode, parse_authorization_header},
	store::{CredentialStore, MemoryStore},
};

const CLIENT_ID: &str = "consumer-signing";
const CLIENT_SECRET: &str = "consumer-signing-secret";

fn user(id: &str) -> UserId {
	UserId::new(id).expect("User identifier fixture should be valid.")
}

fn resource() -> Url {
	Url::parse("https://api.example.com/1/statuses?count=2&include_entities=true")
		.expect("Resource URL should parse.")
}

async fn authenticator_with(
	server: &MockServer,
	quirks: ProviderQuirks,
) -> (ReqwestTestAuthenticator, Arc<MemoryStore>) {
	let (authenticator, store) = build_reqwest_test_authenticator(
		test_descriptor_with(&server.base_url(), quirks),
		ConsumerCredentials::new(CLIENT_ID).with_client_secret(CLIENT_SECRET),
		Arc::new(DefaultProviderStrategy::new("mock")),
	);

	store
		.save(user("alice"), Credentials::new("T2", "S2"))
		.await
		.expect("Seeding the store should succeed.");

	(authenticator, store)
}

#[tokio::test]
async fn headers_carry_a_verifiable_hmac_signature() {
	let server = MockServer::start_async().await;
	let (authenticator, _) = authenticator_with(&server, ProviderQuirks::default()).await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth/verify")
				.header_includes("authorization", "oauth_token=\"T2\"");
			then.status(200);
		})
		.await;
	let params = vec![("status".to_owned(), "Hello Ladies + Gentlemen".to_owned())];
	let header = authenticator
		.authorization_header_for(&user("alice"), "POST", &resource(), &params)
		.await
		.expect("Header computation should succeed.")
		.expect("Alice should have credentials.");

	verify.assert_async().await;

	let fields = parse_authorization_header(&header).expect("Header should parse.");
	let timestamp = fields["oauth_timestamp"].parse().expect("Timestamp should be numeric.");
	let expected = OAuthParameters::new(CLIENT_ID, SignatureMethod::HmacSha1)
		.with_token("T2")
		.with_nonce(fields["oauth_nonce"].clone())
		.with_timestamp(timestamp)
		.sign(
			"POST",
			&resource(),
			&params,
			&SigningMode::hmac(CLIENT_SECRET),
			&TokenSecret::new("S2"),
		)
		.expect("Reference signature should compute.");

	assert_eq!(fields.get("oauth_signature"), expected.signature.as_ref());
}

#[tokio::test]
async fn fresh_nonces_are_used_for_every_header() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { verify_before_signing: false, ..Default::default() };
	let (authenticator, _) = authenticator_with(&server, quirks).await;
	let alice = user("alice");
	let mut nonces = Vec::new();

	for _ in 0..3 {
		let header = authenticator
			.authorization_header_for(&alice, "GET", &resource(), &[])
			.await
			.expect("Header computation should succeed.")
			.expect("Alice should have credentials.");
		let fields = parse_authorization_header(&header).expect("Header should parse.");

		nonces.push(fields["oauth_nonce"].clone());
	}

	nonces.sort();
	nonces.dedup();

	assert_eq!(nonces.len(), 3);
}

#[tokio::test]
async fn revoked_credentials_yield_nothing_but_stay_stored() {
	let server = MockServer::start_async().await;
	let (authenticator, store) = authenticator_with(&server, ProviderQuirks::default()).await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(401).body("oauth_problem=token_revoked");
		})
		.await;
	let alice = user("alice");

	assert!(authenticator.token(&alice).await.expect("Probe should complete.").is_none());
	assert!(
		authenticator
			.authorization_header_for(&alice, "GET", &resource(), &[])
			.await
			.expect("Probe should complete.")
			.is_none()
	);
	assert_eq!(
		authenticator.verify(&alice).await.expect("Probe should complete."),
		TokenValidity::Revoked
	);

	verify.assert_calls_async(3).await;

	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn revoked_credentials_are_evicted_when_configured() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { evict_on_revoked: true, ..Default::default() };
	let (authenticator, store) = authenticator_with(&server, quirks).await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(401);
		})
		.await;
	let alice = user("alice");

	assert_eq!(
		authenticator.verify(&alice).await.expect("Probe should complete."),
		TokenValidity::Revoked
	);
	assert!(store.is_empty());
	assert_eq!(
		authenticator.verify(&alice).await.expect("Lookup should complete."),
		TokenValidity::Missing
	);

	verify.assert_calls_async(1).await;
}

#[tokio::test]
async fn server_errors_during_verification_keep_credentials_valid() {
	let server = MockServer::start_async().await;
	let (authenticator, _) = authenticator_with(&server, ProviderQuirks::default()).await;
	let _verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(503);
		})
		.await;
	let credentials = authenticator
		.token(&user("alice"))
		.await
		.expect("Probe should complete.")
		.expect("Non-401 answers keep the credentials.");

	assert_eq!(credentials.access_token.expose(), "T2");
	assert_eq!(credentials.token_secret.expose(), "S2");
}

#[tokio::test]
async fn signing_can_skip_the_verification_probe() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { verify_before_signing: false, ..Default::default() };
	let (authenticator, _) = authenticator_with(&server, quirks).await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(401);
		})
		.await;
	let header = authenticator
		.authorization_header_for(&user("alice"), "GET", &resource(), &[])
		.await
		.expect("Header computation should succeed.");

	assert!(header.is_some());

	verify.assert_calls_async(0).await;
}

#[tokio::test]
async fn unknown_users_never_reach_the_provider() {
	let server = MockServer::start_async().await;
	let (authenticator, _) = authenticator_with(&server, ProviderQuirks::default()).await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/verify");
			then.status(200);
		})
		.await;
	let bob = user("bob");

	assert!(authenticator.token(&bob).await.expect("Lookup should complete.").is_none());
	assert!(
		authenticator
			.authorization_header_for(&bob, "GET", &resource(), &[])
			.await
			.expect("Lookup should complete.")
			.is_none()
	);
	assert_eq!(
		authenticator.verify(&bob).await.expect("Lookup should complete."),
		TokenValidity::Missing
	);

	verify.assert_calls_async(0).await;
}

#[tokio::test]
async fn invalidated_users_lose_their_credentials() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { verify_before_signing: false, ..Default::default() };
	let (authenticator, store) = authenticator_with(&server, quirks).await;
	let alice = user("alice");

	assert!(authenticator.invalidate(&alice).await.expect("Invalidation should succeed."));
	assert!(!authenticator.invalidate(&alice).await.expect("Invalidation should succeed."));
	assert!(store.is_empty());
	assert!(
		authenticator
			.authorization_header_for(&alice, "GET", &resource(), &[])
			.await
			.expect("Lookup should complete.")
			.is_none()
	);
}

#[tokio::test]
async fn http_requests_are_signed_in_place() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { verify_before_signing: false, ..Default::default() };
	let (authenticator, _) = authenticator_with(&server, quirks).await;
	let request: HttpRequest = ::http::Request::builder()
		.method("POST")
		.uri(resource().as_str())
		.header("content-type", "application/x-www-form-urlencoded")
		.body(b"status=hello+world".to_vec())
		.expect("Request fixture should build.");
	let signed = authenticator
		.sign_http_request(&user("alice"), request)
		.await
		.expect("Signing should succeed.")
		.expect("Alice should have credentials.");
	let header = signed
		.headers()
		.get("authorization")
		.and_then(|value| value.to_str().ok())
		.expect("Signed request should carry an Authorization header.");
	let fields = parse_authorization_header(header).expect("Header should parse.");
	let timestamp = fields["oauth_timestamp"].parse().expect("Timestamp should be numeric.");
	let expected = OAuthParameters::new(CLIENT_ID, SignatureMethod::HmacSha1)
		.with_token("T2")
		.with_nonce(fields["oauth_nonce"].clone())
		.with_timestamp(timestamp)
		.sign(
			"POST",
			&resource(),
			&[("status".into(), "hello world".into())],
			&SigningMode::hmac(CLIENT_SECRET),
			&TokenSecret::new("S2"),
		)
		.expect("Reference signature should compute.");

	assert_eq!(fields.get("oauth_signature"), expected.signature.as_ref());
	assert_eq!(signed.body(), b"status=hello+world");
}
