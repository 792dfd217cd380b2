//! Rust's turnkey OAuth 1.0a broker: drive three-legged authorizations, keep per-user
//! credentials in a lock-guarded store, and sign outbound requests with HMAC-SHA1 or RSA-SHA1.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod signer;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	#[cfg(feature = "reqwest")]
	use crate::{
		auth::{ConsumerCredentials, ProviderId, UserId},
		flows::Authenticator,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{
			ProviderDescriptor, ProviderQuirks, ProviderStrategy, StrategyFuture, UserLookup,
		},
		store::{CredentialStore, MemoryStore},
	};

	/// 1024-bit RSA key (Base64 PKCS#8 DER) used only by tests.
	pub const TEST_RSA_PRIVATE_KEY: &str = "\
		MIICdwIBADANBgkqhkiG9w0BAQEFAASCAmEwggJdAgEAAoGBALyAzDtlIf/WNrwmwhUOBOXSyEG6MzAjvNJ4lAnhedqW\
		ijm3jXVH/Qf13Dpky9m2WO5SPwplMdJFY6A0OPoy2NYA9KX+W0qIgo09J6FgThqlLJKaK1QxbZPHvciS/ISCaNatGZnm\
		OQYDaIYT+gYwGVUzkEe6N7oNYz6cJAOu9+FTAgMBAAECgYAqFH6DC9KJMCLL4cMVvClvvJwjwBNJPdEbEvvJMOJo344/\
		0C/t7IIZ0tK03md7VG+J1CZqhaiXjhHtY3sMr2kkCgQWdXuNnMtCE95CfSxLYJvwxZWV2jRVx9HvckyxQq6ngoq+lJbr\
		zD/ydqvCywQN0qiN6JYGZfILyYD0a5GZQQJBAPhx4UDSJiM/x3twPpZXU1W4Fg0qUnWkZPV2ZMlB0Pl0ffc9dez3rHVF\
		mQQGuFptDJduZvfvPTNRPuYLE63NCgMCQQDCPEbvZ9dcq+MQavJ1tqe6Rsq029mqh36cY5wg3kzvmdeNVFWKXB2M83VL\
		DkLDHCcs+gHGlsIBbwZDeHrBwNJxAkEAxHyUMEbDgMc1ReuspAwmTTnMvtbE5mOAsRzUctMJqfA2m23RMPtkOk8zyBpk\
		fKeX+L+I0fc0iLxtqVQDWUY67wJAIuwBePO7lc7VsVL5Ks7fUy99LI1GklFwIyAJpyMww/dt+NwL0SeErJ3tHcR/nmLG\
		bGC6xwC9+tICV0knEQThEQJBAO7nrlwxCglwjMqoIEOdlYn1JeFBfDemdHaS78Nme4itzRac6L+ZjJL1vNgcUEtpp0HX\
		YlS4gBLt1KQisuiNJfY=";

	/// Authenticator type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestAuthenticator = Authenticator<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Strategy that resolves every user to a fixed identifier, standing in for a provider's
	/// profile endpoint.
	#[cfg(feature = "reqwest")]
	#[derive(Clone, Debug)]
	pub struct FixedUserStrategy {
		/// Provider name reported through [`ProviderStrategy::provider_name`].
		pub name: String,
		/// User identifier returned by [`ProviderStrategy::resolve_user`].
		pub user: UserId,
		/// Access tokens observed by `resolve_user`, in call order.
		pub seen_tokens: Arc<Mutex<Vec<String>>>,
	}
	#[cfg(feature = "reqwest")]
	impl FixedUserStrategy {
		/// Creates a strategy that always resolves to `user`.
		pub fn new(name: impl Into<String>, user: UserId) -> Self {
			Self { name: name.into(), user, seen_tokens: Default::default() }
		}
	}
	#[cfg(feature = "reqwest")]
	impl ProviderStrategy for FixedUserStrategy {
		fn provider_name(&self) -> &str {
			&self.name
		}

		fn resolve_user<'a>(&'a self, lookup: UserLookup<'a>) -> StrategyFuture<'a, UserId> {
			Box::pin(async move {
				self.seen_tokens.lock().push(lookup.credentials.access_token.expose().to_owned());

				Ok(self.user.clone())
			})
		}
	}

	/// Builds a reqwest HTTP client suitable for talking to `httpmock` servers.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a provider descriptor whose endpoints live under `base` (typically an `httpmock`
	/// server URL), with insecure endpoints allowed.
	#[cfg(feature = "reqwest")]
	pub fn test_descriptor(base: &str) -> ProviderDescriptor {
		test_descriptor_with(base, ProviderQuirks::default())
	}

	/// Same as [`test_descriptor`] with caller-supplied quirks; insecure endpoints stay allowed.
	#[cfg(feature = "reqwest")]
	pub fn test_descriptor_with(base: &str, quirks: ProviderQuirks) -> ProviderDescriptor {
		let url = |path: &str| {
			Url::parse(&format!("{base}{path}")).expect("Mock endpoint URL should parse.")
		};

		ProviderDescriptor::builder(
			ProviderId::new("mock-oauth1").expect("Mock provider identifier should be valid."),
		)
		.request_token_endpoint(url("/oauth/request_token"))
		.access_token_endpoint(url("/oauth/access_token"))
		.authorize_endpoint(url("/oauth/authorize"))
		.verify_endpoint(url("/oauth/verify"))
		.redirect_uri(url("/oauth/callback"))
		.quirks(ProviderQuirks { allow_insecure_endpoints: true, ..quirks })
		.build()
		.expect("Mock provider descriptor should build successfully.")
	}

	/// Constructs an [`Authenticator`] backed by an in-memory store and the reqwest transport
	/// used across integration tests.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_authenticator(
		descriptor: ProviderDescriptor,
		consumer: ConsumerCredentials,
		strategy: Arc<dyn ProviderStrategy>,
	) -> (ReqwestTestAuthenticator, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let authenticator = Authenticator::with_http_client(
			store,
			descriptor,
			strategy,
			consumer,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Test authenticator should build successfully.");

		(authenticator, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, serde_json as _, tokio as _};
