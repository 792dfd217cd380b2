//! High-level OAuth 1.0a flows driven by one [`Authenticator`] per provider.
//!
//! `authorize` issues temporary tokens and builds the provider's authorize URL, `callback`
//! exchanges the verifier for token credentials and commits them per user, and `signing`
//! covers the read path: verification probes, `Authorization` headers, and invalidation.

pub mod authorize;
pub mod callback;
pub mod signing;

pub use authorize::*;
pub use callback::*;
pub use signing::*;

// self
use crate::{
	_prelude::*,
	auth::ConsumerCredentials,
	error::ConfigError,
	http::OAuthHttpClient,
	oauth::{OAuthFacade, TransportErrorMapper},
	provider::{ProviderDescriptor, ProviderStrategy},
	signer::{RequestSigner, SigningMode},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates the three-legged flow against a single provider descriptor.
///
/// One instance typically serves every user of one provider. The authenticator owns the HTTP
/// client, credential store, descriptor, and strategy references; the signing mode is chosen
/// once at construction: RSA-SHA1 when the consumer carries a private key, HMAC-SHA1 otherwise.
#[derive(Clone)]
pub struct Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Store holding pending temporary tokens and per-user credentials.
	pub store: Arc<dyn CredentialStore>,
	/// Provider descriptor that defines OAuth endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// Strategy responsible for provider-specific user resolution.
	pub strategy: Arc<dyn ProviderStrategy>,
	signer: RequestSigner,
	hmac_signer: RequestSigner,
}
impl<C, M> Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an authenticator that reuses the caller-provided transport + mapper pair.
	///
	/// Fails when the descriptor is invalid, the client identifier is empty, or the private key
	/// cannot be decoded. A client secret is required unless a private key is configured and the
	/// provider sets `ProviderQuirks::rsa_for_all_requests`, since every request after the
	/// temporary-token call is otherwise signed with HMAC-SHA1.
	pub fn with_http_client(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		consumer: ConsumerCredentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		descriptor.validate().map_err(ConfigError::from)?;

		if consumer.client_id.trim().is_empty() {
			return Err(ConfigError::EmptyClientId.into());
		}

		let ConsumerCredentials { client_id, client_secret, private_key } = consumer;
		let rsa_mode = private_key
			.map(|key| SigningMode::rsa_from_base64_pkcs8(key.expose()))
			.transpose()?;
		let rsa_everywhere = rsa_mode.is_some() && descriptor.quirks.rsa_for_all_requests;

		if client_secret.is_none() && !rsa_everywhere {
			return Err(ConfigError::MissingClientSecret.into());
		}

		let hmac_mode = SigningMode::hmac(client_secret.unwrap_or_default());
		let mode = rsa_mode.unwrap_or_else(|| hmac_mode.clone());

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			store,
			descriptor,
			strategy,
			signer: RequestSigner::new(client_id.clone(), mode),
			hmac_signer: RequestSigner::new(client_id, hmac_mode),
		})
	}

	/// Name of the provider this instance serves, for routing.
	pub fn provider_name(&self) -> &str {
		self.strategy.provider_name()
	}

	/// Signer selected at construction (RSA-SHA1 with a private key, HMAC-SHA1 otherwise).
	pub fn signer(&self) -> &RequestSigner {
		&self.signer
	}

	/// Signer used for verifier exchanges and resource requests.
	///
	/// HMAC-SHA1 with the consumer secret unless the provider sets
	/// `ProviderQuirks::rsa_for_all_requests`.
	pub fn token_signer(&self) -> &RequestSigner {
		if self.descriptor.quirks.rsa_for_all_requests { &self.signer } else { &self.hmac_signer }
	}

	pub(crate) fn facade(&self) -> OAuthFacade<'_, C, M> {
		OAuthFacade::new(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			self.strategy.as_ref(),
		)
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new authenticator for the provided descriptor and consumer.
	///
	/// The authenticator provisions its own reqwest-backed transport (no redirects, bounded
	/// timeout) so callers do not need to pass HTTP handles explicitly.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		consumer: ConsumerCredentials,
	) -> Result<Self> {
		Self::with_http_client(
			store,
			descriptor,
			strategy,
			consumer,
			ReqwestHttpClient::new()?,
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Debug for Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("provider", &self.strategy.provider_name())
			.field("descriptor", &self.descriptor)
			.field("signer", &self.signer)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{TEST_RSA_PRIVATE_KEY, test_descriptor_with},
		provider::{DefaultProviderStrategy, ProviderQuirks},
		signer::SignatureMethod,
		store::MemoryStore,
	};

	fn build_with(
		consumer: ConsumerCredentials,
		quirks: ProviderQuirks,
	) -> Result<ReqwestAuthenticator> {
		ReqwestAuthenticator::new(
			Arc::new(MemoryStore::default()),
			test_descriptor_with("http://127.0.0.1:9", quirks),
			Arc::new(DefaultProviderStrategy::new("mock")),
			consumer,
		)
	}

	fn build(consumer: ConsumerCredentials) -> Result<ReqwestAuthenticator> {
		build_with(consumer, ProviderQuirks::default())
	}

	#[test]
	fn signing_mode_follows_the_consumer_material() {
		let hmac = build(ConsumerCredentials::new("key").with_client_secret("secret"))
			.expect("HMAC authenticator should build.");

		assert_eq!(hmac.signer().mode().method(), SignatureMethod::HmacSha1);
		assert_eq!(hmac.provider_name(), "mock");

		let rsa = build(
			ConsumerCredentials::new("key")
				.with_client_secret("secret")
				.with_private_key(TEST_RSA_PRIVATE_KEY),
		)
		.expect("RSA authenticator should build.");

		assert_eq!(rsa.signer().mode().method(), SignatureMethod::RsaSha1);
		assert_eq!(rsa.token_signer().mode().method(), SignatureMethod::HmacSha1);
	}

	#[test]
	fn rsa_for_all_requests_needs_no_client_secret() {
		let rsa = build_with(
			ConsumerCredentials::new("key").with_private_key(TEST_RSA_PRIVATE_KEY),
			ProviderQuirks { rsa_for_all_requests: true, ..Default::default() },
		)
		.expect("RSA-only authenticator should build when RSA signs every request.");

		assert_eq!(rsa.signer().mode().method(), SignatureMethod::RsaSha1);
		assert_eq!(rsa.token_signer().mode().method(), SignatureMethod::RsaSha1);
	}

	#[test]
	fn construction_rejects_incomplete_consumers() {
		assert!(matches!(
			build(ConsumerCredentials::new("key")),
			Err(Error::Config(ConfigError::MissingClientSecret))
		));
		assert!(matches!(
			build(ConsumerCredentials::new("key").with_private_key(TEST_RSA_PRIVATE_KEY)),
			Err(Error::Config(ConfigError::MissingClientSecret))
		));
		assert!(matches!(
			build_with(
				ConsumerCredentials::new("key"),
				ProviderQuirks { rsa_for_all_requests: true, ..Default::default() },
			),
			Err(Error::Config(ConfigError::MissingClientSecret))
		));
		assert!(matches!(
			build(ConsumerCredentials::new("  ").with_client_secret("secret")),
			Err(Error::Config(ConfigError::EmptyClientId))
		));
		assert!(matches!(
			build(ConsumerCredentials::new("key").with_private_key("not-a-key")),
			Err(Error::Config(ConfigError::InvalidPrivateKey { .. }))
		));
	}
}
