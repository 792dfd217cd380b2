//! Consumer (client) credentials registered with the provider.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Consumer key plus the signing material registered with the provider.
///
/// Supplying `private_key` selects RSA-SHA1 for temporary-token requests. Verifier exchanges
/// and resource requests use HMAC-SHA1 with `client_secret`, so the secret is mandatory unless
/// the provider signs every request with RSA (`ProviderQuirks::rsa_for_all_requests`).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConsumerCredentials {
	/// Consumer key sent as `oauth_consumer_key`.
	pub client_id: String,
	/// Consumer secret for HMAC-SHA1 signing.
	#[serde(default)]
	pub client_secret: Option<TokenSecret>,
	/// Base64-encoded PKCS#8 DER RSA private key for RSA-SHA1 signing.
	#[serde(default)]
	pub private_key: Option<TokenSecret>,
}
impl ConsumerCredentials {
	/// Creates credentials carrying only the consumer key.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: None, private_key: None }
	}

	/// Sets or replaces the consumer secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets or replaces the Base64 PKCS#8 RSA private key.
	pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
		self.private_key = Some(TokenSecret::new(key));

		self
	}
}
impl Debug for ConsumerCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConsumerCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("private_key_set", &self.private_key.is_some())
			.finish()
	}
}
