//! OAuth 1.0a signature primitives.
//!
//! `encode` builds the signature base string (RFC 5849 §3.4.1), `mode` holds the HMAC-SHA1 or
//! RSA-SHA1 key material selected once per authenticator, and `params` carries the per-request
//! `oauth_*` fields and renders the `Authorization` header. [`RequestSigner`] ties a consumer key
//! to a signing mode so flows only supply the request and the token being used.

pub mod encode;
pub mod mode;
pub mod params;

pub use encode::*;
pub use mode::*;
pub use params::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::SignatureError};

/// Computes the Base64 `oauth_signature` for a request.
///
/// `params` must already contain the `oauth_*` protocol parameters alongside any form
/// parameters; query parameters are taken from `url`.
pub fn sign(
	method: &str,
	url: &Url,
	params: &[(String, String)],
	mode: &SigningMode,
	token_secret: &TokenSecret,
) -> Result<String, SignatureError> {
	let base = base_string(method, url, params)?;

	mode.sign(&base, token_secret)
}

/// Consumer key bound to one signing mode.
#[derive(Clone, Debug)]
pub struct RequestSigner {
	consumer_key: String,
	mode: SigningMode,
}
impl RequestSigner {
	/// Binds `consumer_key` to `mode`.
	pub fn new(consumer_key: impl Into<String>, mode: SigningMode) -> Self {
		Self { consumer_key: consumer_key.into(), mode }
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Signing mode applied to every request.
	pub fn mode(&self) -> &SigningMode {
		&self.mode
	}

	/// Returns fresh, unsigned protocol parameters for this consumer.
	pub fn parameters(&self) -> OAuthParameters {
		OAuthParameters::new(self.consumer_key.clone(), self.mode.method())
	}

	/// Signs prepared protocol parameters and renders the `Authorization` header.
	pub fn sign_parameters(
		&self,
		parameters: OAuthParameters,
		method: &str,
		url: &Url,
		params: &[(String, String)],
		token_secret: &TokenSecret,
	) -> Result<String, SignatureError> {
		let signed = parameters.sign(method, url, params, &self.mode, token_secret)?;

		Ok(signed.authorization_header())
	}

	/// Signs a resource request made with `token` and returns the `Authorization` header.
	pub fn authorization_header(
		&self,
		method: &str,
		url: &Url,
		params: &[(String, String)],
		token: &str,
		token_secret: &TokenSecret,
	) -> Result<String, SignatureError> {
		self.sign_parameters(self.parameters().with_token(token), method, url, params, token_secret)
	}
}
