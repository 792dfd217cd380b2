//! Read path: verification probes, signed `Authorization` headers, and invalidation.
//!
//! Stored credentials are fetched (and the store lock released) before any network call. A
//! `401` from the verify endpoint marks the credentials as revoked; they stay in the store
//! unless the provider sets `ProviderQuirks::evict_on_revoked`.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, UserId},
	flows::Authenticator,
	http::{Method, OAuthHttpClient, StatusCode},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
	provider::Endpoint,
};

/// Result of probing the verify endpoint with a user's stored credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenValidity {
	/// The provider accepted the credentials (any status other than `401`).
	Valid,
	/// The provider answered `401`; the credentials were revoked or expired.
	Revoked,
	/// No credentials are stored for the user.
	Missing,
}
impl TokenValidity {
	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenValidity::Valid => "valid",
			TokenValidity::Revoked => "revoked",
			TokenValidity::Missing => "missing",
		}
	}
}

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Probes the verify endpoint with the credentials stored for `user`.
	pub async fn verify(&self, user: &UserId) -> Result<TokenValidity> {
		obs::observe(FlowKind::Verify, "verify", async move {
			match self.store.fetch(user).await? {
				Some(credentials) => self.probe(user, &credentials).await,
				None => Ok(TokenValidity::Missing),
			}
		})
		.await
	}

	/// Returns the credentials stored for `user` once the verify endpoint accepts them.
	///
	/// `None` means the user never authenticated, was invalidated, or was revoked upstream.
	pub async fn token(&self, user: &UserId) -> Result<Option<Credentials>> {
		obs::observe(FlowKind::Verify, "token", async move {
			let Some(credentials) = self.store.fetch(user).await? else {
				return Ok(None);
			};

			match self.probe(user, &credentials).await? {
				TokenValidity::Valid => Ok(Some(credentials)),
				TokenValidity::Revoked | TokenValidity::Missing => Ok(None),
			}
		})
		.await
	}

	/// Computes the `Authorization` header for a request made on behalf of `user`.
	///
	/// `url` carries the request's encoded query parameters and `params` the raw values of any
	/// `application/x-www-form-urlencoded` body. Returns `None` when the user has no stored
	/// credentials or, with `verify_before_signing`, when the verify endpoint rejects them.
	pub async fn authorization_header_for(
		&self,
		user: &UserId,
		method: &str,
		url: &Url,
		params: &[(String, String)],
	) -> Result<Option<String>> {
		obs::observe(FlowKind::Sign, "authorization_header_for", async move {
			let Some(credentials) = self.store.fetch(user).await? else {
				return Ok(None);
			};

			if self.descriptor.quirks.verify_before_signing
				&& self.probe(user, &credentials).await? == TokenValidity::Revoked
			{
				return Ok(None);
			}

			let header = self.token_signer().authorization_header(
				method,
				url,
				params,
				credentials.access_token.expose(),
				&credentials.token_secret,
			)?;

			Ok(Some(header))
		})
		.await
	}

	/// Removes the credentials stored for `user`; returns `true` when an entry existed.
	pub async fn invalidate(&self, user: &UserId) -> Result<bool> {
		self.store.invalidate(user).await.map_err(Error::from)
	}

	async fn probe(&self, user: &UserId, credentials: &Credentials) -> Result<TokenValidity> {
		let endpoint = &self.descriptor.endpoints.verify;
		let header = self.token_signer().authorization_header(
			Method::GET.as_str(),
			endpoint,
			&[],
			credentials.access_token.expose(),
			&credentials.token_secret,
		)?;
		let response = self.facade().send(Endpoint::Verify, Method::GET, endpoint, header).await?;

		if response.status() != StatusCode::UNAUTHORIZED {
			obs::record_verification(TokenValidity::Valid);

			return Ok(TokenValidity::Valid);
		}

		obs::record_verification(TokenValidity::Revoked);

		if self.descriptor.quirks.evict_on_revoked {
			self.store.invalidate(user).await?;
		}

		Ok(TokenValidity::Revoked)
	}
}
