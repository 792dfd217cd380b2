//! Temporary-token request and authorize URL construction.
//!
//! [`Authenticator::begin_authorization`] signs a temporary-token request whose
//! `oauth_callback` is the registered redirect URI carrying the caller's original query string
//! in `state`, records the issued temporary token and secret as pending, and returns the
//! provider page the user's browser should visit.

// self
use crate::{
	_prelude::*,
	auth::{PendingAuthorization, TokenSecret},
	flows::Authenticator,
	http::{Method, OAuthHttpClient},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
	provider::Endpoint,
	signer::SignatureMethod,
};

/// Query parameter carrying the caller's original query string through the provider redirect.
pub const STATE_PARAM: &str = "state";

/// Outcome of [`Authenticator::begin_authorization`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationSession {
	/// Temporary token issued by the provider, now pending.
	pub temporary_token: String,
	/// Provider authorize page with `oauth_token` appended; send the user's browser here.
	pub authorize_url: Url,
	/// Callback announced to the provider as `oauth_callback`.
	pub callback_url: Url,
	/// `oauth_callback_confirmed` as reported by the provider, when present.
	pub callback_confirmed: Option<bool>,
}

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Requests a temporary token and returns the provider authorize URL.
	///
	/// `request_url` is the URL of the request that triggered authentication; its query string
	/// is echoed back to the callback as `state`, where an embedded `userId=` entry names the
	/// owning user. The request is signed with an empty token secret, using POST with RSA-SHA1
	/// and GET with HMAC-SHA1. Nothing is recorded when the provider call fails.
	pub async fn begin_authorization(&self, request_url: &Url) -> Result<AuthorizationSession> {
		obs::observe(FlowKind::Authorize, "begin_authorization", async move {
			let callback_url = callback_url_for(&self.descriptor.redirect_uri, request_url.query());
			let endpoint = &self.descriptor.endpoints.request_token;
			let signer = self.signer();
			let method = match signer.mode().method() {
				SignatureMethod::RsaSha1 => Method::POST,
				SignatureMethod::HmacSha1 => Method::GET,
			};
			let header = signer.sign_parameters(
				signer.parameters().with_callback(callback_url.as_str()),
				method.as_str(),
				endpoint,
				&[],
				&TokenSecret::default(),
			)?;
			let issued = self
				.facade()
				.request_credentials(Endpoint::RequestToken, method, endpoint, header)
				.await?;
			let now = OffsetDateTime::now_utc();

			self.store.purge_pending(now - self.descriptor.quirks.pending_ttl).await?;
			self.store
				.save_pending(PendingAuthorization {
					temporary_token: issued.token.clone(),
					token_secret: issued.token_secret,
					issued_at: now,
				})
				.await?;

			let mut authorize_url = self.descriptor.endpoints.authorize.clone();

			authorize_url.query_pairs_mut().append_pair("oauth_token", &issued.token);

			Ok(AuthorizationSession {
				temporary_token: issued.token,
				authorize_url,
				callback_url,
				callback_confirmed: issued.callback_confirmed,
			})
		})
		.await
	}
}

/// Appends `state` (the caller's raw query string) to the registered redirect URI.
///
/// Without a query string the redirect URI is returned unchanged.
pub fn callback_url_for(redirect_uri: &Url, state: Option<&str>) -> Url {
	let mut callback = redirect_uri.clone();

	if let Some(state) = state {
		callback.query_pairs_mut().append_pair(STATE_PARAM, state);
	}

	callback
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn redirect() -> Url {
		Url::parse("https://app.example.com/oauth/callback").expect("Redirect URI should parse.")
	}

	#[test]
	fn state_round_trips_the_raw_query() {
		let query = "redirect_after_login=%2Fdashboard%3Ftab%3D1&userId=alice+b&x=%26";
		let callback = callback_url_for(&redirect(), Some(query));
		let state = callback
			.query_pairs()
			.find(|(key, _)| key == STATE_PARAM)
			.map(|(_, value)| value.into_owned());

		assert_eq!(state.as_deref(), Some(query));
	}

	#[test]
	fn missing_query_leaves_redirect_untouched() {
		assert_eq!(callback_url_for(&redirect(), None), redirect());
	}
}
