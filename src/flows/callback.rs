//! Callback processing: verifier exchange, user resolution, and credential commit.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret, UserId},
	flows::{Authenticator, authorize::STATE_PARAM},
	http::{Method, OAuthHttpClient},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
	provider::{Endpoint, UserLookup},
};

const USER_ID_KEY: &str = "userId";

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Consumes the provider redirect and returns the user the new credentials belong to.
	///
	/// The pending secret for `oauth_token` is removed before the exchange, so a replayed
	/// callback never signs with it again. Unknown or expired temporary tokens fail with
	/// [`Error::UnknownTemporaryToken`] unless `fail_on_unknown_temporary_token` is disabled, in
	/// which case the exchange is signed with an empty secret. The owning user comes from the
	/// `userId` entry inside `state` when present, otherwise from
	/// [`ProviderStrategy::resolve_user`](crate::provider::ProviderStrategy::resolve_user).
	/// Credentials are committed only after every step succeeded.
	pub async fn complete_authorization(&self, callback_url: &Url) -> Result<UserId> {
		obs::observe(FlowKind::Callback, "complete_authorization", async move {
			let callback = CallbackParameters::parse(callback_url)?;
			let pending = self.store.take_pending(&callback.token).await?;
			let now = OffsetDateTime::now_utc();
			let quirks = &self.descriptor.quirks;
			let temporary_secret = match pending {
				Some(pending) if !pending.is_expired_at(now, quirks.pending_ttl) =>
					pending.token_secret,
				_ if quirks.fail_on_unknown_temporary_token =>
					return Err(Error::UnknownTemporaryToken),
				_ => TokenSecret::default(),
			};
			let signer = self.token_signer();
			let endpoint = &self.descriptor.endpoints.access_token;
			let header = signer.sign_parameters(
				signer.parameters().with_token(&callback.token).with_verifier(&callback.verifier),
				Method::GET.as_str(),
				endpoint,
				&[],
				&temporary_secret,
			)?;
			let issued = self
				.facade()
				.request_credentials(Endpoint::AccessToken, Method::GET, endpoint, header)
				.await?;
			let credentials = Credentials {
				access_token: TokenSecret::new(issued.token),
				token_secret: issued.token_secret,
				issued_at: OffsetDateTime::now_utc(),
			};
			let user = match callback.state.as_deref().and_then(user_id_from_state) {
				Some(raw) => UserId::new(&raw).map_err(|e| Error::UserResolution {
					reason: format!("state carries an invalid userId: {e}"),
				})?,
				None =>
					self.strategy
						.resolve_user(UserLookup { credentials: &credentials, signer })
						.await?,
			};

			self.store.save(user.clone(), credentials).await?;

			Ok(user)
		})
		.await
	}
}

/// OAuth parameters carried by the provider redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CallbackParameters {
	token: String,
	verifier: String,
	state: Option<String>,
}
impl CallbackParameters {
	fn parse(url: &Url) -> Result<Self> {
		let mut token = None;
		let mut verifier = None;
		let mut state = None;

		for (key, value) in url.query_pairs() {
			match key.as_ref() {
				"oauth_token" if token.is_none() => token = Some(value.into_owned()),
				"oauth_verifier" if verifier.is_none() => verifier = Some(value.into_owned()),
				STATE_PARAM if state.is_none() => state = Some(value.into_owned()),
				_ => (),
			}
		}

		Ok(Self {
			token: require("oauth_token", token)?,
			verifier: require("oauth_verifier", verifier)?,
			state,
		})
	}
}

fn require(name: &'static str, value: Option<String>) -> Result<String> {
	value.filter(|value| !value.is_empty()).ok_or(Error::MissingParameter { name })
}

/// Extracts the `userId` entry from a decoded `state` value (the original query string).
pub fn user_id_from_state(state: &str) -> Option<String> {
	if state.trim().is_empty() {
		return None;
	}

	form_urlencoded::parse(state.as_bytes())
		.find(|(key, _)| key == USER_ID_KEY)
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.trim().is_empty())
}
