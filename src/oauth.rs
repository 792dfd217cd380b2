//! Internal OAuth 1.0a request facade.
//!
//! The facade turns a signed `Authorization` header into an [`HttpRequest`], dispatches it
//! through the caller's [`OAuthHttpClient`], and interprets the form-encoded provider response.
//! Non-2xx answers are classified through the provider strategy; transport failures go through
//! the configured [`TransportErrorMapper`].

// crates.io
use ::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransientError},
	http::{HttpRequest, HttpResponse, Method, OAuthHttpClient, ResponseMetadata},
	provider::{Endpoint, ProviderErrorContext, ProviderErrorKind, ProviderStrategy},
};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport while calling `endpoint` into a broker error.
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		endpoint: Endpoint,
		error: E,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_strategy: &dyn ProviderStrategy,
		endpoint: Endpoint,
		err: ReqwestError,
	) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return TransientError::Endpoint {
				endpoint,
				message: "request timed out".into(),
				status: err.status().map(|code| code.as_u16()),
				retry_after: None,
			}
			.into();
		}

		TransportError::from(err).into()
	}
}

/// Token and secret parsed from a temporary-token or access-token response.
#[derive(Clone)]
pub(crate) struct CredentialsResponse {
	pub(crate) token: String,
	pub(crate) token_secret: TokenSecret,
	pub(crate) callback_confirmed: Option<bool>,
}
impl Debug for CredentialsResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialsResponse")
			.field("token", &"<redacted>")
			.field("token_secret", &self.token_secret)
			.field("callback_confirmed", &self.callback_confirmed)
			.finish()
	}
}

/// Borrowed view over the transport, mapper, and strategy used by one flow invocation.
pub(crate) struct OAuthFacade<'a, C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: &'a C,
	error_mapper: &'a M,
	strategy: &'a dyn ProviderStrategy,
}
impl<'a, C, M> OAuthFacade<'a, C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(
		http_client: &'a C,
		error_mapper: &'a M,
		strategy: &'a dyn ProviderStrategy,
	) -> Self {
		Self { http_client, error_mapper, strategy }
	}

	/// Sends a signed request and returns the raw response, whatever its status.
	pub(crate) async fn send(
		&self,
		endpoint: Endpoint,
		method: Method,
		url: &Url,
		authorization: String,
	) -> Result<HttpResponse> {
		let request = build_request(method, url, authorization)?;

		self.http_client
			.execute(request)
			.await
			.map_err(|err| self.error_mapper.map_transport_error(self.strategy, endpoint, err))
	}

	/// Sends a signed request to a credential endpoint and parses the issued token pair.
	pub(crate) async fn request_credentials(
		&self,
		endpoint: Endpoint,
		method: Method,
		url: &Url,
		authorization: String,
	) -> Result<CredentialsResponse> {
		let response = self.send(endpoint, method, url, authorization).await?;

		if !response.status().is_success() {
			return Err(self.classify_failure(endpoint, &response));
		}

		parse_credentials(endpoint, response.body())
	}

	/// Maps a non-2xx provider response into the broker taxonomy.
	pub(crate) fn classify_failure(&self, endpoint: Endpoint, response: &HttpResponse) -> Error {
		let metadata = ResponseMetadata::from_response(response);
		let body = String::from_utf8_lossy(response.body());
		let mut ctx = ProviderErrorContext::new(endpoint).with_body_preview(body);

		if let Some(status) = metadata.status {
			ctx = ctx.with_http_status(status);
		}

		for (key, value) in form_urlencoded::parse(response.body()) {
			match key.as_ref() {
				"oauth_problem" => ctx = ctx.with_oauth_problem(value),
				"oauth_problem_advice" => ctx = ctx.with_problem_advice(value),
				_ => (),
			}
		}

		let reason = ctx.reason();

		match self.strategy.classify_error(&ctx) {
			ProviderErrorKind::Rejected => Error::Rejected { endpoint, reason },
			ProviderErrorKind::InvalidConsumer => Error::InvalidConsumer { reason },
			ProviderErrorKind::Transient => TransientError::Endpoint {
				endpoint,
				message: reason,
				status: metadata.status,
				retry_after: metadata.retry_after,
			}
			.into(),
		}
	}
}

fn build_request(method: Method, url: &Url, authorization: String) -> Result<HttpRequest> {
	let mut builder = ::http::Request::builder()
		.method(method.clone())
		.uri(url.as_str())
		.header(AUTHORIZATION, authorization)
		.header(ACCEPT, FORM_CONTENT_TYPE);

	if method == Method::POST {
		builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
	}

	builder.body(Vec::new()).map_err(|e| ConfigError::from(e).into())
}

fn parse_credentials(endpoint: Endpoint, body: &[u8]) -> Result<CredentialsResponse> {
	let mut token = None;
	let mut token_secret = None;
	let mut callback_confirmed = None;

	for (key, value) in form_urlencoded::parse(body) {
		match key.as_ref() {
			"oauth_token" => token = Some(value.into_owned()),
			"oauth_token_secret" => token_secret = Some(value.into_owned()),
			"oauth_callback_confirmed" => callback_confirmed = Some(value == "true"),
			_ => (),
		}
	}

	let token = token.filter(|token| !token.is_empty()).ok_or_else(|| {
		Error::MalformedResponse { endpoint, reason: "missing oauth_token".into() }
	})?;
	let token_secret = token_secret.ok_or_else(|| Error::MalformedResponse {
		endpoint,
		reason: "missing oauth_token_secret".into(),
	})?;

	Ok(CredentialsResponse { token, token_secret: TokenSecret::new(token_secret), callback_confirmed })
}
