//! Request signing contracts that let downstream crates attach broker-computed `Authorization`
//! headers to arbitrary HTTP clients.

// crates.io
use ::http::{
	HeaderValue,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::UserId,
	error::{ConfigError, SignatureError},
	flows::Authenticator,
	http::{HttpRequest, OAuthHttpClient},
	oauth::TransportErrorMapper,
};

/// Describes how to attach an `Authorization` header value to an outbound request without
/// constraining the HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects the `Authorization` header.
	fn attach_authorization(&self, request: Request, authorization: &str)
	-> Result<Request, Error>;
}

/// [`RequestSignerExt`] implementation for [`HttpRequest`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpRequestSigner;
impl RequestSignerExt<HttpRequest, Error> for HttpRequestSigner {
	fn attach_authorization(
		&self,
		mut request: HttpRequest,
		authorization: &str,
	) -> Result<HttpRequest> {
		let value = HeaderValue::from_str(authorization)
			.map_err(|e| ConfigError::from(::http::Error::from(e)))?;

		request.headers_mut().insert(AUTHORIZATION, value);

		Ok(request)
	}
}

impl<C, M> Authenticator<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Signs `request` on behalf of `user` and returns it with the `Authorization` header set.
	///
	/// Form-encoded bodies take part in the signature. Returns `None` under the same conditions
	/// as [`Authenticator::authorization_header_for`].
	pub async fn sign_http_request(
		&self,
		user: &UserId,
		request: HttpRequest,
	) -> Result<Option<HttpRequest>> {
		let raw = request.uri().to_string();
		let url = Url::parse(&raw).map_err(|_| SignatureError::UnsupportedUrl { url: raw })?;
		let params = form_parameters(&request);

		match self.authorization_header_for(user, request.method().as_str(), &url, &params).await? {
			Some(header) => HttpRequestSigner.attach_authorization(request, &header).map(Some),
			None => Ok(None),
		}
	}
}

fn form_parameters(request: &HttpRequest) -> Vec<(String, String)> {
	let is_form = request
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

	if !is_form {
		return Vec::new();
	}

	form_urlencoded::parse(request.body()).into_owned().collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request(content_type: &str, body: &str) -> HttpRequest {
		::http::Request::builder()
			.method("POST")
			.uri("https://api.example.com/1/statuses/update.json?include_entities=true")
			.header(CONTENT_TYPE, content_type)
			.body(body.as_bytes().to_vec())
			.expect("Request fixture should build.")
	}

	#[test]
	fn only_form_bodies_are_signed() {
		let form = request("application/x-www-form-urlencoded; charset=utf-8", "status=Hello+Ladies");
		let json = request("application/json", "{\"status\":\"Hello\"}");

		assert_eq!(form_parameters(&form), vec![("status".into(), "Hello Ladies".into())]);
		assert!(form_parameters(&json).is_empty());
	}

	#[test]
	fn attaches_header_and_rejects_invalid_values() {
		let signed = HttpRequestSigner
			.attach_authorization(request("text/plain", ""), "OAuth oauth_token=\"T2\"")
			.expect("Valid header should attach.");

		assert_eq!(signed.headers()[AUTHORIZATION], "OAuth oauth_token=\"T2\"");
		assert!(matches!(
			HttpRequestSigner.attach_authorization(request("text/plain", ""), "bad\nvalue"),
			Err(Error::Config(ConfigError::HttpRequest(_)))
		));
	}
}
