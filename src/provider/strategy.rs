//! Provider strategy hooks: naming, user resolution, and error classification.
//!
//! The engine never inherits provider specifics. Each provider injects a [`ProviderStrategy`]
//! that resolves the owning user from freshly issued credentials and, optionally, refines how
//! error responses map into the broker taxonomy.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, UserId},
	error::SignatureError,
	provider::descriptor::Endpoint,
	signer::RequestSigner,
};

/// Boxed future returned by strategy hooks.
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Capability interface implemented once per provider.
///
/// Implementors are required to be `Send + Sync` because one authenticator instance serves every
/// concurrent request for its provider. Only [`ProviderStrategy::classify_error`] has a default.
pub trait ProviderStrategy: Send + Sync {
	/// Name of the provider this strategy serves, used for routing.
	fn provider_name(&self) -> &str;

	/// Resolves the application user owning freshly exchanged credentials.
	///
	/// Called only when the callback `state` does not carry a `userId`. Implementations typically
	/// sign a request to the provider's profile endpoint with
	/// [`UserLookup::authorization_header`].
	fn resolve_user<'a>(&'a self, lookup: UserLookup<'a>) -> StrategyFuture<'a, UserId>;

	/// Maps a failed provider response into the broker taxonomy.
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		classify_default(ctx)
	}
}

/// Credentials and signer handed to [`ProviderStrategy::resolve_user`].
#[derive(Clone, Copy, Debug)]
pub struct UserLookup<'a> {
	/// Credentials just issued by the access-token endpoint.
	pub credentials: &'a Credentials,
	/// Signer configured for resource requests.
	pub signer: &'a RequestSigner,
}
impl UserLookup<'_> {
	/// Signs a request made with the fresh credentials.
	pub fn authorization_header(
		&self,
		method: &str,
		url: &Url,
		params: &[(String, String)],
	) -> Result<String, SignatureError> {
		self.signer.authorization_header(
			method,
			url,
			params,
			self.credentials.access_token.expose(),
			&self.credentials.token_secret,
		)
	}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the token, verifier, or request parameters.
	Rejected,
	/// Provider rejected the consumer key or signature.
	InvalidConsumer,
	/// Failure is temporary; the caller may retry the whole flow.
	Transient,
}

/// Context passed to provider strategies when classifying failed responses.
///
/// Only primitive data is kept (status, `oauth_problem`, body preview) so strategies stay
/// decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Endpoint associated with the failing request.
	pub endpoint: Endpoint,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// `oauth_problem` value (OAuth Problem Reporting extension).
	pub oauth_problem: Option<String>,
	/// `oauth_problem_advice` value.
	pub problem_advice: Option<String>,
	/// Preview of the response body.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided endpoint.
	pub fn new(endpoint: Endpoint) -> Self {
		Self {
			endpoint,
			http_status: None,
			oauth_problem: None,
			problem_advice: None,
			body_preview: None,
		}
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the `oauth_problem` value.
	pub fn with_oauth_problem(mut self, problem: impl Into<String>) -> Self {
		self.oauth_problem = Some(problem.into());

		self
	}

	/// Adds the `oauth_problem_advice` value.
	pub fn with_problem_advice(mut self, advice: impl Into<String>) -> Self {
		self.problem_advice = Some(advice.into());

		self
	}

	/// Adds a truncated body preview.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}

	/// Human-readable summary used in broker errors.
	pub fn reason(&self) -> String {
		match (&self.oauth_problem, &self.problem_advice, self.http_status) {
			(Some(problem), Some(advice), _) => format!("{problem} ({advice})"),
			(Some(problem), None, _) => problem.clone(),
			(None, _, Some(status)) => format!("HTTP {status}"),
			(None, _, None) => "unexpected response".into(),
		}
	}
}

/// Strategy that relies on the callback `state` to identify users.
///
/// Its [`ProviderStrategy::resolve_user`] always fails, so callers must embed `userId=<id>` in
/// the query string passed to `begin_authorization`.
#[derive(Clone, Debug)]
pub struct DefaultProviderStrategy {
	name: String,
}
impl DefaultProviderStrategy {
	/// Creates a strategy reporting `name` as the provider name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn provider_name(&self) -> &str {
		&self.name
	}

	fn resolve_user<'a>(&'a self, _lookup: UserLookup<'a>) -> StrategyFuture<'a, UserId> {
		Box::pin(async move {
			Err(Error::UserResolution {
				reason: format!(
					"provider `{}` has no profile lookup and the callback state carried no userId",
					self.name
				),
			})
		})
	}
}

/// Default classification: `oauth_problem` first, then body hints, then the HTTP status.
pub fn classify_default(ctx: &ProviderErrorContext) -> ProviderErrorKind {
	if let Some(kind) = ctx.oauth_problem.as_deref().and_then(classify_problem) {
		return kind;
	}
	if let Some(kind) = ctx.body_preview.as_deref().and_then(classify_body) {
		return kind;
	}

	classify_status(ctx.http_status)
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn classify_problem(problem: &str) -> Option<ProviderErrorKind> {
	match problem.to_ascii_lowercase().as_str() {
		"consumer_key_unknown"
		| "consumer_key_rejected"
		| "consumer_key_refused"
		| "signature_invalid"
		| "signature_method_rejected" => Some(ProviderErrorKind::InvalidConsumer),
		"token_used" | "token_expired" | "token_revoked" | "token_rejected"
		| "verifier_invalid" | "permission_denied" | "permission_unknown" | "user_refused"
		| "additional_authorization_required" | "parameter_absent" | "parameter_rejected"
		| "version_rejected" => Some(ProviderErrorKind::Rejected),
		"nonce_used" | "timestamp_refused" => Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_body(body: &str) -> Option<ProviderErrorKind> {
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("signature_invalid") || text.contains("invalid signature") =>
			Some(ProviderErrorKind::InvalidConsumer),
		text if text.contains("consumer_key") => Some(ProviderErrorKind::InvalidConsumer),
		text if text.contains("token_rejected") || text.contains("verifier_invalid") =>
			Some(ProviderErrorKind::Rejected),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 401 | 403 | 404 | 410) => ProviderErrorKind::Rejected,
		_ => ProviderErrorKind::Transient,
	}
}
