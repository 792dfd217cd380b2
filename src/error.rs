//! Broker-level error types shared across flows, signers, providers, and stores.

// self
use crate::{_prelude::*, provider::Endpoint};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Signature computation failed for a single request.
	#[error(transparent)]
	Signature(#[from] SignatureError),
	/// Temporary upstream failure; the caller may restart the flow.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Callback URL lacks a required OAuth parameter.
	#[error("Callback is missing the {name} parameter.")]
	MissingParameter {
		/// Name of the absent query parameter.
		name: &'static str,
	},
	/// Callback carried a temporary token with no pending authorization.
	#[error("Temporary token is unknown, expired, or was already consumed.")]
	UnknownTemporaryToken,
	/// Provider rejected the token, verifier, or request.
	#[error("Provider rejected the {endpoint} request: {reason}.")]
	Rejected {
		/// Endpoint that produced the rejection.
		endpoint: Endpoint,
		/// Provider- or broker-supplied reason string.
		reason: String,
	},
	/// Provider rejected the consumer key or signature.
	#[error("Consumer authentication failed: {reason}.")]
	InvalidConsumer {
		/// Provider- or broker-supplied reason string.
		reason: String,
	},
	/// Provider response could not be interpreted as OAuth credentials.
	#[error("The {endpoint} response is malformed: {reason}.")]
	MalformedResponse {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Description of the missing or invalid field.
		reason: String,
	},
	/// Provider strategy could not resolve the owning user.
	#[error("Unable to resolve the authenticated user: {reason}.")]
	UserResolution {
		/// Strategy-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns `true` when the error aborts an authorization attempt (transport, provider, or
	/// callback failures) rather than signalling a local misconfiguration.
	pub fn is_authentication_failure(&self) -> bool {
		matches!(
			self,
			Self::Transient(_)
				| Self::Transport(_)
				| Self::MissingParameter { .. }
				| Self::UnknownTemporaryToken
				| Self::Rejected { .. }
				| Self::InvalidConsumer { .. }
				| Self::MalformedResponse { .. }
				| Self::UserResolution { .. }
		)
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Configured private key is not a Base64-encoded PKCS#8 RSA key.
	#[error("Private key is not a valid Base64 PKCS#8 RSA key.")]
	InvalidPrivateKey {
		/// Underlying decoding failure.
		#[source]
		source: BoxError,
	},
	/// No client secret is configured although some requests are signed with HMAC-SHA1.
	#[error("HMAC-SHA1 signing requires a client secret.")]
	MissingClientSecret,
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a key decoding failure inside [`ConfigError`].
	pub fn invalid_private_key(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidPrivateKey { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while computing a request signature.
#[derive(Debug, ThisError)]
pub enum SignatureError {
	/// HMAC key could not be initialized.
	#[error("HMAC-SHA1 key could not be initialized.")]
	HmacKey,
	/// RSA signing primitive failed.
	#[error("RSA-SHA1 signing failed: {message}.")]
	Rsa {
		/// Message reported by the signing primitive.
		message: String,
	},
	/// Request URL cannot be normalized into a base string URI.
	#[error("Request URL `{url}` cannot be used as a signature base string URI.")]
	UnsupportedUrl {
		/// Offending URL.
		url: String,
	},
}

/// Temporary failure variants.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("The {endpoint} endpoint returned an unexpected response: {message}.")]
	Endpoint {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Provider- or broker-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
