// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// A required endpoint was never supplied.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS unless insecure endpoints are explicitly allowed.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoints must be absolute HTTP(S) URLs with a host.
	#[error("The {endpoint} endpoint is not an HTTP(S) URL: {url}.")]
	UnsupportedEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Pending temporary tokens need a positive lifetime.
	#[error("The pending token lifetime must be positive.")]
	NonPositivePendingTtl,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Temporary-credential endpoint.
	pub request_token_endpoint: Option<Url>,
	/// Token-credential endpoint.
	pub access_token_endpoint: Option<Url>,
	/// Resource-owner authorization page.
	pub authorize_endpoint: Option<Url>,
	/// Credential verification endpoint.
	pub verify_endpoint: Option<Url>,
	/// Registered callback.
	pub redirect_uri: Option<Url>,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			request_token_endpoint: None,
			access_token_endpoint: None,
			authorize_endpoint: None,
			verify_endpoint: None,
			redirect_uri: None,
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the temporary-credential endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the token-credential endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the resource-owner authorization page.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Sets the credential verification endpoint.
	pub fn verify_endpoint(mut self, url: Url) -> Self {
		self.verify_endpoint = Some(url);

		self
	}

	/// Sets the registered callback.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let request_token = require("request_token", self.request_token_endpoint)?;
		let access_token = require("access_token", self.access_token_endpoint)?;
		let authorize = require("authorize", self.authorize_endpoint)?;
		let verify = require("verify", self.verify_endpoint)?;
		let redirect_uri = require("redirect", self.redirect_uri)?;
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints: ProviderEndpoints { request_token, access_token, authorize, verify },
			redirect_uri,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let insecure_ok = self.quirks.allow_insecure_endpoints;

		validate_endpoint("request_token", &self.endpoints.request_token, insecure_ok)?;
		validate_endpoint("access_token", &self.endpoints.access_token, insecure_ok)?;
		validate_endpoint("authorize", &self.endpoints.authorize, insecure_ok)?;
		validate_endpoint("verify", &self.endpoints.verify, insecure_ok)?;
		validate_endpoint("redirect", &self.redirect_uri, insecure_ok)?;

		if !self.quirks.pending_ttl.is_positive() {
			return Err(ProviderDescriptorError::NonPositivePendingTtl);
		}

		Ok(())
	}
}

fn require(endpoint: &'static str, url: Option<Url>) -> Result<Url, ProviderDescriptorError> {
	url.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint })
}

fn validate_endpoint(
	name: &'static str,
	url: &Url,
	insecure_ok: bool,
) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		_ if url.host_str().is_none() => Err(ProviderDescriptorError::UnsupportedEndpoint {
			endpoint: name,
			url: url.to_string(),
		}),
		"https" => Ok(()),
		"http" if insecure_ok => Ok(()),
		"http" =>
			Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
		_ => Err(ProviderDescriptorError::UnsupportedEndpoint {
			endpoint: name,
			url: url.to_string(),
		}),
	}
}
