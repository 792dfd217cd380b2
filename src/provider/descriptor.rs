//! Provider descriptor data structures shared by all flows.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Endpoint labels used in errors, spans, and classification.
pub mod endpoint;
/// Provider-specific behavior toggles.
pub mod quirks;

pub use builder::*;
pub use endpoint::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Temporary-credential (request token) endpoint.
	pub request_token: Url,
	/// Token-credential (access token) endpoint.
	pub access_token: Url,
	/// Resource-owner authorization page the user's browser visits.
	pub authorize: Url,
	/// Endpoint probed with stored credentials to detect revocation.
	pub verify: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Callback registered with the provider; the `state` parameter is appended per request.
	pub redirect_uri: Url,
	/// Provider-specific quirks.
	#[serde(default)]
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}
}
