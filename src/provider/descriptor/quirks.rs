// self
use crate::_prelude::*;

/// Provider-specific toggles that influence how flows behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Accepts `http` endpoints (local development and mock providers only).
	pub allow_insecure_endpoints: bool,
	/// Rejects callbacks whose temporary token has no pending secret instead of exchanging with
	/// an empty secret.
	pub fail_on_unknown_temporary_token: bool,
	/// Probes the verify endpoint before handing out an `Authorization` header.
	pub verify_before_signing: bool,
	/// Removes stored credentials once the verify endpoint answers `401`.
	pub evict_on_revoked: bool,
	/// Uses the RSA key (when configured) for verifier exchanges and resource requests as well,
	/// instead of HMAC-SHA1 with the consumer secret.
	pub rsa_for_all_requests: bool,
	/// Lifetime of a pending temporary token.
	pub pending_ttl: Duration,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			allow_insecure_endpoints: false,
			fail_on_unknown_temporary_token: true,
			verify_before_signing: true,
			evict_on_revoked: false,
			rsa_for_all_requests: false,
			pending_ttl: Duration::minutes(10),
		}
	}
}
