// self
use crate::_prelude::*;

/// Provider endpoints contacted by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// Temporary-credential request.
	RequestToken,
	/// Verifier exchange for token credentials.
	AccessToken,
	/// Credential verification probe.
	Verify,
}
impl Endpoint {
	/// Returns a stable label suitable for errors, spans, and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::RequestToken => "request_token",
			Endpoint::AccessToken => "access_token",
			Endpoint::Verify => "verify",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
