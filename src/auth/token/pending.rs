//! Temporary tokens awaiting the user's decision at the provider.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Temporary token and its shared secret, recorded between the temporary-token request and the
/// provider redirect.
#[derive(Clone)]
pub struct PendingAuthorization {
	/// Temporary (request) token issued by the provider.
	pub temporary_token: String,
	/// Secret shared with the provider for the temporary token.
	pub token_secret: TokenSecret,
	/// Instant the temporary token was recorded.
	pub issued_at: OffsetDateTime,
}
impl PendingAuthorization {
	/// Records a temporary token issued now.
	pub fn new(temporary_token: impl Into<String>, token_secret: impl Into<String>) -> Self {
		Self {
			temporary_token: temporary_token.into(),
			token_secret: TokenSecret::new(token_secret),
			issued_at: OffsetDateTime::now_utc(),
		}
	}

	/// Returns `true` once `ttl` has elapsed since issuance at `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		now - self.issued_at >= ttl
	}
}
impl Debug for PendingAuthorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PendingAuthorization")
			.field("temporary_token", &self.temporary_token)
			.field("token_secret", &self.token_secret)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn expiry_is_measured_from_issuance() {
		let mut pending = PendingAuthorization::new("T1", "S1");
		let now = OffsetDateTime::now_utc();

		pending.issued_at = now - Duration::minutes(5);

		assert!(!pending.is_expired_at(now, Duration::minutes(10)));
		assert!(pending.is_expired_at(now, Duration::minutes(5)));
		assert!(!format!("{pending:?}").contains("S1"));
	}
}
