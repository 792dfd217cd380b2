//! Long-lived access credentials stored per user.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Access token and token secret issued by the provider after a successful verifier exchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Access token sent as `oauth_token` on signed requests.
	pub access_token: TokenSecret,
	/// Token secret mixed into HMAC-SHA1 signing keys.
	pub token_secret: TokenSecret,
	/// Instant the provider issued (or last refreshed) these credentials.
	pub issued_at: OffsetDateTime,
}
impl Credentials {
	/// Creates credentials stamped with the current clock.
	pub fn new(access_token: impl Into<String>, token_secret: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_secret: TokenSecret::new(token_secret),
			issued_at: OffsetDateTime::now_utc(),
		}
	}

	/// Overwrites the token fields with those of `fresh`, keeping this value's identity.
	pub fn refresh_from(&mut self, fresh: Credentials) {
		self.access_token = fresh.access_token;
		self.token_secret = fresh.token_secret;
		self.issued_at = fresh.issued_at;
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("access_token", &"<redacted>")
			.field("token_secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn refresh_overwrites_tokens_in_place() {
		let mut current = Credentials::new("T1", "S1");
		let mut fresh = Credentials::new("T2", "S2");

		fresh.issued_at = macros::datetime!(2030-01-01 00:00 UTC);
		current.refresh_from(fresh);

		assert_eq!(current.access_token.expose(), "T2");
		assert_eq!(current.token_secret.expose(), "S2");
		assert_eq!(current.issued_at, macros::datetime!(2030-01-01 00:00 UTC));
	}

	#[test]
	fn debug_output_redacts_tokens() {
		let rendered = format!("{:?}", Credentials::new("visible-token", "visible-secret"));

		assert!(!rendered.contains("visible-token"));
		assert!(!rendered.contains("visible-secret"));
	}
}
