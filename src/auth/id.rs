//! Strongly typed identifiers for users and providers.
//!
//! Both kinds share one rule set: non-empty, at most [`IDENTIFIER_MAX_LEN`] bytes, and free of
//! whitespace or control characters, so they can be used verbatim as store keys and span fields.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Longest accepted identifier, in bytes.
pub const IDENTIFIER_MAX_LEN: usize = 256;

macro_rules! def_id {
	($(#[$meta:meta])* $vis:vis struct $name:ident => $kind:literal;) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		$vis struct $name(String);
		impl $name {
			/// Label used in validation errors and `Debug` output.
			pub const KIND: &'static str = $kind;

			/// Validates `value` and wraps a copy of it.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				Self::try_from(value.as_ref().to_owned())
			}

			/// Borrows the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				check_identifier(Self::KIND, &value)?;

				Ok(Self(value))
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				self.as_str()
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				self.as_str()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", Self::KIND, self.0)
			}
		}
	};
}

def_id! {
	/// Application-defined identifier of the user owning a set of credentials.
	pub struct UserId => "User";
}
def_id! {
	/// Identifier for an OAuth 1.0a provider descriptor.
	pub struct ProviderId => "Provider";
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, provider).
		kind: &'static str,
	},
	/// The identifier contains whitespace or control characters.
	#[error("{kind} identifier contains whitespace or control characters.")]
	InvalidCharacter {
		/// Kind of identifier (user, provider).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed byte length.
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Kind of identifier (user, provider).
		kind: &'static str,
		/// Maximum permitted byte length.
		max: usize,
	},
}

fn check_identifier(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	match value.len() {
		0 => Err(IdentifierError::Empty { kind }),
		len if len > IDENTIFIER_MAX_LEN =>
			Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN }),
		_ if value.chars().any(|c| c.is_whitespace() || c.is_control()) =>
			Err(IdentifierError::InvalidCharacter { kind }),
		_ => Ok(()),
	}
}
