//! Storage contracts and the built-in in-memory store for pending temporary tokens and per-user
//! credentials.
//!
//! Stores own their synchronization: callers only see atomic operations, never a lock or a map,
//! so no caller can hold store state across a network call.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, PendingAuthorization, UserId},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Records a temporary token awaiting the provider redirect.
	fn save_pending(&self, pending: PendingAuthorization) -> StoreFuture<'_, ()>;

	/// Removes and returns the pending entry for `temporary_token`.
	///
	/// A pending secret is handed out at most once; every later call returns `None`.
	fn take_pending<'a>(
		&'a self,
		temporary_token: &'a str,
	) -> StoreFuture<'a, Option<PendingAuthorization>>;

	/// Drops pending entries issued before `issued_before` and returns how many were removed.
	fn purge_pending(&self, issued_before: OffsetDateTime) -> StoreFuture<'_, usize>;

	/// Fetches the credentials stored for `user`, if any.
	fn fetch<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, Option<Credentials>>;

	/// Inserts credentials for `user`, or overwrites the existing entry's token fields in place.
	fn save(&self, user: UserId, credentials: Credentials) -> StoreFuture<'_, SaveOutcome>;

	/// Removes the credentials stored for `user`; returns `true` when an entry existed.
	fn invalidate<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, bool>;
}

/// Result of a [`CredentialStore::save`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
	/// No entry existed for the user; a new one was created.
	Inserted,
	/// An entry existed and its token fields were overwritten.
	Updated,
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));
		assert!(broker_error.to_string().contains("database unreachable"));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn save_outcome_can_be_serialized() {
		let payload =
			serde_json::to_string(&SaveOutcome::Updated).expect("SaveOutcome should serialize.");

		assert_eq!(payload, "\"Updated\"");

		let round_trip: SaveOutcome =
			serde_json::from_str(&payload).expect("Serialized outcome should deserialize.");

		assert_eq!(round_trip, SaveOutcome::Updated);
	}
}
