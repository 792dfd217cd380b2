//! Thread-safe in-memory [`CredentialStore`] whose lifetime matches the process.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, PendingAuthorization, UserId},
	store::{CredentialStore, SaveOutcome, StoreError, StoreFuture},
};

type StoreState = Arc<Mutex<StoreMaps>>;

#[derive(Debug, Default)]
struct StoreMaps {
	credentials: HashMap<UserId, Credentials>,
	pending: HashMap<String, PendingAuthorization>,
}

/// In-process store guarding both the pending-token table and the credential map with one lock.
///
/// The lock is held only for the map operation itself and every method returns an already
/// resolved future, so it is never held across an `.await`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreState);
impl MemoryStore {
	/// Number of users with stored credentials.
	pub fn len(&self) -> usize {
		self.0.lock().credentials.len()
	}

	/// Returns `true` when no user has stored credentials.
	pub fn is_empty(&self) -> bool {
		self.0.lock().credentials.is_empty()
	}

	/// Number of temporary tokens awaiting a callback.
	pub fn pending_len(&self) -> usize {
		self.0.lock().pending.len()
	}

	fn save_now(state: &StoreState, user: UserId, credentials: Credentials) -> SaveOutcome {
		let mut guard = state.lock();

		match guard.credentials.get_mut(&user) {
			Some(current) => {
				current.refresh_from(credentials);

				SaveOutcome::Updated
			},
			None => {
				guard.credentials.insert(user, credentials);

				SaveOutcome::Inserted
			},
		}
	}

	fn purge_now(state: &StoreState, issued_before: OffsetDateTime) -> usize {
		let mut guard = state.lock();
		let before = guard.pending.len();

		guard.pending.retain(|_, pending| pending.issued_at >= issued_before);

		before - guard.pending.len()
	}
}
impl CredentialStore for MemoryStore {
	fn save_pending(&self, pending: PendingAuthorization) -> StoreFuture<'_, ()> {
		self.0.lock().pending.insert(pending.temporary_token.clone(), pending);

		Box::pin(async { Ok::<_, StoreError>(()) })
	}

	fn take_pending<'a>(
		&'a self,
		temporary_token: &'a str,
	) -> StoreFuture<'a, Option<PendingAuthorization>> {
		let taken = self.0.lock().pending.remove(temporary_token);

		Box::pin(async move { Ok(taken) })
	}

	fn purge_pending(&self, issued_before: OffsetDateTime) -> StoreFuture<'_, usize> {
		let purged = Self::purge_now(&self.0, issued_before);

		Box::pin(async move { Ok(purged) })
	}

	fn fetch<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, Option<Credentials>> {
		let found = self.0.lock().credentials.get(user).cloned();

		Box::pin(async move { Ok(found) })
	}

	fn save(&self, user: UserId, credentials: Credentials) -> StoreFuture<'_, SaveOutcome> {
		let outcome = Self::save_now(&self.0, user, credentials);

		Box::pin(async move { Ok(outcome) })
	}

	fn invalidate<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, bool> {
		let removed = self.0.lock().credentials.remove(user).is_some();

		Box::pin(async move { Ok(removed) })
	}
}
