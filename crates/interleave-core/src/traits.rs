//! The persistence seam between the tool layer and a storage backend.
//!
//! Implemented by the in-memory and JSON-file stores in `interleave-store`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Deck, UserState};

/// A mutation applied to one user's state while the store holds that user's lock.
pub type UserMutator<'a> = Box<dyn FnOnce(&mut UserState) + Send + 'a>;

/// Per-user study state plus the global deck index.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Snapshot of a user's state, `None` if the user has never been written.
    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError>;

    /// Atomic read-modify-write of one user's state.
    ///
    /// Creates the user on first write, bumps `updated_at`, and returns the
    /// state as persisted. Concurrent upserts for the same user are applied
    /// one after another; different users do not block each other.
    async fn upsert(
        &self,
        user_id: &str,
        mutator: UserMutator<'_>,
    ) -> Result<UserState, StoreError>;

    async fn get_deck(&self, name: &str) -> Result<Option<Deck>, StoreError>;

    /// Insert or replace a deck by name.
    async fn put_deck(&self, deck: Deck) -> Result<(), StoreError>;

    /// All deck names, sorted.
    async fn deck_names(&self) -> Result<Vec<String>, StoreError>;
}
