//! In-process study store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use interleave_core::error::StoreError;
use interleave_core::model::{Deck, UserState};
use interleave_core::traits::{StudyStore, UserMutator};

type UserSlot = Arc<Mutex<Option<UserState>>>;

/// Keeps every user and deck in memory for the lifetime of the process.
///
/// Each user lives behind its own async mutex, so upserts for one user are
/// serialized while other users proceed independently.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, UserSlot>>,
    decks: RwLock<BTreeMap<String, Deck>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, user_id: &str) -> UserSlot {
        if let Some(slot) = self.users.read().await.get(user_id) {
            return Arc::clone(slot);
        }
        let mut users = self.users.write().await;
        Arc::clone(users.entry(user_id.to_string()).or_default())
    }
}

#[async_trait]
impl StudyStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        let slot = match self.users.read().await.get(user_id) {
            Some(slot) => Arc::clone(slot),
            None => return Ok(None),
        };
        let state = slot.lock().await;
        Ok(state.clone())
    }

    async fn upsert(
        &self,
        user_id: &str,
        mutator: UserMutator<'_>,
    ) -> Result<UserState, StoreError> {
        let slot = self.slot(user_id).await;
        let mut guard = slot.lock().await;
        let state = guard.get_or_insert_with(|| UserState::new(user_id));
        mutator(state);
        state.updated_at = Utc::now();
        Ok(state.clone())
    }

    async fn get_deck(&self, name: &str) -> Result<Option<Deck>, StoreError> {
        Ok(self.decks.read().await.get(name).cloned())
    }

    async fn put_deck(&self, deck: Deck) -> Result<(), StoreError> {
        self.decks.write().await.insert(deck.name.clone(), deck);
        Ok(())
    }

    async fn deck_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.decks.read().await.keys().cloned().collect())
    }
}
