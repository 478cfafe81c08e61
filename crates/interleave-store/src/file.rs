//! JSON-file study store.
//!
//! Layout under the data directory:
//!
//! ```text
//! users/<user>.json
//! decks/<deck>.json
//! ```
//!
//! File names are derived with [`file_stem`], which keeps ASCII letters,
//! digits, `-` and `_` and percent-encodes every other byte, so distinct keys
//! never share a file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use interleave_core::error::StoreError;
use interleave_core::model::{Deck, UserState};
use interleave_core::traits::{StudyStore, UserMutator};

/// Persists each user and each deck as a pretty-printed JSON file.
pub struct JsonFileStore {
    root: PathBuf,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    deck_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for dir in [root.join("users"), root.join("decks")] {
            std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
                key: dir.display().to_string(),
                message: e.to_string(),
            })?;
        }
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            user_locks: Mutex::new(HashMap::new()),
            deck_lock: Mutex::new(()),
        })
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.root
            .join("users")
            .join(format!("{}.json", file_stem(user_id)))
    }

    fn deck_path(&self, name: &str) -> PathBuf {
        self.root
            .join("decks")
            .join(format!("{}.json", file_stem(name)))
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        Arc::clone(locks.entry(user_id.to_string()).or_default())
    }

    /// Drop this caller's handle and forget the lock once nobody else holds it.
    async fn release_user_lock(&self, user_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.user_locks.lock().await;
        drop(lock);
        if locks
            .get(user_id)
            .is_some_and(|held| Arc::strong_count(held) == 1)
        {
            locks.remove(user_id);
        }
    }

    async fn apply(
        &self,
        user_id: &str,
        mutator: UserMutator<'_>,
    ) -> Result<UserState, StoreError> {
        let path = self.user_path(user_id);
        let mut state = read_json(&path)
            .await?
            .unwrap_or_else(|| UserState::new(user_id));
        mutator(&mut state);
        state.updated_at = Utc::now();
        write_json(&path, &state).await?;
        Ok(state)
    }
}

/// Encode a key as a file stem that is safe on every platform.
pub fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let key = path.display().to_string();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                key,
                message: e.to_string(),
            })
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StoreError::Corrupt {
            key,
            message: e.to_string(),
        })
}

/// Write through a temporary sibling and rename, so readers never see a
/// half-written file.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let key = path.display().to_string();
    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
        key: key.clone(),
        message: e.to_string(),
    })?;
    let tmp = path.with_extension("json.tmp");
    let io = |e: std::io::Error| StoreError::Io {
        key: key.clone(),
        message: e.to_string(),
    };
    tokio::fs::write(&tmp, json).await.map_err(io)?;
    tokio::fs::rename(&tmp, path).await.map_err(io)?;
    Ok(())
}

#[async_trait]
impl StudyStore for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        let lock = self.user_lock(user_id).await;
        let result = {
            let _guard = lock.lock().await;
            read_json(&self.user_path(user_id)).await
        };
        self.release_user_lock(user_id, lock).await;
        result
    }

    async fn upsert(
        &self,
        user_id: &str,
        mutator: UserMutator<'_>,
    ) -> Result<UserState, StoreError> {
        let lock = self.user_lock(user_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply(user_id, mutator).await
        };
        self.release_user_lock(user_id, lock).await;
        result
    }

    async fn get_deck(&self, name: &str) -> Result<Option<Deck>, StoreError> {
        read_json(&self.deck_path(name)).await
    }

    async fn put_deck(&self, deck: Deck) -> Result<(), StoreError> {
        let _guard = self.deck_lock.lock().await;
        write_json(&self.deck_path(&deck.name), &deck).await
    }

    async fn deck_names(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join("decks");
        let io = |e: std::io::Error| StoreError::Io {
            key: dir.display().to_string(),
            message: e.to_string(),
        };

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io)?;
        while let Some(entry) = entries.next_entry().await.map_err(io)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match read_json::<Deck>(&path).await {
                    Ok(Some(deck)) => names.push(deck.name),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("skipping unreadable deck file: {e}"),
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
