//! Persisted key-value storage for session credentials

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::StoreResult;
use async_trait::async_trait;
use std::fmt;

/// Keys the client persists between runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Short-lived access token
    UserToken,
    /// Long-lived token used to mint new access tokens
    RefreshToken,
    /// Display name of the signed-in user
    Username,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [Self::UserToken, Self::RefreshToken, Self::Username];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserToken => "userToken",
            Self::RefreshToken => "refreshToken",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key-value store with explicit get/set/remove
///
/// Removing a key that is not present succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

#[cfg(test)]
pub(crate) mod suite {
    //! Behaviour every `KeyValueStore` implementation must share

    use super::*;

    pub async fn run_all<S: KeyValueStore>(store: &S) {
        missing_key_reads_none(store).await;
        set_then_get(store).await;
        overwrite(store).await;
        remove(store).await;
        keys_are_independent(store).await;
    }

    async fn missing_key_reads_none<S: KeyValueStore>(store: &S) {
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    async fn set_then_get<S: KeyValueStore>(store: &S) {
        store.set("userToken", "abc").await.unwrap();
        assert_eq!(store.get("userToken").await.unwrap().as_deref(), Some("abc"));
    }

    async fn overwrite<S: KeyValueStore>(store: &S) {
        store.set("userToken", "first").await.unwrap();
        store.set("userToken", "second").await.unwrap();
        assert_eq!(
            store.get("userToken").await.unwrap().as_deref(),
            Some("second")
        );
    }

    async fn remove<S: KeyValueStore>(store: &S) {
        store.set("username", "ana").await.unwrap();
        store.remove("username").await.unwrap();
        assert_eq!(store.get("username").await.unwrap(), None);

        // second removal is a no-op
        store.remove("username").await.unwrap();
    }

    async fn keys_are_independent<S: KeyValueStore>(store: &S) {
        store.set("userToken", "access").await.unwrap();
        store.set("refreshToken", "refresh").await.unwrap();
        store.remove("userToken").await.unwrap();
        assert_eq!(
            store.get("refreshToken").await.unwrap().as_deref(),
            Some("refresh")
        );
    }
}
