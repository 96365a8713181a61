//! Shared Store Module
//!
//! A store guarded by one exclusive async lock for concurrent callers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cache::{CacheStats, Clock, KeyInput, Payload, Store, SystemClock};
use crate::error::{Result, StoreError};

// == Shared Store ==
/// Cloneable handle to a [`Store`] behind a `tokio::sync::Mutex`.
///
/// Every operation holds the lock from key validation to the final read, so
/// `get_or_set_with` runs its producer at most once per key per expiration
/// cycle no matter how many tasks race on it. The producer runs while the
/// lock is held; keep it short or compute outside and use `get_or_set`.
pub struct SharedStore<V, C = SystemClock> {
    inner: Arc<Mutex<Store<V, C>>>,
}

impl<V, C> Clone for SharedStore<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SharedStore<V, SystemClock> {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl<V, C: Clock> SharedStore<V, C> {
    // == Constructor ==
    /// Wraps `store` for shared use.
    pub fn new(store: Store<V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // == Lock ==
    /// Locks the store for a sequence of operations that must not
    /// interleave with other callers.
    pub async fn lock(&self) -> MutexGuard<'_, Store<V, C>> {
        self.inner.lock().await
    }

    // == Is Set ==
    /// Reports whether `key` holds a live entry, evicting it if expired.
    pub async fn is_set<K: Into<KeyInput>>(&self, key: K) -> Result<bool> {
        self.inner.lock().await.is_set(key)
    }

    // == Unset ==
    /// Removes `key` and returns the value it held.
    pub async fn unset<K: Into<KeyInput>>(&self, key: K) -> Result<Option<V>> {
        self.inner.lock().await.unset(key)
    }

    // == Reset ==
    /// Drops every entry.
    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }

    // == Length ==
    /// Returns the number of entries in the table.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }
}

impl<V: Clone, C: Clock> SharedStore<V, C> {
    // == Get ==
    /// Returns the live value for `key`.
    pub async fn get<K: Into<KeyInput>>(&self, key: K) -> Result<Option<V>> {
        self.inner.lock().await.get(key)
    }

    // == Set ==
    /// Stores `payload` under `key`, overwriting any existing entry.
    pub async fn set<K, P>(&self, key: K, payload: P, ttl_seconds: Option<u64>) -> Result<Option<V>>
    where
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        self.inner.lock().await.set(key, payload, ttl_seconds)
    }

    // == Get Or Set ==
    /// Returns the live value for `key`, or stores `payload`.
    pub async fn get_or_set<K, P>(
        &self,
        key: K,
        payload: P,
        ttl_seconds: Option<u64>,
    ) -> Result<Option<V>>
    where
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        self.inner.lock().await.get_or_set(key, payload, ttl_seconds)
    }

    /// Returns the live value for `key`, or runs `producer` once under the
    /// lock and stores its result.
    pub async fn get_or_set_with<K, F, P, E>(
        &self,
        key: K,
        ttl_seconds: Option<u64>,
        producer: F,
    ) -> std::result::Result<Option<V>, E>
    where
        K: Into<KeyInput>,
        F: FnOnce() -> std::result::Result<P, E>,
        P: Into<Payload<V>>,
        E: From<StoreError>,
    {
        self.inner
            .lock()
            .await
            .get_or_set_with(key, ttl_seconds, producer)
    }
}
