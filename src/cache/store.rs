//! Cache Store Module
//!
//! Main cache engine: a HashMap of entries with key validation and lazy TTL
//! expiration.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::cache::{CacheStats, Clock, Entry, KeyInput, SystemClock};
use crate::config::Config;
use crate::error::{Result, StoreError};

// == Payload ==
/// What a write stores: a raw value to be wrapped, or a ready-made entry.
///
/// Any `V` converts into `Payload::Raw`. A `Wrapped` entry keeps its own
/// expiration and ignores the TTL passed alongside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<V> {
    Raw(V),
    Wrapped(Entry<V>),
}

impl<V> From<V> for Payload<V> {
    fn from(value: V) -> Self {
        Payload::Raw(value)
    }
}

// == Store ==
/// Key-value store with get-or-compute semantics and lazy TTL expiration.
///
/// Expired entries are treated as absent by every operation that observes
/// them, and the first such observation removes them from the table. There
/// is no background sweeping.
///
/// The store is single-threaded; wrap it in [`SharedStore`](crate::cache::SharedStore)
/// for concurrent callers.
#[derive(Debug)]
pub struct Store<V, C = SystemClock> {
    /// Normalized key to entry
    table: HashMap<String, Entry<V>>,
    /// Time source for stamping and checking expiration
    clock: C,
    config: Config,
    stats: CacheStats,
}

impl<V> Store<V, SystemClock> {
    // == Constructors ==
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates an empty store on the system clock using `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_clock_and_config(SystemClock, config.clone())
    }

    /// Creates a store seeded with `data`, loaded exactly as [`Store::load`]
    /// would load it.
    pub fn with_data<I, K, P>(data: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        Self::from_config_with_data(&Config::default(), data)
    }

    /// Creates a store using `config` and seeds it with `data`.
    ///
    /// The seed goes through [`Store::load`] after the config is in place, so
    /// a configured default TTL applies to seeded raw values too.
    pub fn from_config_with_data<I, K, P>(config: &Config, data: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        let mut store = Self::from_config(config);
        store.load(data)?;
        Ok(store)
    }
}

impl<V> Default for Store<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C: Clock> Store<V, C> {
    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::with_clock_and_config(clock, Config::default())
    }

    /// Creates an empty store reading time from `clock` and using `config`.
    pub fn with_clock_and_config(clock: C, config: Config) -> Self {
        Self {
            table: HashMap::new(),
            clock,
            config,
            stats: CacheStats::new(),
        }
    }

    /// Read-only view of the underlying table, expired entries included.
    pub fn table(&self) -> &HashMap<String, Entry<V>> {
        &self.table
    }

    /// Number of entries in the table. May count expired entries that no
    /// operation has observed yet.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the table holds no entries, expired or live.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.table.len());
        stats
    }

    // == Is Set ==
    /// Reports whether `key` holds a live entry, evicting it if expired.
    ///
    /// This is the authoritative presence check; see [`Store::get`].
    pub fn is_set<K: Into<KeyInput>>(&mut self, key: K) -> Result<bool> {
        let key = key.into().into_key()?;
        Ok(self.evict_if_expired(&key))
    }

    // == Unset ==
    /// Removes `key` and returns the value it held, expired or not.
    pub fn unset<K: Into<KeyInput>>(&mut self, key: K) -> Result<Option<V>> {
        let key = key.into().into_key()?;
        let removed = self.table.remove(&key).map(Entry::into_value);
        if removed.is_some() {
            trace!("Unset key: {}", key);
        }
        Ok(removed)
    }

    // == Reset ==
    /// Drops every entry.
    pub fn reset(&mut self) {
        let dropped = self.table.len();
        self.table = HashMap::new();
        debug!("Store reset: dropped {} entries", dropped);
    }

    // == Load ==
    /// Writes every pair as [`Store::set`] would with no TTL, on top of the
    /// existing table. Raw values still pick up the configured default TTL,
    /// if any; wrapped entries keep their own expiration, and one that is
    /// already expired is dropped straight away.
    ///
    /// Loading is not transactional: if a key is invalid the error is
    /// returned and the pairs before it stay written.
    pub fn load<I, K, P>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        let mut loaded = 0usize;
        for (key, payload) in data {
            let key = key.into().into_key()?;
            self.insert(key.clone(), payload.into(), None);
            self.evict_if_expired(&key);
            loaded += 1;
        }
        debug!("Loaded {} entries", loaded);
        Ok(())
    }

    // == Iterate ==
    /// Iterates over live entries as `(key, value)` pairs.
    ///
    /// Expired entries are skipped but left in the table; iteration never
    /// mutates the store.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        let now = self.clock.now();
        self.table
            .iter()
            .filter(move |(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.as_str(), entry.value()))
    }

    // == Purge Expired ==
    /// Removes all expired entries now instead of waiting for them to be
    /// observed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.table.len();
        self.table.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.table.len();
        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!("Purged {} expired entries", removed);
        }
        removed
    }

    /// Returns whether `key` is live, removing its entry if it has expired.
    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now();
        let expired = match self.table.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.table.remove(key);
            self.stats.record_expirations(1);
            debug!("Evicted expired entry: {}", key);
        }
        !expired
    }

    fn insert(&mut self, key: String, payload: Payload<V>, ttl_seconds: Option<u64>) {
        let entry = match payload {
            Payload::Raw(value) => Entry::new_at(
                value,
                ttl_seconds.or(self.config.default_ttl),
                self.clock.now(),
            ),
            Payload::Wrapped(entry) => entry,
        };
        trace!("Set key: {}", key);
        self.table.insert(key, entry);
    }
}

impl<V: Clone, C: Clock> Store<V, C> {
    // == Get ==
    /// Returns the live value for `key`, evicting it first if expired.
    ///
    /// `None` means no live entry. When `V` can itself represent absence
    /// (for example `serde_json::Value::Null` or an `Option`), a stored
    /// "absent" value comes back as `Some(..)`; callers that flatten the
    /// result cannot tell it from a missing key. Use [`Store::is_set`] to
    /// check presence.
    pub fn get<K: Into<KeyInput>>(&mut self, key: K) -> Result<Option<V>> {
        let key = key.into().into_key()?;
        let value = self.live_value(&key);
        match value {
            Some(_) => {
                self.stats.record_hit();
                trace!("Cache hit: {}", key);
            }
            None => {
                self.stats.record_miss();
                trace!("Cache miss: {}", key);
            }
        }
        Ok(value)
    }

    // == Set ==
    /// Stores `payload` under `key`, overwriting any existing entry.
    ///
    /// `ttl_seconds` applies to raw values only. Returns what [`Store::get`]
    /// would return right after the write, which is `None` if the entry is
    /// already expired.
    pub fn set<K, P>(&mut self, key: K, payload: P, ttl_seconds: Option<u64>) -> Result<Option<V>>
    where
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        let key = key.into().into_key()?;
        Ok(self.store(key, payload.into(), ttl_seconds))
    }

    /// Like [`Store::set`], with the payload produced by `producer`.
    ///
    /// The key is validated first, then `producer` runs exactly once. If it
    /// fails, its error is returned unchanged and the table is untouched.
    pub fn set_with<K, F, P, E>(
        &mut self,
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
        let key = key.into().into_key()?;
        let payload = producer()?.into();
        Ok(self.store(key, payload, ttl_seconds))
    }

    // == Get Or Set ==
    /// Returns the live value for `key`, or stores `payload` and returns
    /// what [`Store::set`] returns.
    pub fn get_or_set<K, P>(
        &mut self,
        key: K,
        payload: P,
        ttl_seconds: Option<u64>,
    ) -> Result<Option<V>>
    where
        K: Into<KeyInput>,
        P: Into<Payload<V>>,
    {
        let key = key.into().into_key()?;
        if let Some(value) = self.cached(&key) {
            return Ok(Some(value));
        }
        Ok(self.store(key, payload.into(), ttl_seconds))
    }

    /// Returns the live value for `key`, or runs `producer` once and stores
    /// its result. `producer` is never called on a hit.
    pub fn get_or_set_with<K, F, P, E>(
        &mut self,
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
        let key = key.into().into_key()?;
        if let Some(value) = self.cached(&key) {
            return Ok(Some(value));
        }
        let payload = producer()?.into();
        Ok(self.store(key, payload, ttl_seconds))
    }

    /// Hit path of get-or-set: the live value, recorded in the stats.
    fn cached(&mut self, key: &str) -> Option<V> {
        let value = self.live_value(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    fn live_value(&mut self, key: &str) -> Option<V> {
        if !self.evict_if_expired(key) {
            return None;
        }
        self.table.get(key).map(|entry| entry.value().clone())
    }

    fn store(&mut self, key: String, payload: Payload<V>, ttl_seconds: Option<u64>) -> Option<V> {
        self.insert(key.clone(), payload, ttl_seconds);
        self.live_value(&key)
    }
}
