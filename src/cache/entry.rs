//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A cached value plus an optional absolute expiration instant.
///
/// Entries are immutable once built. Equality compares values only, so two
/// entries holding the same value are equal whatever their expiration.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry with optional TTL, measured from the system clock.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds, `None` never expires
    pub fn new(value: V, ttl_seconds: Option<u64>) -> Self {
        Self::new_at(value, ttl_seconds, Utc::now())
    }

    /// Creates a new entry whose TTL is measured from `now`.
    ///
    /// A TTL too large to represent is treated as no expiration.
    pub fn new_at(value: V, ttl_seconds: Option<u64>, now: DateTime<Utc>) -> Self {
        let expires_at = ttl_seconds.and_then(|ttl| {
            i64::try_from(ttl)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|ttl| now.checked_add_signed(ttl))
        });

        Self { value, expires_at }
    }

    /// Returns the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the stored value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns the expiration instant, `None` if the entry never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    // == Is Expired ==
    /// Checks if the entry has expired according to the system clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks if the entry has expired at `now`.
    ///
    /// Expiration is strict: an entry is still live at the exact instant it
    /// expires and expired at any later instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining lifetime, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl_remaining_at(Utc::now())
    }

    /// Returns remaining lifetime at `now`, clamped to zero once elapsed.
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expires| (expires - now).max(Duration::zero()))
    }
}

impl<V: PartialEq> PartialEq for Entry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: Eq> Eq for Entry<V> {}
