//! Cache Module
//!
//! Provides the in-memory store with lazy TTL expiration.

mod clock;
mod entry;
mod key;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::Entry;
pub use key::{KeyInput, Symbol};
pub use shared::SharedStore;
pub use stats::CacheStats;
pub use store::{Payload, Store};
