//! Memo Cache - An in-process get-or-compute key-value store
//!
//! Caches values under string keys with optional per-entry TTL. Expiration is
//! lazy: an expired entry is dropped the first time an operation observes it.
//!
//! ```
//! use memo_cache::Store;
//!
//! let mut store: Store<u32> = Store::new();
//! let answer = store
//!     .get_or_set_with("answer", Some(60), || Ok::<_, memo_cache::StoreError>(42u32))
//!     .unwrap();
//! assert_eq!(answer, Some(42));
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Entry, Payload, SharedStore, Store, Symbol};
pub use config::Config;
pub use error::{Result, StoreError};
