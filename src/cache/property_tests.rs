//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store behavior over generated keys, values and
//! operation sequences.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};

use crate::cache::{Clock, Entry, ManualClock, Payload, SharedStore, Store, Symbol};
use crate::error::StoreError;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{0,32}"
}

/// Generates JSON values, falsy ones included
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,16}".prop_map(Value::String),
    ]
}

/// Generates JSON values that are not accepted as keys
fn invalid_key_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        prop::collection::vec("[a-z]{1,4}", 0..3).prop_map(|v| json!(v)),
        Just(json!({"k": 1})),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: i32, ttl: Option<u64> },
    Get { key: String },
    Unset { key: String },
    Advance { seconds: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    let key = "[a-c]";
    prop_oneof![
        (key, any::<i32>(), prop::option::of(0u64..10))
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        key.prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Unset { key }),
        (0i64..12).prop_map(|seconds| CacheOp::Advance { seconds }),
    ]
}

fn frozen_clock() -> ManualClock {
    ManualClock::new(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_roundtrip_preserves_value(key in valid_key_strategy(), value in value_strategy()) {
        let mut store: Store<Value> = Store::new();

        prop_assert_eq!(store.set(key.as_str(), value.clone(), None).unwrap(), Some(value.clone()));
        prop_assert_eq!(store.get(key.as_str()).unwrap(), Some(value));
        prop_assert!(store.is_set(key.as_str()).unwrap());
    }

    #[test]
    fn prop_symbol_and_text_keys_match(key in valid_key_strategy(), value in any::<i32>()) {
        let mut store: Store<i32> = Store::new();

        store.set(Symbol::new(key.clone()), value, None).unwrap();

        prop_assert_eq!(store.get(json!(key)).unwrap(), Some(value));
    }

    #[test]
    fn prop_get_or_set_keeps_first(
        key in valid_key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let mut store: Store<Value> = Store::new();
        let mut second_ran = false;

        let a = store.get_or_set(key.as_str(), first.clone(), None).unwrap();
        let b = store
            .get_or_set_with(key.as_str(), None, || {
                second_ran = true;
                Ok::<_, StoreError>(second)
            })
            .unwrap();

        prop_assert_eq!(a, Some(first.clone()));
        prop_assert_eq!(b, Some(first));
        prop_assert!(!second_ran);
    }

    #[test]
    fn prop_invalid_keys_leave_table_unchanged(
        seed in prop::collection::hash_map(valid_key_strategy(), any::<i32>(), 0..8),
        bad in invalid_key_strategy()
    ) {
        let mut store: Store<i32> = Store::with_data(seed.clone()).unwrap();

        prop_assert!(store.get(bad.clone()).is_err());
        prop_assert!(store.set(bad.clone(), 1, None).is_err());
        prop_assert!(store.is_set(bad.clone()).is_err());
        prop_assert!(store.get_or_set(bad.clone(), 1, None).is_err());
        prop_assert!(store.unset(bad.clone()).is_err());
        prop_assert!(store.load([(bad, 1)]).is_err());

        let contents: HashMap<String, i32> =
            store.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        prop_assert_eq!(contents, seed);
    }

    #[test]
    fn prop_entry_equality_ignores_ttl(
        value in any::<i32>(),
        ttl_a in prop::option::of(any::<u32>()),
        ttl_b in prop::option::of(any::<u32>())
    ) {
        let a = Entry::new(value, ttl_a.map(u64::from));
        let b = Entry::new(value, ttl_b.map(u64::from));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_expiration_boundary(ttl in 0u64..10_000, past_ms in 1i64..5_000) {
        let clock = frozen_clock();
        let mut store: Store<i32, ManualClock> = Store::with_clock(clock.clone());

        store.set("k", 1, Some(ttl)).unwrap();

        clock.advance(Duration::seconds(ttl as i64));
        prop_assert_eq!(store.get("k").unwrap(), Some(1));

        clock.advance(Duration::milliseconds(past_ms));
        prop_assert_eq!(store.get("k").unwrap(), None);
        prop_assert!(store.table().is_empty());
    }

    // Compares the store against a plain map of (value, expires_at) under a
    // shared manual clock.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let clock = frozen_clock();
        let mut store: Store<i32, ManualClock> = Store::with_clock(clock.clone());
        let mut model: HashMap<String, (i32, Option<DateTime<Utc>>)> = HashMap::new();

        for op in ops {
            let now = clock.now();
            match op {
                CacheOp::Set { key, value, ttl } => {
                    let expires = ttl.map(|t| now + Duration::seconds(t as i64));
                    model.insert(key.clone(), (value, expires));
                    prop_assert_eq!(store.set(key.as_str(), value, ttl).unwrap(), Some(value));
                }
                CacheOp::Get { key } => {
                    let expired = matches!(
                        model.get(&key),
                        Some((_, Some(expires))) if now > *expires
                    );
                    if expired {
                        model.remove(&key);
                    }
                    let expected = model.get(&key).map(|(value, _)| *value);
                    prop_assert_eq!(store.get(key.as_str()).unwrap(), expected);
                }
                CacheOp::Unset { key } => {
                    let expected = model.remove(&key).map(|(value, _)| value);
                    prop_assert_eq!(store.unset(key.as_str()).unwrap(), expected);
                }
                CacheOp::Advance { seconds } => clock.advance(Duration::seconds(seconds)),
            }

            // Iteration reports exactly the live model entries
            let now = clock.now();
            let mut live: Vec<(String, i32)> =
                store.iter().map(|(k, v)| (k.to_string(), *v)).collect();
            let mut expected: Vec<(String, i32)> = model
                .iter()
                .filter(|(_, (_, expires))| expires.map_or(true, |e| now <= e))
                .map(|(k, (v, _))| (k.clone(), *v))
                .collect();
            live.sort();
            expected.sort();
            prop_assert_eq!(live, expected);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_load_merges(
        existing in prop::collection::hash_map("[a-m]{1,4}", any::<i32>(), 0..6),
        loaded in prop::collection::hash_map("[h-z]{1,4}", any::<i32>(), 0..6)
    ) {
        let mut store: Store<i32> = Store::with_data(existing.clone()).unwrap();
        store
            .load(loaded.iter().map(|(k, v)| (k.clone(), Payload::Raw(*v))))
            .unwrap();

        let mut expected = existing;
        expected.extend(loaded);
        let contents: HashMap<String, i32> =
            store.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        prop_assert_eq!(contents, expected);
    }

    #[test]
    fn prop_shared_store_roundtrip(key in valid_key_strategy(), value in any::<i64>()) {
        let store: SharedStore<i64> = SharedStore::default();

        let fetched = tokio_test::block_on(async {
            store.set(key.as_str(), value, None).await.unwrap();
            store.get(key.as_str()).await.unwrap()
        });

        prop_assert_eq!(fetched, Some(value));
    }
}
