use qseq::prelude::*;
use qseq::{ChainedMapConfig, MapStats};
use std::hash::{BuildHasherDefault, Hasher};

/// Sends every key to the same bucket.
#[derive(Default)]
struct CollidingHasher;

impl Hasher for CollidingHasher {
    fn finish(&self) -> u64 {
        7
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

type Colliding = BuildHasherDefault<CollidingHasher>;

#[test]
fn test_insert_and_lookup() {
    let mut map = ChainedMap::new();

    assert!(map.insert(1, "Something"));
    assert!(map.insert(2, "Otherthing"));

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Ok(&"Something"));
    assert_eq!(map.try_get(&2), Some(&"Otherthing"));
    assert!(map.contains_key(&2));
}

#[test]
fn test_duplicate_insert_is_rejected() {
    let mut map = ChainedMap::new();

    assert!(map.insert("key", 1));
    assert!(!map.insert("key", 2));

    assert_eq!(map.get("key"), Ok(&1));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_missing_key_fails_loudly() {
    let map: ChainedMap<u32, u32> = ChainedMap::new();

    assert_eq!(map.get(&3), Err(QueryError::KeyNotFound));
    assert_eq!(map.try_get(&3), None);
}

#[test]
fn test_remove() {
    let mut map = ChainedMap::new();
    map.insert(1, "Something");
    map.insert(2, "Otherthing");

    assert_eq!(map.remove(&2), Some("Otherthing"));
    assert!(!map.contains_key(&2));
    assert!(map.contains_key(&1));
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_remove_head_middle_and_tail_of_one_chain() {
    let mut map: ChainedMap<u32, u32, Colliding> = ChainedMap::with_hasher(Colliding::default());
    for key in 0..5 {
        map.insert(key, key * 10);
    }
    // Insertion prepends, so the chain reads 4, 3, 2, 1, 0.
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);

    assert_eq!(map.remove(&4), Some(40)); // head
    assert_eq!(map.remove(&2), Some(20)); // middle
    assert_eq!(map.remove(&0), Some(0)); // tail

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 1]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.stats().longest_chain, 2);
    assert!(!map.contains_key(&4));
    assert_eq!(map.get(&3), Ok(&30));
}

#[test]
fn test_resize_keeps_every_entry() {
    let mut map: ChainedMap<u32, String, Colliding> = ChainedMap::with_hasher(Colliding::default());
    let threshold = map.threshold();
    assert_eq!(map.bucket_count(), 11);
    assert_eq!(threshold, 8);

    for key in 0..50 {
        assert!(map.insert(key, key.to_string()));
    }

    assert_eq!(map.bucket_count(), 11 * 19);
    assert_eq!(map.threshold(), 11 * 19 * 3 / 4);
    assert_eq!(map.len(), 50);
    for key in 0..50 {
        assert_eq!(map.get(&key), Ok(&key.to_string()));
    }

    let stats = map.stats();
    assert_eq!(stats.resizes, 1);
    assert_eq!(stats.entries, 50);
}

#[test]
fn test_get_mut_updates_in_place() {
    let mut map = ChainedMap::new();
    map.insert("hits", 0);

    if let Some(hits) = map.get_mut("hits") {
        *hits += 5;
    }

    assert_eq!(map.get("hits"), Ok(&5));
    assert!(map.get_mut("misses").is_none());
}

#[test]
fn test_size_tracks_inserts_and_removes() {
    let mut map = ChainedMap::new();
    for key in 0..200u32 {
        map.insert(key, ());
    }
    for key in (0..200u32).filter(|key| key % 3 == 0) {
        map.remove(&key);
    }

    let stats = map.stats();
    assert_eq!(map.len(), 133);
    assert_eq!(stats.entries, 133);
    assert_eq!(map.iter().count(), 133);
    assert!(stats.longest_chain < stats.threshold);
}

#[test]
fn test_map_is_a_keyed_sequence() {
    let map: ChainedMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();

    let big = (&map).filter(|(_, value)| *value > 1).project(|(key, _)| key);

    let mut keys = big.collect_vec();
    keys.sort();
    assert_eq!(keys, vec!["b", "c"]);
    assert_eq!(map.sum(|(_, value)| *value as f64), 6.0);
}

#[test]
fn test_clear() {
    let mut map = ChainedMap::new();
    map.insert(1, 1);
    map.insert(2, 2);

    map.clear();

    assert!(map.is_empty());
    assert!(!map.contains_key(&1));
    assert!(map.insert(1, 10));
    assert_eq!(map.get(&1), Ok(&10));
}

#[test]
fn test_custom_config() {
    let config = ChainedMapConfig {
        initial_buckets: 2,
        growth_factor: 2,
        ..ChainedMapConfig::default()
    };
    let mut map = ChainedMap::with_config(config).unwrap();
    assert_eq!(map.threshold(), 1);

    for key in 0..10 {
        map.insert(key, key);
    }

    assert!(map.bucket_count() > 2);
    for key in 0..10 {
        assert_eq!(map.get(&key), Ok(&key));
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = ChainedMapConfig {
        growth_factor: 1,
        ..ChainedMapConfig::default()
    };

    let result: Result<ChainedMap<u8, u8>, _> = ChainedMap::with_config(config);

    assert!(matches!(result, Err(QueryError::InvalidConfig(_))));
}

#[test]
fn test_config_from_json() {
    let config = ChainedMapConfig::from_json(r#"{"initial_buckets": 31}"#).unwrap();
    assert_eq!(config.initial_buckets, 31);
    assert_eq!(config.growth_factor, 19);

    let broken = ChainedMapConfig::from_json(r#"{"initial_buckets": 0}"#);
    assert!(matches!(broken, Err(QueryError::InvalidConfig(_))));

    let garbage = ChainedMapConfig::from_json("not json");
    assert!(matches!(garbage, Err(QueryError::InvalidConfig(_))));
}

#[test]
fn test_config_rejects_overflowing_values() {
    let oversized = [
        r#"{"threshold_numerator": 18446744073709551615}"#,
        r#"{"threshold_numerator": 5, "threshold_denominator": 4}"#,
        r#"{"growth_factor": 18446744073709551615}"#,
        r#"{"growth_factor": 65}"#,
        r#"{"initial_buckets": 18446744073709551615}"#,
    ];

    for json in oversized {
        let result = ChainedMapConfig::from_json(json);
        assert!(
            matches!(result, Err(QueryError::InvalidConfig(_))),
            "accepted {}",
            json
        );
    }

    let boundary = ChainedMapConfig::from_json(
        r#"{"threshold_numerator": 1, "threshold_denominator": 1, "growth_factor": 64}"#,
    )
    .unwrap();
    let mut map = ChainedMap::with_config(boundary).unwrap();
    assert_eq!(map.threshold(), 11);
    for key in 0..20u8 {
        map.insert(key, key);
    }
    assert_eq!(map.len(), 20);
}

#[test]
fn test_threshold_for_does_not_overflow() {
    let config = ChainedMapConfig {
        threshold_numerator: usize::MAX,
        threshold_denominator: usize::MAX,
        ..ChainedMapConfig::default()
    };

    assert_eq!(config.threshold_for(usize::MAX), usize::MAX);
    assert_eq!(config.threshold_for(11), 11);
    assert_eq!(ChainedMapConfig::default().threshold_for(0), 1);
}

#[test]
fn test_stats_serialize() {
    let mut map = ChainedMap::new();
    map.insert('q', 1);

    let json = serde_json::to_string(&map.stats()).unwrap();
    let back: MapStats = serde_json::from_str(&json).unwrap();

    assert_eq!(back, map.stats());
    assert_eq!(back.buckets, 11);
}
