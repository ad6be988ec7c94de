//! Chained hash map
//!
//! Separate chaining over a bucket array, with a per-bucket length counter.
//! When any bucket's chain reaches the threshold the whole table is rebuilt at
//! `growth_factor` times the bucket count and every entry is rehashed.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use serde::{Deserialize, Serialize};

use crate::config::ChainedMapConfig;
use crate::error::{QueryError, QueryResult};
use crate::seq::core::{Lookahead, Sequence};

/// Deterministic hasher used unless the caller supplies one.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

type Chain<K, V> = Option<Box<Link<K, V>>>;

struct Link<K, V> {
    key: K,
    value: V,
    next: Chain<K, V>,
}

/// Snapshot of a map's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
    pub entries: usize,
    pub buckets: usize,
    pub longest_chain: usize,
    pub threshold: usize,
    pub resizes: usize,
}

/// Hash map with separate chaining and threshold-triggered resizing.
///
/// Invariants:
/// - at most one entry per key; inserting an existing key is a no-op
/// - `len()` equals the sum of all bucket chain lengths
/// - keys are compared by equality after hashing, never by hash alone
///
/// Iteration walks buckets in array order and each chain from its head, so
/// within a bucket the most recently inserted entry comes first. The order is
/// otherwise unspecified and only stable while the table is not mutated.
pub struct ChainedMap<K, V, S = DefaultHashBuilder> {
    buckets: Vec<Chain<K, V>>,
    lengths: Vec<usize>,
    len: usize,
    threshold: usize,
    resizes: usize,
    config: ChainedMapConfig,
    hash_builder: S,
}

fn empty_buckets<K, V>(count: usize) -> Vec<Chain<K, V>> {
    std::iter::repeat_with(|| None).take(count).collect()
}

impl<K, V> ChainedMap<K, V> {
    pub fn new() -> Self {
        Self::build(ChainedMapConfig::default(), DefaultHashBuilder::default())
    }

    pub fn with_config(config: ChainedMapConfig) -> QueryResult<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ChainedMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::build(ChainedMapConfig::default(), hash_builder)
    }

    pub fn with_config_and_hasher(config: ChainedMapConfig, hash_builder: S) -> QueryResult<Self> {
        config.validate()?;
        Ok(Self::build(config, hash_builder))
    }

    fn build(config: ChainedMapConfig, hash_builder: S) -> Self {
        let buckets = config.initial_buckets;
        Self {
            buckets: empty_buckets(buckets),
            lengths: vec![0; buckets],
            len: 0,
            threshold: config.threshold_for(buckets),
            resizes: 0,
            config,
            hash_builder,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Chain length that triggers the next resize.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn config(&self) -> &ChainedMapConfig {
        &self.config
    }

    pub fn stats(&self) -> MapStats {
        debug_assert_eq!(self.lengths.iter().sum::<usize>(), self.len);
        MapStats {
            entries: self.len,
            buckets: self.buckets.len(),
            longest_chain: self.lengths.iter().copied().max().unwrap_or(0),
            threshold: self.threshold,
            resizes: self.resizes,
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Remove every entry, keeping the current table size.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            unlink_chain(bucket.take());
        }
        self.lengths.iter_mut().for_each(|length| *length = 0);
        self.len = 0;
    }
}

impl<K, V, S> ChainedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn find_in<Q>(&self, bucket: usize, key: &Q) -> Option<&Link<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut link = self.buckets[bucket].as_deref();
        while let Some(current) = link {
            if current.key.borrow() == key {
                return Some(current);
            }
            link = current.next.as_deref();
        }
        None
    }

    /// Add an entry. Returns `false` and leaves the existing value untouched
    /// if the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let bucket = self.bucket_of(&key);
        if self.find_in(bucket, &key).is_some() {
            return false;
        }

        let next = self.buckets[bucket].take();
        self.buckets[bucket] = Some(Box::new(Link { key, value, next }));
        self.lengths[bucket] += 1;
        self.len += 1;

        if self.lengths[bucket] >= self.threshold {
            self.grow();
        }
        true
    }

    /// Look up a value, failing with `KeyNotFound` if absent.
    pub fn get<Q>(&self, key: &Q) -> QueryResult<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).ok_or(QueryError::KeyNotFound)
    }

    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_in(self.bucket_of(key), key)
            .map(|link| &link.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(key);
        let mut link = self.buckets[bucket].as_deref_mut();
        while let Some(current) = link {
            if current.key.borrow() == key {
                return Some(&mut current.value);
            }
            link = current.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_in(self.bucket_of(key), key).is_some()
    }

    /// Unlink the entry for `key` and return its value. Removing a chain head
    /// relinks the bucket slot itself.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(key);
        let mut slot = &mut self.buckets[bucket];
        while slot
            .as_ref()
            .map_or(false, |link| link.key.borrow() != key)
        {
            slot = &mut slot.as_mut()?.next;
        }

        let mut removed = slot.take()?;
        *slot = removed.next.take();
        self.lengths[bucket] -= 1;
        self.len -= 1;
        Some(removed.value)
    }

    fn grow(&mut self) {
        let old_count = self.buckets.len();
        let new_count = match old_count.checked_mul(self.config.growth_factor) {
            Some(count) => count,
            None => {
                // Keep chaining in the current table and stop retrying.
                log::warn!(
                    "Chained map cannot grow past {} buckets (growth factor {})",
                    old_count,
                    self.config.growth_factor
                );
                self.threshold = usize::MAX;
                return;
            }
        };
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_count));
        self.lengths = vec![0; new_count];

        for mut chain in old {
            while let Some(mut link) = chain {
                chain = link.next.take();
                let bucket = self.bucket_of(&link.key);
                link.next = self.buckets[bucket].take();
                self.buckets[bucket] = Some(link);
                self.lengths[bucket] += 1;
            }
        }

        self.threshold = self.config.threshold_for(new_count);
        self.resizes += 1;
        log::debug!(
            "Chained map resized from {} to {} buckets ({} entries, threshold {})",
            old_count,
            new_count,
            self.len,
            self.threshold
        );
    }
}

fn unlink_chain<K, V>(mut chain: Chain<K, V>) {
    while let Some(mut link) = chain {
        chain = link.next.take();
    }
}

impl<K, V, S> Drop for ChainedMap<K, V, S> {
    fn drop(&mut self) {
        // Unlink iteratively; dropping a long chain recursively can exhaust the stack.
        for bucket in &mut self.buckets {
            unlink_chain(bucket.take());
        }
    }
}

impl<K, V> Default for ChainedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for ChainedMap<K, V> {
    /// The first value seen for a key wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ChainedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V, S> IntoIterator for ChainedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Drains the table in the same order `iter` walks it.
    fn into_iter(mut self) -> Self::IntoIter {
        let remaining = self.len;
        self.len = 0;
        self.lengths.iter_mut().for_each(|length| *length = 0);
        IntoIter {
            buckets: std::mem::take(&mut self.buckets).into_iter(),
            current: None,
            remaining,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A map is also a keyed sequence of `(key, value)` pairs.
impl<K: Clone, V: Clone, S> Sequence for ChainedMap<K, V, S> {
    type Item = (K, V);
    type Cursor<'a> = Lookahead<Entries<'a, K, V>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(Entries { inner: self.iter() })
    }
}

// ================================
// Iterators
// ================================

pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Chain<K, V>>,
    current: Option<&'a Link<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(link) = self.current {
                self.current = link.next.as_deref();
                self.remaining -= 1;
                return Some((&link.key, &link.value));
            }
            self.current = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owned `(key, value)` pairs for the sequence view.
pub struct Entries<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K: Clone, V: Clone> Iterator for Entries<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner
            .next()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning iterator returned by `ChainedMap::into_iter`.
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Chain<K, V>>,
    current: Chain<K, V>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        loop {
            if let Some(mut link) = self.current.take() {
                self.current = link.next.take();
                self.remaining -= 1;
                return Some((link.key, link.value));
            }
            self.current = self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        unlink_chain(self.current.take());
        for chain in &mut self.buckets {
            unlink_chain(chain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_length<K, V, S>(map: &ChainedMap<K, V, S>, bucket: usize) -> usize {
        let mut length = 0;
        let mut link = map.buckets[bucket].as_deref();
        while let Some(current) = link {
            length += 1;
            link = current.next.as_deref();
        }
        length
    }

    fn assert_bookkeeping<K, V, S>(map: &ChainedMap<K, V, S>) {
        for bucket in 0..map.buckets.len() {
            assert_eq!(chain_length(map, bucket), map.lengths[bucket]);
        }
        assert_eq!(map.lengths.iter().sum::<usize>(), map.len);
    }

    #[test]
    fn test_lengths_follow_chains() {
        let mut map = ChainedMap::new();
        for key in 0..500u32 {
            map.insert(key, key);
            assert_bookkeeping(&map);
        }
        for key in (0..500u32).step_by(7) {
            map.remove(&key);
            assert_bookkeeping(&map);
        }
        assert!(map.resizes >= 1);
    }

    #[test]
    fn test_entries_land_in_their_hash_bucket_after_grow() {
        let mut map = ChainedMap::new();
        for key in 0..300u64 {
            map.insert(key, ());
        }

        for bucket in 0..map.buckets.len() {
            let mut link = map.buckets[bucket].as_deref();
            while let Some(current) = link {
                assert_eq!(map.bucket_of(&current.key), bucket);
                link = current.next.as_deref();
            }
        }
    }

    #[test]
    fn test_grow_overflow_keeps_current_table() {
        let mut map = ChainedMap::new();
        map.config.growth_factor = usize::MAX;

        for key in 0..100u32 {
            assert!(map.insert(key, key));
        }

        assert_eq!(map.bucket_count(), 11);
        assert_eq!(map.threshold(), usize::MAX);
        assert_eq!(map.resizes, 0);
        for key in 0..100u32 {
            assert_eq!(map.get(&key), Ok(&key));
        }
        assert_bookkeeping(&map);
    }

    #[test]
    fn test_into_iter_drains_every_entry() {
        let mut map = ChainedMap::new();
        for key in 0..300u32 {
            map.insert(key, key * 2);
        }
        let expected: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();

        let drained = map.into_iter();
        assert_eq!(drained.len(), 300);
        assert_eq!(drained.collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_remove_absent_key_leaves_counts() {
        let mut map = ChainedMap::new();
        map.insert("a", 1);

        assert_eq!(map.remove("b"), None);
        assert_eq!(map.len(), 1);
        assert_bookkeeping(&map);
    }
}
