//! Uniqueness-enforcing set backed by the chained map

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::Cloned;

use crate::map::{ChainedMap, Keys};
use crate::seq::core::{Lookahead, Sequence};

/// A set of unique elements. Used for `distinct` and set algebra membership
/// tests, and usable as a sequence in its own right.
///
/// Iteration order follows the underlying [`ChainedMap`] bucket layout.
pub struct SeqSet<T> {
    map: ChainedMap<T, ()>,
}

impl<T> SeqSet<T> {
    pub fn new() -> Self {
        Self {
            map: ChainedMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Keys<'_, T, ()> {
        self.map.keys()
    }
}

impl<T: Hash + Eq> SeqSet<T> {
    /// Returns `true` if `item` was not present before.
    pub fn add(&mut self, item: T) -> bool {
        self.map.insert(item, ())
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(item)
    }

    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(item).is_some()
    }
}

impl<T> Default for SeqSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SeqSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash + Eq> FromIterator<T> for SeqSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = SeqSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq> Extend<T> for SeqSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Clone> Sequence for SeqSet<T> {
    type Item = T;
    type Cursor<'a> = Lookahead<Cloned<Keys<'a, T, ()>>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(self.map.keys().cloned())
    }

    fn as_set(&self) -> Option<&SeqSet<T>> {
        Some(self)
    }
}
