//! Ordering operators: sort, sort_descending, reverse
//!
//! Both need the whole upstream before yielding anything, so each cursor
//! materializes its own buffer on creation.
use std::cmp::Reverse as Descending;

use super::core::{Cursor, Lookahead, Sequence};

pub trait OrderingSequenceExt: Sequence + Sized {
    /// Stable sort by an extracted key. Elements with equal keys keep their
    /// relative order.
    fn sort<K, F>(self, key: F) -> Sorted<Self, F>
    where
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        Sorted {
            source: self,
            key,
            descending: false,
        }
    }

    /// Stable sort by an extracted key, largest first.
    fn sort_descending<K, F>(self, key: F) -> Sorted<Self, F>
    where
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        Sorted {
            source: self,
            key,
            descending: true,
        }
    }

    fn reverse(self) -> Reverse<Self> {
        Reverse { source: self }
    }
}

impl<S: Sequence> OrderingSequenceExt for S {}

// ================================
// Sorted
// ================================

pub struct Sorted<S, F> {
    pub(crate) source: S,
    pub(crate) key: F,
    pub(crate) descending: bool,
}

impl<S, K, F> Sequence for Sorted<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> K,
    K: Ord,
{
    type Item = S::Item;
    type Cursor<'a> = Lookahead<std::vec::IntoIter<S::Item>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        let mut buffer: Vec<S::Item> = self.source.cursor().collect();
        // Keys are extracted once per element; sort_by_cached_key is stable.
        if self.descending {
            buffer.sort_by_cached_key(|item| Descending((self.key)(item)));
        } else {
            buffer.sort_by_cached_key(|item| (self.key)(item));
        }
        Lookahead::new(buffer.into_iter())
    }
}

// ================================
// Reverse
// ================================

pub struct Reverse<S> {
    pub(crate) source: S,
}

impl<S: Sequence> Sequence for Reverse<S> {
    type Item = S::Item;
    type Cursor<'a> = ReverseCursor<S::Item> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        ReverseCursor {
            stack: self.source.cursor().collect(),
        }
    }
}

/// Pops from a stack filled with the whole upstream.
pub struct ReverseCursor<T> {
    stack: Vec<T>,
}

impl<T> Iterator for ReverseCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.stack.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.stack.len()))
    }
}

impl<T> Cursor for ReverseCursor<T> {
    fn has_next(&mut self) -> bool {
        !self.stack.is_empty()
    }
}
