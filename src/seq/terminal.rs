//! Terminal operators: element accessors, predicates, counting, folding and
//! materialization. Each call starts a fresh cursor and drives it to the
//! answer.
use std::hash::Hash;

use super::core::{Cursor, Filter, Sequence};
use crate::collections::{SeqList, SeqSet};
use crate::error::{QueryError, QueryResult};
use crate::partition::Partition;

pub trait TerminalSequenceExt: Sequence + Sized {
    // ================================
    // First / Second
    // ================================

    fn first(&self) -> QueryResult<Self::Item> {
        self.cursor().next().ok_or(QueryError::EmptySequence)
    }

    fn first_where<P>(&self, predicate: P) -> QueryResult<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).first()
    }

    fn first_or_none(&self) -> Option<Self::Item> {
        self.cursor().next()
    }

    fn first_or_none_where<P>(&self, predicate: P) -> Option<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).first_or_none()
    }

    fn second(&self) -> QueryResult<Self::Item> {
        self.get(1)
    }

    fn second_where<P>(&self, predicate: P) -> QueryResult<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).second()
    }

    fn second_or_none(&self) -> Option<Self::Item> {
        self.cursor().nth(1)
    }

    fn second_or_none_where<P>(&self, predicate: P) -> Option<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).second_or_none()
    }

    // ================================
    // Single
    // ================================

    /// The only element. Fails on an empty sequence and on a second element.
    fn single(&self) -> QueryResult<Self::Item> {
        self.single_or_none()?.ok_or(QueryError::EmptySequence)
    }

    fn single_where<P>(&self, predicate: P) -> QueryResult<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).single()
    }

    /// `Ok(None)` when empty; a second element is still an error.
    fn single_or_none(&self) -> QueryResult<Option<Self::Item>> {
        let mut cursor = self.cursor();
        match cursor.next() {
            Some(_) if cursor.has_next() => Err(QueryError::MultipleMatches),
            found => Ok(found),
        }
    }

    fn single_or_none_where<P>(&self, predicate: P) -> QueryResult<Option<Self::Item>>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).single_or_none()
    }

    // ================================
    // Last
    // ================================

    fn last(&self) -> QueryResult<Self::Item> {
        self.last_or_none().ok_or(QueryError::EmptySequence)
    }

    fn last_where<P>(&self, predicate: P) -> QueryResult<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).last()
    }

    fn last_or_none(&self) -> Option<Self::Item> {
        self.cursor().last()
    }

    fn last_or_none_where<P>(&self, predicate: P) -> Option<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).last_or_none()
    }

    // ================================
    // Positional access
    // ================================

    /// Advance a fresh cursor `index` times. Linear in `index`.
    fn get(&self, index: usize) -> QueryResult<Self::Item> {
        self.cursor()
            .nth(index)
            .ok_or(QueryError::IndexOutOfRange { index })
    }

    // ================================
    // Predicates and counting
    // ================================

    fn any(&self) -> bool {
        self.cursor().has_next()
    }

    fn any_where<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).any()
    }

    fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Self::Item) -> bool,
    {
        !self.any_where(|item| !predicate(item))
    }

    fn count(&self) -> usize {
        self.cursor().count()
    }

    fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Self::Item) -> bool,
    {
        filtered(self, predicate).count()
    }

    // ================================
    // Folds
    // ================================

    fn sum<F>(&self, value: F) -> f64
    where
        F: Fn(&Self::Item) -> f64,
    {
        self.cursor().map(|item| value(&item)).sum()
    }

    /// Mean of the extracted values, `None` for an empty sequence.
    fn avg<F>(&self, value: F) -> Option<f64>
    where
        F: Fn(&Self::Item) -> f64,
    {
        let (total, count) = self
            .cursor()
            .fold((0.0, 0usize), |(total, count), item| (total + value(&item), count + 1));
        (count > 0).then(|| total / count as f64)
    }

    /// Element with the greatest key; the earliest wins a tie.
    fn max_by_key<K, F>(&self, key: F) -> Option<Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        extreme_by_key(self, key, |candidate, best| candidate > best)
    }

    /// Element with the smallest key; the earliest wins a tie.
    fn min_by_key<K, F>(&self, key: F) -> Option<Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        extreme_by_key(self, key, |candidate, best| candidate < best)
    }

    /// Strict left fold.
    fn reduce<U, F>(&self, initial: U, combine: F) -> U
    where
        F: FnMut(U, Self::Item) -> U,
    {
        self.cursor().fold(initial, combine)
    }

    // ================================
    // Materialization
    // ================================

    fn to_list(&self) -> SeqList<Self::Item> {
        self.cursor().collect()
    }

    fn to_set(&self) -> SeqSet<Self::Item>
    where
        Self::Item: Hash + Eq,
    {
        self.cursor().collect()
    }

    fn collect_vec(&self) -> Vec<Self::Item> {
        self.cursor().collect()
    }

    // ================================
    // Grouping
    // ================================

    /// Group every element by `key` in one eager pass.
    fn partition_by<K, F>(&self, key: F) -> Partition<K, Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: Hash + Eq,
    {
        Partition::new(self, key)
    }

    /// Pull every element of every sub-sequence, in source order, into one
    /// list.
    fn flatten_by<B, F>(&self, subsequence: F) -> SeqList<B::Item>
    where
        F: Fn(Self::Item) -> B,
        B: Sequence,
    {
        let mut flat = SeqList::new();
        for item in self.cursor() {
            flat.extend(subsequence(item).cursor());
        }
        flat
    }
}

impl<S: Sequence> TerminalSequenceExt for S {}

fn filtered<S, P>(source: &S, predicate: P) -> Filter<&S, P>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
{
    Filter { source, predicate }
}

fn extreme_by_key<S, K, F, B>(source: &S, key: F, beats: B) -> Option<S::Item>
where
    S: Sequence,
    F: Fn(&S::Item) -> K,
    B: Fn(&K, &K) -> bool,
{
    let mut best: Option<(K, S::Item)> = None;
    for item in source.cursor() {
        let candidate = key(&item);
        let replace = match &best {
            Some((best_key, _)) => beats(&candidate, best_key),
            None => true,
        };
        if replace {
            best = Some((candidate, item));
        }
    }
    best.map(|(_, item)| item)
}
