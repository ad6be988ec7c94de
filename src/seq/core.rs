//! Core sequence traits and the per-element adapters
//!
//! A [`Sequence`] is a re-iterable description of elements. Calling
//! [`Sequence::cursor`] hands out a fresh [`Cursor`] that pulls elements one at
//! a time. Adapters never carry iteration state themselves; everything mutable
//! (position, cached element, seen keys) lives in the cursor.

use std::hash::Hash;
use std::rc::Rc;

use crate::collections::SeqSet;

/// A live iteration over a sequence.
///
/// `has_next` may be called any number of times without side effects once the
/// next element has been probed. `next` probes implicitly when needed.
pub trait Cursor: Iterator {
    fn has_next(&mut self) -> bool;
}

/// A lazily evaluated, possibly restartable source of elements.
///
/// Finiteness is up to the producer: operators chained over an unbounded
/// source terminate only if the caller stops pulling.
pub trait Sequence {
    type Item;
    type Cursor<'a>: Cursor<Item = Self::Item>
    where
        Self: 'a;

    /// Start a new, independent pass over the sequence.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// Set algebra reuses an existing uniqueness structure instead of copying
    /// it. Only [`SeqSet`] answers `Some`.
    fn as_set(&self) -> Option<&SeqSet<Self::Item>> {
        None
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    type Item = S::Item;
    type Cursor<'a> = S::Cursor<'a> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        (**self).cursor()
    }

    fn as_set(&self) -> Option<&SeqSet<Self::Item>> {
        (**self).as_set()
    }
}

impl<S: Sequence + ?Sized> Sequence for Rc<S> {
    type Item = S::Item;
    type Cursor<'a> = S::Cursor<'a> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        (**self).cursor()
    }

    fn as_set(&self) -> Option<&SeqSet<Self::Item>> {
        (**self).as_set()
    }
}

// ================================
// Probe state machine
// ================================

/// Two-phase probe/consume state shared by every adapter cursor.
///
/// Probing runs the upstream work (predicate, projection, key extraction) at
/// most once per element and parks the result; consuming hands it out and
/// resets to `Unprobed`. `Exhausted` is sticky.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Unprobed,
    Ready(T),
    Exhausted,
}

impl<T> Probe<T> {
    /// Run `produce` only if nothing is parked yet.
    pub fn fill_with<F>(&mut self, produce: F)
    where
        F: FnOnce() -> Option<T>,
    {
        if let Probe::Unprobed = self {
            *self = match produce() {
                Some(item) => Probe::Ready(item),
                None => Probe::Exhausted,
            };
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Probe::Ready(_))
    }

    /// Consume the parked element.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Probe::Unprobed) {
            Probe::Ready(item) => Some(item),
            Probe::Exhausted => {
                *self = Probe::Exhausted;
                None
            }
            Probe::Unprobed => None,
        }
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Probe::Unprobed
    }
}

/// Gives any plain iterator the idempotent `has_next` of a [`Cursor`].
pub struct Lookahead<I: Iterator> {
    pub(crate) inner: I,
    pub(crate) state: Probe<I::Item>,
}

impl<I: Iterator> Lookahead<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            state: Probe::Unprobed,
        }
    }
}

impl<I: Iterator> Iterator for Lookahead<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let inner = &mut self.inner;
        self.state.fill_with(|| inner.next());
        self.state.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let parked = usize::from(self.state.is_ready());
        match self.state {
            Probe::Exhausted => (0, Some(0)),
            _ => {
                let (lower, upper) = self.inner.size_hint();
                (
                    lower.saturating_add(parked),
                    upper.and_then(|u| u.checked_add(parked)),
                )
            }
        }
    }
}

impl<I: Iterator> Cursor for Lookahead<I> {
    fn has_next(&mut self) -> bool {
        let inner = &mut self.inner;
        self.state.fill_with(|| inner.next());
        self.state.is_ready()
    }
}

// ================================
// Extension trait
// ================================

/// Lazy per-element operators. Each call wraps `self` in a new adapter and
/// does no work until a cursor is pulled.
///
/// To keep using a source after chaining, chain off a reference:
/// `(&list).filter(...)`.
pub trait SequenceExt: Sequence + Sized {
    /// Keep the elements for which `predicate` holds, in order.
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool,
    {
        Filter {
            source: self,
            predicate,
        }
    }

    /// Transform every element one-to-one, in order.
    fn project<U, F>(self, transform: F) -> Project<Self, F>
    where
        F: Fn(Self::Item) -> U,
    {
        Project {
            source: self,
            transform,
        }
    }

    /// Drop repeated elements; the first occurrence wins.
    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Hash + Eq + Clone,
    {
        Distinct { source: self }
    }

    /// Drop elements whose extracted key was already seen; the first element
    /// per key wins.
    fn distinct_by<K, F>(self, key: F) -> DistinctBy<Self, F>
    where
        F: Fn(&Self::Item) -> K,
        K: Hash + Eq,
    {
        DistinctBy { source: self, key }
    }
}

impl<S: Sequence> SequenceExt for S {}

// ================================
// Filter
// ================================

pub struct Filter<S, F> {
    pub(crate) source: S,
    pub(crate) predicate: F,
}

impl<S, F> Sequence for Filter<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Cursor<'a> = FilterCursor<'a, S::Cursor<'a>, F> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        FilterCursor {
            upstream: self.source.cursor(),
            predicate: &self.predicate,
            state: Probe::Unprobed,
        }
    }
}

pub struct FilterCursor<'a, C: Iterator, F> {
    upstream: C,
    predicate: &'a F,
    state: Probe<C::Item>,
}

impl<'a, C, F> FilterCursor<'a, C, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> bool,
{
    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        let predicate = self.predicate;
        self.state
            .fill_with(|| upstream.find(|item| predicate(item)));
    }
}

impl<'a, C, F> Iterator for FilterCursor<'a, C, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> bool,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.probe();
        self.state.take()
    }
}

impl<'a, C, F> Cursor for FilterCursor<'a, C, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> bool,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}

// ================================
// Project
// ================================

pub struct Project<S, F> {
    pub(crate) source: S,
    pub(crate) transform: F,
}

impl<S, U, F> Sequence for Project<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> U,
{
    type Item = U;
    type Cursor<'a> = ProjectCursor<'a, S::Cursor<'a>, U, F> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        ProjectCursor {
            upstream: self.source.cursor(),
            transform: &self.transform,
            state: Probe::Unprobed,
        }
    }
}

/// Caches the projected value so `has_next` never runs the transform twice.
pub struct ProjectCursor<'a, C, U, F> {
    upstream: C,
    transform: &'a F,
    state: Probe<U>,
}

impl<'a, C, U, F> ProjectCursor<'a, C, U, F>
where
    C: Iterator,
    F: Fn(C::Item) -> U,
{
    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        let transform = self.transform;
        self.state.fill_with(|| upstream.next().map(transform));
    }
}

impl<'a, C, U, F> Iterator for ProjectCursor<'a, C, U, F>
where
    C: Iterator,
    F: Fn(C::Item) -> U,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        self.probe();
        self.state.take()
    }
}

impl<'a, C, U, F> Cursor for ProjectCursor<'a, C, U, F>
where
    C: Iterator,
    F: Fn(C::Item) -> U,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}

// ================================
// Distinct
// ================================

pub struct Distinct<S> {
    pub(crate) source: S,
}

impl<S> Sequence for Distinct<S>
where
    S: Sequence,
    S::Item: Hash + Eq + Clone,
{
    type Item = S::Item;
    type Cursor<'a> = DistinctCursor<S::Cursor<'a>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        DistinctCursor {
            upstream: self.source.cursor(),
            seen: SeqSet::new(),
            state: Probe::Unprobed,
        }
    }
}

/// The seen-set belongs to this cursor alone; a second cursor over the same
/// adapter starts from an empty set.
pub struct DistinctCursor<C: Iterator> {
    upstream: C,
    seen: SeqSet<C::Item>,
    state: Probe<C::Item>,
}

impl<C> DistinctCursor<C>
where
    C: Iterator,
    C::Item: Hash + Eq + Clone,
{
    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        let seen = &mut self.seen;
        self.state
            .fill_with(|| upstream.find(|item| seen.add(item.clone())));
    }
}

impl<C> Iterator for DistinctCursor<C>
where
    C: Iterator,
    C::Item: Hash + Eq + Clone,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.probe();
        self.state.take()
    }
}

impl<C> Cursor for DistinctCursor<C>
where
    C: Iterator,
    C::Item: Hash + Eq + Clone,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}

// ================================
// DistinctBy
// ================================

pub struct DistinctBy<S, F> {
    pub(crate) source: S,
    pub(crate) key: F,
}

impl<S, K, F> Sequence for DistinctBy<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> K,
    K: Hash + Eq,
{
    type Item = S::Item;
    type Cursor<'a> = DistinctByCursor<'a, S::Cursor<'a>, K, F> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        DistinctByCursor {
            upstream: self.source.cursor(),
            key: &self.key,
            seen: SeqSet::new(),
            state: Probe::Unprobed,
        }
    }
}

pub struct DistinctByCursor<'a, C: Iterator, K, F> {
    upstream: C,
    key: &'a F,
    seen: SeqSet<K>,
    state: Probe<C::Item>,
}

impl<'a, C, K, F> DistinctByCursor<'a, C, K, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> K,
    K: Hash + Eq,
{
    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        let seen = &mut self.seen;
        let key = self.key;
        self.state.fill_with(|| upstream.find(|item| seen.add(key(item))));
    }
}

impl<'a, C, K, F> Iterator for DistinctByCursor<'a, C, K, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> K,
    K: Hash + Eq,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.probe();
        self.state.take()
    }
}

impl<'a, C, K, F> Cursor for DistinctByCursor<'a, C, K, F>
where
    C: Iterator,
    F: Fn(&C::Item) -> K,
    K: Hash + Eq,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}
