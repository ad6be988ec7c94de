//! Set algebra: except, intersect, union_distinct, concat
//!
//! `except` and `intersect` buffer the right-hand side into a uniqueness
//! structure when a cursor starts, then stream the left-hand side against it.
//! A right-hand side that already is a [`SeqSet`] is borrowed as-is.
use std::hash::Hash;

use super::core::{Cursor, Distinct, Probe, Sequence};
use crate::collections::SeqSet;

pub trait SetSequenceExt: Sequence + Sized {
    /// Elements of `self` that do not occur in `other`.
    fn except<B>(self, other: B) -> Except<Self, B>
    where
        B: Sequence<Item = Self::Item>,
        Self::Item: Hash + Eq,
    {
        Except { lhs: self, rhs: other }
    }

    /// Elements of `self` that also occur in `other`. Duplicates on the left
    /// are kept.
    fn intersect<B>(self, other: B) -> Intersect<Self, B>
    where
        B: Sequence<Item = Self::Item>,
        Self::Item: Hash + Eq,
    {
        Intersect { lhs: self, rhs: other }
    }

    /// `self` followed by `other`, keeping every duplicate.
    fn concat<B>(self, other: B) -> Concat<Self, B>
    where
        B: Sequence<Item = Self::Item>,
    {
        Concat { lhs: self, rhs: other }
    }

    /// `self` followed by `other`, each element kept only at its first
    /// occurrence across both.
    fn union_distinct<B>(self, other: B) -> Distinct<Concat<Self, B>>
    where
        B: Sequence<Item = Self::Item>,
        Self::Item: Hash + Eq + Clone,
    {
        Distinct {
            source: Concat { lhs: self, rhs: other },
        }
    }
}

impl<S: Sequence> SetSequenceExt for S {}

/// Right-hand membership, borrowed when the source already is a set.
pub enum Membership<'a, T> {
    Borrowed(&'a SeqSet<T>),
    Owned(SeqSet<T>),
}

impl<'a, T: Hash + Eq> Membership<'a, T> {
    pub fn of<B>(source: &'a B) -> Self
    where
        B: Sequence<Item = T>,
    {
        match source.as_set() {
            Some(set) => Membership::Borrowed(set),
            None => Membership::Owned(source.cursor().collect()),
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        match self {
            Membership::Borrowed(set) => set.contains(item),
            Membership::Owned(set) => set.contains(item),
        }
    }
}

// ================================
// Except / Intersect
// ================================

pub struct Except<A, B> {
    pub(crate) lhs: A,
    pub(crate) rhs: B,
}

impl<A, B> Sequence for Except<A, B>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    A::Item: Hash + Eq,
{
    type Item = A::Item;
    type Cursor<'a> = MembershipCursor<'a, A::Cursor<'a>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        MembershipCursor::new(self.lhs.cursor(), Membership::of(&self.rhs), false)
    }
}

pub struct Intersect<A, B> {
    pub(crate) lhs: A,
    pub(crate) rhs: B,
}

impl<A, B> Sequence for Intersect<A, B>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    A::Item: Hash + Eq,
{
    type Item = A::Item;
    type Cursor<'a> = MembershipCursor<'a, A::Cursor<'a>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        MembershipCursor::new(self.lhs.cursor(), Membership::of(&self.rhs), true)
    }
}

/// Streams the left-hand side, keeping elements whose membership on the
/// right equals `keep_members`.
pub struct MembershipCursor<'a, C: Iterator> {
    upstream: C,
    members: Membership<'a, C::Item>,
    keep_members: bool,
    state: Probe<C::Item>,
}

impl<'a, C> MembershipCursor<'a, C>
where
    C: Iterator,
    C::Item: Hash + Eq,
{
    fn new(upstream: C, members: Membership<'a, C::Item>, keep_members: bool) -> Self {
        Self {
            upstream,
            members,
            keep_members,
            state: Probe::Unprobed,
        }
    }

    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        let members = &self.members;
        let keep = self.keep_members;
        self.state
            .fill_with(|| upstream.find(|item| members.contains(item) == keep));
    }
}

impl<'a, C> Iterator for MembershipCursor<'a, C>
where
    C: Iterator,
    C::Item: Hash + Eq,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.probe();
        self.state.take()
    }
}

impl<'a, C> Cursor for MembershipCursor<'a, C>
where
    C: Iterator,
    C::Item: Hash + Eq,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}

// ================================
// Concat
// ================================

pub struct Concat<A, B> {
    pub(crate) lhs: A,
    pub(crate) rhs: B,
}

impl<A, B> Sequence for Concat<A, B>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
{
    type Item = A::Item;
    type Cursor<'a> = ConcatCursor<A::Cursor<'a>, B::Cursor<'a>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        ConcatCursor {
            lhs: self.lhs.cursor(),
            rhs: self.rhs.cursor(),
        }
    }
}

pub struct ConcatCursor<CA, CB> {
    lhs: CA,
    rhs: CB,
}

impl<CA, CB> Iterator for ConcatCursor<CA, CB>
where
    CA: Cursor,
    CB: Cursor<Item = CA::Item>,
{
    type Item = CA::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.lhs.next().or_else(|| self.rhs.next())
    }
}

impl<CA, CB> Cursor for ConcatCursor<CA, CB>
where
    CA: Cursor,
    CB: Cursor<Item = CA::Item>,
{
    fn has_next(&mut self) -> bool {
        self.lhs.has_next() || self.rhs.has_next()
    }
}
