//! Sequence constructors: empty, once, repeat, from_iter, from_fn
use std::iter;
use std::marker::PhantomData;

use super::core::{Lookahead, Sequence};

// ================================
// Basic Constructors
// ================================

pub struct Empty<T> {
    pub(crate) _phantom: PhantomData<fn() -> T>,
}

impl<T> Sequence for Empty<T> {
    type Item = T;
    type Cursor<'a> = Lookahead<iter::Empty<T>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(iter::empty())
    }
}

pub struct Once<T> {
    pub(crate) value: T,
}

impl<T: Clone> Sequence for Once<T> {
    type Item = T;
    type Cursor<'a> = Lookahead<iter::Once<T>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(iter::once(self.value.clone()))
    }
}

/// Unbounded: only pull a finite prefix, or chain operators that stop early.
pub struct Repeat<T> {
    pub(crate) value: T,
}

impl<T: Clone> Sequence for Repeat<T> {
    type Item = T;
    type Cursor<'a> = Lookahead<iter::Repeat<T>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(iter::repeat(self.value.clone()))
    }
}

/// Restartable view over any cloneable iterable; each cursor clones it.
pub struct FromIter<I> {
    pub(crate) iter: I,
}

impl<I> Sequence for FromIter<I>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;
    type Cursor<'a> = Lookahead<I::IntoIter> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(self.iter.clone().into_iter())
    }
}

// ================================
// Function-based Constructors
// ================================

/// A caller-supplied iteration state machine. The factory runs once per
/// cursor, so the sequence restarts cleanly as long as the factory does.
pub struct FromFn<F> {
    pub(crate) factory: F,
}

impl<F, I> Sequence for FromFn<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;
    type Cursor<'a> = Lookahead<I::IntoIter> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new((self.factory)().into_iter())
    }
}

pub fn empty<T>() -> Empty<T> {
    Empty {
        _phantom: PhantomData,
    }
}

pub fn once<T: Clone>(value: T) -> Once<T> {
    Once { value }
}

pub fn repeat<T: Clone>(value: T) -> Repeat<T> {
    Repeat { value }
}

pub fn from_iter<I>(iter: I) -> FromIter<I>
where
    I: IntoIterator + Clone,
{
    FromIter { iter }
}

pub fn from_fn<F, I>(factory: F) -> FromFn<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    FromFn { factory }
}
