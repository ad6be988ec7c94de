//! Runtime type narrowing: cast and of_type
//!
//! Heterogeneous sequences carry elements of a tagged type (an enum, or
//! `Rc<dyn Any>`). The element type decides which narrower types it can be
//! turned into by implementing [`Narrow`].
use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::rc::Rc;

use super::core::{Cursor, Probe, Sequence};
use super::terminal::TerminalSequenceExt;
use crate::error::{QueryError, QueryResult};

/// Discriminant-plus-downcast capability.
pub trait Narrow<U>: Sized {
    /// Returns the element as a `U`, or hands it back unchanged if it is not
    /// one.
    fn narrow(self) -> Result<U, Self>;
}

impl<U: Any> Narrow<Rc<U>> for Rc<dyn Any> {
    fn narrow(self) -> Result<Rc<U>, Self> {
        self.downcast::<U>()
    }
}

/// Type narrowing operators.
pub trait TypedSequenceExt: Sequence + Sized {
    /// Treat every element as a `U`. A mismatch is reported when that element
    /// is pulled, as an `Err(TypeMismatch)` item.
    fn cast<U>(self) -> Cast<Self, U>
    where
        Self::Item: Narrow<U>,
    {
        Cast {
            source: self,
            _target: PhantomData,
        }
    }

    /// Keep only the elements that are a `U`, as `U`.
    fn of_type<U>(self) -> OfType<Self, U>
    where
        Self::Item: Narrow<U>,
    {
        OfType {
            source: self,
            _target: PhantomData,
        }
    }

    // ================================
    // Typed accessors
    // ================================

    /// The element at `index`, narrowed to `U`.
    fn get_as<U>(&self, index: usize) -> QueryResult<U>
    where
        Self::Item: Narrow<U>,
    {
        narrow_to(self.get(index)?)
    }

    fn first_as<U>(&self) -> QueryResult<U>
    where
        Self::Item: Narrow<U>,
    {
        narrow_to(self.first()?)
    }

    fn second_as<U>(&self) -> QueryResult<U>
    where
        Self::Item: Narrow<U>,
    {
        narrow_to(self.second()?)
    }

    /// Fails with the same errors as `single` before narrowing is attempted.
    fn single_as<U>(&self) -> QueryResult<U>
    where
        Self::Item: Narrow<U>,
    {
        narrow_to(self.single()?)
    }

    fn last_as<U>(&self) -> QueryResult<U>
    where
        Self::Item: Narrow<U>,
    {
        narrow_to(self.last()?)
    }
}

impl<S: Sequence> TypedSequenceExt for S {}

fn narrow_to<T, U>(item: T) -> QueryResult<U>
where
    T: Narrow<U>,
{
    item.narrow().map_err(|_| mismatch::<U>())
}

fn mismatch<U>() -> QueryError {
    QueryError::TypeMismatch {
        expected: type_name::<U>(),
    }
}

// ================================
// Cast
// ================================

pub struct Cast<S, U> {
    pub(crate) source: S,
    pub(crate) _target: PhantomData<fn() -> U>,
}

impl<S, U> Sequence for Cast<S, U>
where
    S: Sequence,
    S::Item: Narrow<U>,
{
    type Item = QueryResult<U>;
    type Cursor<'a> = CastCursor<S::Cursor<'a>, U> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        CastCursor {
            upstream: self.source.cursor(),
            _target: PhantomData,
        }
    }
}

pub struct CastCursor<C, U> {
    upstream: C,
    _target: PhantomData<fn() -> U>,
}

impl<C, U> Iterator for CastCursor<C, U>
where
    C: Iterator,
    C::Item: Narrow<U>,
{
    type Item = QueryResult<U>;

    fn next(&mut self) -> Option<Self::Item> {
        self.upstream.next().map(narrow_to::<C::Item, U>)
    }
}

// Narrowing is only attempted on consume, so probing is just the upstream's.
impl<C, U> Cursor for CastCursor<C, U>
where
    C: Cursor,
    C::Item: Narrow<U>,
{
    fn has_next(&mut self) -> bool {
        self.upstream.has_next()
    }
}

// ================================
// OfType
// ================================

pub struct OfType<S, U> {
    pub(crate) source: S,
    pub(crate) _target: PhantomData<fn() -> U>,
}

impl<S, U> Sequence for OfType<S, U>
where
    S: Sequence,
    S::Item: Narrow<U>,
{
    type Item = U;
    type Cursor<'a> = OfTypeCursor<S::Cursor<'a>, U> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        OfTypeCursor {
            upstream: self.source.cursor(),
            state: Probe::Unprobed,
        }
    }
}

pub struct OfTypeCursor<C, U> {
    upstream: C,
    state: Probe<U>,
}

impl<C, U> OfTypeCursor<C, U>
where
    C: Iterator,
    C::Item: Narrow<U>,
{
    fn probe(&mut self) {
        let upstream = &mut self.upstream;
        self.state
            .fill_with(|| upstream.find_map(|item| item.narrow().ok()));
    }
}

impl<C, U> Iterator for OfTypeCursor<C, U>
where
    C: Iterator,
    C::Item: Narrow<U>,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        self.probe();
        self.state.take()
    }
}

impl<C, U> Cursor for OfTypeCursor<C, U>
where
    C: Iterator,
    C::Item: Narrow<U>,
{
    fn has_next(&mut self) -> bool {
        self.probe();
        self.state.is_ready()
    }
}
