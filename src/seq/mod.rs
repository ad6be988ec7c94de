//! Lazy, re-iterable sequences and their operators
//!
//! Operators are split by family, each with its own extension trait. All of
//! them are blanket-implemented for every [`Sequence`].

pub mod core;
pub mod constructors;
pub mod ordering;
pub mod set_ops;
pub mod terminal;
pub mod typed;

// Re-export core types
pub use self::core::{
    Cursor, Distinct, DistinctBy, Filter, Lookahead, Probe, Project, Sequence, SequenceExt,
};

// Re-export constructors
pub use self::constructors::{
    empty, from_fn, from_iter, once, repeat, Empty, FromFn, FromIter, Once, Repeat,
};

// Re-export ordering and set algebra
pub use ordering::{OrderingSequenceExt, Reverse, Sorted};
pub use set_ops::{Concat, Except, Intersect, Membership, SetSequenceExt};

// Re-export terminals and type narrowing
pub use terminal::TerminalSequenceExt;
pub use typed::{Cast, Narrow, OfType, TypedSequenceExt};
