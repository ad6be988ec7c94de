//! qseq: lazy query sequences over any finite or unbounded source.
//!
//! Chain operators on a [`Sequence`] to describe a query, then drive it with a
//! cursor or a terminal call. Grouping and membership tests run on
//! [`ChainedMap`], a separately chained hash map.

pub mod collections;
pub mod config;
pub mod error;
pub mod map;
pub mod partition;
pub mod seq;

pub use collections::{SeqList, SeqSet};
pub use config::ChainedMapConfig;
pub use error::{QueryError, QueryResult};
pub use map::{ChainedMap, MapStats};
pub use partition::Partition;
pub use seq::{
    empty, from_fn, from_iter, once, repeat, Cursor, Lookahead, Narrow, OrderingSequenceExt, Probe,
    Sequence, SequenceExt, SetSequenceExt, TerminalSequenceExt, TypedSequenceExt,
};

/// Everything needed to build and drive queries.
pub mod prelude {
    pub use crate::collections::{SeqList, SeqSet};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::map::ChainedMap;
    pub use crate::partition::Partition;
    pub use crate::seq::{
        Cursor, Narrow, OrderingSequenceExt, Sequence, SequenceExt, SetSequenceExt,
        TerminalSequenceExt, TypedSequenceExt,
    };
    pub use crate::seq_list;
}
