//! Storage leaves every query chain starts from: an insertion-ordered list
//! and a uniqueness-enforcing set.

pub mod list;
pub mod set;

pub use list::SeqList;
pub use set::SeqSet;
