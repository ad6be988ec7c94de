//! Insertion-ordered growable list

use std::iter::Cloned;
use std::slice;

use crate::error::{QueryError, QueryResult};
use crate::seq::core::{Lookahead, Sequence};

/// Build a [`SeqList`] from a list of elements.
///
/// ```
/// use qseq::seq_list;
/// let list = seq_list!["One", "Two", "Three"];
/// assert_eq!(list.len(), 3);
/// ```
#[macro_export]
macro_rules! seq_list {
    () => {
        $crate::collections::SeqList::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::collections::SeqList::from(vec![$($item),+])
    };
}

/// A growable list that keeps elements in insertion order.
///
/// Every cursor starts from the front, so a list can be queried any number of
/// times. Cursors hand out clones of the stored elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeqList<T> {
    items: Vec<T>,
}

impl<T> SeqList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn add_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
    }

    pub fn remove_at(&mut self, index: usize) -> QueryResult<T> {
        if index < self.items.len() {
            Ok(self.items.remove(index))
        } else {
            Err(QueryError::IndexOutOfRange { index })
        }
    }

    /// Remove the first element equal to `item`. Returns whether one was found.
    pub fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|candidate| candidate == item)
    }

    /// Constant-time positional access, unlike the linear `get` every
    /// sequence offers.
    pub fn get_ref(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for SeqList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for SeqList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for SeqList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for SeqList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for SeqList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SeqList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone> Sequence for SeqList<T> {
    type Item = T;
    type Cursor<'a> = Lookahead<Cloned<slice::Iter<'a, T>>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(self.items.iter().cloned())
    }
}
