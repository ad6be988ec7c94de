//! Eager grouping of a sequence into keyed sub-sequences

use std::borrow::Borrow;
use std::hash::Hash;
use std::iter::Cloned;
use std::rc::Rc;

use crate::collections::SeqList;
use crate::map::{ChainedMap, Keys, Values};
use crate::seq::core::{Lookahead, Sequence};

/// Groups built by one full pass over a source.
///
/// Iterating a partition yields one group per distinct key. Group order follows
/// the chained map's bucket layout, not first-seen order. Within a group,
/// elements keep their source order.
pub struct Partition<K, T> {
    groups: ChainedMap<K, Rc<SeqList<T>>>,
    empty: Rc<SeqList<T>>,
}

impl<K, T> Partition<K, T>
where
    K: Hash + Eq,
{
    pub fn new<S, F>(source: &S, key: F) -> Self
    where
        S: Sequence<Item = T> + ?Sized,
        F: Fn(&T) -> K,
    {
        let mut staged: ChainedMap<K, SeqList<T>> = ChainedMap::new();
        let mut total = 0usize;

        for item in source.cursor() {
            let group_key = key(&item);
            match staged.get_mut(&group_key) {
                Some(group) => group.add(item),
                None => {
                    staged.insert(group_key, SeqList::from(vec![item]));
                }
            }
            total += 1;
        }

        let groups: ChainedMap<K, Rc<SeqList<T>>> = staged
            .into_iter()
            .map(|(group_key, group)| (group_key, Rc::new(group)))
            .collect();

        log::trace!("Partitioned {} elements into {} groups", total, groups.len());
        Self {
            groups,
            empty: Rc::new(SeqList::new()),
        }
    }

    /// The group for `key`, or an empty group if no element had that key.
    pub fn get<Q>(&self, key: &Q) -> Rc<SeqList<T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups
            .try_get(key)
            .map_or_else(|| Rc::clone(&self.empty), Rc::clone)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups.contains_key(key)
    }

    /// Undo the grouping: every element of every group, group by group.
    pub fn flatten(&self) -> SeqList<T>
    where
        T: Clone,
    {
        self.groups
            .values()
            .flat_map(|group| group.iter().cloned())
            .collect()
    }
}

impl<K, T> Partition<K, T> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> Keys<'_, K, Rc<SeqList<T>>> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &SeqList<T>)> + '_ {
        self.groups.iter().map(|(key, group)| (key, group.as_ref()))
    }
}

impl<K, T> Sequence for Partition<K, T> {
    type Item = Rc<SeqList<T>>;
    type Cursor<'a> = Lookahead<Cloned<Values<'a, K, Rc<SeqList<T>>>>> where Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_> {
        Lookahead::new(self.groups.values().cloned())
    }
}
