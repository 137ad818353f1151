//! KeyedList: an `OrderedList` with an embedded `KeyedIndex` from key to
//! cell handle, giving O(1) expected removal by key while keeping
//! insertion order.

use crate::keyed_index::KeyedIndex;
use crate::ordered_list::{Iter, ListHandle, OrderedList};
use core::borrow::Borrow;
use core::hash::Hash;

pub struct KeyedList<K, T> {
    list: OrderedList<T>,
    index: KeyedIndex<K, ListHandle>,
}

impl<K, T> KeyedList<K, T>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            list: OrderedList::new(),
            index: KeyedIndex::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Append `data` under `key`. Returns false, leaving the list unchanged,
    /// when `key` is already present.
    pub fn insert(&mut self, key: K, data: T) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let h = self.list.push_back(data);
        self.index.insert(key, h);
        true
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, h) = self.index.remove(q)?;
        self.list.remove(h)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.list.get(*self.index.get(q)?)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(q)
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }

    /// Read-only view of the embedded index.
    pub fn index(&self) -> &KeyedIndex<K, ListHandle> {
        &self.index
    }

    pub fn clean_with<FK, FT>(self, mut release_key: FK, release_data: FT)
    where
        FK: FnMut(K),
        FT: FnMut(T),
    {
        self.list.clean_with(release_data);
        self.index.clean_with(|k, _| release_key(k));
    }
}

impl<K, T> Default for KeyedList<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
