//! KeyedIndex: separately chained hash index with stable entry handles.
//!
//! Chain nodes live in a generational arena; each bucket stores the arena key
//! of its chain head and chains are doubly linked through the nodes. Growth
//! relinks arena keys into a larger bucket vector, so no entry is moved and
//! every `EntryId` handed out stays valid across resizes.

use crate::config::{ConfigError, IndexConfig};
use crate::reentrancy::BusyFlag;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::{DefaultKey, SlotMap};
use thiserror::Error;
use tracing::{debug, trace};

/// Stable handle to one entry of a `KeyedIndex`.
///
/// Handles survive resizes. Once the entry is removed the handle stops
/// resolving, even if its arena slot is later reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryId(DefaultKey);

impl EntryId {
    pub(crate) fn new(k: DefaultKey) -> Self {
        EntryId(k)
    }
    pub(crate) fn raw(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, K, V, S>(&self, index: &'a KeyedIndex<K, V, S>) -> Option<&'a K>
    where
        K: Eq + Hash,
        S: BuildHasher + Clone + Default,
    {
        index.handle_key(*self)
    }

    pub fn value<'a, K, V, S>(&self, index: &'a KeyedIndex<K, V, S>) -> Option<&'a V>
    where
        K: Eq + Hash,
        S: BuildHasher + Clone + Default,
    {
        index.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, S>(&self, index: &'a mut KeyedIndex<K, V, S>) -> Option<&'a mut V>
    where
        K: Eq + Hash,
        S: BuildHasher + Clone + Default,
    {
        index.handle_value_mut(*self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("key already present in index")]
    DuplicateKey,
}

#[derive(Debug)]
struct ChainNode<K, V> {
    key: K,
    value: V,
    hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

pub struct KeyedIndex<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    nodes: SlotMap<DefaultKey, ChainNode<K, V>>,
    config: IndexConfig,
    resizes: usize,
    busy: BusyFlag,
}

impl<K, V> KeyedIndex<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Panics if `buckets` is zero.
    pub fn with_capacity(buckets: usize) -> Self {
        Self::with_capacity_and_hasher(buckets, Default::default())
    }

    pub fn with_config(config: IndexConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V> Default for KeyedIndex<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the entries of a `KeyedIndex`, in arena order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, ChainNode<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (EntryId, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, n)| (EntryId::new(k), &n.key, &n.value))
    }
}

/// Mutable iterator over the entries of a `KeyedIndex`.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, ChainNode<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (EntryId, &'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, n)| (EntryId::new(k), &n.key, &mut n.value))
    }
}

impl<K, V, S> KeyedIndex<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(IndexConfig::default(), hasher)
    }

    /// Panics if `buckets` is zero.
    pub fn with_capacity_and_hasher(buckets: usize, hasher: S) -> Self {
        assert!(buckets > 0, "KeyedIndex requires at least one bucket");
        Self::build(IndexConfig::default().initial_buckets(buckets), hasher)
    }

    pub fn with_config_and_hasher(config: IndexConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn build(config: IndexConfig, hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; config.initial_buckets],
            nodes: SlotMap::with_key(),
            config,
            resizes: 0,
            busy: BusyFlag::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.nodes.len() as f64 / self.buckets.len() as f64
    }

    /// Number of times the bucket array has grown since construction.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[inline]
    fn bucket_for(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    // Runs user Hash/Eq code; guarded against reentry.
    fn probe<Q>(&self, q: &Q) -> (u64, Option<DefaultKey>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.hasher.hash_one(q);
        let mut cur = self.buckets[self.bucket_for(hash)];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                return (hash, Some(k));
            }
            cur = node.next;
        }
        (hash, None)
    }

    /// Handle of the entry for `q`, if present.
    pub fn find<Q>(&self, q: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.probe(q).1.map(EntryId::new)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.probe(q).1.is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.probe(q).1?;
        Some(&self.nodes[k].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.probe(q).1?;
        Some(&mut self.nodes[k].value)
    }

    /// The stored key equal to `q`, which may differ from `q` in fields that
    /// do not take part in equality.
    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.probe(q).1?;
        let node = &self.nodes[k];
        Some((&node.key, &node.value))
    }

    /// Insert or overwrite. On overwrite the stored key is kept, the value is
    /// replaced and the previous value returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            (_, Some(k)) => Some(core::mem::replace(&mut self.nodes[k].value, value)),
            (hash, None) => {
                self.link_new(key, value, hash);
                None
            }
        }
    }

    /// Insert only if `key` is absent; an existing entry is left untouched.
    pub fn unique_insert(&mut self, key: K, value: V) -> Result<EntryId, InsertError> {
        self.unique_insert_with(key, || value)
    }

    /// Like `unique_insert`, but only builds the value when the key is new.
    pub fn unique_insert_with<F>(&mut self, key: K, default: F) -> Result<EntryId, InsertError>
    where
        F: FnOnce() -> V,
    {
        match self.probe(&key) {
            (_, Some(_)) => Err(InsertError::DuplicateKey),
            (hash, None) => Ok(EntryId::new(self.link_new(key, default(), hash))),
        }
    }

    // New node goes to the head of its bucket; growth runs afterwards until
    // the load is back under the threshold.
    fn link_new(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let b = self.bucket_for(hash);
        let head = self.buckets[b];
        let k = self.nodes.insert(ChainNode {
            key,
            value,
            hash,
            prev: None,
            next: head,
        });
        if let Some(h) = head {
            self.nodes[h].prev = Some(k);
        }
        self.buckets[b] = Some(k);

        // Small load factors can need more than one doubling.
        while self
            .config
            .needs_resize(self.nodes.len(), self.buckets.len())
        {
            self.grow();
        }
        k
    }

    fn grow(&mut self) {
        let old_len = self.buckets.len();
        let new_len = old_len
            .checked_mul(self.config.growth_factor)
            .expect("bucket count overflow");
        let mut fresh: Vec<Option<DefaultKey>> = vec![None; new_len];

        for b in 0..old_len {
            let mut cur = self.buckets[b];
            while let Some(k) = cur {
                let (hash, next) = {
                    let n = &self.nodes[k];
                    (n.hash, n.next)
                };
                let nb = (hash % new_len as u64) as usize;
                let head = fresh[nb];
                {
                    let n = &mut self.nodes[k];
                    n.prev = None;
                    n.next = head;
                }
                if let Some(h) = head {
                    self.nodes[h].prev = Some(k);
                }
                fresh[nb] = Some(k);
                cur = next;
            }
        }

        self.buckets = fresh;
        self.resizes += 1;
        debug!(
            from = old_len,
            to = new_len,
            entries = self.nodes.len(),
            "keyed index grew"
        );
    }

    fn unlink(&mut self, k: DefaultKey) -> Option<ChainNode<K, V>> {
        let node = self.nodes.remove(k)?;
        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => {
                let b = self.bucket_for(node.hash);
                self.buckets[b] = node.next;
            }
        }
        if let Some(n) = node.next {
            self.nodes[n].prev = node.prev;
        }
        Some(node)
    }

    /// Remove the entry for `q` and hand back ownership of its key and value.
    /// The bucket array is never shrunk.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.probe(q).1?;
        self.unlink(k).map(|n| (n.key, n.value))
    }

    /// Remove by handle; `None` if the handle no longer resolves.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<(K, V)> {
        self.unlink(id.raw()).map(|n| (n.key, n.value))
    }

    /// Drop every entry but keep the current bucket count.
    pub fn reset(&mut self) {
        self.reset_with(|_, _| {});
    }

    /// Empty the index, passing each owned entry to `release`.
    pub fn reset_with<F>(&mut self, mut release: F)
    where
        F: FnMut(K, V),
    {
        let n = self.nodes.len();
        self.buckets.iter_mut().for_each(|b| *b = None);
        for (_, node) in self.nodes.drain() {
            release(node.key, node.value);
        }
        trace!(released = n, buckets = self.buckets.len(), "keyed index reset");
    }

    /// Tear the index down.
    pub fn clean(self) {
        self.clean_with(|_, _| {});
    }

    pub fn clean_with<F>(mut self, release: F)
    where
        F: FnMut(K, V),
    {
        self.reset_with(release);
    }

    /// Bucket that `q` hashes to under the current bucket count.
    pub fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        self.bucket_for(self.hasher.hash_one(q))
    }

    /// Number of chain nodes in `bucket`; zero when out of range.
    pub fn chain_len(&self, bucket: usize) -> usize {
        let mut cur = self.buckets.get(bucket).copied().flatten();
        let mut n = 0;
        while let Some(k) = cur {
            n += 1;
            cur = self.nodes[k].next;
        }
        n
    }

    pub(crate) fn handle_key(&self, id: EntryId) -> Option<&K> {
        self.nodes.get(id.raw()).map(|n| &n.key)
    }

    pub(crate) fn handle_value(&self, id: EntryId) -> Option<&V> {
        self.nodes.get(id.raw()).map(|n| &n.value)
    }

    pub(crate) fn handle_value_mut(&mut self, id: EntryId) -> Option<&mut V> {
        self.nodes.get_mut(id.raw()).map(|n| &mut n.value)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.nodes.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }
}

impl<K, S> KeyedIndex<K, usize, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    /// Bump the counter stored under `key`, starting at 1, and return it.
    pub fn insert_count(&mut self, key: K) -> usize {
        match self.probe(&key) {
            (_, Some(k)) => {
                let count = &mut self.nodes[k].value;
                *count += 1;
                *count
            }
            (hash, None) => {
                self.link_new(key, 1, hash);
                1
            }
        }
    }

    /// Counter stored under `q`, or zero when absent.
    pub fn get_count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).copied().unwrap_or(0)
    }
}
