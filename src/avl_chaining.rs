use super::avl_tree::AvlTree;
use super::bucket_hasher::{BucketHasher, ModuloHasher};
use super::config::{allocate_buckets, doubled, TableConfig};
use super::dictionary::{impl_dictionary, Key, Value};
use super::error::TableError;
use log::{debug, trace};
use std::mem;

/// Separate chaining where every bucket is an [`AvlTree`], so a crowded bucket still answers in
/// logarithmic time.
#[derive(Clone, Debug)]
pub struct AvlChainingTable<H: BucketHasher + Clone = ModuloHasher> {
    buckets: Vec<AvlTree>,
    hasher: H,
    /// Kept here rather than summed over the trees on demand.
    num_items: usize,
    config: TableConfig,
}

impl AvlChainingTable<ModuloHasher> {
    /// Creates an empty table of 16 trees that grows before the average tree size reaches one.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::chaining(), ModuloHasher)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(config, ModuloHasher)
    }
}

impl Default for AvlChainingTable<ModuloHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: BucketHasher + Clone> AvlChainingTable<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_parts(TableConfig::chaining(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self, TableError> {
        config.validate()?;
        let buckets = allocate_buckets(config.initial_capacity)?;

        Ok(Self {
            buckets,
            hasher,
            num_items: 0,
            config,
        })
    }

    fn from_parts(config: TableConfig, hasher: H) -> Self {
        let mut buckets = Vec::with_capacity(config.initial_capacity);
        buckets.resize_with(config.initial_capacity, AvlTree::new);

        Self {
            buckets,
            hasher,
            num_items: 0,
            config,
        }
    }

    /// Inserts `value` under `key`, overwriting any previous value. The table doubles first if this insert
    /// could push the load factor to its threshold.
    pub fn insert(&mut self, key: Key, value: Value) -> Result<(), TableError> {
        if self.config.needs_growth(self.num_items, self.buckets.len()) {
            self.resize()?;
        }

        self.insert_pair(key, value);
        Ok(())
    }

    fn insert_pair(&mut self, key: Key, value: Value) {
        let index = self.hasher.bucket(key, self.buckets.len());
        let tree = &mut self.buckets[index];

        if !tree.contains_key(key) {
            self.num_items += 1;
        }
        tree.insert(key, value);
    }

    /// Removes `key` from its bucket's tree. Returns `false` if it was not present.
    pub fn remove(&mut self, key: Key) -> bool {
        let index = self.hasher.bucket(key, self.buckets.len());
        let removed = self.buckets[index].remove(key);
        if removed {
            self.num_items -= 1;
        }
        removed
    }

    pub fn get(&self, key: Key) -> Option<Value> {
        self.buckets[self.hasher.bucket(key, self.buckets.len())].get(key)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Clears every tree and shrinks back to the initial capacity.
    pub fn clear(&mut self) {
        trace!(
            "clearing AVL chaining table of {} entries in {} buckets",
            self.num_items,
            self.buckets.len()
        );
        for tree in &mut self.buckets {
            tree.clear();
        }

        let mut buckets = Vec::with_capacity(self.config.initial_capacity);
        buckets.resize_with(self.config.initial_capacity, AvlTree::new);
        self.buckets = buckets;
        self.num_items = 0;
    }

    pub fn len(&self) -> usize {
        self.num_items
    }

    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// Gets the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The tree behind bucket `index`, or `None` past the last bucket.
    pub fn bucket(&self, index: usize) -> Option<&AvlTree> {
        self.buckets.get(index)
    }

    /// All `(key, value)` pairs, bucket by bucket, ascending by key within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        self.buckets.iter().flat_map(AvlTree::iter)
    }

    /// Doubles the bucket count and re-inserts every pair, taking each old tree in key order.
    fn resize(&mut self) -> Result<(), TableError> {
        let old_capacity = self.buckets.len();
        let new_buckets = allocate_buckets(doubled(old_capacity)?)?;
        let old_buckets = mem::replace(&mut self.buckets, new_buckets);
        let live = self.num_items;

        self.num_items = 0;
        for tree in &old_buckets {
            for (key, value) in tree.pairs() {
                self.insert_pair(key, value);
            }
        }

        debug!(
            "resized AVL chaining table from {} to {} buckets ({} entries moved)",
            old_capacity,
            self.buckets.len(),
            live
        );
        Ok(())
    }
}

impl_dictionary!(AvlChainingTable);
