use super::bucket_hasher::{BucketHasher, ModuloHasher};
use super::config::{allocate_buckets, doubled, TableConfig};
use super::dictionary::{impl_dictionary, Key, Value};
use super::error::TableError;
use super::map_entry::Entry;
use log::{debug, trace};
use std::fmt;
use std::mem;

type Link = Option<Box<Node>>;

struct Node {
    entry: Entry,
    next: Link,
}

/// Separate chaining over singly linked lists.
///
/// New keys are pushed at the head of their bucket, so a bucket lists its entries from the most recent
/// insert to the oldest. Cloning, dropping and formatting walk each chain in a loop, so a single crowded
/// bucket does not recurse once per node.
pub struct ChainingTable<H: BucketHasher + Clone = ModuloHasher> {
    buckets: Vec<Link>,
    hasher: H,
    num_items: usize,
    config: TableConfig,
}

impl ChainingTable<ModuloHasher> {
    /// Creates an empty table of 16 buckets that grows before the average chain length reaches one.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::chaining(), ModuloHasher)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(config, ModuloHasher)
    }
}

impl Default for ChainingTable<ModuloHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: BucketHasher + Clone> ChainingTable<H> {
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
        Self {
            buckets: empty_buckets(config.initial_capacity),
            hasher,
            num_items: 0,
            config,
        }
    }

    /// Inserts `value` under `key`. An existing key is updated in place, a new one is pushed at the head of
    /// its bucket. The table doubles first if this insert could push the load factor to its threshold.
    pub fn insert(&mut self, key: Key, value: Value) -> Result<(), TableError> {
        if self.config.needs_growth(self.num_items, self.buckets.len()) {
            self.resize()?;
        }

        self.insert_entry(Entry::new(key, value));
        Ok(())
    }

    fn insert_entry(&mut self, entry: Entry) {
        let index = self.hasher.bucket(entry.key, self.buckets.len());

        let mut cur = self.buckets[index].as_deref_mut();
        while let Some(node) = cur {
            if node.entry.key == entry.key {
                node.entry.value = entry.value;
                return;
            }
            cur = node.next.as_deref_mut();
        }

        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Node { entry, next: head }));
        self.num_items += 1;
    }

    /// Unlinks the node holding `key`. Returns `false` if the key was not present.
    pub fn remove(&mut self, key: Key) -> bool {
        let index = self.hasher.bucket(key, self.buckets.len());

        let mut link = &mut self.buckets[index];
        loop {
            match link {
                None => return false,
                Some(node) if node.entry.key == key => {
                    *link = node.next.take();
                    self.num_items -= 1;
                    return true;
                }
                Some(node) => link = &mut node.next,
            }
        }
    }

    pub fn get(&self, key: Key) -> Option<Value> {
        self.bucket_entries(self.hasher.bucket(key, self.buckets.len()))
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Frees every node and shrinks back to the initial capacity.
    pub fn clear(&mut self) {
        trace!(
            "clearing chaining table of {} entries in {} buckets",
            self.num_items,
            self.buckets.len()
        );
        let old = mem::replace(&mut self.buckets, empty_buckets(self.config.initial_capacity));
        for head in old {
            drop_chain(head);
        }
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

    /// Number of entries chained in bucket `index`, or `None` past the last bucket.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        if index < self.buckets.len() {
            Some(self.bucket_entries(index).count())
        } else {
            None
        }
    }

    /// All `(key, value)` pairs, bucket by bucket, newest first within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        (0..self.buckets.len())
            .flat_map(move |index| self.bucket_entries(index))
            .map(|entry| (entry.key, entry.value))
    }

    fn bucket_entries(&self, index: usize) -> impl Iterator<Item = &Entry> + '_ {
        let mut cur = self.buckets[index].as_deref();
        std::iter::from_fn(move || {
            let node = cur?;
            cur = node.next.as_deref();
            Some(&node.entry)
        })
    }

    /// Doubles the bucket count, then walks every old chain head to tail and pushes each node onto its new
    /// bucket. Entries that stay together end up in reverse order.
    fn resize(&mut self) -> Result<(), TableError> {
        let old_capacity = self.buckets.len();
        let new_buckets = allocate_buckets(doubled(old_capacity)?)?;
        let old_buckets = mem::replace(&mut self.buckets, new_buckets);
        let live = self.num_items;

        self.num_items = 0;
        for mut link in old_buckets {
            while let Some(mut node) = link {
                link = node.next.take();
                self.insert_entry(node.entry);
            }
        }

        debug!(
            "resized chaining table from {} to {} buckets ({} entries moved)",
            old_capacity,
            self.buckets.len(),
            live
        );
        Ok(())
    }
}

impl_dictionary!(ChainingTable);

impl<H: BucketHasher + Clone> Clone for ChainingTable<H> {
    /// Rebuilds every chain in its original order.
    fn clone(&self) -> Self {
        let buckets = (0..self.buckets.len())
            .map(|index| {
                let entries: Vec<Entry> = self.bucket_entries(index).copied().collect();
                entries.into_iter().rev().fold(None, |next, entry| {
                    Some(Box::new(Node { entry, next }))
                })
            })
            .collect();

        Self {
            buckets,
            hasher: self.hasher.clone(),
            num_items: self.num_items,
            config: self.config,
        }
    }
}

impl<H: BucketHasher + Clone> Drop for ChainingTable<H> {
    fn drop(&mut self) {
        for head in self.buckets.drain(..) {
            drop_chain(head);
        }
    }
}

impl<H: BucketHasher + Clone + fmt::Debug> fmt::Debug for ChainingTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainingTable")
            .field("entries", &DebugEntries(self))
            .field("hasher", &self.hasher)
            .field("num_items", &self.num_items)
            .field("config", &self.config)
            .finish()
    }
}

struct DebugEntries<'a, H: BucketHasher + Clone>(&'a ChainingTable<H>);

impl<H: BucketHasher + Clone> fmt::Debug for DebugEntries<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

fn empty_buckets(capacity: usize) -> Vec<Link> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

/// Unlinks a chain node by node so long chains do not recurse in `Drop`.
fn drop_chain(mut link: Link) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}
