use super::bucket_hasher::{BucketHasher, ModuloHasher};
use super::config::{allocate_buckets, doubled, TableConfig};
use super::dictionary::{impl_dictionary, Key, Value};
use super::error::TableError;
use super::map_entry::{Entry, Slot};
use log::{debug, trace, warn};
use std::mem;

/// Open-addressing table with linear probing and tombstone deletion.
///
/// Removing a key leaves a tombstone behind so that keys stored further along the same probe run stay
/// reachable. Tombstones are only dropped when the table resizes, and they do not count towards `len`.
#[derive(Clone, Debug)]
pub struct OpenAddressingTable<H: BucketHasher + Clone = ModuloHasher> {
    inner: Vec<Slot>,
    hasher: H,
    num_items: usize,
    config: TableConfig,
}

impl OpenAddressingTable<ModuloHasher> {
    /// Creates an empty table of 16 slots that grows once it would become 70% full.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::open_addressing(), ModuloHasher)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(config, ModuloHasher)
    }
}

impl Default for OpenAddressingTable<ModuloHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: BucketHasher + Clone> OpenAddressingTable<H> {
    /// Creates a table with the default sizing but a custom way of choosing home slots.
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_parts(TableConfig::open_addressing(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self, TableError> {
        config.validate_open_addressing()?;
        let inner = allocate_buckets(config.initial_capacity)?;

        Ok(Self {
            inner,
            hasher,
            num_items: 0,
            config,
        })
    }

    fn from_parts(config: TableConfig, hasher: H) -> Self {
        Self {
            inner: vec![Slot::Empty; config.initial_capacity],
            hasher,
            num_items: 0,
            config,
        }
    }

    /// Inserts `value` under `key`, overwriting any previous value.
    ///
    /// The table doubles first if this insert could push the load factor to its threshold. The probe then
    /// walks from the key's home slot until it meets an empty slot: a live slot holding `key` is updated in
    /// place, otherwise the first empty or tombstoned slot seen on the way is claimed.
    pub fn insert(&mut self, key: Key, value: Value) -> Result<(), TableError> {
        if self.config.needs_growth(self.num_items, self.inner.len()) {
            self.resize()?;
        }

        self.insert_entry(Entry::new(key, value));
        Ok(())
    }

    fn insert_entry(&mut self, entry: Entry) {
        let capacity = self.inner.len();
        let home = self.hasher.bucket(entry.key, capacity);
        let mut vacancy = None;

        for step in 0..capacity {
            let i = (home + step) % capacity;
            match &mut self.inner[i] {
                Slot::Occupied(existing) if existing.key == entry.key => {
                    existing.value = entry.value;
                    // Return to prevent updating num items.
                    return;
                }
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    if vacancy.is_none() {
                        vacancy = Some(i);
                    }
                }
                Slot::Empty => {
                    if vacancy.is_none() {
                        vacancy = Some(i);
                    }
                    break;
                }
            }
        }

        match vacancy {
            Some(i) => {
                self.inner[i] = Slot::Occupied(entry);
                self.num_items += 1;
            }
            None => warn!(
                "no free slot for key {} after probing all {} slots; insert dropped",
                entry.key, capacity
            ),
        }
    }

    /// Removes `key`, leaving a tombstone in its slot. Returns `false` if the key was not present.
    pub fn remove(&mut self, key: Key) -> bool {
        match self.find_slot(key) {
            Some(i) => {
                self.inner[i] = Slot::Tombstone;
                self.num_items -= 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: Key) -> Option<Value> {
        self.find_slot(key)
            .and_then(|i| self.inner[i].entry())
            .map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.find_slot(key).is_some()
    }

    /// Index of the live slot holding `key`. The probe skips tombstones and stops at the first empty slot,
    /// or after visiting every slot once.
    fn find_slot(&self, key: Key) -> Option<usize> {
        let capacity = self.inner.len();
        let home = self.hasher.bucket(key, capacity);

        for step in 0..capacity {
            let i = (home + step) % capacity;
            match &self.inner[i] {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(i),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }

        None
    }

    /// Drops every entry and tombstone and shrinks back to the initial capacity.
    pub fn clear(&mut self) {
        trace!(
            "clearing open-addressing table of {} entries in {} slots",
            self.num_items,
            self.inner.len()
        );
        self.inner = vec![Slot::Empty; self.config.initial_capacity];
        self.num_items = 0;
    }

    /// Gets the number of live entries. Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.num_items
    }

    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// Gets the number of slots.
    pub fn capacity(&self) -> usize {
        self.inner.len()
    }

    /// Gets the number of slots holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.inner.iter().filter(|slot| slot.is_tombstone()).count()
    }

    /// Live `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        self.inner
            .iter()
            .filter_map(Slot::entry)
            .map(|entry| (entry.key, entry.value))
    }

    /// Allocates a slot array of twice the size and re-inserts every live entry in slot order. Tombstones are
    /// dropped along the way.
    fn resize(&mut self) -> Result<(), TableError> {
        let old_capacity = self.inner.len();
        let new_inner = allocate_buckets(doubled(old_capacity)?)?;
        let old_inner = mem::replace(&mut self.inner, new_inner);
        let tombstones = old_inner.iter().filter(|slot| slot.is_tombstone()).count();
        let live = self.num_items;

        self.num_items = 0;
        for slot in old_inner {
            if let Slot::Occupied(entry) = slot {
                self.insert_entry(entry);
            }
        }

        debug!(
            "resized open-addressing table from {} to {} slots ({} entries moved, {} tombstones dropped)",
            old_capacity,
            self.inner.len(),
            live,
            tombstones
        );
        Ok(())
    }
}

impl_dictionary!(OpenAddressingTable);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket_hasher::FxBuildHasher;

    #[test]
    fn it_starts_empty_with_sixteen_slots() {
        let table = OpenAddressingTable::new();

        assert_eq!(table.capacity(), 16);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.get(1), None);
    }

    #[test]
    fn it_inserts_and_updates_values() {
        let mut table = OpenAddressingTable::new();
        table.insert(7, 70).unwrap();
        table.insert(7, 71).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(7), Some(71));
    }

    #[test]
    fn it_resizes_on_the_twelfth_key() {
        let mut table = OpenAddressingTable::new();
        for key in 0..11 {
            table.insert(key, key * 10).unwrap();
        }
        assert_eq!(table.capacity(), 16);

        table.insert(11, 110).unwrap();

        assert_eq!(table.capacity(), 32);
        assert_eq!(table.len(), 12);
        for key in 0..12 {
            assert_eq!(table.get(key), Some(key * 10));
        }
    }

    #[test]
    fn it_probes_past_tombstones() {
        let mut table = OpenAddressingTable::new();
        // All three share home slot 1.
        table.insert(1, 10).unwrap();
        table.insert(17, 170).unwrap();
        table.insert(33, 330).unwrap();

        assert!(table.remove(17));
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.get(17), None);
        assert_eq!(table.get(33), Some(330));
        assert!(!table.remove(17));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn it_reuses_a_tombstone_for_new_keys() {
        let mut table = OpenAddressingTable::new();
        table.insert(1, 10).unwrap();
        table.insert(17, 170).unwrap();
        table.remove(1);

        table.insert(49, 490).unwrap();

        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.get(49), Some(490));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn it_updates_a_key_stored_behind_a_tombstone() {
        let mut table = OpenAddressingTable::new();
        table.insert(1, 10).unwrap();
        table.insert(17, 170).unwrap();
        table.remove(1);

        table.insert(17, 171).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(17), Some(171));
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn it_drops_tombstones_on_resize() {
        let mut table = OpenAddressingTable::new();
        for key in 0..10 {
            table.insert(key, key).unwrap();
        }
        table.remove(0);
        table.remove(1);
        assert_eq!(table.tombstones(), 2);

        for key in 10..14 {
            table.insert(key, key).unwrap();
        }

        assert_eq!(table.capacity(), 32);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.len(), 12);
    }

    #[test]
    fn it_wraps_around_the_end_of_the_slots() {
        let mut table = OpenAddressingTable::new();
        table.insert(15, 1).unwrap();
        table.insert(31, 2).unwrap();

        assert_eq!(table.get(31), Some(2));
        assert_eq!(table.inner[0], Slot::Occupied(Entry::new(31, 2)));
    }

    #[test]
    fn it_gives_up_quietly_when_every_slot_is_taken() {
        let config = TableConfig::open_addressing().with_initial_capacity(2);
        let mut table = OpenAddressingTable::with_config(config).unwrap();
        table.insert_entry(Entry::new(0, 0));
        table.insert_entry(Entry::new(1, 1));

        table.insert_entry(Entry::new(2, 2));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2), None);
        assert!(!table.remove(2));
    }

    #[test]
    fn it_clears_back_to_the_initial_capacity() {
        let mut table = OpenAddressingTable::new();
        for key in 0..40 {
            table.insert(key, key).unwrap();
        }
        assert!(table.capacity() > 16);

        table.clear();

        assert_eq!(table.capacity(), 16);
        assert_eq!(table.len(), 0);
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn it_clones_independently() {
        let mut original = OpenAddressingTable::new();
        original.insert(1, 1).unwrap();
        let mut copy = original.clone();

        copy.insert(1, 2).unwrap();
        copy.insert(2, 2).unwrap();

        assert_eq!(original.get(1), Some(1));
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn it_handles_negative_keys() {
        let mut table = OpenAddressingTable::new();
        table.insert(-5, 1).unwrap();
        table.insert(5, 2).unwrap();
        table.insert(i32::MIN, 3).unwrap();

        assert_eq!(table.get(-5), Some(1));
        assert_eq!(table.get(5), Some(2));
        assert_eq!(table.get(i32::MIN), Some(3));
    }

    #[test]
    fn it_works_with_the_fx_hasher() {
        let mut table = OpenAddressingTable::with_hasher(FxBuildHasher::new());
        for key in 0..100 {
            table.insert(key * 16, key).unwrap();
        }

        assert_eq!(table.len(), 100);
        for key in 0..100 {
            assert_eq!(table.get(key * 16), Some(key));
        }
    }

    #[test]
    fn it_rejects_invalid_configs() {
        let config = TableConfig::open_addressing().with_initial_capacity(10);
        assert!(matches!(
            OpenAddressingTable::with_config(config),
            Err(TableError::InvalidConfig(_))
        ));
    }
}
