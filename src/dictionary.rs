use super::error::TableError;

pub type Key = i32;
pub type Value = i32;

/// Value reported by [`Dictionary::get_or_sentinel`] for a missing key. A stored `-1` reads the same, so
/// prefer [`Dictionary::get`] whenever the caller can handle an `Option`.
pub const NOT_FOUND: Value = -1;

/// The operation set shared by every table in this crate.
pub trait Dictionary {
    /// Inserts or overwrites the value for `key`. May grow the table first.
    fn insert(&mut self, key: Key, value: Value) -> Result<(), TableError>;

    /// Removes `key`, returning whether it was present.
    fn remove(&mut self, key: Key) -> bool;

    fn get(&self, key: Key) -> Option<Value>;

    /// Drops every entry and returns to the initial capacity.
    fn clear(&mut self);

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Number of slots or buckets currently allocated.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// `get` with the `-1` convention of the benchmarking harness.
    fn get_or_sentinel(&self, key: Key) -> Value {
        self.get(key).unwrap_or(NOT_FOUND)
    }
}

/// Forwards the `Dictionary` methods to a table's inherent methods of the same name.
macro_rules! impl_dictionary {
    ($table:ident) => {
        impl<H: $crate::bucket_hasher::BucketHasher + Clone> $crate::dictionary::Dictionary
            for $table<H>
        {
            fn insert(
                &mut self,
                key: $crate::dictionary::Key,
                value: $crate::dictionary::Value,
            ) -> Result<(), $crate::error::TableError> {
                $table::insert(self, key, value)
            }

            fn remove(&mut self, key: $crate::dictionary::Key) -> bool {
                $table::remove(self, key)
            }

            fn get(&self, key: $crate::dictionary::Key) -> Option<$crate::dictionary::Value> {
                $table::get(self, key)
            }

            fn clear(&mut self) {
                $table::clear(self)
            }

            fn len(&self) -> usize {
                $table::len(self)
            }

            fn capacity(&self) -> usize {
                $table::capacity(self)
            }
        }
    };
}

pub(crate) use impl_dictionary;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainingTable;

    #[test]
    fn it_reports_the_sentinel_for_missing_keys() {
        let mut table = ChainingTable::new();
        table.insert(5, 50).unwrap();

        let dict: &dyn Dictionary = &table;
        assert_eq!(dict.get_or_sentinel(5), 50);
        assert_eq!(dict.get_or_sentinel(6), NOT_FOUND);
        assert!(dict.contains_key(5));
        assert!(!dict.is_empty());
    }

    #[test]
    fn it_cannot_tell_a_stored_sentinel_from_a_missing_key() {
        let mut table = ChainingTable::new();
        table.insert(3, NOT_FOUND).unwrap();

        assert_eq!(table.get_or_sentinel(3), table.get_or_sentinel(4));
        assert_eq!(table.get(3), Some(NOT_FOUND));
        assert_eq!(table.get(4), None);
    }

    #[test]
    fn it_computes_the_load_factor() {
        let mut table = ChainingTable::new();
        for key in 0..8 {
            table.insert(key, key).unwrap();
        }

        assert!((Dictionary::load_factor(&table) - 0.5).abs() < f64::EPSILON);
    }
}
