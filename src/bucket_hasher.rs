use super::dictionary::Key;
use rustc_hash::FxHasher;
use std::hash::{BuildHasher, Hasher};

/// Maps a key to one of `capacity` buckets. `capacity` is always non-zero.
pub trait BucketHasher {
    fn bucket(&self, key: Key, capacity: usize) -> usize;
}

/// `|key| mod capacity`. No mixing at all: keys that differ by a multiple of the capacity share a bucket.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModuloHasher;

impl BucketHasher for ModuloHasher {
    fn bucket(&self, key: Key, capacity: usize) -> usize {
        key.unsigned_abs() as usize % capacity
    }
}

/// Runs keys through the fx hashing algorithm before reducing them, which spreads patterned key sets
/// (strides of the capacity, clustered ranges) across the table.
#[derive(Clone, Copy, Debug, Default)]
pub struct FxBuildHasher;

impl FxBuildHasher {
    pub fn new() -> Self {
        Self {}
    }
}

impl BuildHasher for FxBuildHasher {
    type Hasher = FxHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FxHasher::default()
    }
}

impl BucketHasher for FxBuildHasher {
    fn bucket(&self, key: Key, capacity: usize) -> usize {
        let mut hasher = self.build_hasher();
        hasher.write_i32(key);
        let hash = hasher.finish();
        // Fx is a single multiply, so the low bits of a multiple of 2^k stay zero. Fold the high half in.
        ((hash >> 32) ^ hash) as usize % capacity
    }
}
