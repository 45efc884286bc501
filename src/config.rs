use super::error::TableError;

/// Capacity every table starts with, and returns to on `clear`.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Open addressing degrades quickly as the slot array fills up, so it grows earlier than the chaining tables.
pub const OPEN_ADDRESSING_LOAD_FACTOR: f64 = 0.7;

pub const CHAINING_LOAD_FACTOR: f64 = 1.0;

/// Sizing parameters for a table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    /// Number of slots or buckets allocated up front. Must be a power of two.
    pub initial_capacity: usize,
    /// A table doubles before an insert whenever `(len + 1) / capacity` would reach this value.
    pub max_load_factor: f64,
}

impl TableConfig {
    pub fn open_addressing() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: OPEN_ADDRESSING_LOAD_FACTOR,
        }
    }

    /// Shared by the linked-list and AVL chaining tables.
    pub fn chaining() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: CHAINING_LOAD_FACTOR,
        }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Checks the settings common to every table.
    pub fn validate(&self) -> Result<(), TableError> {
        if !self.initial_capacity.is_power_of_two() {
            return Err(TableError::InvalidConfig(format!(
                "initial capacity must be a non-zero power of two, got {}",
                self.initial_capacity
            )));
        }

        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(TableError::InvalidConfig(format!(
                "max load factor must be a positive finite number, got {}",
                self.max_load_factor
            )));
        }

        Ok(())
    }

    /// Open addressing stores at most one entry per slot, so its load factor cannot exceed 1.
    pub fn validate_open_addressing(&self) -> Result<(), TableError> {
        self.validate()?;

        if self.max_load_factor > 1.0 {
            return Err(TableError::InvalidConfig(format!(
                "open addressing needs a max load factor of at most 1.0, got {}",
                self.max_load_factor
            )));
        }

        Ok(())
    }

    /// Whether a table holding `len` entries in `capacity` slots must grow before taking one more.
    pub(crate) fn needs_growth(&self, len: usize, capacity: usize) -> bool {
        (len + 1) as f64 / capacity as f64 >= self.max_load_factor
    }
}

/// Doubles `capacity`, reporting overflow instead of wrapping.
pub(crate) fn doubled(capacity: usize) -> Result<usize, TableError> {
    capacity
        .checked_mul(2)
        .ok_or(TableError::CapacityOverflow { capacity })
}

/// Allocates `capacity` default-initialised buckets, surfacing allocation failure as an error.
pub(crate) fn allocate_buckets<T: Default>(capacity: usize) -> Result<Vec<T>, TableError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, T::default);
    Ok(buckets)
}
