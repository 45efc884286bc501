use super::dictionary::{Key, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: Key,
    pub value: Value,
}

impl Entry {
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }
}

/// A slot of the open-addressing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Never held data since the last resize or clear. Ends every probe sequence.
    Empty,
    Occupied(Entry),
    /// Held data that has since been removed. Skipped by lookups, but probing continues past it.
    Tombstone,
}

impl Slot {
    /// The live entry, if any.
    pub fn entry(&self) -> Option<&Entry> {
        if let Slot::Occupied(entry) = self {
            Some(entry)
        } else {
            None
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Slot::Empty
    }
}
