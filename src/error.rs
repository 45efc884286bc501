use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot grow a table of capacity {capacity} without overflowing usize")]
    CapacityOverflow { capacity: usize },
    #[error("failed to allocate table storage: {0}")]
    Allocation(#[from] TryReserveError),
}
