//! Integer dictionaries built on three collision-resolution strategies:
//! open addressing with linear probing, separate chaining with linked lists
//! and separate chaining with per-bucket AVL trees.

pub mod avl_chaining;
pub mod avl_tree;
pub mod bucket_hasher;
pub mod chaining;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod map_entry;
pub mod open_addressing;

pub use avl_chaining::AvlChainingTable;
pub use avl_tree::AvlTree;
pub use bucket_hasher::{BucketHasher, FxBuildHasher, ModuloHasher};
pub use chaining::ChainingTable;
pub use config::TableConfig;
pub use dictionary::{Dictionary, Key, Value, NOT_FOUND};
pub use error::TableError;
pub use open_addressing::OpenAddressingTable;
