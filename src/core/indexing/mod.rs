pub mod hash_table;
pub mod rbtree;
pub mod traits;

// Re-export the index types and the shared trait for convenience.
pub use hash_table::OpenAddressTable;
pub use rbtree::RedBlackIndex;
pub use traits::RecordIndex;
