//! Red-Black Tree Index
//!
//! Ordered index over accident records keyed by id, with the standard
//! red-black rebalancing on insert and remove. Nodes live in a `Vec`-based
//! arena and reference each other by index, so rotations and fixups are
//! plain index reassignments rather than pointer surgery.

pub mod tree;

pub use tree::{InorderIter, RedBlackIndex};
