use crate::core::common::error::CrashDbError;
use crate::core::types::AccidentRecord;
use std::fmt::Debug; // Import Debug

/// Trait for the keyed operations shared by both record indexes.
///
/// Every index stores whole [`AccidentRecord`] values keyed by their `id`
/// string. Predicate searches are not part of this seam: the tree and the
/// table return differently shaped result sets (ordered slice of references
/// versus a materialized filtered table), so those stay inherent methods.
pub trait RecordIndex: Debug {
    /// Inserts a record into the index.
    ///
    /// Duplicate ids are not rejected; both indexes deliberately keep
    /// multiset semantics for equal keys.
    ///
    /// # Errors
    ///
    /// Returns `CrashDbError::TableFull` from the open-addressing table when
    /// a probe wraps without finding a free slot. The tree never fails.
    fn insert(&mut self, record: AccidentRecord) -> Result<(), CrashDbError>;

    /// Removes one record with the given id, returning it.
    ///
    /// Returns `None` when no live record carries the id. With duplicate
    /// ids present, exactly one of them is removed per call.
    fn remove(&mut self, id: &str) -> Option<AccidentRecord>;

    /// Finds a record by exact id, returning a borrowed view.
    fn get(&self, id: &str) -> Option<&AccidentRecord>;

    /// Number of live records in the index.
    fn len(&self) -> usize;

    /// Returns true when the index holds no live records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
