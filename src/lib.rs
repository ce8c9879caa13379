#![forbid(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

//! # crashdb: In-Memory Indexes Over a Traffic-Accident Dataset
//!
//! `crashdb` builds two independent in-memory indexes over a fixed dataset of
//! traffic-accident records, both keyed by the record id:
//! - A red-black tree (`RedBlackIndex`) for ordered access
//! - An open-addressing hash table (`OpenAddressTable`) for direct access
//!
//! Both indexes are populated once from a CSV dataset and then queried
//! interactively through the binary's menu interface. The library itself
//! never prints; query results are returned as optional references or
//! materialized result sets and rendered by the caller.

pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::common::CrashDbError;
pub use crate::core::config::Config;
pub use crate::core::indexing::{OpenAddressTable, RecordIndex, RedBlackIndex};
pub use crate::core::types::{AccidentRecord, RecordFilter};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, CrashDbError>;

#[cfg(test)]
mod tests {
    use crate::core::indexing::{OpenAddressTable, RecordIndex, RedBlackIndex};
    use crate::core::types::{AccidentRecord, RecordFilter};

    fn record(id: &str, severity: i32, city: &str) -> AccidentRecord {
        AccidentRecord::new(id, severity, 0.5, city, "CA", "90001")
    }

    fn dataset() -> Vec<AccidentRecord> {
        vec![
            record("A-3920", 2, "Fresno"),
            record("A-0015", 4, "Oakland"),
            record("A-7781", 2, "Fresno"),
            record("A-1204", 1, "San Jose"),
            record("A-5550", 3, "Oakland"),
        ]
    }

    #[test]
    fn both_indexes_agree_on_keyed_lookups() {
        let mut tree = RedBlackIndex::new();
        let mut table = OpenAddressTable::new();
        for rec in dataset() {
            tree.insert(rec.clone());
            table.insert(rec).unwrap();
        }

        for rec in dataset() {
            assert_eq!(tree.get(&rec.id), Some(&rec));
            assert_eq!(table.get(&rec.id), Some(&rec));
        }
        assert_eq!(tree.get("A-9999"), None);
        assert_eq!(table.get("A-9999"), None);
        assert_eq!(tree.len(), table.len());
    }

    #[test]
    fn both_indexes_agree_on_predicate_search() {
        let mut tree = RedBlackIndex::new();
        let mut table = OpenAddressTable::new();
        for rec in dataset() {
            tree.insert(rec.clone());
            table.insert(rec).unwrap();
        }

        let filter = RecordFilter::by_city("Fresno");
        let from_tree: Vec<String> =
            tree.filter(&filter).into_iter().map(|r| r.id.clone()).collect();
        let mut from_table: Vec<String> =
            table.filter(&filter).unwrap().iter().map(|r| r.id.clone()).collect();
        from_table.sort();

        // Tree results arrive in ascending id order already.
        assert_eq!(from_tree, vec!["A-3920".to_string(), "A-7781".to_string()]);
        assert_eq!(from_tree, from_table);
    }

    #[test]
    fn removal_through_the_shared_trait() {
        fn drive(index: &mut dyn RecordIndex) {
            for rec in dataset() {
                index.insert(rec).unwrap();
            }
            let removed = index.remove("A-1204").unwrap();
            assert_eq!(removed.id, "A-1204");
            assert!(index.get("A-1204").is_none());
            assert!(index.remove("A-1204").is_none());
            assert_eq!(index.len(), 4);
        }

        drive(&mut RedBlackIndex::new());
        drive(&mut OpenAddressTable::new());
    }
}
