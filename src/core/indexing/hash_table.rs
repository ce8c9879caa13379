use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::common::error::CrashDbError;
use crate::core::types::{AccidentRecord, RecordFilter};

/// Default bucket count for a fresh table.
const DEFAULT_BUCKETS: usize = 101;

/// Growth is triggered before an insert would bring the live load factor
/// to or past this limit.
const MAX_LOAD_FACTOR: f64 = 0.8;

/// One slot of the table.
///
/// A removed entry becomes a `Tombstone` rather than `Empty`: probe
/// sequences for other keys may pass through it, so searches must skip it
/// but never terminate on it. Only a full rebuild during growth turns
/// tombstones back into empty slots.
#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Empty,
    Occupied(AccidentRecord),
    Tombstone,
}

impl Slot {
    fn is_live(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Unordered index over accident records: open addressing with linear
/// probing and lazy deletion.
///
/// The table is keyed only on the record id. `len` counts live entries;
/// tombstones occupy slots until the next growth rebuild. Duplicate ids
/// are not detected or merged on insert, matching the tree's multiset
/// semantics.
#[derive(Debug)]
pub struct OpenAddressTable {
    buckets: Vec<Slot>,
    len: usize,
}

impl Default for OpenAddressTable {
    fn default() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }
}

impl OpenAddressTable {
    /// Creates a table with the default bucket count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with `buckets` slots. The count is clamped to at
    /// least one so the modulo reduction is always defined.
    pub fn with_buckets(buckets: usize) -> Self {
        OpenAddressTable { buckets: vec![Slot::Empty; buckets.max(1)], len: 0 }
    }

    /// Number of live (occupied, non-deleted) records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the table holds no live records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Ratio of live entries to total slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Occupancy of a single slot: 1 if live, 0 otherwise, `None` out of
    /// bounds. With open addressing every slot holds at most one entry.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(|slot| usize::from(slot.is_live()))
    }

    /// Home slot for a key under the current bucket count. Recomputed
    /// fresh on every call; positions are never cached across a resize.
    fn bucket_for(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    /// Linear probe for the slot holding a live record with this id.
    ///
    /// Tombstones do not terminate the scan; an empty slot or a full wrap
    /// back to the home slot does.
    fn probe_live(&self, id: &str) -> Option<usize> {
        let home = self.bucket_for(id);
        let mut index = home;
        loop {
            match &self.buckets[index] {
                Slot::Empty => return None,
                Slot::Occupied(record) if record.id == id => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
            index = (index + 1) % self.buckets.len();
            if index == home {
                return None;
            }
        }
    }

    /// Linear probe for the first non-live slot starting at `home`.
    /// `None` when the probe wraps without finding one.
    fn probe_free(&self, home: usize) -> Option<usize> {
        let mut index = home;
        loop {
            if !self.buckets[index].is_live() {
                return Some(index);
            }
            index = (index + 1) % self.buckets.len();
            if index == home {
                return None;
            }
        }
    }

    /// Inserts a record, growing the table first when the insert would
    /// push the load factor to the limit.
    ///
    /// Duplicate ids are not checked; equal keys coexist in separate
    /// slots.
    ///
    /// # Errors
    ///
    /// Returns `CrashDbError::TableFull` if the probe wraps fully without
    /// finding a free slot, leaving the table unmodified. The growth
    /// trigger makes this unreachable in normal operation.
    pub fn insert(&mut self, record: AccidentRecord) -> Result<(), CrashDbError> {
        if (self.len + 1) as f64 >= self.buckets.len() as f64 * MAX_LOAD_FACTOR {
            self.grow();
        }

        let home = self.bucket_for(&record.id);
        let index = match self.probe_free(home) {
            Some(index) => index,
            None => return Err(CrashDbError::TableFull { buckets: self.buckets.len() }),
        };

        self.buckets[index] = Slot::Occupied(record);
        self.len += 1;
        Ok(())
    }

    /// Doubles the bucket count and rebuilds from scratch, re-inserting
    /// every live record under the new modulus. Tombstones are dropped in
    /// the process. Called only from the insert load-factor check; the
    /// table never shrinks.
    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, vec![Slot::Empty; new_count]);

        for slot in old {
            if let Slot::Occupied(record) = slot {
                let home = self.bucket_for(&record.id);
                let mut index = home;
                while self.buckets[index].is_live() {
                    index = (index + 1) % self.buckets.len();
                }
                self.buckets[index] = Slot::Occupied(record);
            }
        }
    }

    /// Removes one live record with the given id by tombstoning its slot.
    /// Returns the record, or `None` when the id is absent.
    pub fn remove(&mut self, id: &str) -> Option<AccidentRecord> {
        let index = self.probe_live(id)?;
        match std::mem::replace(&mut self.buckets[index], Slot::Tombstone) {
            Slot::Occupied(record) => {
                self.len -= 1;
                Some(record)
            }
            other => {
                // probe_live only returns live slots; restore defensively.
                self.buckets[index] = other;
                None
            }
        }
    }

    /// Finds a live record by exact id, returning a borrowed view.
    pub fn get(&self, id: &str) -> Option<&AccidentRecord> {
        let index = self.probe_live(id)?;
        match &self.buckets[index] {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }

    /// Materializes a filtered copy: a freshly built table holding clones
    /// of every live record matching `filter`. Full scan; the table is
    /// keyed only on id, so there is no hashing shortcut.
    ///
    /// # Errors
    ///
    /// Propagates `CrashDbError::TableFull` from the rebuild inserts,
    /// which cannot occur in practice since the result table grows itself.
    pub fn filter(&self, filter: &RecordFilter) -> Result<OpenAddressTable, CrashDbError> {
        let mut result = OpenAddressTable::with_buckets(self.buckets.len());
        for record in self.iter() {
            if filter.matches(record) {
                result.insert(record.clone())?;
            }
        }
        Ok(result)
    }

    /// Iterator over live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &AccidentRecord> {
        self.buckets.iter().filter_map(|slot| match slot {
            Slot::Occupied(record) => Some(record),
            _ => None,
        })
    }
}

impl crate::core::indexing::traits::RecordIndex for OpenAddressTable {
    fn insert(&mut self, record: AccidentRecord) -> Result<(), CrashDbError> {
        Self::insert(self, record)
    }

    fn remove(&mut self, id: &str) -> Option<AccidentRecord> {
        Self::remove(self, id)
    }

    fn get(&self, id: &str) -> Option<&AccidentRecord> {
        Self::get(self, id)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}
