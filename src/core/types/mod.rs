// src/core/types/mod.rs

use std::fmt;

/// One traffic-accident record, the value stored by both indexes.
///
/// Records are immutable after construction. The `id` field is the unique
/// key; the remaining fields are payload, four of which (severity, city,
/// state, zipcode) are filterable through [`RecordFilter`]. Field order is
/// fixed and governs how a 6-field delimited row maps onto the constructor:
/// id, severity, distance, city, state, zipcode.
///
/// No field is validated here; ingestion filters malformed rows before they
/// reach the indexes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccidentRecord {
    pub id: String,
    pub severity: i32,
    pub distance: f64,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl AccidentRecord {
    pub fn new(
        id: impl Into<String>,
        severity: i32,
        distance: f64,
        city: impl Into<String>,
        state: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            distance,
            city: city.into(),
            state: state.into(),
            zipcode: zipcode.into(),
        }
    }
}

impl fmt::Display for AccidentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Severity: {}, Distance: {}, City: {}, State: {}, Zipcode: {}",
            self.id, self.severity, self.distance, self.city, self.state, self.zipcode
        )
    }
}

/// Predicate over the filterable attributes of an [`AccidentRecord`].
///
/// Each constraint is optional; `None` means "don't filter on this field".
/// An unconstrained filter matches every record, so a predicate search with
/// no constraints degenerates to "return everything". Callers that accept
/// sentinel inputs (empty string, zero severity) map them to `None` before
/// constructing the filter; the core only understands `Option`.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub severity: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

impl RecordFilter {
    pub fn by_severity(severity: i32) -> Self {
        Self { severity: Some(severity), ..Self::default() }
    }

    pub fn by_city(city: impl Into<String>) -> Self {
        Self { city: Some(city.into()), ..Self::default() }
    }

    pub fn by_state(state: impl Into<String>) -> Self {
        Self { state: Some(state.into()), ..Self::default() }
    }

    pub fn by_zipcode(zipcode: impl Into<String>) -> Self {
        Self { zipcode: Some(zipcode.into()), ..Self::default() }
    }

    /// Returns true when `record` satisfies every present constraint.
    pub fn matches(&self, record: &AccidentRecord) -> bool {
        self.severity.map_or(true, |s| record.severity == s)
            && self.city.as_deref().map_or(true, |c| record.city == c)
            && self.state.as_deref().map_or(true, |s| record.state == s)
            && self.zipcode.as_deref().map_or(true, |z| record.zipcode == z)
    }
}
