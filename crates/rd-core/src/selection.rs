//! The single selected record shared by the table and the map

use geo_types::Point;

use crate::record::Restaurant;

/// Snapshot of the selected record
///
/// Held by value so it stays valid after the filtered set changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Index of the record in the full dataset
    pub row: usize,
    pub name: String,
    pub location: Point<f64>,
}

impl Selection {
    pub fn from_record(row: usize, record: &Restaurant) -> Self {
        Self {
            row,
            name: record.name.clone(),
            location: record.location,
        }
    }

    /// Name-based match used for highlighting
    ///
    /// Two records sharing a name both match.
    pub fn matches(&self, record: &Restaurant) -> bool {
        record.name == self.name
    }
}
