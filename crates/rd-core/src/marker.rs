//! Per-record marker display state

use geo_types::Point;

use crate::category::{classify, ColorCategory};
use crate::popup::{build_popup_content, PopupContent};
use crate::record::Restaurant;
use crate::selection::Selection;

/// Color and highlight state for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerState {
    /// Cuisine-derived category
    pub category: ColorCategory,
    pub highlighted: bool,
}

impl MarkerState {
    /// Category the icon is drawn with
    pub fn icon_category(&self) -> ColorCategory {
        if self.highlighted {
            ColorCategory::ALERT
        } else {
            self.category
        }
    }
}

/// Everything the map needs to draw one record
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    /// Index of the record in the full dataset
    pub row: usize,
    pub position: Point<f64>,
    pub state: MarkerState,
    pub popup: PopupContent,
}

impl MarkerDescriptor {
    pub fn new(row: usize, record: &Restaurant, selection: Option<&Selection>) -> Self {
        Self {
            row,
            position: record.location,
            state: marker_state(record, selection),
            popup: build_popup_content(record),
        }
    }
}

pub fn marker_state(record: &Restaurant, selection: Option<&Selection>) -> MarkerState {
    MarkerState {
        category: classify(record.cuisine.as_deref()),
        highlighted: selection.map(|s| s.matches(record)).unwrap_or(false),
    }
}
