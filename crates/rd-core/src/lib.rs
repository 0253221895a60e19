//! Core functionality for the restaurant dashboard
//!
//! This crate owns the data model and the selection-and-filter coordinator
//! that feeds the table and map views.

pub mod category;
pub mod coordinator;
pub mod events;
pub mod filter;
pub mod marker;
pub mod popup;
pub mod record;
pub mod selection;
pub mod viewport;

// Re-export commonly used types
pub use category::{classify, ColorCategory};
pub use coordinator::{DashboardCoordinator, DashboardSnapshot, TableRow};
pub use events::EventBus;
pub use filter::{apply_filters, filter_records, FilterCriteria};
pub use marker::{marker_state, MarkerDescriptor, MarkerState};
pub use popup::{build_popup_content, is_valid, PopupContent, PopupLine};
pub use record::{Dataset, DatasetColumns, Restaurant};
pub use selection::Selection;
pub use viewport::{resolve_viewport, MapViewport, ViewportSettings};

/// Literal values that stand in for missing data in source files.
///
/// Matched case-insensitively.
pub const MISSING_SENTINELS: &[&str] = &["nan", "none", "", "n/a", "non spécifié"];

/// Check if a raw value is one of the missing-data sentinels
pub fn is_missing_sentinel(value: &str) -> bool {
    let lowered = value.to_lowercase();
    MISSING_SENTINELS.iter().any(|sentinel| lowered == *sentinel)
}
