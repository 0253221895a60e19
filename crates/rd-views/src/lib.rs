//! Table and map views for the restaurant dashboard

mod map;
mod tables;

pub use map::{MapConfig, MapView};
pub use tables::{page_count, page_range, RestaurantTable, TableConfig};

use egui::{Color32, Ui};
use rd_core::{ColorCategory, DashboardCoordinator};

/// Base trait for the dashboard's panels
pub trait DashboardView {
    /// Get the display name
    fn display_name(&self) -> &str;

    /// Draw the UI, pushing user interactions back to the coordinator
    fn ui(&mut self, coordinator: &mut DashboardCoordinator, ui: &mut Ui);
}

/// Marker fill of a category
pub fn category_color(category: ColorCategory) -> Color32 {
    let [r, g, b] = category.rgb();
    Color32::from_rgb(r, g, b)
}

/// Readable text color of a category
pub fn category_text_color(category: ColorCategory) -> Color32 {
    let [r, g, b] = category.text_rgb();
    Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_colors() {
        assert_eq!(category_color(ColorCategory::DarkBlue), Color32::from_rgb(0x00, 0x66, 0xA2));
        assert_eq!(category_text_color(ColorCategory::Beige), Color32::from_rgb(0x8B, 0x45, 0x13));
        assert_eq!(category_text_color(ColorCategory::Green), category_color(ColorCategory::Green));
    }
}
