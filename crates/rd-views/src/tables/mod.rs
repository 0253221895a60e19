//! Paginated results table with single-row selection

use std::ops::Range;

use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use egui::{RichText, Ui};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use rd_core::DashboardCoordinator;

use crate::DashboardView;

/// Displayed columns: (batch column, header, initial width)
///
/// `lat` and `lon` stay in the batch but are not shown.
const VISIBLE_COLUMNS: &[(&str, &str, f32)] = &[
    ("name", "Restaurant", 140.0),
    ("cuisine", "Cuisine", 100.0),
    ("phone", "Téléphone", 110.0),
    ("horaires", "Horaires", 220.0),
    ("quartier", "Quartier", 140.0),
];

/// Configuration for the results table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
    pub height: f32,
    pub striped_rows: bool,
    pub resizable_columns: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 3,
            height: 200.0,
            striped_rows: true,
            resizable_columns: true,
        }
    }
}

/// Number of pages needed for `total` rows, at least one
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    ((total + page_size - 1) / page_size).max(1)
}

/// Rows shown on `page`, clamped to the last page
pub fn page_range(total: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let page = page.min(page_count(total, page_size) - 1);
    let start = (page * page_size).min(total);
    start..(start + page_size).min(total)
}

/// Table view over the filtered restaurants
pub struct RestaurantTable {
    title: String,
    pub config: TableConfig,

    // State
    page: usize,
    cached_batch: Option<RecordBatch>,
    cached_rows: Vec<usize>,
}

impl RestaurantTable {
    pub fn new(title: String, config: TableConfig) -> Self {
        Self {
            title,
            config,
            page: 0,
            cached_batch: None,
            cached_rows: Vec::new(),
        }
    }

    /// Rebuild the batch when the filtered set changed
    fn refresh(&mut self, coordinator: &DashboardCoordinator) {
        let filtered = &coordinator.snapshot().filtered;
        if self.cached_batch.is_some() && *filtered == self.cached_rows {
            return;
        }

        self.cached_rows = filtered.clone();
        self.page = 0;
        self.cached_batch = match rd_data::table_batch(&coordinator.table_rows()) {
            Ok(batch) => Some(batch),
            Err(e) => {
                error!("Failed to build table data: {}", e);
                None
            }
        };
        debug!("Table refreshed with {} rows", self.cached_rows.len());
    }

    fn pagination_ui(&mut self, ui: &mut Ui, total: usize) {
        let pages = page_count(total, self.config.page_size);
        self.page = self.page.min(pages - 1);

        ui.horizontal(|ui| {
            if ui.add_enabled(self.page > 0, egui::Button::new("◀")).clicked() {
                self.page -= 1;
            }
            ui.label(format!("Page {} / {}", self.page + 1, pages));
            if ui.add_enabled(self.page + 1 < pages, egui::Button::new("▶")).clicked() {
                self.page += 1;
            }
            ui.separator();
            ui.label(format!("{} résultats", total));
        });
    }

    /// Draw the current page, returning a selection change if the user made one
    fn render_table(&self, ui: &mut Ui, data: &RecordBatch, selected: Option<usize>) -> Option<Option<usize>> {
        use egui_extras::{Column, TableBuilder};

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let rows = page_range(data.num_rows(), self.config.page_size, self.page);
        let schema = data.schema();

        let column_indices: Vec<usize> = VISIBLE_COLUMNS
            .iter()
            .filter_map(|(name, _, _)| schema.index_of(name).ok())
            .collect();
        let hours_idx = schema.index_of("horaires").ok();

        let mut change = None;

        let mut builder = TableBuilder::new(ui)
            .striped(self.config.striped_rows)
            .resizable(self.config.resizable_columns)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .max_scroll_height(self.config.height)
            .vscroll(true)
            .column(Column::exact(28.0));

        for (_, _, width) in VISIBLE_COLUMNS {
            builder = builder.column(Column::initial(*width).at_least(60.0).clip(true));
        }

        builder
            .header(20.0, |mut header| {
                header.col(|_ui| {});
                for (_, title, _) in VISIBLE_COLUMNS {
                    header.col(|ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|mut body| {
                for row_index in rows {
                    let lines = hours_idx
                        .and_then(|idx| array_value_to_string(data.column(idx), row_index).ok())
                        .map(|hours| hours.lines().count().max(1))
                        .unwrap_or(1);

                    body.row(text_height * lines as f32, |mut row| {
                        row.col(|ui| {
                            let mut checked = selected == Some(row_index);
                            if ui.checkbox(&mut checked, "").changed() {
                                change = Some(checked.then_some(row_index));
                            }
                        });

                        for &col_idx in &column_indices {
                            row.col(|ui| {
                                let value = array_value_to_string(data.column(col_idx), row_index).unwrap_or_default();
                                if selected == Some(row_index) {
                                    ui.label(RichText::new(value).strong());
                                } else {
                                    ui.label(value);
                                }
                            });
                        }
                    });
                }
            });

        change
    }
}

impl DashboardView for RestaurantTable {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, coordinator: &mut DashboardCoordinator, ui: &mut Ui) {
        ui.heading(self.title.as_str());
        self.refresh(coordinator);

        let warn_color = ui.visuals().warn_fg_color;
        let data = match self.cached_batch.clone() {
            Some(data) if data.num_rows() > 0 => data,
            _ => {
                ui.colored_label(warn_color, "Aucun résultat.");
                return;
            }
        };

        self.pagination_ui(ui, data.num_rows());
        ui.add_space(4.0);

        let selected = coordinator.selected_filtered_row();
        if let Some(change) = self.render_table(ui, &data, selected) {
            coordinator.select_row(change);
        }
    }
}
