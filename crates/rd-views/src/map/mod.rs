//! Map view: markers on a lon/lat plot plus restaurant popups

use egui::{Color32, Pos2, RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rd_core::{ColorCategory, DashboardCoordinator, MapViewport, MarkerDescriptor, PopupContent, PopupLine};

use crate::{category_color, category_text_color, DashboardView};

/// Map view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub height: f32,
    pub marker_radius: f32,
    pub highlight_radius: f32,

    /// Pointer distance, in pixels, within which a click hits a marker
    pub click_tolerance: f32,

    /// Delay before the highlighted marker's popup opens
    pub popup_delay_ms: u64,

    pub show_legend: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            height: 400.0,
            marker_radius: 5.0,
            highlight_radius: 9.0,
            click_tolerance: 12.0,
            popup_delay_ms: 500,
            show_legend: true,
        }
    }
}

/// Heading shown above the map
pub fn map_heading(count: usize) -> String {
    format!("Carte interactive ({} restaurants sélectionnés)", count)
}

/// Index of the candidate closest to `target`, if within `max_distance`
fn nearest_marker(candidates: impl IntoIterator<Item = (usize, Pos2)>, target: Pos2, max_distance: f32) -> Option<usize> {
    candidates
        .into_iter()
        .map(|(row, pos)| (row, pos.distance(target)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(row, _)| row)
}

/// Plot bounds centered on the viewport
///
/// Latitude span is shrunk by cos(latitude) so both axes cover a similar
/// ground distance.
fn viewport_bounds(viewport: &MapViewport) -> PlotBounds {
    let half_lon = viewport.span_degrees() / 2.0;
    let half_lat = half_lon * viewport.latitude().to_radians().cos().abs().max(0.01);
    PlotBounds::from_min_max(
        [viewport.longitude() - half_lon, viewport.latitude() - half_lat],
        [viewport.longitude() + half_lon, viewport.latitude() + half_lat],
    )
}

/// Map view over the filtered restaurants
pub struct MapView {
    title: String,
    pub config: MapConfig,

    // State
    last_viewport: Option<MapViewport>,
    last_highlighted: Vec<usize>,
    popup_pending_since: Option<f64>,
    open_popup: Option<usize>,
}

impl MapView {
    pub fn new(title: String, config: MapConfig) -> Self {
        Self {
            title,
            config,
            last_viewport: None,
            last_highlighted: Vec::new(),
            popup_pending_since: None,
            open_popup: None,
        }
    }

    /// Schedule the highlighted popup after a selection change
    fn track_highlight(&mut self, ui: &Ui, markers: &[MarkerDescriptor]) {
        let highlighted: Vec<usize> = markers.iter().filter(|m| m.state.highlighted).map(|m| m.row).collect();
        let now = ui.input(|i| i.time);

        if highlighted != self.last_highlighted {
            self.popup_pending_since = (!highlighted.is_empty()).then_some(now);
            if highlighted.is_empty() {
                self.open_popup = None;
            }
            self.last_highlighted = highlighted;
        }

        if let Some(since) = self.popup_pending_since {
            let delay = self.config.popup_delay_ms as f64 / 1000.0;
            let elapsed = now - since;
            if elapsed >= delay {
                self.open_popup = self.last_highlighted.first().copied();
                self.popup_pending_since = None;
            } else {
                ui.ctx()
                    .request_repaint_after(std::time::Duration::from_secs_f64(delay - elapsed));
            }
        }
    }

    fn render_plot(&mut self, ui: &mut Ui, markers: &[MarkerDescriptor], viewport: MapViewport) -> Option<usize> {
        let reset_bounds = self.last_viewport != Some(viewport);
        if reset_bounds {
            debug!(
                "Map viewport moved to ({:.5}, {:.5}) zoom {}",
                viewport.latitude(),
                viewport.longitude(),
                viewport.zoom
            );
            self.last_viewport = Some(viewport);
        }

        let aspect = (1.0 / viewport.latitude().to_radians().cos().abs().max(0.01)) as f32;
        let mut plot = Plot::new("restaurant_map")
            .height(self.config.height)
            .data_aspect(aspect)
            .x_axis_label("longitude")
            .y_axis_label("latitude");
        if self.config.show_legend {
            plot = plot.legend(Legend::default());
        }

        let config = self.config.clone();
        let response = plot.show(ui, |plot_ui| {
            if reset_bounds {
                plot_ui.set_plot_bounds(viewport_bounds(&viewport));
            }

            // One series per category, highlighted markers drawn last
            for category in ColorCategory::ALL {
                let positions: Vec<[f64; 2]> = markers
                    .iter()
                    .filter(|m| !m.state.highlighted && m.state.icon_category() == category)
                    .map(|m| [m.position.x(), m.position.y()])
                    .collect();
                if positions.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(positions))
                        .color(category_color(category))
                        .radius(config.marker_radius)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .name(category.name()),
                );
            }

            let highlighted: Vec<[f64; 2]> = markers
                .iter()
                .filter(|m| m.state.highlighted)
                .map(|m| [m.position.x(), m.position.y()])
                .collect();
            if !highlighted.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(highlighted))
                        .color(category_color(ColorCategory::ALERT))
                        .radius(config.highlight_radius)
                        .shape(MarkerShape::Diamond)
                        .filled(true)
                        .name("sélection"),
                );
            }

            if !plot_ui.response().clicked() {
                return None;
            }
            let pointer = plot_ui.pointer_coordinate()?;
            let target = plot_ui.screen_from_plot(pointer);
            let candidates: Vec<(usize, Pos2)> = markers
                .iter()
                .map(|m| (m.row, plot_ui.screen_from_plot(PlotPoint::new(m.position.x(), m.position.y()))))
                .collect();
            nearest_marker(candidates, target, config.click_tolerance)
        });

        response.inner
    }

    fn popup_ui(&mut self, ui: &Ui, markers: &[MarkerDescriptor]) {
        let Some(row) = self.open_popup else {
            return;
        };
        let Some(marker) = markers.iter().find(|m| m.row == row) else {
            self.open_popup = None;
            return;
        };

        let mut open = true;
        egui::Window::new(marker.popup.title.as_str())
            .id(egui::Id::new(("restaurant_popup", row)))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ui.ctx(), |ui| render_popup(ui, &marker.popup));

        if !open {
            self.open_popup = None;
        }
    }
}

/// Draw popup content the way the HTML fragment lays it out
fn render_popup(ui: &mut Ui, popup: &PopupContent) {
    let text_color = category_text_color(popup.accent);

    ui.label(RichText::new(&popup.title).heading().color(text_color));
    if !popup.subtitle.is_empty() {
        ui.label(RichText::new(&popup.subtitle).small().color(Color32::from_gray(0x88)));
    }
    ui.label(
        RichText::new(format!(" {} ", popup.badge))
            .small()
            .strong()
            .color(Color32::WHITE)
            .background_color(category_color(popup.accent)),
    );
    ui.add_space(6.0);

    for line in &popup.lines {
        match line {
            PopupLine::Hours(entries) => {
                ui.label(format!("🕒 {}", entries.join("\n")));
            }
            PopupLine::Phone(phone) => {
                ui.label(format!("📞 {}", phone));
            }
            PopupLine::Website(url) => {
                ui.horizontal_wrapped(|ui| {
                    ui.label("Site web");
                    ui.hyperlink_to(RichText::new(url).strong().underline().color(text_color), url);
                });
            }
        }
    }
}

impl DashboardView for MapView {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, coordinator: &mut DashboardCoordinator, ui: &mut Ui) {
        let snapshot = coordinator.snapshot();
        ui.heading(map_heading(snapshot.filtered.len()));

        self.track_highlight(ui, &snapshot.markers);
        if let Some(clicked) = self.render_plot(ui, &snapshot.markers, snapshot.viewport) {
            self.open_popup = Some(clicked);
        }
        self.popup_ui(ui, &snapshot.markers);
    }
}
