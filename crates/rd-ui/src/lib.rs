//! Filter controls and theming for the restaurant dashboard

pub mod filter_panel;
pub mod theme;

pub use filter_panel::{FilterOptions, FilterPanel};
pub use theme::{apply_theme, Theme};

/// Draw the "no data" state
pub fn no_data_ui(ui: &mut egui::Ui, source_name: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("Aucune donnée disponible");
        ui.label(format!("Impossible de charger {}.", source_name));
        ui.label("Utilisez Fichier › Ouvrir… pour choisir un autre jeu de données.");
    });
}
