//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rd_core::events::{events, handler_from_fn, Event};
use rd_core::{DashboardCoordinator, EventBus};
use rd_data::{load_or_none, DatasetConfig};
use rd_ui::{apply_theme, FilterPanel};
use rd_views::{DashboardView, MapView, RestaurantTable};

mod config;

use config::{config_path, AppConfig, CONFIG_ENV_VAR, WINDOW_TITLE};

/// Main application state
struct RestoDashApp {
    config: AppConfig,
    coordinator: DashboardCoordinator,
    filter_panel: FilterPanel,
    map: MapView,
    table: RestaurantTable,

    /// Source name of the dataset that failed to load, if any
    unavailable: Option<String>,
}

impl RestoDashApp {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, event_bus: Arc<EventBus>) -> Self {
        apply_theme(&cc.egui_ctx, &config.theme);

        let coordinator = DashboardCoordinator::new(config.viewport.clone(), event_bus);
        let map = MapView::new("Carte interactive".to_string(), config.map.clone());
        let table = RestaurantTable::new("Détails des résultats".to_string(), config.table.clone());

        let mut app = Self {
            config,
            coordinator,
            filter_panel: FilterPanel::new(),
            map,
            table,
            unavailable: None,
        };
        let dataset_config = app.config.dataset.clone();
        app.open_dataset(&dataset_config);
        app
    }

    fn open_dataset(&mut self, dataset_config: &DatasetConfig) {
        self.unavailable = install_dataset(&mut self.coordinator, dataset_config);
    }

    fn open_file(&mut self, path: PathBuf) {
        info!("Opening dataset: {:?}", path);
        let dataset_config = DatasetConfig {
            path,
            format: None,
            delimiter: None,
            ..self.config.dataset.clone()
        };
        self.open_dataset(&dataset_config);
        self.config.dataset = dataset_config;
    }

    /// Handle menu actions
    fn handle_menu(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Fichier", |ui| {
                    if ui.button("Ouvrir…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("GeoJSON", &["geojson", "json"])
                            .add_filter("CSV / TSV", &["csv", "tsv"])
                            .pick_file()
                        {
                            self.open_file(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Quitter").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Affichage", |ui| {
                    if ui.checkbox(&mut self.config.theme.dark_mode, "Thème sombre").changed() {
                        apply_theme(ctx, &self.config.theme);
                        ui.close_menu();
                    }
                    if ui.button("Effacer la sélection").clicked() {
                        self.coordinator.clear_selection();
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

/// Load a dataset into the coordinator, or switch it to the "no data" state
///
/// Returns the source name when loading failed.
fn install_dataset(coordinator: &mut DashboardCoordinator, dataset_config: &DatasetConfig) -> Option<String> {
    let source_name = dataset_config.file_name();
    match load_or_none(dataset_config) {
        Some(dataset) => {
            coordinator.set_dataset(Some(dataset));
            None
        }
        None => {
            let error = format!("could not load {}", dataset_config.path.display());
            coordinator.mark_unavailable(&source_name, &error);
            Some(source_name)
        }
    }
}

impl eframe::App for RestoDashApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_menu(ctx);

        if self.coordinator.has_data() {
            egui::TopBottomPanel::top("filters").show(ctx, |ui| {
                ui.add_space(4.0);
                self.filter_panel.ui(&mut self.coordinator, ui);
                ui.add_space(4.0);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.coordinator.has_data() {
                let source_name = self
                    .unavailable
                    .clone()
                    .unwrap_or_else(|| self.config.dataset.file_name());
                rd_ui::no_data_ui(ui, &source_name);
                return;
            }

            egui::ScrollArea::vertical()
                .id_source("dashboard_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.map.ui(&mut self.coordinator, ui);
                    ui.add_space(12.0);
                    self.table.ui(&mut self.coordinator, ui);
                });
        });
    }
}

/// Log coordinator events
///
/// Load failures are already logged by `load_or_none`.
fn subscribe_logging(bus: &EventBus) {
    bus.subscribe::<events::DatasetLoaded>(handler_from_fn(|event: &dyn Event| {
        if let Some(e) = event.as_any().downcast_ref::<events::DatasetLoaded>() {
            info!(
                "Dataset {} loaded: {} records, {} columns",
                e.source_name, e.record_count, e.column_count
            );
        }
    }));
    bus.subscribe::<events::FiltersChanged>(handler_from_fn(|event: &dyn Event| {
        if let Some(e) = event.as_any().downcast_ref::<events::FiltersChanged>() {
            info!("Filters applied, {} restaurants match", e.filtered_count);
        }
    }));
    bus.subscribe::<events::SelectionChanged>(handler_from_fn(|event: &dyn Event| {
        if let Some(e) = event.as_any().downcast_ref::<events::SelectionChanged>() {
            match &e.name {
                Some(name) => info!("Selected {}", name),
                None => info!("Selection cleared"),
            }
        }
    }));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV_VAR).ok());
    let config = AppConfig::load_or_default(&path);

    info!("Starting {}", WINDOW_TITLE);

    let event_bus = Arc::new(EventBus::new());
    subscribe_logging(&event_bus);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(WINDOW_TITLE),
        default_theme: if config.theme.dark_mode {
            eframe::Theme::Dark
        } else {
            eframe::Theme::Light
        },
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Box::new(RestoDashApp::new(cc, config, event_bus))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn coordinator_with_unavailable_log() -> (DashboardCoordinator, Arc<Mutex<Vec<String>>>) {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe::<events::DatasetUnavailable>(handler_from_fn(move |event: &dyn Event| {
            if let Some(e) = event.as_any().downcast_ref::<events::DatasetUnavailable>() {
                sink.lock().unwrap().push(e.source_name.clone());
            }
        }));
        (DashboardCoordinator::new(Default::default(), bus), seen)
    }

    #[test]
    fn test_missing_dataset_switches_to_no_data() {
        let (mut coordinator, seen) = coordinator_with_unavailable_log();
        let config = DatasetConfig::new(PathBuf::from("/nonexistent/restaurants.geojson"));

        assert_eq!(install_dataset(&mut coordinator, &config), Some("restaurants.geojson".to_string()));
        assert!(!coordinator.has_data());
        assert_eq!(*seen.lock().unwrap(), vec!["restaurants.geojson".to_string()]);
    }

    #[test]
    fn test_loaded_dataset_is_installed() {
        let (mut coordinator, seen) = coordinator_with_unavailable_log();
        let path = std::env::temp_dir().join(format!("restodash-app-{}.csv", std::process::id()));
        std::fs::write(&path, "name,lat,lon\nA,46.8,-71.2\n").unwrap();

        let unavailable = install_dataset(&mut coordinator, &DatasetConfig::new(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(unavailable, None);
        assert_eq!(coordinator.filtered_count(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }
}
