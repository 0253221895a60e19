//! Selection-and-filter coordinator
//!
//! Owns the loaded dataset, the current filter criteria and the current
//! selection, and derives everything the table and the map draw from them.
//! Every mutation recomputes the derived state in full.

use std::sync::Arc;

use tracing::{debug, info};

use crate::events::{events, EventBus};
use crate::filter::{apply_filters, FilterCriteria};
use crate::marker::MarkerDescriptor;
use crate::record::{Dataset, Restaurant};
use crate::selection::Selection;
use crate::viewport::{resolve_viewport, MapViewport, ViewportSettings};

/// Derived state for one interaction
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Indices into the dataset, in dataset order
    pub filtered: Vec<usize>,
    pub viewport: MapViewport,
    /// One marker per filtered record, same order as `filtered`
    pub markers: Vec<MarkerDescriptor>,
}

/// Table projection of one filtered record
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Index of the record in the full dataset
    pub row: usize,
    pub name: String,
    pub cuisine: String,
    pub phone: String,
    /// Opening hours, one entry per line
    pub horaires: String,
    pub quartier: String,
    pub lat: f64,
    pub lon: f64,
}

impl TableRow {
    fn from_record(row: usize, record: &Restaurant) -> Self {
        Self {
            row,
            name: record.name.clone(),
            cuisine: record.cuisine.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            horaires: record.hours_multiline(),
            quartier: record.quartier.clone().unwrap_or_default(),
            lat: record.latitude(),
            lon: record.longitude(),
        }
    }
}

pub struct DashboardCoordinator {
    dataset: Option<Arc<Dataset>>,
    criteria: FilterCriteria,
    selection: Option<Selection>,
    settings: ViewportSettings,
    event_bus: Arc<EventBus>,
    snapshot: DashboardSnapshot,
}

impl DashboardCoordinator {
    /// Create a coordinator in the "no data" state
    pub fn new(settings: ViewportSettings, event_bus: Arc<EventBus>) -> Self {
        let snapshot = DashboardSnapshot {
            filtered: Vec::new(),
            viewport: resolve_viewport(&[], None, &settings),
            markers: Vec::new(),
        };
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            selection: None,
            settings,
            event_bus,
            snapshot,
        }
    }

    pub fn with_dataset(mut self, dataset: Option<Arc<Dataset>>) -> Self {
        self.install(dataset);
        self
    }

    /// Replace the dataset, clearing criteria and selection
    ///
    /// `None` puts the dashboard in the "no data" state.
    pub fn set_dataset(&mut self, dataset: Option<Dataset>) {
        self.install(dataset.map(Arc::new));
    }

    fn install(&mut self, dataset: Option<Arc<Dataset>>) {
        if let Some(dataset) = &dataset {
            info!(
                "Installing dataset '{}' with {} records",
                dataset.source_name,
                dataset.len()
            );
            self.event_bus.publish(events::DatasetLoaded {
                source_name: dataset.source_name.clone(),
                record_count: dataset.len(),
                column_count: dataset.columns.columns.len(),
            });
        }
        self.dataset = dataset;
        self.criteria = FilterCriteria::default();
        self.selection = None;
        self.recompute();
    }

    /// Record that loading failed, leaving the dashboard without data
    pub fn mark_unavailable(&mut self, source_name: &str, error: &str) {
        self.event_bus.publish(events::DatasetUnavailable {
            source_name: source_name.to_string(),
            error: error.to_string(),
        });
        self.install(None);
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn viewport(&self) -> MapViewport {
        self.snapshot.viewport
    }

    /// Replace the filter criteria
    ///
    /// The selection is kept, so the map may stay centered on a record the
    /// new criteria exclude.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.criteria = criteria;
        self.recompute();
        self.event_bus.publish(events::FiltersChanged {
            filtered_count: self.snapshot.filtered.len(),
        });
    }

    /// Select the `row`-th filtered record, or clear with `None`
    ///
    /// A row outside the filtered set clears the selection.
    pub fn select_row(&mut self, row: Option<usize>) {
        let selection = row.and_then(|row| {
            let dataset = self.dataset.as_ref()?;
            let index = *self.snapshot.filtered.get(row)?;
            Some(Selection::from_record(index, &dataset.records[index]))
        });

        if selection == self.selection {
            return;
        }
        self.selection = selection;
        self.recompute();
        self.event_bus.publish(events::SelectionChanged {
            name: self.selection.as_ref().map(|s| s.name.clone()),
        });
    }

    pub fn clear_selection(&mut self) {
        self.select_row(None);
    }

    /// Position of the selected record within the filtered set
    pub fn selected_filtered_row(&self) -> Option<usize> {
        let selection = self.selection.as_ref()?;
        self.snapshot.filtered.iter().position(|&idx| idx == selection.row)
    }

    pub fn filtered_records(&self) -> Vec<&Restaurant> {
        match &self.dataset {
            Some(dataset) => self.snapshot.filtered.iter().map(|&idx| &dataset.records[idx]).collect(),
            None => Vec::new(),
        }
    }

    pub fn filtered_count(&self) -> usize {
        self.snapshot.filtered.len()
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        match &self.dataset {
            Some(dataset) => self
                .snapshot
                .filtered
                .iter()
                .map(|&idx| TableRow::from_record(idx, &dataset.records[idx]))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn neighborhood_options(&self) -> Vec<String> {
        self.dataset.as_ref().map(|d| d.neighborhoods()).unwrap_or_default()
    }

    pub fn cuisine_options(&self) -> Vec<String> {
        self.dataset.as_ref().map(|d| d.cuisines()).unwrap_or_default()
    }

    pub fn has_vegan_column(&self) -> bool {
        self.dataset
            .as_ref()
            .map(|d| d.columns.vegan_column.is_some())
            .unwrap_or(false)
    }

    pub fn has_vegetarian_column(&self) -> bool {
        self.dataset
            .as_ref()
            .map(|d| d.columns.vegetarian_column.is_some())
            .unwrap_or(false)
    }

    fn recompute(&mut self) {
        let selection = self.selection.as_ref();

        let (filtered, markers) = match &self.dataset {
            Some(dataset) => {
                let filtered = apply_filters(dataset, &self.criteria);
                let markers = filtered
                    .iter()
                    .map(|&idx| MarkerDescriptor::new(idx, &dataset.records[idx], selection))
                    .collect();
                (filtered, markers)
            }
            None => (Vec::new(), Vec::new()),
        };

        let viewport = {
            let records: Vec<&Restaurant> = match &self.dataset {
                Some(dataset) => filtered.iter().map(|&idx| &dataset.records[idx]).collect(),
                None => Vec::new(),
            };
            resolve_viewport(&records, selection, &self.settings)
        };

        debug!(
            "Recomputed dashboard: {} filtered, zoom {}, selection {:?}",
            filtered.len(),
            viewport.zoom,
            selection.map(|s| s.name.as_str())
        );

        self.snapshot = DashboardSnapshot {
            filtered,
            viewport,
            markers,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ColorCategory;
    use crate::record::DatasetColumns;
    use crate::viewport::{CITY_ZOOM, CLOSE_UP_ZOOM};

    fn scenario_dataset() -> Dataset {
        let records = vec![
            Restaurant::new("A", 46.80, -71.20)
                .with_quartier("X")
                .with_cuisine("Pizza")
                .with_vegan("no"),
            Restaurant::new("B", 46.85, -71.25)
                .with_quartier("Y")
                .with_cuisine("Sushi")
                .with_vegan("yes"),
        ];
        let columns = DatasetColumns {
            columns: vec!["quartier".into(), "cuisine".into(), "diet:vegan".into()],
            has_quartier: true,
            has_cuisine: true,
            vegan_column: Some("diet:vegan".into()),
            vegetarian_column: None,
        };
        Dataset::new("scenario", records, columns)
    }

    fn coordinator() -> DashboardCoordinator {
        DashboardCoordinator::new(ViewportSettings::default(), Arc::new(EventBus::new()))
    }

    fn only_x() -> FilterCriteria {
        FilterCriteria {
            neighborhoods: ["X".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_data_is_safe() {
        let mut coordinator = coordinator();
        assert!(!coordinator.has_data());
        assert!(coordinator.filtered_records().is_empty());
        assert!(coordinator.table_rows().is_empty());
        assert!(coordinator.snapshot().markers.is_empty());
        assert!(coordinator.neighborhood_options().is_empty());

        coordinator.set_criteria(only_x());
        coordinator.select_row(Some(0));
        assert!(coordinator.selection().is_none());

        let viewport = coordinator.viewport();
        assert_eq!(viewport.latitude(), 46.81);
        assert_eq!(viewport.longitude(), -71.22);
        assert_eq!(viewport.zoom, CITY_ZOOM);
    }

    #[test]
    fn test_end_to_end_selection_outside_filter() {
        let mut coordinator = coordinator();
        coordinator.set_dataset(Some(scenario_dataset()));

        coordinator.set_criteria(only_x());
        let names: Vec<_> = coordinator.filtered_records().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["A"]);
        assert_eq!(coordinator.viewport().center, coordinator.filtered_records()[0].location);
        assert_eq!(coordinator.viewport().zoom, CITY_ZOOM);

        // Select B with every record visible, then restrict to X again.
        coordinator.set_criteria(FilterCriteria::default());
        coordinator.select_row(Some(1));
        coordinator.set_criteria(only_x());

        let names: Vec<_> = coordinator.table_rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A"]);
        let viewport = coordinator.viewport();
        assert_eq!(viewport.latitude(), 46.85);
        assert_eq!(viewport.longitude(), -71.25);
        assert_eq!(viewport.zoom, CLOSE_UP_ZOOM);
        assert_eq!(coordinator.selected_filtered_row(), None);
    }

    #[test]
    fn test_selection_highlights_marker() {
        let mut coordinator = coordinator();
        coordinator.set_dataset(Some(scenario_dataset()));
        coordinator.select_row(Some(1));

        let markers = &coordinator.snapshot().markers;
        assert_eq!(markers.len(), 2);
        assert!(!markers[0].state.highlighted);
        assert_eq!(markers[0].state.icon_category(), ColorCategory::DarkBlue);
        assert!(markers[1].state.highlighted);
        assert_eq!(markers[1].state.icon_category(), ColorCategory::ALERT);
        assert_eq!(coordinator.selected_filtered_row(), Some(1));
    }

    #[test]
    fn test_select_row_indexes_filtered_set() {
        let mut coordinator = coordinator();
        coordinator.set_dataset(Some(scenario_dataset()));
        coordinator.set_criteria(FilterCriteria {
            vegan_only: true,
            ..Default::default()
        });
        coordinator.select_row(Some(0));
        let selection = coordinator.selection().cloned();
        assert_eq!(selection.map(|s| (s.row, s.name)), Some((1, "B".to_string())));

        coordinator.select_row(Some(5));
        assert!(coordinator.selection().is_none());
    }

    #[test]
    fn test_new_dataset_resets_state() {
        let mut coordinator = coordinator();
        coordinator.set_dataset(Some(scenario_dataset()));
        coordinator.set_criteria(only_x());
        coordinator.select_row(Some(0));

        coordinator.set_dataset(Some(scenario_dataset()));
        assert_eq!(coordinator.criteria(), &FilterCriteria::default());
        assert!(coordinator.selection().is_none());
        assert_eq!(coordinator.filtered_count(), 2);

        coordinator.mark_unavailable("missing.geojson", "not found");
        assert!(!coordinator.has_data());
        assert_eq!(coordinator.filtered_count(), 0);
    }

    #[test]
    fn test_table_rows_projection() {
        let mut dataset = scenario_dataset();
        dataset.records[0].horaires = Some("Mo 11:00-14:00,Tu 11:00-14:00".into());
        let mut coordinator = coordinator();
        coordinator.set_dataset(Some(dataset));

        let rows = coordinator.table_rows();
        assert_eq!(rows[0].horaires, "Mo 11:00-14:00\nTu 11:00-14:00");
        assert_eq!(rows[0].phone, "");
        assert_eq!(rows[1].quartier, "Y");
        assert_eq!(rows[1].lat, 46.85);
        assert_eq!(rows[1].lon, -71.25);
    }

    #[test]
    fn test_dietary_columns_reported() {
        let coordinator = coordinator().with_dataset(Some(Arc::new(scenario_dataset())));
        assert!(coordinator.has_vegan_column());
        assert!(!coordinator.has_vegetarian_column());
        assert_eq!(coordinator.neighborhood_options(), vec!["X", "Y"]);
        assert_eq!(coordinator.cuisine_options(), vec!["Pizza", "Sushi"]);
    }

    #[test]
    fn test_events_published() {
        use crate::events::handler_from_fn;
        use parking_lot::Mutex;

        let bus = Arc::new(EventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        bus.subscribe::<events::SelectionChanged>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<events::SelectionChanged>() {
                sink.lock().push(e.name.clone());
            }
        }));

        let mut coordinator = DashboardCoordinator::new(ViewportSettings::default(), bus);
        coordinator.set_dataset(Some(scenario_dataset()));
        coordinator.select_row(Some(0));
        coordinator.select_row(Some(0));
        coordinator.clear_selection();

        assert_eq!(*log.lock(), vec![Some("A".to_string()), None]);
    }
}
