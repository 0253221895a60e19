//! Filter controls for the dashboard

use std::collections::BTreeSet;

use egui::Ui;
use tracing::debug;

use rd_core::{DashboardCoordinator, FilterCriteria};

pub const NEIGHBORHOOD_PLACEHOLDER: &str = "Tous les quartiers";
pub const CUISINE_PLACEHOLDER: &str = "Toutes les cuisines";

/// Text shown on a multiselect button
pub fn selection_summary(selected: &BTreeSet<String>, placeholder: &str) -> String {
    match selected.len() {
        0 => placeholder.to_string(),
        1 => selected.iter().next().cloned().unwrap_or_default(),
        n => format!("{} sélectionnés", n),
    }
}

/// Add or remove `value` from a multiselect set
pub fn toggle(selected: &mut BTreeSet<String>, value: &str, checked: bool) {
    if checked {
        selected.insert(value.to_string());
    } else {
        selected.remove(value);
    }
}

/// Which controls the loaded dataset supports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub neighborhoods: Vec<String>,
    pub cuisines: Vec<String>,
    pub vegan: bool,
    pub vegetarian: bool,
}

impl FilterOptions {
    pub fn from_coordinator(coordinator: &DashboardCoordinator) -> Self {
        Self {
            neighborhoods: coordinator.neighborhood_options(),
            cuisines: coordinator.cuisine_options(),
            vegan: coordinator.has_vegan_column(),
            vegetarian: coordinator.has_vegetarian_column(),
        }
    }
}

/// Neighborhood/cuisine multiselects and dietary checkboxes
///
/// Controls whose column is missing from the dataset are not shown.
#[derive(Default)]
pub struct FilterPanel;

impl FilterPanel {
    pub fn new() -> Self {
        Self
    }

    /// Draw the controls and push changed criteria to the coordinator
    pub fn ui(&mut self, coordinator: &mut DashboardCoordinator, ui: &mut Ui) {
        let options = FilterOptions::from_coordinator(coordinator);
        if let Some(criteria) = self.controls_ui(ui, &options, coordinator.criteria()) {
            debug!("Filter criteria changed: {:?}", criteria);
            coordinator.set_criteria(criteria);
        }
    }

    /// Returns the new criteria snapshot when a control changed
    fn controls_ui(&mut self, ui: &mut Ui, options: &FilterOptions, current: &FilterCriteria) -> Option<FilterCriteria> {
        let mut criteria = current.clone();
        let mut changed = false;

        ui.horizontal_wrapped(|ui| {
            if !options.neighborhoods.is_empty() {
                ui.label("Quartier");
                changed |= multiselect(ui, &options.neighborhoods, &mut criteria.neighborhoods, NEIGHBORHOOD_PLACEHOLDER);
                ui.separator();
            }

            if !options.cuisines.is_empty() {
                ui.label("Cuisine");
                changed |= multiselect(ui, &options.cuisines, &mut criteria.cuisines, CUISINE_PLACEHOLDER);
                ui.separator();
            }

            if options.vegan {
                changed |= ui.checkbox(&mut criteria.vegan_only, "Végan").changed();
            }
            if options.vegetarian {
                changed |= ui.checkbox(&mut criteria.vegetarian_only, "Végétarien").changed();
            }

            if criteria.is_active() && ui.small_button("Réinitialiser").clicked() {
                criteria = FilterCriteria::default();
                changed = true;
            }
        });

        (changed && criteria != *current).then_some(criteria)
    }
}

/// Menu of checkboxes, returns whether the set changed
fn multiselect(ui: &mut Ui, options: &[String], selected: &mut BTreeSet<String>, placeholder: &str) -> bool {
    let mut changed = false;
    ui.menu_button(selection_summary(selected, placeholder), |ui| {
        egui::ScrollArea::vertical()
            .id_source(placeholder)
            .max_height(300.0)
            .show(ui, |ui| {
                for option in options {
                    let mut checked = selected.contains(option);
                    if ui.checkbox(&mut checked, option.as_str()).changed() {
                        toggle(selected, option, checked);
                        changed = true;
                    }
                }
            });
        if !selected.is_empty() && ui.button("Effacer").clicked() {
            selected.clear();
            changed = true;
            ui.close_menu();
        }
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_summary() {
        let mut selected = BTreeSet::new();
        assert_eq!(selection_summary(&selected, CUISINE_PLACEHOLDER), "Toutes les cuisines");

        selected.insert("Saint-Roch".to_string());
        assert_eq!(selection_summary(&selected, NEIGHBORHOOD_PLACEHOLDER), "Saint-Roch");

        selected.insert("Limoilou".to_string());
        assert_eq!(selection_summary(&selected, NEIGHBORHOOD_PLACEHOLDER), "2 sélectionnés");
    }

    #[test]
    fn test_toggle() {
        let mut selected = BTreeSet::new();
        toggle(&mut selected, "pizza", true);
        toggle(&mut selected, "sushi", true);
        toggle(&mut selected, "pizza", false);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec!["sushi".to_string()]);
    }

    #[test]
    fn test_options_without_data() {
        let coordinator = DashboardCoordinator::new(Default::default(), Default::default());
        assert_eq!(FilterOptions::from_coordinator(&coordinator), FilterOptions::default());
    }
}
