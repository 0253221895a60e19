//! Filter criteria and the filtering pass over the dataset

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{Dataset, DatasetColumns, Restaurant};

/// Dietary values that count as a match, compared lowercased
const DIETARY_ACCEPTED: &[&str] = &["yes", "only"];

/// User-chosen constraints
///
/// An empty set or a `false` flag imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub neighborhoods: BTreeSet<String>,
    pub cuisines: BTreeSet<String>,
    pub vegan_only: bool,
    pub vegetarian_only: bool,
}

impl FilterCriteria {
    /// Check whether any constraint is active
    pub fn is_active(&self) -> bool {
        !self.neighborhoods.is_empty() || !self.cuisines.is_empty() || self.vegan_only || self.vegetarian_only
    }

    /// Check a single record against every active constraint
    pub fn matches(&self, record: &Restaurant, columns: &DatasetColumns) -> bool {
        if !self.neighborhoods.is_empty() && !Self::member(&self.neighborhoods, record.quartier.as_deref()) {
            return false;
        }

        if !self.cuisines.is_empty() && !Self::member(&self.cuisines, record.cuisine.as_deref()) {
            return false;
        }

        // No dietary column in the dataset means nothing can satisfy the flag
        if self.vegan_only && !(columns.vegan_column.is_some() && Self::dietary_match(record.vegan.as_deref())) {
            return false;
        }

        if self.vegetarian_only
            && !(columns.vegetarian_column.is_some() && Self::dietary_match(record.vegetarian.as_deref()))
        {
            return false;
        }

        true
    }

    fn member(set: &BTreeSet<String>, value: Option<&str>) -> bool {
        value.map(|v| set.contains(v)).unwrap_or(false)
    }

    fn dietary_match(value: Option<&str>) -> bool {
        value
            .map(|v| {
                let lowered = v.to_lowercase();
                DIETARY_ACCEPTED.contains(&lowered.as_str())
            })
            .unwrap_or(false)
    }
}

/// Indices of the records satisfying `criteria`, in dataset order
pub fn apply_filters(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record, &dataset.columns))
        .map(|(idx, _)| idx)
        .collect()
}

/// Record-level form of [`apply_filters`]
pub fn filter_records<'a, I>(records: I, columns: &DatasetColumns, criteria: &FilterCriteria) -> Vec<&'a Restaurant>
where
    I: IntoIterator<Item = &'a Restaurant>,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record, columns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(vegan: bool, vegetarian: bool) -> DatasetColumns {
        DatasetColumns {
            columns: Vec::new(),
            has_quartier: true,
            has_cuisine: true,
            vegan_column: vegan.then(|| "diet:vegan".to_string()),
            vegetarian_column: vegetarian.then(|| "diet:vegetarian".to_string()),
        }
    }

    fn sample_dataset() -> Dataset {
        let records = vec![
            Restaurant::new("A", 46.80, -71.21)
                .with_quartier("X")
                .with_cuisine("Pizza")
                .with_vegan("no")
                .with_vegetarian("yes"),
            Restaurant::new("B", 46.82, -71.23)
                .with_quartier("Y")
                .with_cuisine("Sushi")
                .with_vegan("yes")
                .with_vegetarian("ONLY"),
            Restaurant::new("C", 46.83, -71.25).with_cuisine("Pizza"),
            Restaurant::new("D", 46.84, -71.26)
                .with_quartier("X")
                .with_cuisine("Burger")
                .with_vegan("Only"),
        ];
        Dataset::new("test", records, columns(true, true))
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything_in_order() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria::default();
        assert!(!criteria.is_active());
        assert_eq!(apply_filters(&dataset, &criteria), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_neighborhood_filter_drops_missing_quartier() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            neighborhoods: set(&["X"]),
            ..Default::default()
        };
        assert_eq!(apply_filters(&dataset, &criteria), vec![0, 3]);
    }

    #[test]
    fn test_constraints_are_anded() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            neighborhoods: set(&["X", "Y"]),
            cuisines: set(&["Pizza", "Sushi"]),
            ..Default::default()
        };
        assert_eq!(apply_filters(&dataset, &criteria), vec![0, 1]);
    }

    #[test]
    fn test_cuisine_membership_is_exact() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            cuisines: set(&["pizza"]),
            ..Default::default()
        };
        assert!(apply_filters(&dataset, &criteria).is_empty());
    }

    #[test]
    fn test_vegan_flag_accepts_yes_and_only_case_insensitive() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            vegan_only: true,
            ..Default::default()
        };
        assert_eq!(apply_filters(&dataset, &criteria), vec![1, 3]);
    }

    #[test]
    fn test_vegetarian_flag() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            vegetarian_only: true,
            ..Default::default()
        };
        assert_eq!(apply_filters(&dataset, &criteria), vec![0, 1]);
    }

    #[test]
    fn test_dietary_flag_without_column_drops_all() {
        let mut dataset = sample_dataset();
        dataset.columns = columns(false, true);
        let criteria = FilterCriteria {
            vegan_only: true,
            ..Default::default()
        };
        assert!(apply_filters(&dataset, &criteria).is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            neighborhoods: set(&["X"]),
            vegan_only: true,
            ..Default::default()
        };
        let once = filter_records(&dataset.records, &dataset.columns, &criteria);
        let twice = filter_records(once.iter().copied(), &dataset.columns, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_false_positives() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            neighborhoods: set(&["X"]),
            cuisines: set(&["Burger"]),
            vegan_only: true,
            vegetarian_only: false,
        };
        for record in filter_records(&dataset.records, &dataset.columns, &criteria) {
            assert_eq!(record.quartier.as_deref(), Some("X"));
            assert_eq!(record.cuisine.as_deref(), Some("Burger"));
            let vegan = record.vegan.as_deref().unwrap_or_default().to_lowercase();
            assert!(vegan == "yes" || vegan == "only");
        }
    }
}
