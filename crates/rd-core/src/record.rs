//! Restaurant records and the immutable dataset they live in

use geo_types::Point;
use indexmap::IndexMap;

/// Name shown for records whose source has no name
pub const UNNAMED_RESTAURANT: &str = "Sans nom";

/// A single restaurant entry
///
/// Optional attributes are already normalized: a sentinel such as `"nan"`
/// in the source arrives here as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,

    /// Point location, x = longitude, y = latitude
    pub location: Point<f64>,

    pub cuisine: Option<String>,
    pub quartier: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,

    /// Opening hours as a comma-delimited list
    pub horaires: Option<String>,

    /// Raw value of the resolved vegan column
    pub vegan: Option<String>,

    /// Raw value of the resolved vegetarian column
    pub vegetarian: Option<String>,

    /// Remaining attributes in source column order
    pub properties: IndexMap<String, String>,
}

impl Restaurant {
    /// Create a record with only a name and a location
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            location: Point::new(longitude, latitude),
            cuisine: None,
            quartier: None,
            phone: None,
            website: None,
            horaires: None,
            vegan: None,
            vegetarian: None,
            properties: IndexMap::new(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Opening hours split into one entry per comma-delimited item
    ///
    /// Entries are kept verbatim, surrounding spaces included.
    pub fn hours_lines(&self) -> Vec<&str> {
        self.horaires
            .as_deref()
            .map(|hours| hours.split(',').collect())
            .unwrap_or_default()
    }

    /// Opening hours with one entry per line, empty when unknown
    pub fn hours_multiline(&self) -> String {
        self.hours_lines().join("\n")
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_quartier(mut self, quartier: impl Into<String>) -> Self {
        self.quartier = Some(quartier.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_horaires(mut self, horaires: impl Into<String>) -> Self {
        self.horaires = Some(horaires.into());
        self
    }

    pub fn with_vegan(mut self, value: impl Into<String>) -> Self {
        self.vegan = Some(value.into());
        self
    }

    pub fn with_vegetarian(mut self, value: impl Into<String>) -> Self {
        self.vegetarian = Some(value.into());
        self
    }
}

/// Which logical columns the loaded dataset actually provides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetColumns {
    /// Every attribute column, in first-seen order
    pub columns: Vec<String>,

    pub has_quartier: bool,
    pub has_cuisine: bool,

    /// Physical column consulted for the vegan flag
    pub vegan_column: Option<String>,

    /// Physical column consulted for the vegetarian flag
    pub vegetarian_column: Option<String>,
}

/// The full, immutable record set
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub source_name: String,
    pub records: Vec<Restaurant>,
    pub columns: DatasetColumns,
}

impl Dataset {
    pub fn new(source_name: impl Into<String>, records: Vec<Restaurant>, columns: DatasetColumns) -> Self {
        Self {
            source_name: source_name.into(),
            records,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct neighborhoods, empty when the column is missing
    pub fn neighborhoods(&self) -> Vec<String> {
        if !self.columns.has_quartier {
            return Vec::new();
        }
        Self::distinct(self.records.iter().filter_map(|r| r.quartier.as_deref()))
    }

    /// Sorted distinct cuisines, empty when the column is missing
    pub fn cuisines(&self) -> Vec<String> {
        if !self.columns.has_cuisine {
            return Vec::new();
        }
        Self::distinct(self.records.iter().filter_map(|r| r.cuisine.as_deref()))
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        values
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_axes() {
        let record = Restaurant::new("Chez Paul", 46.81, -71.22);
        assert_eq!(record.latitude(), 46.81);
        assert_eq!(record.longitude(), -71.22);
    }

    #[test]
    fn test_hours_split_verbatim() {
        let record = Restaurant::new("A", 0.0, 0.0).with_horaires("Mo-Fr 11:00-22:00, Sa 12:00-23:00");
        assert_eq!(record.hours_lines(), vec!["Mo-Fr 11:00-22:00", " Sa 12:00-23:00"]);
        assert_eq!(record.hours_multiline(), "Mo-Fr 11:00-22:00\n Sa 12:00-23:00");
    }

    #[test]
    fn test_hours_missing() {
        let record = Restaurant::new("A", 0.0, 0.0);
        assert!(record.hours_lines().is_empty());
        assert_eq!(record.hours_multiline(), "");
    }

    #[test]
    fn test_distinct_options_sorted_and_skip_missing() {
        let records = vec![
            Restaurant::new("A", 0.0, 0.0).with_quartier("Vieux-Québec").with_cuisine("Pizza"),
            Restaurant::new("B", 0.0, 0.0).with_quartier("Limoilou"),
            Restaurant::new("C", 0.0, 0.0).with_quartier("Limoilou").with_cuisine("Burger"),
        ];
        let columns = DatasetColumns {
            has_quartier: true,
            has_cuisine: true,
            ..Default::default()
        };
        let dataset = Dataset::new("test", records, columns);

        assert_eq!(dataset.neighborhoods(), vec!["Limoilou", "Vieux-Québec"]);
        assert_eq!(dataset.cuisines(), vec!["Burger", "Pizza"]);
    }

    #[test]
    fn test_options_empty_without_column() {
        let records = vec![Restaurant::new("A", 0.0, 0.0).with_quartier("Limoilou")];
        let dataset = Dataset::new("test", records, DatasetColumns::default());
        assert!(dataset.neighborhoods().is_empty());
        assert!(dataset.cuisines().is_empty());
    }
}
