//! Column resolution and record normalization
//!
//! Sources hand raw rows to [`DatasetBuilder`], which resolves the logical
//! columns once and turns every row into a normalized [`Restaurant`].

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use rd_core::record::UNNAMED_RESTAURANT;
use rd_core::{Dataset, DatasetColumns, Restaurant};

use crate::config::DatasetConfig;

/// Maps logical attributes to the physical columns of a dataset
pub struct ColumnResolver<'a> {
    config: &'a DatasetConfig,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(config: &'a DatasetConfig) -> Self {
        Self { config }
    }

    /// Resolve the columns present in a dataset
    ///
    /// Dietary columns are the first, in column order, whose name contains
    /// the configured keyword, ignoring case.
    pub fn resolve(&self, columns: &[String]) -> DatasetColumns {
        let resolved = DatasetColumns {
            columns: columns.to_vec(),
            has_quartier: columns.iter().any(|c| *c == self.config.quartier_column),
            has_cuisine: columns.iter().any(|c| *c == self.config.cuisine_column),
            vegan_column: Self::first_containing(columns, &self.config.vegan_keyword),
            vegetarian_column: Self::first_containing(columns, &self.config.vegetarian_keyword),
        };
        debug!(
            "Resolved columns: quartier={}, cuisine={}, vegan={:?}, vegetarian={:?}",
            resolved.has_quartier, resolved.has_cuisine, resolved.vegan_column, resolved.vegetarian_column
        );
        resolved
    }

    fn first_containing(columns: &[String], keyword: &str) -> Option<String> {
        if keyword.is_empty() {
            return None;
        }
        let keyword = keyword.to_lowercase();
        columns.iter().find(|c| c.to_lowercase().contains(&keyword)).cloned()
    }
}

/// One raw row as read by a source
struct RawRow {
    latitude: f64,
    longitude: f64,
    values: IndexMap<String, String>,
}

/// Accumulates raw rows and builds the final dataset
pub struct DatasetBuilder<'a> {
    config: &'a DatasetConfig,
    source_name: String,
    columns: IndexSet<String>,
    rows: Vec<RawRow>,
    skipped: usize,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(source_name: impl Into<String>, config: &'a DatasetConfig) -> Self {
        Self {
            config,
            source_name: source_name.into(),
            columns: IndexSet::new(),
            rows: Vec::new(),
            skipped: 0,
        }
    }

    /// Register a column even if no row carries a value for it
    pub fn declare_column(&mut self, column: &str) {
        if !self.columns.contains(column) {
            self.columns.insert(column.to_string());
        }
    }

    /// Add a row located at `(latitude, longitude)`
    pub fn push_row(&mut self, latitude: f64, longitude: f64, values: IndexMap<String, String>) {
        for column in values.keys() {
            self.declare_column(column);
        }
        self.rows.push(RawRow {
            latitude,
            longitude,
            values,
        });
    }

    /// Count a row that could not be used
    pub fn skip_row(&mut self, reason: &str) {
        self.skipped += 1;
        warn!("Skipping record {} of {}: {}", self.rows.len() + self.skipped, self.source_name, reason);
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(self) -> Dataset {
        let columns: Vec<String> = self.columns.into_iter().collect();
        let resolved = ColumnResolver::new(self.config).resolve(&columns);

        if self.skipped > 0 {
            warn!("{} records of {} were skipped", self.skipped, self.source_name);
        }

        let config = self.config;
        let records = self
            .rows
            .into_iter()
            .map(|row| Self::normalize(row, config, &resolved))
            .collect();

        Dataset::new(self.source_name, records, resolved)
    }

    fn normalize(row: RawRow, config: &DatasetConfig, columns: &DatasetColumns) -> Restaurant {
        let nulls = &config.null_config;
        let mut values: IndexMap<String, String> = row
            .values
            .into_iter()
            .filter_map(|(column, value)| nulls.normalize(&value).map(|value| (column, value)))
            .collect();

        let name = values
            .shift_remove(&config.name_column)
            .unwrap_or_else(|| UNNAMED_RESTAURANT.to_string());

        let mut record = Restaurant::new(name, row.latitude, row.longitude);
        record.quartier = values.shift_remove(&config.quartier_column);
        record.cuisine = values.shift_remove(&config.cuisine_column);
        record.phone = values.shift_remove(&config.phone_column);
        record.website = values.shift_remove(&config.website_column);
        record.horaires = values.shift_remove(&config.hours_column);
        record.vegan = columns.vegan_column.as_ref().and_then(|c| values.get(c).cloned());
        record.vegetarian = columns.vegetarian_column.as_ref().and_then(|c| values.get(c).cloned());
        record.properties = values;
        record
    }
}
