//! Dataset loading for the restaurant dashboard

pub mod config;
pub mod projection;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;
use tracing::{error, info};

use rd_core::Dataset;

// Re-exports
pub use config::{DatasetConfig, DatasetFormat, NullConfig};
pub use projection::{table_batch, TABLE_COLUMNS};
pub use schema::{ColumnResolver, DatasetBuilder};
pub use sources::{CsvSource, DatasetSource, GeoJsonSource};

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

/// Pick the source matching the configured (or inferred) format
pub fn source_for(config: &DatasetConfig) -> Box<dyn DatasetSource> {
    match config.resolved_format() {
        DatasetFormat::GeoJson => Box::new(GeoJsonSource::new(config.clone())),
        DatasetFormat::Csv => Box::new(CsvSource::new(config.clone())),
    }
}

/// Load the configured dataset
pub fn load_dataset(config: &DatasetConfig) -> Result<Dataset, DataError> {
    let source = source_for(config);
    info!("Loading dataset from {}", source.source_name());
    let dataset = source.load()?;
    info!(
        "Loaded {} restaurants with {} columns from {}",
        dataset.len(),
        dataset.columns.columns.len(),
        dataset.source_name
    );
    Ok(dataset)
}

/// Load the configured dataset, logging failures instead of returning them
///
/// A `None` result is the dashboard's "no data" state.
pub fn load_or_none(config: &DatasetConfig) -> Option<Dataset> {
    match load_dataset(config) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            error!("Dataset {} unavailable: {}", config.path.display(), e);
            None
        }
    }
}
