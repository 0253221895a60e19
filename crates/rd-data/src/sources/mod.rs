pub mod csv_source;
pub mod geojson_source;

pub use csv_source::CsvSource;
pub use geojson_source::GeoJsonSource;

use rd_core::Dataset;

use crate::DataError;

/// Trait for dataset sources
pub trait DatasetSource {
    /// Get the source name (file name)
    fn source_name(&self) -> &str;

    /// Read the whole dataset
    fn load(&self) -> Result<Dataset, DataError>;
}
