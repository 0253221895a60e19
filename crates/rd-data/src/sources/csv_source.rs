use std::fs::File;
use std::io::{BufReader, Read};

use csv::ReaderBuilder;
use indexmap::IndexMap;

use rd_core::Dataset;

use super::DatasetSource;
use crate::config::DatasetConfig;
use crate::schema::DatasetBuilder;
use crate::DataError;

/// CSV source with one latitude and one longitude column
pub struct CsvSource {
    config: DatasetConfig,
    source_name: String,
}

impl CsvSource {
    pub fn new(config: DatasetConfig) -> Self {
        let source_name = config.file_name();
        Self { config, source_name }
    }

    /// Read delimited text from any reader into a dataset
    pub fn read<R: Read>(reader: R, source_name: &str, config: &DatasetConfig) -> Result<Dataset, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(config.resolved_delimiter())
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
        let lat_idx = Self::find_column(&headers, &config.latitude_column)?;
        let lon_idx = Self::find_column(&headers, &config.longitude_column)?;

        let mut builder = DatasetBuilder::new(source_name, config);
        for (idx, header) in headers.iter().enumerate() {
            if idx != lat_idx && idx != lon_idx {
                builder.declare_column(header);
            }
        }

        for result in csv_reader.records() {
            let record = result?;

            let coordinates = (
                record.get(lat_idx).and_then(|v| v.trim().parse::<f64>().ok()),
                record.get(lon_idx).and_then(|v| v.trim().parse::<f64>().ok()),
            );
            let (latitude, longitude) = match coordinates {
                (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
                _ => {
                    builder.skip_row("unparsable coordinates");
                    continue;
                }
            };

            let values: IndexMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != lat_idx && *idx != lon_idx)
                .map(|(_, (header, value))| (header.clone(), value.to_string()))
                .collect();

            builder.push_row(latitude, longitude, values);
        }

        Ok(builder.build())
    }

    fn find_column(headers: &[String], name: &str) -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }
}

impl DatasetSource for CsvSource {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn load(&self) -> Result<Dataset, DataError> {
        let file = File::open(&self.config.path)?;
        Self::read(BufReader::new(file), &self.source_name, &self.config)
    }
}
