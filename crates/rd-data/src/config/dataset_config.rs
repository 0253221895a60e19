//! Where the dataset lives and how its columns are named

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::null_handling::NullConfig;

/// On-disk dataset format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetFormat {
    GeoJson,
    Csv,
}

/// Configuration for loading the restaurant dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the dataset file
    pub path: PathBuf,

    /// Explicit format, inferred from the extension when absent
    pub format: Option<DatasetFormat>,

    /// Missing-value handling
    pub null_config: NullConfig,

    pub name_column: String,
    pub quartier_column: String,
    pub cuisine_column: String,
    pub phone_column: String,
    pub website_column: String,
    pub hours_column: String,

    /// Latitude column (CSV only)
    pub latitude_column: String,

    /// Longitude column (CSV only)
    pub longitude_column: String,

    /// Field delimiter (CSV only), inferred from the extension when absent
    pub delimiter: Option<char>,

    /// Substring identifying the vegan column
    pub vegan_keyword: String,

    /// Substring identifying the vegetarian column
    pub vegetarian_keyword: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("restaurants.geojson"),
            format: None,
            null_config: NullConfig::default(),
            name_column: "name".to_string(),
            quartier_column: "quartier".to_string(),
            cuisine_column: "cuisine".to_string(),
            phone_column: "phone".to_string(),
            website_column: "website".to_string(),
            hours_column: "horaires".to_string(),
            latitude_column: "lat".to_string(),
            longitude_column: "lon".to_string(),
            delimiter: None,
            vegan_keyword: "vegan".to_string(),
            vegetarian_keyword: "vegetarian".to_string(),
        }
    }
}

impl DatasetConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Configured format, or one guessed from the file extension
    pub fn resolved_format(&self) -> DatasetFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self.extension().as_deref() {
            Some("csv") | Some("tsv") => DatasetFormat::Csv,
            _ => DatasetFormat::GeoJson,
        }
    }

    /// CSV field delimiter: the configured one if it is a single byte,
    /// otherwise tab for `.tsv` files and comma for everything else
    pub fn resolved_delimiter(&self) -> u8 {
        if let Some(delimiter) = self.delimiter.filter(char::is_ascii) {
            return delimiter as u8;
        }
        match self.extension().as_deref() {
            Some("tsv") => b'\t',
            _ => b',',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inference() {
        assert_eq!(DatasetConfig::new("a.geojson".into()).resolved_format(), DatasetFormat::GeoJson);
        assert_eq!(DatasetConfig::new("a.json".into()).resolved_format(), DatasetFormat::GeoJson);
        assert_eq!(DatasetConfig::new("a.CSV".into()).resolved_format(), DatasetFormat::Csv);

        let explicit = DatasetConfig {
            format: Some(DatasetFormat::Csv),
            ..DatasetConfig::new("a.txt".into())
        };
        assert_eq!(explicit.resolved_format(), DatasetFormat::Csv);
    }

    #[test]
    fn test_delimiter_inference() {
        assert_eq!(DatasetConfig::new("a.csv".into()).resolved_delimiter(), b',');
        assert_eq!(DatasetConfig::new("a.TSV".into()).resolved_delimiter(), b'\t');
        assert_eq!(DatasetConfig::new("a.tsv".into()).resolved_format(), DatasetFormat::Csv);

        let semicolon = DatasetConfig {
            delimiter: Some(';'),
            ..DatasetConfig::new("a.csv".into())
        };
        assert_eq!(semicolon.resolved_delimiter(), b';');

        let non_ascii = DatasetConfig {
            delimiter: Some('§'),
            ..DatasetConfig::new("a.tsv".into())
        };
        assert_eq!(non_ascii.resolved_delimiter(), b'\t');
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DatasetConfig = serde_json::from_str(r#"{"path": "data/quebec.geojson"}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("data/quebec.geojson"));
        assert_eq!(config.quartier_column, "quartier");
        assert_eq!(config.vegan_keyword, "vegan");
        assert!(config.null_config.is_null("nan"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(DatasetConfig::new("dir/restaurants.geojson".into()).file_name(), "restaurants.geojson");
    }
}
