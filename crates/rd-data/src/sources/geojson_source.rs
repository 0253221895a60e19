use geojson::{Feature, GeoJson};
use indexmap::IndexMap;
use serde_json::Value;

use rd_core::Dataset;

use super::DatasetSource;
use crate::config::DatasetConfig;
use crate::schema::DatasetBuilder;
use crate::DataError;

/// GeoJSON source: a FeatureCollection of Point features
///
/// Feature properties become the dataset columns.
pub struct GeoJsonSource {
    config: DatasetConfig,
    source_name: String,
}

impl GeoJsonSource {
    pub fn new(config: DatasetConfig) -> Self {
        let source_name = config.file_name();
        Self { config, source_name }
    }

    /// Parse GeoJSON text into a dataset
    pub fn parse(text: &str, source_name: &str, config: &DatasetConfig) -> Result<Dataset, DataError> {
        let features = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(DataError::InvalidGeometry(
                    "expected a FeatureCollection, found a bare geometry".to_string(),
                ))
            }
        };

        let mut builder = DatasetBuilder::new(source_name, config);
        for feature in &features {
            match Self::point_of(feature) {
                Ok((latitude, longitude)) => builder.push_row(latitude, longitude, Self::properties_of(feature)),
                Err(reason) => builder.skip_row(&reason),
            }
        }
        Ok(builder.build())
    }

    /// (latitude, longitude) of a Point feature
    fn point_of(feature: &Feature) -> Result<(f64, f64), String> {
        let geometry = feature.geometry.as_ref().ok_or_else(|| "feature has no geometry".to_string())?;
        match &geometry.value {
            geojson::Value::Point(position) if position.len() >= 2 => Ok((position[1], position[0])),
            geojson::Value::Point(_) => Err("point has fewer than two coordinates".to_string()),
            other => Err(format!("expected a Point geometry, found {}", Self::geometry_kind(other))),
        }
    }

    fn geometry_kind(value: &geojson::Value) -> &'static str {
        match value {
            geojson::Value::Point(_) => "Point",
            geojson::Value::MultiPoint(_) => "MultiPoint",
            geojson::Value::LineString(_) => "LineString",
            geojson::Value::MultiLineString(_) => "MultiLineString",
            geojson::Value::Polygon(_) => "Polygon",
            geojson::Value::MultiPolygon(_) => "MultiPolygon",
            geojson::Value::GeometryCollection(_) => "GeometryCollection",
        }
    }

    fn properties_of(feature: &Feature) -> IndexMap<String, String> {
        let Some(properties) = &feature.properties else {
            return IndexMap::new();
        };
        properties
            .iter()
            .filter_map(|(key, value)| Self::value_to_string(value).map(|v| (key.clone(), v)))
            .collect()
    }

    /// Property value as text, `None` for JSON null
    ///
    /// Arrays of scalars are joined with commas, the same shape as a
    /// comma-delimited string column.
    fn value_to_string(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Self::value_to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Object(_) => Some(value.to_string()),
        }
    }
}

impl DatasetSource for GeoJsonSource {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn load(&self) -> Result<Dataset, DataError> {
        let text = std::fs::read_to_string(&self.config.path)?;
        Self::parse(&text, &self.source_name, &self.config)
    }
}
