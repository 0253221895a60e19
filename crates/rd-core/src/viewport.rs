//! Map viewport resolution

use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::record::Restaurant;
use crate::selection::Selection;

/// Zoom used when a record is selected
pub const CLOSE_UP_ZOOM: u8 = 18;

/// Zoom used for the whole-city view
pub const CITY_ZOOM: u8 = 12;

/// Québec City, shown when there is nothing else to center on
pub const FALLBACK_CENTER: (f64, f64) = (46.81, -71.22);

/// Map center and zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Point<f64>,
    pub zoom: u8,
}

impl MapViewport {
    pub fn latitude(&self) -> f64 {
        self.center.y()
    }

    pub fn longitude(&self) -> f64 {
        self.center.x()
    }

    /// Approximate visible extent in degrees of longitude
    ///
    /// Follows the web-map convention of 360 degrees at zoom 0, halved at
    /// each level.
    pub fn span_degrees(&self) -> f64 {
        360.0 / f64::from(1u32 << self.zoom.min(24))
    }
}

/// Zoom levels and fallback location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub close_up_zoom: u8,
    pub city_zoom: u8,

    /// (latitude, longitude)
    pub fallback_center: (f64, f64),
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            close_up_zoom: CLOSE_UP_ZOOM,
            city_zoom: CITY_ZOOM,
            fallback_center: FALLBACK_CENTER,
        }
    }
}

/// Decide where the map looks
///
/// A selection wins even when the selected record is not part of
/// `filtered`. Otherwise the mean position of the filtered records is used,
/// and the fallback center when there are none.
pub fn resolve_viewport(filtered: &[&Restaurant], selection: Option<&Selection>, settings: &ViewportSettings) -> MapViewport {
    if let Some(selection) = selection {
        return MapViewport {
            center: selection.location,
            zoom: settings.close_up_zoom,
        };
    }

    if !filtered.is_empty() {
        let count = filtered.len() as f64;
        let mean_lat = filtered.iter().map(|r| r.latitude()).sum::<f64>() / count;
        let mean_lon = filtered.iter().map(|r| r.longitude()).sum::<f64>() / count;
        return MapViewport {
            center: Point::new(mean_lon, mean_lat),
            zoom: settings.city_zoom,
        };
    }

    let (lat, lon) = settings.fallback_center;
    MapViewport {
        center: Point::new(lon, lat),
        zoom: settings.city_zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_without_selection_uses_fallback() {
        let viewport = resolve_viewport(&[], None, &ViewportSettings::default());
        assert_eq!(viewport.latitude(), 46.81);
        assert_eq!(viewport.longitude(), -71.22);
        assert_eq!(viewport.zoom, CITY_ZOOM);
    }

    #[test]
    fn test_mean_of_filtered_records() {
        let a = Restaurant::new("A", 46.0, -71.0);
        let b = Restaurant::new("B", 47.0, -72.0);
        let viewport = resolve_viewport(&[&a, &b], None, &ViewportSettings::default());
        assert!((viewport.latitude() - 46.5).abs() < 1e-9);
        assert!((viewport.longitude() + 71.5).abs() < 1e-9);
        assert_eq!(viewport.zoom, CITY_ZOOM);
    }

    #[test]
    fn test_selection_takes_priority() {
        let a = Restaurant::new("A", 46.0, -71.0);
        let elsewhere = Restaurant::new("Z", 45.5, -73.6);
        let selection = Selection::from_record(9, &elsewhere);

        let viewport = resolve_viewport(&[&a], Some(&selection), &ViewportSettings::default());
        assert_eq!(viewport.center, elsewhere.location);
        assert_eq!(viewport.zoom, CLOSE_UP_ZOOM);

        let viewport = resolve_viewport(&[], Some(&selection), &ViewportSettings::default());
        assert_eq!(viewport.center, elsewhere.location);
        assert_eq!(viewport.zoom, CLOSE_UP_ZOOM);
    }

    #[test]
    fn test_custom_settings() {
        let settings = ViewportSettings {
            close_up_zoom: 16,
            city_zoom: 10,
            fallback_center: (45.5, -73.56),
        };
        let viewport = resolve_viewport(&[], None, &settings);
        assert_eq!(viewport.latitude(), 45.5);
        assert_eq!(viewport.zoom, 10);
    }

    #[test]
    fn test_span_halves_per_zoom_level() {
        let city = MapViewport { center: Point::new(0.0, 0.0), zoom: 12 };
        let closer = MapViewport { center: Point::new(0.0, 0.0), zoom: 13 };
        assert!((city.span_degrees() - 2.0 * closer.span_degrees()).abs() < 1e-12);
    }
}
