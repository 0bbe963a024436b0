//! Display configuration handed to the renderer by the host page.
//!
//! The host serializes an `environment` blob plus an `override` blob into
//! the map element's data storage; [`Environment::from_values`] deep-merges
//! the override onto the base before the renderer starts.

use crate::core::geo::LatLng;
use crate::data::poi::{PointOfInterest, StyleDefaults};
use crate::{MapError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Base map rendering style of the mapping service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum MapTypeId {
    Hybrid,
    #[default]
    Roadmap,
    Satellite,
    Terrain,
}

impl MapTypeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapTypeId::Hybrid => "hybrid",
            MapTypeId::Roadmap => "roadmap",
            MapTypeId::Satellite => "satellite",
            MapTypeId::Terrain => "terrain",
        }
    }
}

impl TryFrom<String> for MapTypeId {
    type Error = MapError;

    /// Accepts both the short form ("hybrid") and the fully qualified legacy
    /// form ("google.maps.MapTypeId.HYBRID")
    fn try_from(value: String) -> Result<Self> {
        match value.as_str() {
            "hybrid" | "google.maps.MapTypeId.HYBRID" => Ok(MapTypeId::Hybrid),
            "roadmap" | "google.maps.MapTypeId.ROADMAP" => Ok(MapTypeId::Roadmap),
            "satellite" | "google.maps.MapTypeId.SATELLITE" => Ok(MapTypeId::Satellite),
            "terrain" | "google.maps.MapTypeId.TERRAIN" => Ok(MapTypeId::Terrain),
            other => Err(MapError::Config(format!("unknown map type: {other}"))),
        }
    }
}

impl Serialize for MapTypeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Map display options from the plugin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    #[serde(default = "default_zoom", deserialize_with = "zoom_from_string_or_number")]
    pub zoom: u8,
    #[serde(default = "default_true")]
    pub pan_control: bool,
    #[serde(default = "default_true")]
    pub zoom_control: bool,
    #[serde(default = "default_true")]
    pub map_type_control: bool,
    #[serde(default = "default_true")]
    pub scale_control: bool,
    #[serde(default = "default_true")]
    pub street_view_control: bool,
    #[serde(default)]
    pub overview_map_control: bool,
    #[serde(default = "default_true")]
    pub activate_scroll_wheel: bool,
    /// Opaque style JSON passed through to the mapping service.
    #[serde(default)]
    pub styles: Option<Value>,
    #[serde(default)]
    pub map_type_id: MapTypeId,
    #[serde(default)]
    pub map_height: String,
    #[serde(default)]
    pub map_width: String,
    /// Comma-separated allow-list of visible category ids.
    #[serde(default)]
    pub categories: String,
}

fn default_zoom() -> u8 {
    12
}

fn default_true() -> bool {
    true
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            pan_control: true,
            zoom_control: true,
            map_type_control: true,
            scale_control: true,
            street_view_control: true,
            overview_map_control: false,
            activate_scroll_wheel: true,
            styles: None,
            map_type_id: MapTypeId::default(),
            map_height: String::new(),
            map_width: String::new(),
            categories: String::new(),
        }
    }
}

/// The plugin settings arrive from form values, so zoom may be "12" or 12
fn zoom_from_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u8, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Zoom {
        Number(u8),
        Text(String),
    }

    match Zoom::deserialize(deserializer)? {
        Zoom::Number(zoom) => Ok(zoom),
        Zoom::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Extension-wide configuration: style fallbacks and the default map center
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtConf {
    #[serde(flatten)]
    pub defaults: StyleDefaults,
    #[serde(default)]
    pub default_latitude: f64,
    #[serde(default)]
    pub default_longitude: f64,
}

impl ExtConf {
    pub fn default_position(&self) -> LatLng {
        LatLng::new(self.default_latitude, self.default_longitude)
    }
}

/// The content record hosting the plugin; its uid namespaces form fields and
/// DOM ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub uid: u64,
}

/// Everything the renderer needs beyond the POI list itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default)]
    pub settings: MapSettings,
    #[serde(default)]
    pub ext_conf: ExtConf,
    #[serde(default)]
    pub content_record: ContentRecord,
}

impl Environment {
    /// Builds the effective environment by deep-merging the per-element
    /// override blob onto the base blob
    pub fn from_values(base: Value, overrides: Value) -> Result<Environment> {
        let merged = merge_environment(base, overrides);
        Ok(serde_json::from_value(merged)?)
    }
}

/// Deep merge of two JSON values: objects merge recursively, everything else
/// is replaced by the override
pub fn merge_environment(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut base_map), Value::Object(override_map)) => {
            for (key, override_value) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_environment(base_value, override_value),
                    None => override_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overrides) => overrides,
    }
}

/// Per-element data attributes read from the host page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapElement {
    #[serde(default)]
    pub pois: Vec<PointOfInterest>,
    /// Single-point fallback used when the POI list is empty.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub edit_marker: bool,
}

impl MapElement {
    pub fn fallback_position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }
}

/// Options handed to [`MapBackend::configure`](crate::MapBackend::configure)
/// when the map is created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub zoom: u8,
    pub pan_control: bool,
    pub zoom_control: bool,
    pub map_type_control: bool,
    pub scale_control: bool,
    pub street_view_control: bool,
    pub overview_map_control: bool,
    pub scrollwheel: bool,
    pub styles: Option<Value>,
    pub map_type_id: MapTypeId,
    pub map_height: String,
    pub map_width: String,
}

impl From<&MapSettings> for MapOptions {
    fn from(settings: &MapSettings) -> Self {
        Self {
            zoom: settings.zoom,
            pan_control: settings.pan_control,
            zoom_control: settings.zoom_control,
            map_type_control: settings.map_type_control,
            scale_control: settings.scale_control,
            street_view_control: settings.street_view_control,
            overview_map_control: settings.overview_map_control,
            scrollwheel: settings.activate_scroll_wheel,
            styles: settings.styles.clone(),
            map_type_id: settings.map_type_id,
            map_height: settings.map_height.clone(),
            map_width: settings.map_width.clone(),
        }
    }
}

/// Parses a comma-separated id list: entries are trimmed, empty and
/// non-numeric entries dropped
pub fn parse_id_list(list: &str) -> Vec<u64> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| item.parse().ok())
        .collect()
}
