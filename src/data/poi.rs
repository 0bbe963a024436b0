//! Point-of-interest records as serialized by the server side and consumed
//! by the renderer.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Geometric shape classifier of a record. Fixed at creation; the core never
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    Point,
    Area,
    Route,
    Radius,
}

/// A category a record is tagged with. Unique by id across one POI list; the
/// first category of a record supplies the marker icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub uid: u64,
    pub title: String,
    /// Icon URL; empty means no custom icon.
    #[serde(default)]
    pub marker_icon: String,
}

impl Category {
    pub fn new(uid: u64, title: impl Into<String>) -> Self {
        Self {
            uid,
            title: title.into(),
            marker_icon: String::new(),
        }
    }

    pub fn with_marker_icon(mut self, url: impl Into<String>) -> Self {
        self.marker_icon = url.into();
        self
    }
}

/// One vertex of an Area or Route path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<PathPoint> for LatLng {
    fn from(point: PathPoint) -> Self {
        LatLng::new(point.latitude, point.longitude)
    }
}

/// The five overlay style attributes. An empty string means "use the
/// configured default"; absent fields are the caller's problem to normalize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiStyle {
    #[serde(default)]
    pub stroke_color: String,
    #[serde(default)]
    pub stroke_opacity: String,
    #[serde(default)]
    pub stroke_weight: String,
    #[serde(default)]
    pub fill_color: String,
    #[serde(default)]
    pub fill_opacity: String,
}

/// Configured style fallbacks, applied wherever a record leaves an attribute
/// empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefaults {
    #[serde(default)]
    pub stroke_color: String,
    #[serde(default)]
    pub stroke_opacity: String,
    #[serde(default)]
    pub stroke_weight: String,
    #[serde(default)]
    pub fill_color: String,
    #[serde(default)]
    pub fill_opacity: String,
}

impl PoiStyle {
    /// Returns a copy with every empty attribute replaced by its configured
    /// default. Pure; applied exactly once per record before overlay
    /// creation.
    pub fn or_defaults(&self, defaults: &StyleDefaults) -> PoiStyle {
        fn pick(value: &str, fallback: &str) -> String {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        }

        PoiStyle {
            stroke_color: pick(&self.stroke_color, &defaults.stroke_color),
            stroke_opacity: pick(&self.stroke_opacity, &defaults.stroke_opacity),
            stroke_weight: pick(&self.stroke_weight, &defaults.stroke_weight),
            fill_color: pick(&self.fill_color, &defaults.fill_color),
            fill_opacity: pick(&self.fill_opacity, &defaults.fill_opacity),
        }
    }
}

/// A single mappable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub uid: u64,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Circle radius in meters; only meaningful for `Radius` records.
    #[serde(default)]
    pub radius: f64,
    /// Ordered path vertices for `Area` and `Route` records.
    #[serde(default)]
    pub pois: Vec<PathPoint>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub style: PoiStyle,
    /// Opaque markup shown when a `Point` marker is clicked.
    #[serde(default)]
    pub info_window_content: String,
}

impl PointOfInterest {
    pub fn new(uid: u64, collection_type: CollectionType) -> Self {
        Self {
            uid,
            collection_type,
            latitude: None,
            longitude: None,
            radius: 0.0,
            pois: Vec::new(),
            categories: Vec::new(),
            style: PoiStyle::default(),
            info_window_content: String::new(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn with_radius(mut self, meters: f64) -> Self {
        self.radius = meters;
        self
    }

    pub fn with_path(mut self, points: Vec<PathPoint>) -> Self {
        self.pois = points;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_info_window_content(mut self, content: impl Into<String>) -> Self {
        self.info_window_content = content.into();
        self
    }

    pub fn with_style(mut self, style: PoiStyle) -> Self {
        self.style = style;
        self
    }

    /// The record's own coordinate, if both halves are populated
    pub fn position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Ordered path of an Area or Route record
    pub fn path(&self) -> Vec<LatLng> {
        self.pois.iter().copied().map(LatLng::from).collect()
    }
}
