//! Overlay option structs handed to the backend, one per collection type.

use crate::core::geo::{LatLng, LatLngBounds, EARTH_RADIUS_KM};
use crate::data::poi::PoiStyle;

/// Marker icon dimensions in pixels.
pub const ICON_SIZE: (u32, u32) = (25, 40);
/// Icon anchor: bottom center of the scaled icon.
pub const ICON_ANCHOR: (u32, u32) = (13, 40);

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub url: String,
    pub scaled_size: (u32, u32),
    pub anchor: (u32, u32),
}

impl MarkerIcon {
    pub fn scaled(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scaled_size: ICON_SIZE,
            anchor: ICON_ANCHOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub draggable: bool,
    pub icon: Option<MarkerIcon>,
}

impl MarkerOptions {
    /// Plain non-draggable marker with the default icon
    pub fn plain(position: LatLng) -> Self {
        Self {
            position,
            draggable: false,
            icon: None,
        }
    }
}

/// Filled polygon for an `Area` record
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOptions {
    pub paths: Vec<LatLng>,
    pub stroke_color: String,
    pub stroke_opacity: String,
    pub stroke_weight: String,
    pub fill_color: String,
    pub fill_opacity: String,
}

impl PolygonOptions {
    pub fn new(paths: Vec<LatLng>, style: &PoiStyle) -> Self {
        Self {
            paths,
            stroke_color: style.stroke_color.clone(),
            stroke_opacity: style.stroke_opacity.clone(),
            stroke_weight: style.stroke_weight.clone(),
            fill_color: style.fill_color.clone(),
            fill_opacity: style.fill_opacity.clone(),
        }
    }
}

/// Unfilled polyline for a `Route` record; fill attributes are ignored
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineOptions {
    pub path: Vec<LatLng>,
    pub stroke_color: String,
    pub stroke_opacity: String,
    pub stroke_weight: String,
}

impl PolylineOptions {
    pub fn new(path: Vec<LatLng>, style: &PoiStyle) -> Self {
        Self {
            path,
            stroke_color: style.stroke_color.clone(),
            stroke_opacity: style.stroke_opacity.clone(),
            stroke_weight: style.stroke_weight.clone(),
        }
    }
}

/// Circle for a `Radius` record
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOptions {
    pub center: LatLng,
    /// Radius in meters.
    pub radius: f64,
    pub stroke_color: String,
    pub stroke_opacity: String,
    pub stroke_weight: String,
    pub fill_color: String,
    pub fill_opacity: String,
}

impl CircleOptions {
    pub fn new(center: LatLng, radius: f64, style: &PoiStyle) -> Self {
        Self {
            center,
            radius,
            stroke_color: style.stroke_color.clone(),
            stroke_opacity: style.stroke_opacity.clone(),
            stroke_weight: style.stroke_weight.clone(),
            fill_color: style.fill_color.clone(),
            fill_opacity: style.fill_opacity.clone(),
        }
    }

    /// Bounding region of the circle, used to extend the viewport bounds
    pub fn bounds(&self) -> LatLngBounds {
        let delta_lat = (self.radius / 1000.0 / EARTH_RADIUS_KM).to_degrees();
        let delta_lng = delta_lat / self.center.lat.to_radians().cos().abs().max(f64::EPSILON);

        LatLngBounds::new(
            LatLng::new(self.center.lat - delta_lat, self.center.lng - delta_lng),
            LatLng::new(self.center.lat + delta_lat, self.center.lng + delta_lng),
        )
    }
}
