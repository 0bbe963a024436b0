//! The mapping-service capability the renderer drives.
//!
//! The real backend wraps a third-party mapping API; [`HeadlessBackend`]
//! records every call instead and backs the test suite and headless
//! embeddings.

use crate::core::config::MapOptions;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::prelude::HashMap;
use crate::render::overlay::{CircleOptions, MarkerOptions, PolygonOptions, PolylineOptions};
use serde::{Deserialize, Serialize};

/// Opaque handle to an overlay created by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// Interaction events delivered later by the host event loop, in arbitrary
/// order relative to each other
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MarkerClicked { marker: OverlayId },
    MarkerDragEnd { marker: OverlayId, position: LatLng },
    MapClicked { position: LatLng },
    CategoryToggled { category: u64, checked: bool },
}

/// Overlay primitives and map operations of the external mapping service
pub trait MapBackend {
    /// Applies the map display options once, before any overlay is created
    fn configure(&mut self, options: &MapOptions);

    fn add_marker(&mut self, options: &MarkerOptions) -> OverlayId;
    fn add_polygon(&mut self, options: &PolygonOptions) -> OverlayId;
    fn add_polyline(&mut self, options: &PolylineOptions) -> OverlayId;
    fn add_circle(&mut self, options: &CircleOptions) -> OverlayId;

    fn set_marker_position(&mut self, marker: OverlayId, position: LatLng);
    fn set_marker_visible(&mut self, marker: OverlayId, visible: bool);

    fn open_info_window(&mut self, marker: OverlayId, content: &str);
    fn close_info_window(&mut self);

    fn set_center(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: u8);
    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    /// Writes a sibling form input selected by a class-name convention, e.g.
    /// `latitude-42`
    fn set_form_field(&mut self, name: &str, value: &str);
}

/// One recorded backend operation
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Configure(MapOptions),
    AddMarker(OverlayId, MarkerOptions),
    AddPolygon(OverlayId, PolygonOptions),
    AddPolyline(OverlayId, PolylineOptions),
    AddCircle(OverlayId, CircleOptions),
    SetMarkerPosition(OverlayId, LatLng),
    SetMarkerVisible(OverlayId, bool),
    OpenInfoWindow(OverlayId, String),
    CloseInfoWindow,
    SetCenter(LatLng),
    SetZoom(u8),
    FitBounds(LatLngBounds),
    SetFormField(String, String),
}

/// Recording backend without a real map behind it
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    calls: Vec<BackendCall>,
    marker_positions: HashMap<OverlayId, LatLng>,
    marker_visibility: HashMap<OverlayId, bool>,
    form_fields: HashMap<String, String>,
    open_info_window: Option<(OverlayId, String)>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_overlay(&mut self) -> OverlayId {
        self.next_id += 1;
        OverlayId(self.next_id)
    }

    /// Every call in invocation order
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn marker_position(&self, marker: OverlayId) -> Option<LatLng> {
        self.marker_positions.get(&marker).copied()
    }

    /// Markers start visible; toggles overwrite
    pub fn marker_visible(&self, marker: OverlayId) -> bool {
        self.marker_visibility.get(&marker).copied().unwrap_or(true)
    }

    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form_fields.get(name).map(String::as_str)
    }

    /// The currently open info window, if any
    pub fn current_info_window(&self) -> Option<(OverlayId, &str)> {
        self.open_info_window
            .as_ref()
            .map(|(marker, content)| (*marker, content.as_str()))
    }

    pub fn marker_count(&self) -> usize {
        self.marker_positions.len()
    }

    pub fn last_center(&self) -> Option<LatLng> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::SetCenter(center) => Some(*center),
            _ => None,
        })
    }

    pub fn last_zoom(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::SetZoom(zoom) => Some(*zoom),
            _ => None,
        })
    }

    pub fn fitted_bounds(&self) -> Option<LatLngBounds> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::FitBounds(bounds) => Some(bounds.clone()),
            _ => None,
        })
    }
}

impl MapBackend for HeadlessBackend {
    fn configure(&mut self, options: &MapOptions) {
        self.calls.push(BackendCall::Configure(options.clone()));
    }

    fn add_marker(&mut self, options: &MarkerOptions) -> OverlayId {
        let id = self.next_overlay();
        self.marker_positions.insert(id, options.position);
        self.marker_visibility.insert(id, true);
        self.calls.push(BackendCall::AddMarker(id, options.clone()));
        id
    }

    fn add_polygon(&mut self, options: &PolygonOptions) -> OverlayId {
        let id = self.next_overlay();
        self.calls.push(BackendCall::AddPolygon(id, options.clone()));
        id
    }

    fn add_polyline(&mut self, options: &PolylineOptions) -> OverlayId {
        let id = self.next_overlay();
        self.calls.push(BackendCall::AddPolyline(id, options.clone()));
        id
    }

    fn add_circle(&mut self, options: &CircleOptions) -> OverlayId {
        let id = self.next_overlay();
        self.calls.push(BackendCall::AddCircle(id, options.clone()));
        id
    }

    fn set_marker_position(&mut self, marker: OverlayId, position: LatLng) {
        self.marker_positions.insert(marker, position);
        self.calls.push(BackendCall::SetMarkerPosition(marker, position));
    }

    fn set_marker_visible(&mut self, marker: OverlayId, visible: bool) {
        self.marker_visibility.insert(marker, visible);
        self.calls.push(BackendCall::SetMarkerVisible(marker, visible));
    }

    fn open_info_window(&mut self, marker: OverlayId, content: &str) {
        self.open_info_window = Some((marker, content.to_string()));
        self.calls
            .push(BackendCall::OpenInfoWindow(marker, content.to_string()));
    }

    fn close_info_window(&mut self) {
        self.open_info_window = None;
        self.calls.push(BackendCall::CloseInfoWindow);
    }

    fn set_center(&mut self, center: LatLng) {
        self.calls.push(BackendCall::SetCenter(center));
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.calls.push(BackendCall::SetZoom(zoom));
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.calls.push(BackendCall::FitBounds(bounds.clone()));
    }

    fn set_form_field(&mut self, name: &str, value: &str) {
        self.form_fields.insert(name.to_string(), value.to_string());
        self.calls
            .push(BackendCall::SetFormField(name.to_string(), value.to_string()));
    }
}
