//! Client-side rendering: one initialization pass builds every overlay,
//! after which the host event loop feeds interaction events back in.

use crate::core::config::{Environment, MapElement, MapOptions};
use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::poi::{CollectionType, PointOfInterest};
use crate::prelude::HashMap;
use crate::render::backend::{MapBackend, MapEvent, OverlayId};
use crate::render::categories::{group_categories, CategoryFilter};
use crate::render::info_window::InfoWindow;
use crate::render::overlay::{
    CircleOptions, MarkerIcon, MarkerOptions, PolygonOptions, PolylineOptions,
};
use crate::Result;

/// Zoom applied when only the single-point fallback coordinate is shown.
const FALLBACK_ZOOM: u8 = 15;

/// Renders one POI list onto one map instance.
///
/// All overlays, the category→marker registry and the bounding region are
/// built synchronously in [`MapRenderer::initialize`]; afterwards the state
/// is only read by [`MapRenderer::handle_event`]. The shared info window is
/// owned here and mutated exclusively through its open/close API.
pub struct MapRenderer {
    environment: Environment,
    editable: bool,
    /// Category id -> markers registered under it. A marker with N
    /// categories appears in N lists.
    markers: HashMap<u64, Vec<OverlayId>>,
    marker_content: HashMap<OverlayId, String>,
    edit_markers: Vec<OverlayId>,
    bounds: Option<LatLngBounds>,
    info_window: InfoWindow,
    category_filter: Option<CategoryFilter>,
}

impl MapRenderer {
    /// Builds the map: configures the backend, creates one overlay per
    /// record, groups categories and centers the view.
    ///
    /// A list with exactly one record that has no own coordinate (an `Area`
    /// or `Route`) issues neither `set_center` nor `fit_bounds`; the
    /// viewport stays at the backend default.
    pub fn initialize<B: MapBackend>(
        backend: &mut B,
        element: &MapElement,
        environment: Environment,
    ) -> Result<MapRenderer> {
        backend.configure(&MapOptions::from(&environment.settings));

        let mut renderer = MapRenderer {
            editable: element.edit_marker,
            environment,
            markers: HashMap::default(),
            marker_content: HashMap::default(),
            edit_markers: Vec::new(),
            bounds: None,
            info_window: InfoWindow::new(),
            category_filter: None,
        };

        if element.pois.is_empty() {
            renderer.render_fallback(backend, element);
            return Ok(renderer);
        }

        log::debug!("rendering {} poi collections", element.pois.len());

        for poi in &element.pois {
            // style defaulting happens exactly once per record, before the
            // overlay is created
            let mut poi = poi.clone();
            poi.style = poi.style.or_defaults(&renderer.environment.ext_conf.defaults);
            renderer.render_poi(backend, &poi);
        }

        if renderer.markers.len() > 1 {
            let grouped = group_categories(&element.pois, &renderer.environment.settings.categories);
            let registered: Vec<_> = grouped
                .into_iter()
                .filter(|category| renderer.markers.contains_key(&category.uid))
                .collect();
            renderer.category_filter = Some(CategoryFilter::new(
                registered,
                renderer.environment.content_record.uid,
            ));
        }

        if element.pois.len() > 1 {
            if let Some(bounds) = &renderer.bounds {
                backend.fit_bounds(bounds);
            }
        } else if let Some(position) = element.pois[0].position() {
            backend.set_center(position);
        }

        Ok(renderer)
    }

    /// Empty POI list: either the single-point fallback or the configured
    /// default center
    fn render_fallback<B: MapBackend>(&mut self, backend: &mut B, element: &MapElement) {
        if let Some(position) = element.fallback_position() {
            backend.add_marker(&MarkerOptions::plain(position));
            self.extend_bounds(&position);
            backend.set_center(position);
            backend.set_zoom(FALLBACK_ZOOM);
        } else {
            backend.set_center(self.environment.ext_conf.default_position());
        }
    }

    fn render_poi<B: MapBackend>(&mut self, backend: &mut B, poi: &PointOfInterest) {
        match poi.collection_type {
            CollectionType::Point => self.create_marker(backend, poi),
            CollectionType::Area => self.create_area(backend, poi),
            CollectionType::Route => self.create_route(backend, poi),
            CollectionType::Radius => self.create_radius(backend, poi),
        }
    }

    fn create_marker<B: MapBackend>(&mut self, backend: &mut B, poi: &PointOfInterest) {
        let Some(position) = poi.position() else {
            log::warn!("poi {} has no coordinates, skipping marker", poi.uid);
            return;
        };

        // the first category with an icon configured supplies the marker icon
        let icon = poi
            .categories
            .first()
            .filter(|category| !category.marker_icon.is_empty())
            .map(|category| MarkerIcon::scaled(category.marker_icon.clone()));

        let marker = backend.add_marker(&MarkerOptions {
            position,
            draggable: self.editable,
            icon,
        });

        for category in &poi.categories {
            self.markers.entry(category.uid).or_default().push(marker);
        }

        self.extend_bounds(&position);

        if self.editable {
            self.edit_markers.push(marker);
        } else {
            self.marker_content
                .insert(marker, poi.info_window_content.clone());
        }
    }

    fn create_area<B: MapBackend>(&mut self, backend: &mut B, poi: &PointOfInterest) {
        let paths = self.collect_path(poi);
        if paths.is_empty() {
            return;
        }
        backend.add_polygon(&PolygonOptions::new(paths, &poi.style));
    }

    fn create_route<B: MapBackend>(&mut self, backend: &mut B, poi: &PointOfInterest) {
        let path = self.collect_path(poi);
        if path.is_empty() {
            return;
        }
        backend.add_polyline(&PolylineOptions::new(path, &poi.style));
    }

    fn create_radius<B: MapBackend>(&mut self, backend: &mut B, poi: &PointOfInterest) {
        let Some(center) = poi.position() else {
            log::warn!("poi {} has no coordinates, skipping circle", poi.uid);
            return;
        };

        let options = CircleOptions::new(center, poi.radius, &poi.style);
        self.extend_bounds_region(&options.bounds());
        backend.add_circle(&options);
    }

    /// Ordered path of an Area/Route record; every vertex also extends the
    /// bounding region, even when the overlay itself ends up empty
    fn collect_path(&mut self, poi: &PointOfInterest) -> Vec<LatLng> {
        let path = poi.path();
        for point in &path {
            self.extend_bounds(point);
        }
        path
    }

    fn extend_bounds(&mut self, point: &LatLng) {
        match &mut self.bounds {
            Some(bounds) => bounds.extend(point),
            None => self.bounds = Some(LatLngBounds::from_point(*point)),
        }
    }

    fn extend_bounds_region(&mut self, region: &LatLngBounds) {
        self.bounds = Some(match &self.bounds {
            Some(bounds) => bounds.union(region),
            None => region.clone(),
        });
    }

    /// Reacts to one host interaction event. Events arrive in arbitrary
    /// order relative to each other.
    pub fn handle_event<B: MapBackend>(&mut self, backend: &mut B, event: MapEvent) {
        match event {
            MapEvent::MarkerClicked { marker } => {
                // edit mode has no info windows
                if self.editable {
                    return;
                }
                if let Some(content) = self.marker_content.get(&marker).cloned() {
                    self.info_window.open(backend, marker, &content);
                }
            }
            MapEvent::MarkerDragEnd { marker, position } => {
                if self.edit_markers.contains(&marker) {
                    self.write_position_fields(backend, position);
                }
            }
            MapEvent::MapClicked { position } => {
                if !self.editable {
                    return;
                }
                for &marker in &self.edit_markers {
                    backend.set_marker_position(marker, position);
                }
                if !self.edit_markers.is_empty() {
                    self.write_position_fields(backend, position);
                }
            }
            MapEvent::CategoryToggled { category, checked } => {
                if let Some(filter) = &mut self.category_filter {
                    filter.set_checked(category, checked);
                }
                // only the clicked category's markers are touched; a marker
                // shared with another category is re-shown by re-checking
                // either one (legacy behavior, kept on purpose)
                if let Some(markers) = self.markers.get(&category) {
                    for &marker in markers {
                        backend.set_marker_visible(marker, checked);
                    }
                }
            }
        }
    }

    /// Writes the coordinate form fields with exactly 6 decimal places
    fn write_position_fields<B: MapBackend>(&self, backend: &mut B, position: LatLng) {
        let uid = self.environment.content_record.uid;
        backend.set_form_field(&format!("latitude-{uid}"), &format!("{:.6}", position.lat));
        backend.set_form_field(&format!("longitude-{uid}"), &format!("{:.6}", position.lng));
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Accumulated bounding region over every rendered overlay
    pub fn bounds(&self) -> Option<&LatLngBounds> {
        self.bounds.as_ref()
    }

    /// Markers registered under the given category id
    pub fn markers_for_category(&self, category: u64) -> &[OverlayId] {
        self.markers
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The checkbox model, present only when more than one category key is
    /// registered
    pub fn category_filter(&self) -> Option<&CategoryFilter> {
        self.category_filter.as_ref()
    }

    pub fn info_window(&self) -> &InfoWindow {
        &self.info_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ContentRecord;
    use crate::data::poi::{Category, PathPoint, PoiStyle};
    use crate::render::backend::{BackendCall, HeadlessBackend};

    fn environment() -> Environment {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut env = Environment::default();
        env.content_record = ContentRecord { uid: 7 };
        env.ext_conf.default_latitude = 51.0;
        env.ext_conf.default_longitude = 9.0;
        env.settings.categories = "1,2,3".into();
        env
    }

    fn element(pois: Vec<PointOfInterest>) -> MapElement {
        MapElement {
            pois,
            ..MapElement::default()
        }
    }

    fn point(uid: u64, lat: f64, lng: f64) -> PointOfInterest {
        PointOfInterest::new(uid, CollectionType::Point)
            .at(lat, lng)
            .with_info_window_content(format!("poi {uid}"))
    }

    #[test]
    fn test_empty_list_without_fallback_centers_on_default() {
        let mut backend = HeadlessBackend::new();
        let renderer =
            MapRenderer::initialize(&mut backend, &element(vec![]), environment()).unwrap();

        assert_eq!(backend.last_center(), Some(LatLng::new(51.0, 9.0)));
        assert_eq!(backend.marker_count(), 0);
        assert!(renderer.bounds().is_none());
    }

    #[test]
    fn test_empty_list_with_fallback_places_single_marker() {
        let mut backend = HeadlessBackend::new();
        let element = MapElement {
            latitude: Some(50.1109),
            longitude: Some(8.6821),
            ..MapElement::default()
        };
        MapRenderer::initialize(&mut backend, &element, environment()).unwrap();

        assert_eq!(backend.marker_count(), 1);
        assert_eq!(backend.last_center(), Some(LatLng::new(50.1109, 8.6821)));
        assert_eq!(backend.last_zoom(), Some(15));
    }

    #[test]
    fn test_single_record_centers_without_bounds_fit() {
        let mut backend = HeadlessBackend::new();
        MapRenderer::initialize(
            &mut backend,
            &element(vec![point(1, 52.52, 13.405)]),
            environment(),
        )
        .unwrap();

        assert_eq!(backend.last_center(), Some(LatLng::new(52.52, 13.405)));
        assert_eq!(backend.fitted_bounds(), None);
    }

    #[test]
    fn test_single_record_without_position_leaves_viewport_untouched() {
        let mut backend = HeadlessBackend::new();
        let area = PointOfInterest::new(1, CollectionType::Area).with_path(vec![
            PathPoint { latitude: 50.0, longitude: 8.0 },
            PathPoint { latitude: 50.1, longitude: 8.1 },
        ]);
        let renderer =
            MapRenderer::initialize(&mut backend, &element(vec![area]), environment()).unwrap();

        // the path extends the bounding region, but a single record never
        // triggers a bounds fit, and an Area has no center to pan to
        assert!(renderer.bounds().is_some());
        assert_eq!(backend.last_center(), None);
        assert_eq!(backend.fitted_bounds(), None);
    }

    #[test]
    fn test_multiple_records_fit_accumulated_bounds() {
        let mut backend = HeadlessBackend::new();
        MapRenderer::initialize(
            &mut backend,
            &element(vec![point(1, 52.0, 13.0), point(2, 48.0, 11.0)]),
            environment(),
        )
        .unwrap();

        let bounds = backend.fitted_bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(48.0, 11.0));
        assert_eq!(bounds.north_east, LatLng::new(52.0, 13.0));
        assert_eq!(backend.last_center(), None);
    }

    #[test]
    fn test_marker_registered_under_every_category() {
        let mut backend = HeadlessBackend::new();
        let poi = point(1, 52.0, 13.0)
            .with_category(Category::new(1, "Food"))
            .with_category(Category::new(2, "Hotels"));
        let renderer =
            MapRenderer::initialize(&mut backend, &element(vec![poi]), environment()).unwrap();

        assert_eq!(renderer.markers_for_category(1).len(), 1);
        assert_eq!(renderer.markers_for_category(2).len(), 1);
        assert_eq!(renderer.markers_for_category(1), renderer.markers_for_category(2));
        assert!(renderer.markers_for_category(9).is_empty());
    }

    #[test]
    fn test_first_category_icon_assigned() {
        let mut backend = HeadlessBackend::new();
        let poi = point(1, 52.0, 13.0)
            .with_category(Category::new(1, "Food").with_marker_icon("https://e/icon.png"))
            .with_category(Category::new(2, "Hotels").with_marker_icon("https://e/other.png"));
        MapRenderer::initialize(&mut backend, &element(vec![poi]), environment()).unwrap();

        let icon = backend
            .calls()
            .iter()
            .find_map(|call| match call {
                BackendCall::AddMarker(_, options) => options.icon.clone(),
                _ => None,
            })
            .unwrap();
        assert_eq!(icon.url, "https://e/icon.png");
    }

    #[test]
    fn test_icon_skipped_when_first_category_has_none() {
        let mut backend = HeadlessBackend::new();
        let poi = point(1, 52.0, 13.0)
            .with_category(Category::new(1, "Food"))
            .with_category(Category::new(2, "Hotels").with_marker_icon("https://e/other.png"));
        MapRenderer::initialize(&mut backend, &element(vec![poi]), environment()).unwrap();

        let has_icon = backend.calls().iter().any(|call| {
            matches!(call, BackendCall::AddMarker(_, options) if options.icon.is_some())
        });
        assert!(!has_icon);
    }

    #[test]
    fn test_area_with_empty_path_is_silently_skipped() {
        let mut backend = HeadlessBackend::new();
        let area = PointOfInterest::new(1, CollectionType::Area);
        MapRenderer::initialize(&mut backend, &element(vec![area]), environment()).unwrap();

        let polygons = backend
            .calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::AddPolygon(..)))
            .count();
        assert_eq!(polygons, 0);
    }

    #[test]
    fn test_area_and_route_dispatch() {
        let mut backend = HeadlessBackend::new();
        let path = vec![
            PathPoint { latitude: 50.0, longitude: 8.0 },
            PathPoint { latitude: 50.1, longitude: 8.1 },
            PathPoint { latitude: 50.2, longitude: 8.0 },
        ];
        let area = PointOfInterest::new(1, CollectionType::Area).with_path(path.clone());
        let route = PointOfInterest::new(2, CollectionType::Route).with_path(path);

        let renderer =
            MapRenderer::initialize(&mut backend, &element(vec![area, route]), environment())
                .unwrap();

        assert!(backend
            .calls()
            .iter()
            .any(|call| matches!(call, BackendCall::AddPolygon(..))));
        assert!(backend
            .calls()
            .iter()
            .any(|call| matches!(call, BackendCall::AddPolyline(..))));

        let bounds = renderer.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(50.0, 8.0));
        assert_eq!(bounds.north_east, LatLng::new(50.2, 8.1));
    }

    #[test]
    fn test_radius_record_creates_circle_and_extends_bounds() {
        let mut backend = HeadlessBackend::new();
        let circle = PointOfInterest::new(1, CollectionType::Radius)
            .at(50.0, 8.0)
            .with_radius(2000.0);
        let renderer =
            MapRenderer::initialize(&mut backend, &element(vec![circle]), environment()).unwrap();

        assert!(backend
            .calls()
            .iter()
            .any(|call| matches!(call, BackendCall::AddCircle(..))));

        let bounds = renderer.bounds().unwrap();
        assert!(bounds.south_west.lat < 50.0);
        assert!(bounds.north_east.lat > 50.0);
    }

    #[test]
    fn test_style_defaults_applied_before_overlay_creation() {
        let mut backend = HeadlessBackend::new();
        let mut env = environment();
        env.ext_conf.defaults.stroke_color = "#abcdef".into();
        env.ext_conf.defaults.fill_color = "#123123".into();

        let area = PointOfInterest::new(1, CollectionType::Area)
            .with_path(vec![PathPoint { latitude: 50.0, longitude: 8.0 }])
            .with_style(PoiStyle {
                stroke_color: "#000000".into(),
                ..PoiStyle::default()
            });
        MapRenderer::initialize(&mut backend, &element(vec![area]), env).unwrap();

        let polygon = backend
            .calls()
            .iter()
            .find_map(|call| match call {
                BackendCall::AddPolygon(_, options) => Some(options.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(polygon.stroke_color, "#000000");
        assert_eq!(polygon.fill_color, "#123123");
    }

    #[test]
    fn test_category_filter_needs_more_than_one_category() {
        let mut backend = HeadlessBackend::new();
        let pois = vec![
            point(1, 52.0, 13.0).with_category(Category::new(1, "Food")),
            point(2, 52.1, 13.1).with_category(Category::new(1, "Food")),
        ];
        let renderer =
            MapRenderer::initialize(&mut backend, &element(pois), environment()).unwrap();
        assert!(renderer.category_filter().is_none());

        let mut backend = HeadlessBackend::new();
        let pois = vec![
            point(1, 52.0, 13.0).with_category(Category::new(1, "Food")),
            point(2, 52.1, 13.1).with_category(Category::new(2, "Hotels")),
        ];
        let renderer =
            MapRenderer::initialize(&mut backend, &element(pois), environment()).unwrap();
        let filter = renderer.category_filter().unwrap();
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.form_id(), "poimapForm-7");
    }

    #[test]
    fn test_category_filter_respects_allow_list() {
        let mut backend = HeadlessBackend::new();
        let mut env = environment();
        env.settings.categories = "2".into();
        let pois = vec![
            point(1, 52.0, 13.0).with_category(Category::new(1, "Food")),
            point(2, 52.1, 13.1).with_category(Category::new(2, "Hotels")),
        ];
        let renderer = MapRenderer::initialize(&mut backend, &element(pois), env).unwrap();

        let filter = renderer.category_filter().unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.toggles()[0].category.uid, 2);
    }

    #[test]
    fn test_info_window_closes_before_reopening() {
        let mut backend = HeadlessBackend::new();
        let pois = vec![point(1, 52.0, 13.0), point(2, 52.1, 13.1)];
        let mut renderer =
            MapRenderer::initialize(&mut backend, &element(pois), environment()).unwrap();

        let first = backend
            .calls()
            .iter()
            .find_map(|call| match call {
                BackendCall::AddMarker(id, _) => Some(*id),
                _ => None,
            })
            .unwrap();

        renderer.handle_event(&mut backend, MapEvent::MarkerClicked { marker: first });
        assert_eq!(backend.current_info_window(), Some((first, "poi 1")));
        assert_eq!(renderer.info_window().open_on(), Some(first));
    }

    #[test]
    fn test_unknown_category_toggle_is_noop() {
        let mut backend = HeadlessBackend::new();
        let pois = vec![point(1, 52.0, 13.0).with_category(Category::new(1, "Food"))];
        let mut renderer =
            MapRenderer::initialize(&mut backend, &element(pois), environment()).unwrap();

        let calls_before = backend.calls().len();
        renderer.handle_event(
            &mut backend,
            MapEvent::CategoryToggled {
                category: 99,
                checked: false,
            },
        );
        assert_eq!(backend.calls().len(), calls_before);
    }
}
