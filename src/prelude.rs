//! Prelude module for common poimap types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use poimap::prelude::*;`

pub use crate::core::{
    config::{Environment, ExtConf, MapElement, MapOptions, MapSettings, MapTypeId},
    geo::{LatLng, LatLngBounds},
};

pub use crate::data::poi::{
    Category, CollectionType, PathPoint, PoiStyle, PointOfInterest, StyleDefaults,
};

pub use crate::search::{
    store::{MemoryStore, PoiStore},
    GeoSearchService, PoiDistance, SearchQuery,
};

pub use crate::render::{
    backend::{BackendCall, HeadlessBackend, MapBackend, MapEvent, OverlayId},
    categories::CategoryFilter,
    info_window::InfoWindow,
    overlay::{CircleOptions, MarkerIcon, MarkerOptions, PolygonOptions, PolylineOptions},
    renderer::MapRenderer,
};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
