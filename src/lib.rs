//! # poimap
//!
//! Core of a point-of-interest map plugin, split into two independent parts:
//!
//! - [`search`]: ranks stored POI records by great-circle distance from a
//!   query point and filters them by radius or category membership.
//! - [`render`]: turns a POI list plus display configuration into map
//!   overlays driven through a [`render::backend::MapBackend`], with a
//!   togglable category filter, a single shared info window and optional
//!   drag-to-edit of marker coordinates.
//!
//! The record store and the mapping service itself are external
//! collaborators, reached through the `PoiStore` and `MapBackend` traits.

pub mod core;
pub mod data;
pub mod prelude;
pub mod render;
pub mod search;

// Re-export public API
pub use crate::core::{
    config::{Environment, ExtConf, MapElement, MapOptions, MapSettings, MapTypeId},
    geo::{LatLng, LatLngBounds},
};

pub use data::poi::{Category, CollectionType, PoiStyle, PointOfInterest, StyleDefaults};

pub use search::{
    store::{MemoryStore, PoiStore},
    GeoSearchService, PoiDistance, SearchQuery,
};

pub use render::{
    backend::{HeadlessBackend, MapBackend, MapEvent, OverlayId},
    renderer::MapRenderer,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Error type alias for convenience
pub type Error = MapError;
