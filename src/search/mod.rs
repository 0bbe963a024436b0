//! Server-side POI search: radius ranking and category filtering.

pub mod store;

use crate::core::config::parse_id_list;
use crate::core::geo::LatLng;
use crate::data::poi::{CollectionType, PointOfInterest};
use crate::prelude::HashSet;
use crate::Result;
use store::PoiStore;

/// Immutable radius-search input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: i64,
}

impl SearchQuery {
    pub fn new(latitude: f64, longitude: f64, radius_km: i64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A record together with its computed distance from the query point
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDistance {
    pub poi: PointOfInterest,
    pub distance_km: f64,
}

/// Ranks and filters records from a [`PoiStore`].
///
/// Holds no state of its own beyond the store handle, so independent
/// requests may each build one and query concurrently.
pub struct GeoSearchService<S: PoiStore> {
    store: S,
}

impl<S: PoiStore> GeoSearchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records within `radius_km` of the query point, ascending by distance.
    ///
    /// Only `Point` records with populated coordinates participate. The
    /// filter is strictly `distance < radius_km`, so a non-positive radius
    /// always yields an empty result. Ties keep the store's natural order.
    /// Coordinates outside valid ranges are not validated here.
    pub fn search_within_radius(&self, query: SearchQuery) -> Result<Vec<PoiDistance>> {
        let origin = query.position();
        let radius = query.radius_km as f64;

        let mut matches: Vec<PoiDistance> = self
            .store
            .find_all()?
            .into_iter()
            .filter(|poi| poi.collection_type == CollectionType::Point)
            .filter_map(|poi| {
                let position = poi.position()?;
                let distance_km = origin.distance_km(&position);
                Some(PoiDistance { poi, distance_km })
            })
            // strict `<` also rejects a NaN distance from degenerate acos input
            .filter(|hit| hit.distance_km < radius)
            .collect();

        // stable sort keeps store order for equal distances
        matches.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::debug!(
            "radius search around ({}, {}) within {} km matched {} records",
            query.latitude,
            query.longitude,
            query.radius_km,
            matches.len()
        );

        Ok(matches)
    }

    /// Records tagged with at least one of the given categories (logical
    /// OR). The input is a comma-separated id list; an empty list matches
    /// nothing, never everything. Result order is the store's order.
    pub fn find_by_categories(&self, categories: &str) -> Result<Vec<PointOfInterest>> {
        let wanted: HashSet<u64> = parse_id_list(categories).into_iter().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .store
            .find_all()?
            .into_iter()
            .filter(|poi| poi.categories.iter().any(|c| wanted.contains(&c.uid)))
            .collect();

        Ok(matches)
    }
}
