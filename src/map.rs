//! Map queries over the cultural hotspot points of interest: every point, a
//! geojson feature collection, points inside a bounding box and points near a
//! centre.

use crate::error::Result;
use crate::geometry::{
    decode, filter_by_bounding_box, filter_by_radius, to_feature_collection, to_point_list,
    BoundingBox, DecodeMode, DecodedGeometry, MapFeature, MapPoint, Point, RadiusQuery,
};
use crate::poi::{PointOfInterest, PointOfInterestStore};

use geojson::FeatureCollection;

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

pub fn decode_geometry(raw: Option<&str>, mode: DecodeMode) -> Result<Option<DecodedGeometry>> {
    mode.apply(decode(raw))
}

pub fn query_by_bounding_box<T: MapFeature>(
    points: &[T],
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
) -> Vec<&T> {
    filter_by_bounding_box(points, &BoundingBox::new(min_lat, max_lat, min_lon, max_lon))
}

pub fn query_by_radius<T: MapFeature>(points: &[T], lat: f64, lon: f64, radius_km: f64) -> Vec<&T> {
    filter_by_radius(points, &RadiusQuery::new(Point::new(lon, lat), radius_km))
}

pub fn project_to_points<T: MapFeature>(points: &[T]) -> Vec<MapPoint> {
    to_point_list(points)
}

pub fn project_to_geojson<T: MapFeature>(points: &[T]) -> FeatureCollection {
    to_feature_collection(points)
}

pub struct MapService {
    store: PointOfInterestStore,
    default_radius_km: f64,
}

impl MapService {
    pub fn new(store: PointOfInterestStore) -> MapService {
        MapService::with_default_radius(store, DEFAULT_RADIUS_KM)
    }

    pub fn with_default_radius(store: PointOfInterestStore, default_radius_km: f64) -> MapService {
        MapService { store, default_radius_km }
    }

    /// Every point of interest, including those without a location.
    pub fn hotspots(&self) -> &[PointOfInterest] {
        self.store.points()
    }

    pub fn points(&self) -> Vec<MapPoint> {
        project_to_points(self.store.points())
    }

    pub fn geojson(&self) -> FeatureCollection {
        project_to_geojson(self.store.points())
    }

    pub fn points_in_bounds(&self, min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Vec<MapPoint> {
        to_point_list(query_by_bounding_box(self.store.points(), min_lat, max_lat, min_lon, max_lon))
    }

    pub fn points_nearby(&self, lat: f64, lon: f64, radius_km: Option<f64>) -> Vec<MapPoint> {
        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        to_point_list(query_by_radius(self.store.points(), lat, lon, radius_km))
    }
}
