mod decode;
mod filter;
mod pointgeometry;
mod position;

pub use crate::geometry::position::{haversine_km, Point, EARTH_RADIUS_KM};
pub use crate::geometry::decode::{
    decode, decode_lenient, decode_strict, DecodeMode, Decoded, DecodedGeometry, GeometryType,
};
pub use crate::geometry::filter::{
    filter_by_bounding_box, filter_by_radius, BoundingBox, Located, RadiusQuery,
};
pub use crate::geometry::pointgeometry::{
    to_feature, to_feature_collection, to_point_list, MapFeature, MapPoint,
};
