use crate::geometry::Located;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use serde_json::json;

/// An item which can be drawn on a map: an id, a name, an optional location
/// and a set of properties passed through to the output unchanged.
pub trait MapFeature: Located {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn properties(&self) -> &JsonObject;
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: String,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

pub fn to_point_list<'a, T, I>(items: I) -> Vec<MapPoint>
where
    T: MapFeature + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut res = Vec::new();
    for it in items {
        if let Some(p) = it.location() {
            res.push(MapPoint {
                id: String::from(it.id()),
                name: String::from(it.name()),
                longitude: p.lon,
                latitude: p.lat,
            });
        }
    }
    res
}

fn feature_properties<T: MapFeature>(it: &T) -> JsonObject {
    let mut props = it.properties().clone();
    // the mapped id and name replace any record fields of the same name
    props.insert(String::from("id"), json!(it.id()));
    props.insert(String::from("name"), json!(it.name()));
    props
}

pub fn to_feature<T: MapFeature>(it: &T) -> Option<Feature> {
    let p = it.location()?;
    let geom = Geometry::new(geojson::Value::from(&p.to_geo()));

    Some(Feature {
        bbox: None,
        geometry: Some(geom),
        id: None,
        properties: Some(feature_properties(it)),
        foreign_members: None,
    })
}

pub fn to_feature_collection<'a, T, I>(items: I) -> FeatureCollection
where
    T: MapFeature + 'a,
    I: IntoIterator<Item = &'a T>,
{
    FeatureCollection {
        bbox: None,
        features: items.into_iter().filter_map(to_feature).collect(),
        foreign_members: None,
    }
}
