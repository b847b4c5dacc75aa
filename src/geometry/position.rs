use serde::{Deserialize, Serialize};

/// Mean earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "longitude")]
    pub lon: f64,
    #[serde(rename = "latitude")]
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Point {
        Point { lon, lat }
    }

    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }

    pub fn distance_km(&self, other: &Point) -> f64 {
        haversine_km(self, other)
    }
}

/// Great circle distance, in kilometres, between two lon/lat points.
pub fn haversine_km(p: &Point, q: &Point) -> f64 {
    let dlat = (q.lat - p.lat).to_radians();
    let dlon = (q.lon - p.lon).to_radians();

    let a = f64::powi(f64::sin(dlat / 2.0), 2)
        + f64::cos(p.lat.to_radians()) * f64::cos(q.lat.to_radians()) * f64::powi(f64::sin(dlon / 2.0), 2);

    // rounding can push a just past 1.0 for antipodal points
    let a = a.min(1.0);
    let c = 2.0 * f64::atan2(a.sqrt(), (1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Point::new(-79.3832, 43.6532);
        assert_eq!(haversine_km(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_city_hall_cn_tower() {
        let city_hall = Point::new(-79.3832, 43.6532);
        let cn_tower = Point::new(-79.3871, 43.6426);
        let d = city_hall.distance_km(&cn_tower);
        assert!(d > 1.1 && d < 1.3, "distance was {}", d);
        assert_eq!(d, cn_tower.distance_km(&city_hall));
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_km(&Point::new(0.0, 0.0), &Point::new(0.0, 1.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_serialize_point() {
        let s = serde_json::to_value(Point::new(-79.5, 43.7)).unwrap();
        assert_eq!(s, serde_json::json!({"longitude": -79.5, "latitude": 43.7}));
    }
}
