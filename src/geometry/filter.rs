use crate::error::{Error, Result};
use crate::geometry::{haversine_km, Point};

/// Anything which may have a location. Items without one never match a
/// spatial filter.
pub trait Located {
    fn location(&self) -> Option<Point>;
}

impl Located for Point {
    fn location(&self) -> Option<Point> {
        Some(*self)
    }
}

impl<T: Located> Located for &T {
    fn location(&self) -> Option<Point> {
        T::location(*self)
    }
}

/// Inclusive lat/lon rectangle. An inverted box (min greater than max)
/// matches nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> BoundingBox {
        BoundingBox { min_lat, max_lat, min_lon, max_lon }
    }

    /// As `new`, but rejects non-finite or inverted bounds.
    pub fn checked(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<BoundingBox> {
        let bbox = BoundingBox::new(min_lat, max_lat, min_lon, max_lon);
        if !bbox.is_finite() {
            return Err(Error::InvalidArgument(format!("bounding box {} has non-finite values", bbox)));
        }
        if bbox.is_inverted() {
            return Err(Error::InvalidArgument(format!("bounding box {} is inverted", bbox)));
        }
        Ok(bbox)
    }

    pub fn is_inverted(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        if self.min_lat > p.lat {
            return false;
        }
        if self.max_lat < p.lat {
            return false;
        }
        if self.min_lon > p.lon {
            return false;
        }
        if self.max_lon < p.lon {
            return false;
        }
        // comparisons with NaN are always false
        p.lat.is_finite() && p.lon.is_finite() && self.is_finite()
    }

    fn is_finite(&self) -> bool {
        self.min_lat.is_finite() && self.max_lat.is_finite() && self.min_lon.is_finite() && self.max_lon.is_finite()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[lat {} .. {}, lon {} .. {}]",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusQuery {
    pub center: Point,
    pub radius_km: f64,
}

impl RadiusQuery {
    /// A negative radius is accepted and matches nothing.
    pub fn new(center: Point, radius_km: f64) -> RadiusQuery {
        RadiusQuery { center, radius_km }
    }

    pub fn checked(center: Point, radius_km: f64) -> Result<RadiusQuery> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "radius must be a non-negative number of km, not {}",
                radius_km
            )));
        }
        if !center.lat.is_finite() || !center.lon.is_finite() {
            return Err(Error::InvalidArgument(format!("centre {:?} is not finite", center)));
        }
        Ok(RadiusQuery::new(center, radius_km))
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        haversine_km(&self.center, p) <= self.radius_km
    }
}

pub fn filter_by_bounding_box<'a, T: Located>(items: &'a [T], bbox: &BoundingBox) -> Vec<&'a T> {
    items
        .iter()
        .filter(|it| match it.location() {
            Some(p) => bbox.contains_point(&p),
            None => false,
        })
        .collect()
}

pub fn filter_by_radius<'a, T: Located>(items: &'a [T], query: &RadiusQuery) -> Vec<&'a T> {
    items
        .iter()
        .filter(|it| match it.location() {
            Some(p) => query.contains_point(&p),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(Option<Point>);
    impl Located for Item {
        fn location(&self) -> Option<Point> {
            self.0
        }
    }

    fn toronto() -> Point {
        Point::new(-79.3832, 43.6532)
    }

    fn cn_tower() -> Point {
        Point::new(-79.3871, 43.6426)
    }

    #[test]
    fn test_bbox_example() {
        let bbox = BoundingBox::new(43.6, 43.7, -79.45, -79.35);
        let pts = vec![Point::new(-79.38, 43.65), Point::new(-79.38, 43.8)];
        let res = filter_by_bounding_box(&pts, &bbox);
        assert_eq!(res, vec![&pts[0]]);
    }

    #[test]
    fn test_bbox_inclusive_edges() {
        let bbox = BoundingBox::new(43.6, 43.7, -79.45, -79.35);
        let pts = vec![
            Point::new(-79.40, 43.6),
            Point::new(-79.40, 43.7),
            Point::new(-79.45, 43.65),
            Point::new(-79.35, 43.65),
            Point::new(-79.45, 43.6),
            Point::new(-79.35, 43.7),
        ];
        assert_eq!(filter_by_bounding_box(&pts, &bbox).len(), pts.len());

        let outside = vec![Point::new(-79.3499, 43.65), Point::new(-79.40, 43.5999)];
        assert!(filter_by_bounding_box(&outside, &bbox).is_empty());
    }

    #[test]
    fn test_bbox_inverted_matches_nothing() {
        let bbox = BoundingBox::new(43.7, 43.6, -79.45, -79.35);
        let pts = vec![Point::new(-79.38, 43.65), Point::new(-79.38, 43.7)];
        assert!(filter_by_bounding_box(&pts, &bbox).is_empty());

        let bbox = BoundingBox::new(43.6, 43.7, -79.35, -79.45);
        assert!(filter_by_bounding_box(&pts, &bbox).is_empty());
    }

    #[test]
    fn test_bbox_checked() {
        assert!(BoundingBox::checked(43.6, 43.7, -79.45, -79.35).is_ok());
        assert!(matches!(
            BoundingBox::checked(43.7, 43.6, -79.45, -79.35),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BoundingBox::checked(f64::NAN, 43.6, -79.45, -79.35),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_radius_example() {
        let pts = vec![cn_tower()];
        assert_eq!(filter_by_radius(&pts, &RadiusQuery::new(toronto(), 5.0)).len(), 1);
        assert!(filter_by_radius(&pts, &RadiusQuery::new(toronto(), 1.0)).is_empty());
    }

    #[test]
    fn test_radius_inclusive() {
        let d = toronto().distance_km(&cn_tower());
        let pts = vec![cn_tower()];
        assert_eq!(filter_by_radius(&pts, &RadiusQuery::new(toronto(), d)).len(), 1);

        let same = vec![toronto()];
        assert_eq!(filter_by_radius(&same, &RadiusQuery::new(toronto(), 0.0)).len(), 1);
    }

    #[test]
    fn test_radius_negative() {
        let same = vec![toronto()];
        assert!(filter_by_radius(&same, &RadiusQuery::new(toronto(), -1.0)).is_empty());
        assert!(matches!(
            RadiusQuery::checked(toronto(), -1.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(RadiusQuery::checked(toronto(), 0.0).is_ok());
    }

    #[test]
    fn test_absent_locations_excluded() {
        let items = vec![Item(None), Item(Some(toronto())), Item(None), Item(Some(cn_tower()))];

        let bbox = BoundingBox::new(-90.0, 90.0, -180.0, 180.0);
        let res = filter_by_bounding_box(&items, &bbox);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].0, Some(toronto()));
        assert_eq!(res[1].0, Some(cn_tower()));

        let res = filter_by_radius(&items, &RadiusQuery::new(toronto(), 20000.0));
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].0, Some(toronto()));
    }
}
