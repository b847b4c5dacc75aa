//! Decoding of the geometry text carried by open data records, for example
//! `{"coordinates": [[-79.48576, 43.685]], "type": "MultiPoint"}`.
//!
//! Only the first coordinate pair is used, so a multipoint is reduced to its
//! first point. Longitude comes first.

use crate::error::{Error, Result};
use crate::geometry::Point;

use serde::{Serialize, Serializer};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    MultiPoint,
    Other(String),
    Unknown,
}

impl GeometryType {
    pub fn from_tag(tag: Option<&str>) -> GeometryType {
        match tag {
            None => GeometryType::Unknown,
            Some("Point") => GeometryType::Point,
            Some("MultiPoint") => GeometryType::MultiPoint,
            Some(t) => GeometryType::Other(String::from(t)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::Other(t) => t,
            GeometryType::Unknown => "Unknown",
        }
    }
}

impl Serialize for GeometryType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedGeometry {
    #[serde(flatten)]
    pub point: Point,
    #[serde(rename = "type")]
    pub geometry_type: GeometryType,
}

/// Outcome of decoding one geometry string.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Geometry(DecodedGeometry),
    Absent,
    Invalid(String),
}

impl Decoded {
    pub fn strict(self) -> Result<Option<DecodedGeometry>> {
        match self {
            Decoded::Geometry(g) => Ok(Some(g)),
            Decoded::Absent => Ok(None),
            Decoded::Invalid(msg) => Err(Error::InvalidGeometry(msg)),
        }
    }

    pub fn lenient(self) -> Option<DecodedGeometry> {
        match self {
            Decoded::Geometry(g) => Some(g),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeMode {
    Strict,
    Lenient,
}

impl DecodeMode {
    pub fn apply(&self, decoded: Decoded) -> Result<Option<DecodedGeometry>> {
        match self {
            DecodeMode::Strict => decoded.strict(),
            DecodeMode::Lenient => Ok(decoded.lenient()),
        }
    }
}

fn invalid(reason: &str, raw: &str) -> Decoded {
    Decoded::Invalid(format!("{} in {:?}", reason, raw))
}

pub fn decode(raw: Option<&str>) -> Decoded {
    let raw = match raw {
        None => return Decoded::Absent,
        Some(r) => r,
    };
    if raw.trim().is_empty() {
        return Decoded::Absent;
    }

    let root: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return invalid(&e.to_string(), raw),
    };

    let geometry_type = GeometryType::from_tag(root.get("type").and_then(Value::as_str));

    let first = match root.get("coordinates").and_then(Value::as_array).and_then(|c| c.first()) {
        Some(f) => f,
        None => return invalid("missing or empty coordinates", raw),
    };

    let pair = match first.as_array() {
        Some(p) => p,
        None => return invalid("first coordinate is not an array", raw),
    };

    match (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) {
        (Some(lon), Some(lat)) => Decoded::Geometry(DecodedGeometry {
            point: Point::new(lon, lat),
            geometry_type,
        }),
        _ => invalid("first coordinate has fewer than two numbers", raw),
    }
}

pub fn decode_strict(raw: Option<&str>) -> Result<Option<DecodedGeometry>> {
    decode(raw).strict()
}

pub fn decode_lenient(raw: Option<&str>) -> Option<DecodedGeometry> {
    decode(raw).lenient()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPOINT: &str = r#"{"coordinates": [[-79.48576, 43.685], [-79.1, 43.9]], "type": "MultiPoint"}"#;

    #[test]
    fn test_decode_first_pair() {
        let g = decode_strict(Some(MULTIPOINT)).unwrap().unwrap();
        assert_eq!(g.point, Point::new(-79.48576, 43.685));
        assert_eq!(g.geometry_type, GeometryType::MultiPoint);

        assert_eq!(decode_lenient(Some(MULTIPOINT)), Some(g));
    }

    #[test]
    fn test_decode_ignores_elevation() {
        let g = decode_lenient(Some(r#"{"type":"MultiPoint","coordinates":[[1.5,2.5,100.0]]}"#)).unwrap();
        assert_eq!(g.point, Point::new(1.5, 2.5));
    }

    #[test]
    fn test_decode_missing_type() {
        let g = decode_lenient(Some(r#"{"coordinates":[[1,2]]}"#)).unwrap();
        assert_eq!(g.geometry_type, GeometryType::Unknown);
        assert_eq!(g.point, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_decode_blank_is_absent() {
        for raw in [None, Some(""), Some("   "), Some("\n\t")] {
            assert_eq!(decode(raw), Decoded::Absent);
            assert!(decode_strict(raw).unwrap().is_none());
            assert!(decode_lenient(raw).is_none());
        }
    }

    #[test]
    fn test_decode_malformed() {
        let bad = [
            "{not json",
            r#"{"type":"MultiPoint"}"#,
            r#"{"type":"MultiPoint","coordinates":[]}"#,
            r#"{"type":"MultiPoint","coordinates":[[1.0]]}"#,
            r#"{"type":"MultiPoint","coordinates":[["a","b"]]}"#,
            r#"{"type":"Point","coordinates":[1.0, 2.0]}"#,
            "[1,2]",
        ];
        for raw in bad {
            assert!(matches!(decode(Some(raw)), Decoded::Invalid(_)), "{}", raw);
            assert!(decode_lenient(Some(raw)).is_none());
            match decode_strict(Some(raw)) {
                Err(Error::InvalidGeometry(_)) => {}
                other => panic!("expected InvalidGeometry for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_decode_mode() {
        assert!(DecodeMode::Lenient.apply(decode(Some("{"))).unwrap().is_none());
        assert!(DecodeMode::Strict.apply(decode(Some("{"))).is_err());
        assert!(DecodeMode::Strict.apply(decode(Some(MULTIPOINT))).unwrap().is_some());
    }

    #[test]
    fn test_serialize_decoded() {
        let g = decode_lenient(Some(MULTIPOINT)).unwrap();
        assert_eq!(
            serde_json::to_value(&g).unwrap(),
            serde_json::json!({"longitude": -79.48576, "latitude": 43.685, "type": "MultiPoint"})
        );
    }
}
