mod source;
mod store;

pub use crate::poi::source::{CkanSource, FileSource, PointOfInterestSource};
pub use crate::poi::store::PointOfInterestStore;

use crate::ckan::RawRecord;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::geometry::{decode, DecodeMode, Decoded, DecodedGeometry, Located, MapFeature, Point};

use serde::Serialize;
use serde_json::{Map, Value};

/// A named place from an open data source. Records whose geometry could not
/// be decoded are kept with `geometry` set to `None`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    pub geometry: Option<DecodedGeometry>,
    pub properties: Map<String, Value>,
}

impl Located for PointOfInterest {
    fn location(&self) -> Option<Point> {
        self.geometry.as_ref().map(|g| g.point)
    }
}

impl MapFeature for PointOfInterest {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

/// Picks the id, name and geometry out of a raw record. Every other field is
/// carried through as a property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMapper {
    pub id_field: String,
    pub name_field: String,
    pub geometry_field: String,
}

impl Default for PropertyMapper {
    fn default() -> PropertyMapper {
        PropertyMapper::new("_id", "NAME", "geometry")
    }
}

fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl PropertyMapper {
    pub fn new(id_field: &str, name_field: &str, geometry_field: &str) -> PropertyMapper {
        PropertyMapper {
            id_field: String::from(id_field),
            name_field: String::from(name_field),
            geometry_field: String::from(geometry_field),
        }
    }

    pub fn from_settings(settings: &Settings) -> PropertyMapper {
        PropertyMapper::new(&settings.id_field, &settings.name_field, &settings.geometry_field)
    }

    fn decode_geometry(&self, value: Option<&Value>) -> Decoded {
        match value {
            None | Some(Value::Null) => Decoded::Absent,
            Some(Value::String(s)) => decode(Some(s.as_str())),
            // some datastore dumps hold the geometry as an object, not text
            Some(obj @ Value::Object(_)) => decode(Some(obj.to_string().as_str())),
            Some(other) => Decoded::Invalid(format!("geometry field holds {}", other)),
        }
    }

    /// Converts record number `index` (counting from zero). Records without
    /// an id are numbered from one.
    pub fn map_record(&self, index: usize, mut record: RawRecord, mode: DecodeMode) -> Result<PointOfInterest> {
        let id = match record.remove(&self.id_field).as_ref().and_then(value_as_string) {
            Some(i) => i,
            None => (index + 1).to_string(),
        };
        let name = record
            .remove(&self.name_field)
            .as_ref()
            .and_then(value_as_string)
            .unwrap_or_default();

        let decoded = self.decode_geometry(record.remove(&self.geometry_field).as_ref());
        let geometry = match mode.apply(decoded) {
            Ok(g) => g,
            Err(Error::InvalidGeometry(m)) => {
                return Err(Error::InvalidGeometry(format!("record {} ({}): {}", id, name, m)));
            }
            Err(e) => return Err(e),
        };

        Ok(PointOfInterest {
            id,
            name,
            geometry,
            properties: record,
        })
    }
}
