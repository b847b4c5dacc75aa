use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use std::fs::File;
use std::io::BufReader;

pub const DEFAULT_CKAN_BASE_URL: &str = "https://ckan0.cf.opendata.inter.prod-toronto.ca";
pub const DEFAULT_HOTSPOT_PACKAGE: &str = "cultural-hotspot-points-of-interest";
pub const MAPS_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub ckan_base_url: String,
    pub hotspot_package: String,
    pub id_field: String,
    pub name_field: String,
    pub geometry_field: String,
    pub strict_geometry: bool,
    pub datasets_file: String,
    pub page_size: usize,
    pub default_radius_km: f64,
    pub google_maps_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            ckan_base_url: String::from(DEFAULT_CKAN_BASE_URL),
            hotspot_package: String::from(DEFAULT_HOTSPOT_PACKAGE),
            id_field: String::from("_id"),
            name_field: String::from("NAME"),
            geometry_field: String::from("geometry"),
            strict_geometry: false,
            datasets_file: String::from("datasets.json"),
            page_size: 1000,
            default_radius_km: 5.0,
            google_maps_api_key: None,
        }
    }
}

impl Settings {
    pub fn from_file(infn: &str) -> Result<Settings> {
        let ff = File::open(infn)?;
        let settings: Settings = serde_json::from_reader(BufReader::new(ff))?;
        settings.check()?;
        Ok(settings)
    }

    /// Reads `infn` when given, otherwise starts from the defaults. The maps
    /// key can always be replaced by the environment.
    pub fn load(infn: Option<&str>) -> Result<Settings> {
        let mut settings = match infn {
            Some(f) => Settings::from_file(f)?,
            None => Settings::default(),
        };
        if let Ok(key) = std::env::var(MAPS_KEY_ENV) {
            if !key.trim().is_empty() {
                settings.google_maps_api_key = Some(key);
            }
        }
        Ok(settings)
    }

    pub fn write(&self, outfn: &str) -> Result<()> {
        let ff = File::create(outfn)?;
        serde_json::to_writer_pretty(ff, self)?;
        Ok(())
    }

    pub fn check(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidInput(String::from("PageSize must be at least 1")));
        }
        if !self.default_radius_km.is_finite() || self.default_radius_km < 0.0 {
            return Err(Error::InvalidInput(format!(
                "DefaultRadiusKm must be a non-negative number, not {}",
                self.default_radius_km
            )));
        }
        if self.geometry_field.is_empty() {
            return Err(Error::InvalidInput(String::from("GeometryField must not be empty")));
        }
        Ok(())
    }

    /// Body of the maps key response, `{"apiKey": ...}`.
    pub fn maps_key(&self) -> Result<Value> {
        match &self.google_maps_api_key {
            Some(k) => Ok(json!({ "apiKey": k })),
            None => Err(Error::NotFound(format!(
                "no maps api key: set GoogleMapsApiKey or {}",
                MAPS_KEY_ENV
            ))),
        }
    }
}
