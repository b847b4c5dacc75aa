use clap::{Args, Subcommand, ValueHint};

use crate::commands::{write_json, RunCmd};
use toronto_opendata::config::Settings;
use toronto_opendata::geometry::DecodeMode;
use toronto_opendata::map::MapService;
use toronto_opendata::message;
use toronto_opendata::poi::{CkanSource, FileSource, PointOfInterestStore, PropertyMapper};
use toronto_opendata::utils::Timer;
use toronto_opendata::Result;

#[derive(Args, Debug)]
pub struct SourceArgs {
    ///reads hotspots from a local json or csv file instead of the open data portal
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: Option<String>,

    ///fails on the first record with an invalid geometry
    #[arg(long)]
    strict: bool,
}

impl SourceArgs {
    fn load(&self, settings: &Settings) -> Result<MapService> {
        let mapper = PropertyMapper::from_settings(settings);
        let mode = if self.strict || settings.strict_geometry {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        };

        let timer = Timer::new();
        let store = match &self.input {
            Some(f) => PointOfInterestStore::load(&FileSource::new(f), &mapper, mode)?,
            None => PointOfInterestStore::load(&CkanSource::from_settings(settings), &mapper, mode)?,
        };
        message!(
            "loaded {} points of interest ({} located) in {:0.1}s",
            store.len(),
            store.num_located(),
            timer.since()
        );

        Ok(MapService::with_default_radius(store, settings.default_radius_km))
    }
}

#[derive(Args, Debug)]
pub struct Hotspots {
    #[command(flatten)]
    source: SourceArgs,
}

impl RunCmd for Hotspots {
    fn run(&self, settings: &Settings) -> Result<()> {
        let service = self.source.load(settings)?;
        write_json(service.hotspots())
    }
}

#[derive(Subcommand, Debug)]
pub enum MapCommands {
    /// every located hotspot as a simple map point
    Points(MapPoints),
    /// every located hotspot as a geojson FeatureCollection
    Geojson(MapGeojson),
    /// hotspots inside a lat/lon bounding box (edges included)
    Bounds(MapBounds),
    /// hotspots within a radius, in km, of a centre point
    Nearby(MapNearby),
}

impl RunCmd for MapCommands {
    fn run(&self, settings: &Settings) -> Result<()> {
        match self {
            MapCommands::Points(c) => c.run(settings),
            MapCommands::Geojson(c) => c.run(settings),
            MapCommands::Bounds(c) => c.run(settings),
            MapCommands::Nearby(c) => c.run(settings),
        }
    }
}

#[derive(Args, Debug)]
pub struct MapPoints {
    #[command(flatten)]
    source: SourceArgs,
}

impl RunCmd for MapPoints {
    fn run(&self, settings: &Settings) -> Result<()> {
        write_json(&self.source.load(settings)?.points())
    }
}

#[derive(Args, Debug)]
pub struct MapGeojson {
    #[command(flatten)]
    source: SourceArgs,
}

impl RunCmd for MapGeojson {
    fn run(&self, settings: &Settings) -> Result<()> {
        write_json(&self.source.load(settings)?.geojson())
    }
}

#[derive(Args, Debug)]
pub struct MapBounds {
    #[command(flatten)]
    source: SourceArgs,

    ///minimum latitude
    #[arg(long, allow_negative_numbers = true)]
    min_lat: f64,

    ///maximum latitude
    #[arg(long, allow_negative_numbers = true)]
    max_lat: f64,

    ///minimum longitude
    #[arg(long, allow_negative_numbers = true)]
    min_lon: f64,

    ///maximum longitude
    #[arg(long, allow_negative_numbers = true)]
    max_lon: f64,
}

impl RunCmd for MapBounds {
    fn run(&self, settings: &Settings) -> Result<()> {
        let service = self.source.load(settings)?;
        write_json(&service.points_in_bounds(self.min_lat, self.max_lat, self.min_lon, self.max_lon))
    }
}

#[derive(Args, Debug)]
pub struct MapNearby {
    #[command(flatten)]
    source: SourceArgs,

    ///centre latitude
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    ///centre longitude
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    ///radius in km, defaults to DefaultRadiusKm from the settings (5.0)
    #[arg(short, long, allow_negative_numbers = true)]
    radius_km: Option<f64>,
}

impl RunCmd for MapNearby {
    fn run(&self, settings: &Settings) -> Result<()> {
        let service = self.source.load(settings)?;
        write_json(&service.points_nearby(self.lat, self.lon, self.radius_km))
    }
}
