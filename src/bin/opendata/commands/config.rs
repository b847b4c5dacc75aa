use clap::{Args, ValueHint};

use crate::commands::{write_json, RunCmd};
use toronto_opendata::config::Settings;
use toronto_opendata::geometry::DecodeMode;
use toronto_opendata::map::decode_geometry;
use toronto_opendata::message;
use toronto_opendata::Result;

#[derive(Args, Debug)]
pub struct MapsKey {}

impl RunCmd for MapsKey {
    fn run(&self, settings: &Settings) -> Result<()> {
        write_json(&settings.maps_key()?)
    }
}

#[derive(Args, Debug)]
pub struct Decode {
    ///geometry json, eg '{"coordinates": [[-79.48576, 43.685]], "type": "MultiPoint"}'
    geometry: String,

    ///reports malformed geometry as an error rather than null
    #[arg(long)]
    strict: bool,
}

impl RunCmd for Decode {
    fn run(&self, _settings: &Settings) -> Result<()> {
        let mode = if self.strict { DecodeMode::Strict } else { DecodeMode::Lenient };
        write_json(&decode_geometry(Some(self.geometry.as_str()), mode)?)
    }
}

#[derive(Args, Debug)]
pub struct WriteSettings {
    ///output file
    #[arg(default_value = "settings.json", value_hint = ValueHint::FilePath)]
    output: String,
}

impl RunCmd for WriteSettings {
    fn run(&self, settings: &Settings) -> Result<()> {
        settings.write(&self.output)?;
        message!("wrote {}", self.output);
        Ok(())
    }
}
