use clap::{Parser, Subcommand, ValueHint};

use crate::commands::{
    CsvCommands, DatasetCommands, Decode, Hotspots, MapCommands, MapsKey, RunCmd, WriteSettings,
};
use toronto_opendata::config::Settings;
use toronto_opendata::Result;

#[derive(Parser)]
#[command(version, about = "Toronto open data: datasets, csv files and cultural hotspots", long_about = None)]
pub struct Cli {
    ///reads settings from a json file (see write-settings)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// lists every cultural hotspot point of interest, with or without a location
    Hotspots(Hotspots),

    /// cultural hotspots as map points or geojson
    #[command(subcommand)]
    Map(MapCommands),

    /// reads or streams a local csv file
    #[command(subcommand)]
    Csv(CsvCommands),

    /// dataset catalogue, and metadata from the open data portal
    #[command(subcommand)]
    Datasets(DatasetCommands),

    /// prints the google maps api key as json
    MapsKey(MapsKey),

    /// decodes a geometry string and prints the point
    Decode(Decode),

    /// writes the settings in use to a json file
    WriteSettings(WriteSettings),
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let settings = Settings::load(self.settings.as_deref())?;
        self.command.run(&settings)
    }
}

impl RunCmd for Commands {
    fn run(&self, settings: &Settings) -> Result<()> {
        match self {
            Commands::Hotspots(c) => c.run(settings),
            Commands::Map(c) => c.run(settings),
            Commands::Csv(c) => c.run(settings),
            Commands::Datasets(c) => c.run(settings),
            Commands::MapsKey(c) => c.run(settings),
            Commands::Decode(c) => c.run(settings),
            Commands::WriteSettings(c) => c.run(settings),
        }
    }
}
