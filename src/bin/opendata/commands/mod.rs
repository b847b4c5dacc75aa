mod cli;
mod config;
mod csvfiles;
mod datasets;
mod map;

pub use cli::Cli;
pub use config::{Decode, MapsKey, WriteSettings};
pub use csvfiles::CsvCommands;
pub use datasets::DatasetCommands;
pub use map::{Hotspots, MapCommands};

use serde::Serialize;
use std::io::Write;
use toronto_opendata::config::Settings;
use toronto_opendata::Result;

pub trait RunCmd {
    fn run(&self, settings: &Settings) -> Result<()>;
}

/// Pretty prints `value` to stdout. Messages go to stderr, so the output can
/// be piped.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
