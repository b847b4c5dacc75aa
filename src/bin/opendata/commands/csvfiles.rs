use clap::{Args, Subcommand, ValueHint};

use crate::commands::{write_json, RunCmd};
use toronto_opendata::config::Settings;
use toronto_opendata::csvfile::{content_disposition, download_filename, read_headers, read_rows, stream_csv};
use toronto_opendata::message;
use toronto_opendata::Result;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum CsvCommands {
    /// prints the header names of a csv file
    Headers(CsvPath),
    /// prints every row of a csv file as json
    Read(CsvPath),
    /// streams a csv file to stdout, or to a file in OUTPUT_DIR
    Stream(CsvStream),
}

impl RunCmd for CsvCommands {
    fn run(&self, settings: &Settings) -> Result<()> {
        match self {
            CsvCommands::Headers(c) => write_json(&read_headers(&c.file_path)?),
            CsvCommands::Read(c) => write_json(&read_rows(&c.file_path)?),
            CsvCommands::Stream(c) => c.run(settings),
        }
    }
}

#[derive(Args, Debug)]
pub struct CsvPath {
    ///path to the csv file (.csv or .csv.gz)
    #[arg(value_hint = ValueHint::FilePath)]
    file_path: String,
}

#[derive(Args, Debug)]
pub struct CsvStream {
    ///path to the csv file (.csv or .csv.gz)
    #[arg(value_hint = ValueHint::FilePath)]
    file_path: String,

    ///name for the downloaded file, defaults to download.csv
    #[arg(short, long)]
    download_filename: Option<String>,

    ///writes the download into this directory instead of stdout
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output_dir: Option<String>,
}

impl RunCmd for CsvStream {
    fn run(&self, _settings: &Settings) -> Result<()> {
        let disposition = content_disposition(self.download_filename.as_deref());

        let written = match &self.output_dir {
            Some(dir) => {
                let outfn = Path::new(dir).join(download_filename(self.download_filename.as_deref()));
                let mut out = BufWriter::new(File::create(&outfn)?);
                let n = stream_csv(&self.file_path, &mut out)?;
                message!("wrote {}", outfn.display());
                n
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                stream_csv(&self.file_path, &mut out)?
            }
        };
        message!("Content-Disposition: {} ({} bytes)", disposition, written);
        Ok(())
    }
}
