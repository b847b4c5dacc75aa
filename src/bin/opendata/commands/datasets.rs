use clap::{Args, Subcommand};

use crate::commands::{write_json, RunCmd};
use toronto_opendata::ckan::CkanClient;
use toronto_opendata::config::Settings;
use toronto_opendata::datasets::{Dataset, DatasetRepository, JsonFileRepository};
use toronto_opendata::message;
use toronto_opendata::{Error, Result};

#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// lists the catalogue, optionally filtered by category or format
    List(DatasetList),
    /// shows one catalogue entry
    Show(DatasetId),
    /// adds (or with --id replaces) a catalogue entry
    Add(DatasetAdd),
    /// removes a catalogue entry
    Delete(DatasetId),
    /// adds a package from the open data portal to the catalogue
    Import(PackageId),
    /// prints the open data portal metadata of a package
    Remote(PackageId),
    /// searches the open data portal
    Search(DatasetSearch),
}

fn repository(settings: &Settings) -> JsonFileRepository {
    JsonFileRepository::new(&settings.datasets_file)
}

impl RunCmd for DatasetCommands {
    fn run(&self, settings: &Settings) -> Result<()> {
        match self {
            DatasetCommands::List(c) => c.run(settings),
            DatasetCommands::Show(c) => match repository(settings).find_by_id(c.id)? {
                Some(d) => write_json(&d),
                None => Err(Error::NotFound(format!("dataset {}", c.id))),
            },
            DatasetCommands::Add(c) => c.run(settings),
            DatasetCommands::Delete(c) => {
                repository(settings).delete(c.id)?;
                message!("deleted dataset {}", c.id);
                Ok(())
            }
            DatasetCommands::Import(c) => {
                let package = CkanClient::new(&settings.ckan_base_url).package_show(&c.package)?;
                let saved = repository(settings).save(Dataset::from_package(&package)?)?;
                write_json(&saved)
            }
            DatasetCommands::Remote(c) => {
                write_json(&CkanClient::new(&settings.ckan_base_url).package_show(&c.package)?)
            }
            DatasetCommands::Search(c) => c.run(settings),
        }
    }
}

#[derive(Args, Debug)]
pub struct DatasetList {
    ///only datasets in this category
    #[arg(short, long)]
    category: Option<String>,

    ///only datasets in this format
    #[arg(short, long, conflicts_with = "category")]
    format: Option<String>,
}

impl RunCmd for DatasetList {
    fn run(&self, settings: &Settings) -> Result<()> {
        let repo = repository(settings);
        let res = match (&self.category, &self.format) {
            (Some(c), _) => repo.find_by_category(c)?,
            (None, Some(f)) => repo.find_by_format(f)?,
            (None, None) => repo.find_all()?,
        };
        write_json(&res)
    }
}

#[derive(Args, Debug)]
pub struct DatasetId {
    id: u64,
}

#[derive(Args, Debug)]
pub struct PackageId {
    ///package name or id on the open data portal
    package: String,
}

#[derive(Args, Debug)]
pub struct DatasetAdd {
    ///replaces the dataset with this id
    #[arg(long)]
    id: Option<u64>,

    #[arg(short, long)]
    name: String,

    #[arg(short, long)]
    description: String,

    #[arg(short, long)]
    category: Option<String>,

    #[arg(short, long)]
    format: Option<String>,

    #[arg(short, long)]
    last_updated: Option<String>,

    #[arg(short = 'u', long)]
    download_url: Option<String>,
}

impl RunCmd for DatasetAdd {
    fn run(&self, settings: &Settings) -> Result<()> {
        let ds = Dataset {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            format: self.format.clone(),
            last_updated: self.last_updated.clone(),
            download_url: self.download_url.clone(),
        };
        write_json(&repository(settings).save(ds)?)
    }
}

#[derive(Args, Debug)]
pub struct DatasetSearch {
    query: String,

    ///number of results
    #[arg(short, long, default_value_t = 10)]
    rows: usize,
}

impl RunCmd for DatasetSearch {
    fn run(&self, settings: &Settings) -> Result<()> {
        let res = CkanClient::new(&settings.ckan_base_url).package_search(&self.query, self.rows)?;
        write_json(&res)
    }
}
