use crate::datasets::Dataset;
use crate::error::{Error, Result};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait DatasetRepository {
    fn find_all(&self) -> Result<Vec<Dataset>>;

    fn find_by_id(&self, id: u64) -> Result<Option<Dataset>> {
        Ok(self.find_all()?.into_iter().find(|d| d.id == Some(id)))
    }

    fn find_by_category(&self, category: &str) -> Result<Vec<Dataset>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|d| d.category.as_deref() == Some(category))
            .collect())
    }

    fn find_by_format(&self, format: &str) -> Result<Vec<Dataset>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|d| d.format.as_deref() == Some(format))
            .collect())
    }

    /// Inserts or replaces `dataset`, giving it the next free id if it has
    /// none. Returns the stored dataset.
    fn save(&mut self, dataset: Dataset) -> Result<Dataset>;

    fn delete(&mut self, id: u64) -> Result<()>;
}

fn upsert(datasets: &mut Vec<Dataset>, mut dataset: Dataset) -> Result<Dataset> {
    dataset.validate()?;
    match dataset.id {
        None => {
            let next = datasets.iter().filter_map(|d| d.id).max().unwrap_or(0) + 1;
            dataset.id = Some(next);
            datasets.push(dataset.clone());
        }
        Some(id) => match datasets.iter_mut().find(|d| d.id == Some(id)) {
            Some(existing) => {
                *existing = dataset.clone();
            }
            None => datasets.push(dataset.clone()),
        },
    }
    Ok(dataset)
}

fn remove(datasets: &mut Vec<Dataset>, id: u64) -> Result<()> {
    let before = datasets.len();
    datasets.retain(|d| d.id != Some(id));
    if datasets.len() == before {
        return Err(Error::NotFound(format!("dataset {}", id)));
    }
    Ok(())
}

fn write_catalogue(path: &Path, datasets: &[Dataset]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, datasets)?;
    out.flush()?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    datasets: Vec<Dataset>,
}

impl MemoryRepository {
    pub fn new() -> MemoryRepository {
        MemoryRepository::default()
    }
}

impl DatasetRepository for MemoryRepository {
    fn find_all(&self) -> Result<Vec<Dataset>> {
        Ok(self.datasets.clone())
    }

    fn save(&mut self, dataset: Dataset) -> Result<Dataset> {
        upsert(&mut self.datasets, dataset)
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        remove(&mut self.datasets, id)
    }
}

/// Keeps the catalogue as a json array in one file. A missing file is an
/// empty catalogue.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> JsonFileRepository {
        JsonFileRepository {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Result<Vec<Dataset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let ff = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(ff))?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Writes to a temporary file next to the catalogue, then renames it over
    /// the catalogue, so a failed write leaves the old file in place.
    fn write(&self, datasets: &[Dataset]) -> Result<()> {
        let tmp = self.temp_path();
        if let Err(e) = write_catalogue(&tmp, datasets) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DatasetRepository for JsonFileRepository {
    fn find_all(&self) -> Result<Vec<Dataset>> {
        self.read()
    }

    fn save(&mut self, dataset: Dataset) -> Result<Dataset> {
        let mut datasets = self.read()?;
        let res = upsert(&mut datasets, dataset)?;
        self.write(&datasets)?;
        Ok(res)
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        let mut datasets = self.read()?;
        remove(&mut datasets, id)?;
        self.write(&datasets)
    }
}
