mod repository;

pub use crate::datasets::repository::{DatasetRepository, JsonFileRepository, MemoryRepository};

use crate::ckan::package_resources;
use crate::error::{Error, Result};
use crate::utils::{parse_timestamp, timestamp_string};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalogue entry for one open data set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

fn non_blank(v: Option<&Value>) -> Option<String> {
    match v.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Some(String::from(s.trim())),
        _ => None,
    }
}

fn normalise_timestamp(ts: String) -> String {
    match parse_timestamp(&ts) {
        Ok(t) => timestamp_string(t),
        Err(_) => ts,
    }
}

impl Dataset {
    pub fn new(name: &str, description: &str) -> Dataset {
        Dataset {
            name: String::from(name),
            description: String::from(description),
            ..Dataset::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput(String::from("dataset name must not be blank")));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "dataset {} description must not be blank",
                self.name
            )));
        }
        Ok(())
    }

    /// Builds a dataset from CKAN `package_show` metadata. The format and
    /// download url come from the first resource.
    pub fn from_package(package: &Value) -> Result<Dataset> {
        let name = match non_blank(package.get("title")).or_else(|| non_blank(package.get("name"))) {
            Some(n) => n,
            None => return Err(Error::InvalidInput(String::from("package has no title or name"))),
        };
        let description = non_blank(package.get("notes"))
            .or_else(|| non_blank(package.get("excerpt")))
            .unwrap_or_else(|| name.clone());

        // topics is a comma separated string on the Toronto portal
        let category = non_blank(package.get("topics"))
            .and_then(|t| t.split(',').map(|s| s.trim().to_string()).find(|s| !s.is_empty()))
            .or_else(|| {
                package
                    .get("groups")
                    .and_then(Value::as_array)
                    .and_then(|g| g.first())
                    .and_then(|g| non_blank(g.get("title")))
            });

        let first = package_resources(package).first();
        let format = first.and_then(|r| non_blank(r.get("format")));
        let download_url = first.and_then(|r| non_blank(r.get("url")));

        let last_updated = non_blank(package.get("last_refreshed"))
            .or_else(|| non_blank(package.get("metadata_modified")))
            .map(normalise_timestamp);

        let ds = Dataset {
            id: None,
            name,
            description,
            category,
            format,
            last_updated,
            download_url,
        };
        ds.validate()?;
        Ok(ds)
    }
}
