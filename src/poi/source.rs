use crate::ckan::{active_resource_id, CkanClient, DatastorePage, RawRecord};
use crate::config::Settings;
use crate::csvfile::{has_csv_extension, open_csv};
use crate::error::{Error, Result};
use crate::logging::{messenger, ProgressPercent};
use crate::message;

use serde_json::Value;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Supplies the raw records a `PointOfInterestStore` is built from. Each call
/// fetches afresh; nothing is cached.
pub trait PointOfInterestSource {
    fn fetch(&self) -> Result<Vec<RawRecord>>;
}

impl PointOfInterestSource for Vec<RawRecord> {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(self.clone())
    }
}

/// Reads every record of the first datastore resource of a CKAN package.
pub struct CkanSource {
    client: CkanClient,
    package_id: String,
    page_size: usize,
}

impl CkanSource {
    pub fn new(client: CkanClient, package_id: &str, page_size: usize) -> CkanSource {
        CkanSource {
            client,
            package_id: String::from(package_id),
            page_size: usize::max(page_size, 1),
        }
    }

    pub fn from_settings(settings: &Settings) -> CkanSource {
        CkanSource::new(
            CkanClient::new(&settings.ckan_base_url),
            &settings.hotspot_package,
            settings.page_size,
        )
    }
}

impl PointOfInterestSource for CkanSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let package = self.client.package_show(&self.package_id)?;
        let resource_id = match active_resource_id(&package) {
            Some(r) => r,
            None => {
                return Err(Error::NotFound(format!(
                    "package {} has no datastore resource",
                    self.package_id
                )));
            }
        };

        let progress = messenger().start_progress_percent(&format!("fetch {}", self.package_id));
        let records = read_all_pages(self.page_size, progress.as_ref(), |offset| {
            self.client.datastore_search(&resource_id, self.page_size, offset)
        })?;
        progress.finish();

        message!("fetched {} records from {} [{}]", records.len(), self.package_id, resource_id);
        Ok(records)
    }
}

/// Reads datastore pages from offset zero until `total` records have been
/// read. The server may return fewer rows than asked for, so a short page
/// only ends the read when no total is reported.
fn read_all_pages<F>(page_size: usize, progress: &dyn ProgressPercent, mut read_page: F) -> Result<Vec<RawRecord>>
where
    F: FnMut(usize) -> Result<DatastorePage>,
{
    let mut records = Vec::new();
    loop {
        let page = read_page(records.len())?;
        let num = page.records.len();
        records.extend(page.records);

        if num == 0 {
            break;
        }
        match page.total {
            Some(total) => {
                if total > 0 {
                    progress.progress_percent(100.0 * (records.len() as f64) / (total as f64));
                }
                if records.len() as u64 >= total {
                    break;
                }
            }
            None => {
                if num < page_size {
                    break;
                }
            }
        }
    }
    Ok(records)
}

/// Reads records from a local file: either a csv file with a header row, or
/// a json file holding an array of records or a datastore_search response.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> FileSource {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn fetch_csv(&self) -> Result<Vec<RawRecord>> {
        let mut rdr = open_csv(&self.path)?;
        let headers = rdr.headers()?.clone();

        let mut res = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let mut rec = RawRecord::new();
            for (k, v) in headers.iter().zip(row.iter()) {
                rec.insert(String::from(k), Value::String(String::from(v)));
            }
            res.push(rec);
        }
        Ok(res)
    }

    fn fetch_json(&self) -> Result<Vec<RawRecord>> {
        let ff = File::open(&self.path)?;
        let root: Value = serde_json::from_reader(BufReader::new(ff))?;
        records_from_json(root)
            .ok_or_else(|| Error::InvalidInput(format!("{} does not hold a list of records", self.path.display())))
    }
}

fn records_from_json(root: Value) -> Option<Vec<RawRecord>> {
    let list = match root {
        Value::Array(a) => a,
        Value::Object(mut obj) => {
            // full action response, or just its result
            let inner = match obj.remove("result") {
                Some(r) => r,
                None => Value::Object(obj),
            };
            match inner {
                Value::Object(mut r) => match r.remove("records") {
                    Some(Value::Array(a)) => a,
                    _ => return None,
                },
                _ => return None,
            }
        }
        _ => return None,
    };

    let mut res = Vec::with_capacity(list.len());
    for item in list {
        match item {
            Value::Object(m) => res.push(m),
            _ => return None,
        }
    }
    Some(res)
}

impl PointOfInterestSource for FileSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let recs = if has_csv_extension(&self.path.to_string_lossy()) {
            self.fetch_csv()?
        } else {
            self.fetch_json()?
        };
        message!("read {} records from {}", recs.len(), self.path.display());
        Ok(recs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!("opendata-{}-{}", std::process::id(), name));
        let mut f = File::create(&p).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        p
    }

    struct NoProgress;
    impl ProgressPercent for NoProgress {
        fn progress_percent(&self, _percent: f64) {}
        fn finish(&self) {}
    }

    fn numbered(from: usize, to: usize) -> Vec<RawRecord> {
        (from..to)
            .map(|i| match json!({"_id": i + 1}) {
                Value::Object(m) => m,
                _ => unreachable!(),
            })
            .collect()
    }

    // serves at most `cap` rows per request, whatever limit is asked for
    fn capped_pages(total: usize, cap: usize, report_total: bool, offsets: &mut Vec<usize>, offset: usize) -> DatastorePage {
        offsets.push(offset);
        let end = usize::min(offset + cap, total);
        DatastorePage {
            records: if offset < total { numbered(offset, end) } else { Vec::new() },
            total: if report_total { Some(total as u64) } else { None },
        }
    }

    #[test]
    fn test_read_all_pages_server_cap() {
        let mut offsets = Vec::new();
        let recs = read_all_pages(5, &NoProgress, |off| Ok(capped_pages(7, 3, true, &mut offsets, off))).unwrap();
        assert_eq!(recs.len(), 7);
        assert_eq!(offsets, vec![0, 3, 6]);
        assert_eq!(recs[6]["_id"], json!(7));
    }

    #[test]
    fn test_read_all_pages_exact_multiple() {
        let mut offsets = Vec::new();
        let recs = read_all_pages(3, &NoProgress, |off| Ok(capped_pages(6, 3, true, &mut offsets, off))).unwrap();
        assert_eq!(recs.len(), 6);
        assert_eq!(offsets, vec![0, 3]);
    }

    #[test]
    fn test_read_all_pages_without_total() {
        let mut offsets = Vec::new();
        let recs = read_all_pages(3, &NoProgress, |off| Ok(capped_pages(7, 3, false, &mut offsets, off))).unwrap();
        assert_eq!(recs.len(), 7);
        assert_eq!(offsets, vec![0, 3, 6]);
    }

    #[test]
    fn test_read_all_pages_empty_page_stops() {
        // total larger than what the resource really holds
        let mut calls = 0;
        let recs = read_all_pages(5, &NoProgress, |off| {
            calls += 1;
            Ok(DatastorePage {
                records: if off == 0 { numbered(0, 2) } else { Vec::new() },
                total: Some(10),
            })
        })
        .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_read_all_pages_error() {
        let res = read_all_pages(5, &NoProgress, |_| Err(Error::CkanError(String::from("datastore_search: down"))));
        assert!(matches!(res, Err(Error::CkanError(_))));
    }

    #[test]
    fn test_records_from_json() {
        assert_eq!(records_from_json(json!([{"a": 1}, {"a": 2}])).unwrap().len(), 2);
        assert_eq!(records_from_json(json!({"records": [{"a": 1}]})).unwrap().len(), 1);
        assert_eq!(
            records_from_json(json!({"success": true, "result": {"records": [{"a": 1}], "total": 1}}))
                .unwrap()
                .len(),
            1
        );
        assert!(records_from_json(json!([1, 2])).is_none());
        assert!(records_from_json(json!({"other": []})).is_none());
        assert!(records_from_json(json!("x")).is_none());
    }

    #[test]
    fn test_file_source_json() {
        let p = temp_file(
            "hotspots.json",
            r#"[{"_id": 1, "NAME": "a", "geometry": "{\"coordinates\": [[-79.4, 43.7]], \"type\": \"MultiPoint\"}"}]"#,
        );
        let recs = FileSource::new(&p).fetch().unwrap();
        std::fs::remove_file(&p).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["NAME"], json!("a"));
    }

    #[test]
    fn test_file_source_csv() {
        let p = temp_file(
            "hotspots.csv",
            "_id,NAME,geometry\n1,a,\"{\"\"coordinates\"\": [[-79.4, 43.7]], \"\"type\"\": \"\"MultiPoint\"\"}\"\n2,b,\n",
        );
        let recs = FileSource::new(&p).fetch().unwrap();
        std::fs::remove_file(&p).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["geometry"], json!("{\"coordinates\": [[-79.4, 43.7]], \"type\": \"MultiPoint\"}"));
        assert_eq!(recs[1]["NAME"], json!("b"));
        assert_eq!(recs[1]["geometry"], json!(""));
    }

    #[test]
    fn test_file_source_bad_json() {
        let p = temp_file("bad.json", r#"{"nothing": true}"#);
        let res = FileSource::new(&p).fetch();
        std::fs::remove_file(&p).unwrap();
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }
}
