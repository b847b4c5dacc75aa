//! Reading and streaming of local csv files. Files ending `.csv.gz` are
//! decompressed as they are read.

use crate::error::{Error, Result};
use crate::logging::{messenger, ProgressBytes};

use flate2::read::GzDecoder;
use regex::Regex;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "download.csv";

const CHUNK_SIZE: usize = 64 * 1024;

fn csv_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.csv(\.gz)?$").expect("bad csv name regex"))
}

fn unsafe_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("bad filename regex"))
}

pub fn has_csv_extension(fname: &str) -> bool {
    csv_name_regex().is_match(fname)
}

fn is_gzipped(fname: &str) -> bool {
    fname.to_lowercase().ends_with(".gz")
}

pub fn is_valid_csv_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !has_csv_extension(&path.to_string_lossy()) {
        return false;
    }
    match std::fs::metadata(path) {
        Ok(m) => m.is_file(),
        Err(_) => false,
    }
}

fn check_csv_file(path: &Path) -> Result<()> {
    if is_valid_csv_file(path) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("{} is not a readable csv file", path.display())))
    }
}

/// Counts bytes as they are read from the underlying file.
struct ProgressReader<R: Read> {
    inner: R,
    pos: u64,
    progress: Box<dyn ProgressBytes>,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        self.progress.progress_bytes(self.pos);
        Ok(n)
    }
}

impl<R: Read> Drop for ProgressReader<R> {
    fn drop(&mut self) {
        self.progress.finish();
    }
}

fn open_reader(path: &Path, progress: Option<Box<dyn ProgressBytes>>) -> Result<Box<dyn Read>> {
    check_csv_file(path)?;
    let ff = File::open(path)?;

    let inner: Box<dyn Read> = match progress {
        Some(progress) => Box::new(ProgressReader { inner: ff, pos: 0, progress }),
        None => Box::new(ff),
    };

    if is_gzipped(&path.to_string_lossy()) {
        Ok(Box::new(GzDecoder::new(BufReader::new(inner))))
    } else {
        Ok(Box::new(BufReader::new(inner)))
    }
}

pub fn open_csv<P: AsRef<Path>>(path: P) -> Result<csv::Reader<Box<dyn Read>>> {
    let rdr = open_reader(path.as_ref(), None)?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(rdr))
}

pub fn read_headers<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut rdr = open_csv(path)?;
    Ok(rdr.headers()?.iter().map(String::from).collect())
}

/// Every row of the file keyed by header. Short rows only hold the columns
/// they have.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<BTreeMap<String, String>>> {
    let mut rdr = open_csv(path)?;
    let headers = rdr.headers()?.clone();

    let mut res = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut m = BTreeMap::new();
        for (k, v) in headers.iter().zip(row.iter()) {
            m.insert(String::from(k), String::from(v));
        }
        res.push(m);
    }
    Ok(res)
}

/// Copies the file to `out` a chunk at a time, returning the number of bytes
/// written.
pub fn stream_csv<P: AsRef<Path>, W: Write>(path: P, out: &mut W) -> Result<u64> {
    let path = path.as_ref();
    check_csv_file(path)?;
    let total = std::fs::metadata(path)?.len();

    let progress = messenger().start_progress_bytes(&format!("stream {}", path.display()), total);
    let mut rdr = open_reader(path, Some(progress))?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = rdr.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        written += n as u64;
    }
    out.flush()?;
    Ok(written)
}

pub fn download_filename(requested: Option<&str>) -> String {
    let name = match requested {
        Some(r) => unsafe_filename_chars().replace_all(r.trim(), "_").into_owned(),
        None => String::new(),
    };
    if name.is_empty() || name.chars().all(|c| c == '.' || c == '_') {
        String::from(DEFAULT_DOWNLOAD_FILENAME)
    } else {
        name
    }
}

/// Value of the content-disposition header for a csv download.
pub fn content_disposition(requested: Option<&str>) -> String {
    format!("attachment; filename=\"{}\"", download_filename(requested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::path::PathBuf;

    const CONTENTS: &str = "name,category,ward\nAGO,Gallery,10\nROM,Museum,11\nShort,Park\n";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("opendata-csv-{}-{}", std::process::id(), name))
    }

    fn write_plain(name: &str) -> PathBuf {
        let p = temp_path(name);
        std::fs::write(&p, CONTENTS).unwrap();
        p
    }

    fn write_gz(name: &str) -> PathBuf {
        let p = temp_path(name);
        let mut enc = GzEncoder::new(File::create(&p).unwrap(), Compression::default());
        enc.write_all(CONTENTS.as_bytes()).unwrap();
        enc.finish().unwrap();
        p
    }

    #[test]
    fn test_has_csv_extension() {
        assert!(has_csv_extension("a/b/data.csv"));
        assert!(has_csv_extension("DATA.CSV"));
        assert!(has_csv_extension("data.csv.gz"));
        assert!(!has_csv_extension("data.json"));
        assert!(!has_csv_extension("data.csv.bak"));
    }

    #[test]
    fn test_is_valid_csv_file() {
        let p = write_plain("valid.csv");
        assert!(is_valid_csv_file(&p));
        std::fs::remove_file(&p).unwrap();
        assert!(!is_valid_csv_file(&p));
        assert!(!is_valid_csv_file(std::env::temp_dir()));
    }

    #[test]
    fn test_read_headers_and_rows() {
        let p = write_plain("rows.csv");
        let headers = read_headers(&p).unwrap();
        let rows = read_rows(&p).unwrap();
        std::fs::remove_file(&p).unwrap();

        assert_eq!(headers, vec!["name", "category", "ward"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["name"], "ROM");
        assert_eq!(rows[1]["ward"], "11");
        assert_eq!(rows[2].len(), 2);
    }

    #[test]
    fn test_read_gzipped() {
        let p = write_gz("rows.csv.gz");
        let rows = read_rows(&p).unwrap();
        let mut out = Vec::new();
        let n = stream_csv(&p, &mut out).unwrap();
        std::fs::remove_file(&p).unwrap();

        assert_eq!(rows[0]["category"], "Gallery");
        assert_eq!(out, CONTENTS.as_bytes());
        assert_eq!(n, CONTENTS.len() as u64);
    }

    #[test]
    fn test_stream_csv() {
        let p = write_plain("stream.csv");
        let mut out = Vec::new();
        let n = stream_csv(&p, &mut out).unwrap();
        std::fs::remove_file(&p).unwrap();
        assert_eq!(out, CONTENTS.as_bytes());
        assert_eq!(n, CONTENTS.len() as u64);
    }

    #[test]
    fn test_invalid_path() {
        let mut out = Vec::new();
        let missing = temp_path("missing.csv");
        assert!(matches!(read_headers(&missing), Err(Error::InvalidInput(_))));
        assert!(matches!(stream_csv(&missing, &mut out), Err(Error::InvalidInput(_))));
        assert!(matches!(read_rows("Cargo.toml"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(content_disposition(None), "attachment; filename=\"download.csv\"");
        assert_eq!(content_disposition(Some("hotspots.csv")), "attachment; filename=\"hotspots.csv\"");
        assert_eq!(content_disposition(Some("a\"b/c.csv")), "attachment; filename=\"a_b_c.csv\"");
        assert_eq!(content_disposition(Some("  ")), "attachment; filename=\"download.csv\"");
        assert_eq!(content_disposition(Some("..")), "attachment; filename=\"download.csv\"");
    }
}
