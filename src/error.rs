#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Http(Box<ureq::Error>),
    InvalidGeometry(String),
    InvalidArgument(String),
    InvalidInput(String),
    NotFound(String),
    CkanError(String),
}

impl std::error::Error for Error {}

impl std::convert::From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::convert::From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl std::convert::From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}

impl std::convert::From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        Error::Http(Box::new(e))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Csv(e) => write!(f, "csv error: {}", e),
            Error::Http(e) => write!(f, "http error: {}", e),
            Error::InvalidGeometry(m) => write!(f, "invalid geometry: {}", m),
            Error::InvalidArgument(m) => write!(f, "invalid argument: {}", m),
            Error::InvalidInput(m) => write!(f, "invalid input: {}", m),
            Error::NotFound(m) => write!(f, "not found: {}", m),
            Error::CkanError(m) => write!(f, "ckan request failed: {}", m),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
