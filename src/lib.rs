pub mod logging;
pub mod defaultlogger;
pub mod error;
pub mod utils;
pub mod config;

pub mod geometry;
pub mod ckan;
pub mod poi;
pub mod map;
pub mod csvfile;
pub mod datasets;

pub use error::{Error, Result};
