//! Where register CSV text comes from.

use std::path::PathBuf;

use sponsorgrid_io::ingest::{decode_payload, read_register_file};

use crate::client::{FetchError, RegisterClient};

/// A provider of register CSV text. Implementations block.
pub trait CsvSource: Send + Sync {
    fn fetch_csv(&self) -> Result<String, FetchError>;

    /// Human-readable origin for logs and status output.
    fn describe(&self) -> String;
}

impl CsvSource for RegisterClient {
    fn fetch_csv(&self) -> Result<String, FetchError> {
        self.fetch_bytes().map(decode_payload)
    }

    fn describe(&self) -> String {
        self.csv_url().to_string()
    }
}

/// A register export on local disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileSource {
    fn fetch_csv(&self) -> Result<String, FetchError> {
        read_register_file(&self.path).map_err(|source| FetchError::File {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
