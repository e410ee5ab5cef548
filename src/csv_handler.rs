use crate::error::{CrateError, Result};
use crate::taxon::normalizer::{NormalizedTable, normalize};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type CacheKey = (PathBuf, String);

static TABLE_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<NormalizedTable>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// Represents a row from the input species table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SpeciesRecord {
    #[serde(rename = "Class", default)]
    pub class: String,
    #[serde(rename = "Order", default)]
    pub order: String,
    #[serde(rename = "Family", default)]
    pub family: String,
    #[serde(rename = "Fish", default)]
    pub fish: String,
    #[serde(rename = "Species_Scientific", default)]
    pub species_scientific: String,
}

pub const REQUIRED_HEADERS: [&str; 5] = ["Class", "Order", "Family", "Fish", "Species_Scientific"];

/// Anything able to hand back the raw rows stored at a path.
pub trait TableSource {
    fn read_rows(&self, path: &Path) -> Result<Vec<SpeciesRecord>>;

    /// Distinguishes sources that would parse the same path differently.
    fn cache_tag(&self) -> String {
        String::new()
    }
}

/// Reads a delimited text file with the `csv` crate.
#[derive(Debug, Clone, Copy)]
pub struct CsvTableSource {
    pub delimiter: u8,
}

impl Default for CsvTableSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvTableSource {
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(CrateError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }
}

impl TableSource for CsvTableSource {
    fn read_rows(&self, path: &Path) -> Result<Vec<SpeciesRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?;
        let headers = reader.headers()?.clone();

        for required_header in REQUIRED_HEADERS.iter() {
            if !headers.iter().any(|h| h == *required_header) {
                return Err(CrateError::MissingHeader(required_header.to_string()));
            }
        }

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: SpeciesRecord = result?;
            records.push(record);
        }
        debug!("Read {} rows from {:?}", records.len(), path);

        Ok(records)
    }

    fn cache_tag(&self) -> String {
        format!("csv:{}", self.delimiter)
    }
}

/// Loads and normalizes the table at `path`, reusing the process-wide copy
/// when the same path was loaded before by an equivalent source (same
/// [`TableSource::cache_tag`]). Failed loads are not remembered.
pub fn load_table(source: &dyn TableSource, path: &Path) -> Result<Arc<NormalizedTable>> {
    let key = (path.to_path_buf(), source.cache_tag());
    if let Some(cached) = TABLE_CACHE
        .lock()
        .ok()
        .and_then(|cache| cache.get(&key).cloned())
    {
        debug!("Table cache hit for {:?}", path);
        return Ok(cached);
    }

    info!("Loading species table from {:?}", path);
    let rows = source.read_rows(path)?;
    let table = Arc::new(normalize(&rows)?);

    match TABLE_CACHE.lock() {
        Ok(mut cache) => {
            cache.insert(key, Arc::clone(&table));
        }
        Err(_) => warn!("Table cache is unavailable; {:?} will be reloaded next time", path),
    }
    Ok(table)
}
