//! CSV exports of the locations table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::{info, warn};

use super::{LocationRecord, LocationSource};

/// Reads a headed CSV export; empty cells become absent fields.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LocationSource for CsvFileSource {
    fn fetch(&self) -> Result<Vec<LocationRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (line, result) in reader.deserialize::<LocationRecord>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(err) => {
                    skipped += 1;
                    warn!(line = line + 2, %err, "skipping unreadable csv row");
                }
            }
        }
        info!(rows = rows.len(), skipped, path = %self.path.display(), "loaded csv locations");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
