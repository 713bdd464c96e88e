//! JSON array exports of the locations table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use super::{LocationRecord, LocationSource};

/// Reads a JSON array of joined location rows; rows that do not fit the record shape are skipped.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LocationSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<LocationRecord>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let values: Vec<Value> = serde_json::from_str(&text)
            .with_context(|| format!("parse location rows from {}", self.path.display()))?;
        let mut rows = Vec::with_capacity(values.len());
        let mut skipped = 0usize;
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<LocationRecord>(value) {
                Ok(row) => rows.push(row),
                Err(err) => {
                    skipped += 1;
                    warn!(index, %err, "skipping unreadable json row");
                }
            }
        }
        info!(rows = rows.len(), skipped, path = %self.path.display(), "loaded json locations");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
