//! Location ingestion layer: record shapes and the readers that supply them.

pub mod csv_source;
pub mod json_source;
#[cfg(feature = "duckdb")]
pub mod store;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

pub use csv_source::CsvFileSource;
pub use json_source::JsonFileSource;

/// One crowd-reported location row, joined with its reporter's display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub surrounding: Option<String>,
    #[serde(default)]
    pub rating: Option<RawRating>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub reporter_name: Option<String>,
}

/// Rating exactly as the store returned it; only numeric-looking values survive parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(f64),
    Text(String),
    Malformed(serde_json::Value),
}

impl RawRating {
    /// Numeric value of the rating, or `None` when it is not a finite number.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Malformed(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Coordinates arrive as numbers or as DECIMAL-style strings; anything else is absent.
fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawRating>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(RawRating::parse))
}

impl From<f64> for RawRating {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawRating {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Anything able to produce the full current set of location rows.
pub trait LocationSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<LocationRecord>>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

/// Stand-in for a path no reader understands; every fetch fails.
#[derive(Debug, Clone)]
pub struct UnsupportedSource {
    path: PathBuf,
}

impl LocationSource for UnsupportedSource {
    fn fetch(&self) -> Result<Vec<LocationRecord>> {
        bail!("no location reader for {}", self.path.display())
    }

    fn describe(&self) -> String {
        format!("unsupported:{}", self.path.display())
    }
}

/// Fetch every row, degrading any source failure to an empty dataset.
pub fn fetch_locations(source: &dyn LocationSource) -> Vec<LocationRecord> {
    match source.fetch() {
        Ok(records) => {
            info!(source = %source.describe(), rows = records.len(), "fetched locations");
            records
        }
        Err(err) => {
            warn!(source = %source.describe(), error = %err, "location fetch failed; continuing with no rows");
            Vec::new()
        }
    }
}

/// Pick a reader for `path` from its extension.
///
/// Unknown extensions still yield a source, so the failure surfaces through
/// [`fetch_locations`] as an empty dataset like any other read error.
pub fn open_source(path: &Path) -> Box<dyn LocationSource> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => Box::new(JsonFileSource::new(path)),
        "csv" => Box::new(CsvFileSource::new(path)),
        #[cfg(feature = "duckdb")]
        "duckdb" | "db" => Box::new(store::DuckStore::new(path)),
        other => {
            warn!(extension = other, path = %path.display(), "unsupported location source");
            Box::new(UnsupportedSource {
                path: path.to_path_buf(),
            })
        }
    }
}
