#![cfg(feature = "duckdb")]

//! DuckDB-backed location store mirroring the relational `locations`/`users` schema.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use duckdb::{Connection, Row};
use tracing::info;

use super::{LocationRecord, LocationSource, RawRating};

const LOCATIONS_QUERY: &str = "
    SELECT l.id,
           l.location_name,
           l.description,
           l.surrounding,
           CAST(l.rating AS VARCHAR),
           CAST(l.latitude AS DOUBLE),
           CAST(l.longitude AS DOUBLE),
           l.created_by,
           CAST(l.created_at AS VARCHAR),
           u.name AS reporter_name
    FROM locations l
    LEFT JOIN users u ON l.created_by = u.id
    ORDER BY l.id";

/// Opens the database file on every fetch; nothing is held between runs.
#[derive(Debug, Clone)]
pub struct DuckStore {
    pub db_path: PathBuf,
}

impl DuckStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            db_path: path.as_ref().to_path_buf(),
        }
    }
}

impl LocationSource for DuckStore {
    fn fetch(&self) -> Result<Vec<LocationRecord>> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("open duckdb {}", self.db_path.display()))?;
        info!(path = %self.db_path.display(), "opened duckdb");
        let mut stmt = conn.prepare(LOCATIONS_QUERY)?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("duckdb:{}", self.db_path.display())
    }
}

fn map_row(row: &Row<'_>) -> duckdb::Result<LocationRecord> {
    let rating: Option<String> = row.get(4)?;
    Ok(LocationRecord {
        id: row.get(0)?,
        location_name: row.get(1)?,
        description: row.get(2)?,
        surrounding: row.get(3)?,
        rating: rating.map(RawRating::Text),
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        created_by: row.get(7)?,
        created_at: row.get(8)?,
        reporter_name: row.get(9)?,
    })
}
