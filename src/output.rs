//! Report persistence.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::AnalysisReport;

/// Destination for a finished report.
pub trait ReportSink {
    fn write(&self, report: &AnalysisReport) -> Result<()>;
}

/// Pretty-printed JSON file; parent directories are created on demand.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReportSink for JsonFileSink {
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!(path = %self.path.display(), predictions = report.predictions.len(), "wrote safety report");
        Ok(())
    }
}
