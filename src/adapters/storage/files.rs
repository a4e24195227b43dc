//! File report writer
//!
//! Writes `meeting_analysis_<ts>.json` and `meeting_report_<ts>.txt` into the
//! output directory, creating it on first use. The timestamp lives only in the
//! file names.

use crate::domain::models::Report;
use crate::error::Result;
use crate::ports::storage::{ReportWriterPort, WrittenReport};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub struct FileReportWriter {
    output_dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn paths(&self, stamp: &str) -> WrittenReport {
        WrittenReport {
            json_path: self
                .output_dir
                .join(format!("meeting_analysis_{}.json", stamp)),
            text_path: self.output_dir.join(format!("meeting_report_{}.txt", stamp)),
        }
    }

    /// Paths for this second, suffixed when a run in the same second already wrote
    async fn free_paths(&self, timestamp: &str) -> Result<WrittenReport> {
        let mut paths = self.paths(timestamp);
        let mut n = 2;
        while exists(&paths.json_path).await? || exists(&paths.text_path).await? {
            paths = self.paths(&format!("{}_{}", timestamp, n));
            n += 1;
        }
        Ok(paths)
    }
}

async fn exists(path: &Path) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

/// Writes both files or neither
async fn write_pair(paths: &WrittenReport, json: &str, text: &str) -> Result<()> {
    tokio::fs::write(&paths.json_path, json).await?;
    if let Err(e) = tokio::fs::write(&paths.text_path, text).await {
        if let Err(cleanup) = tokio::fs::remove_file(&paths.json_path).await {
            log::warn!(
                "Could not remove {}: {}",
                paths.json_path.display(),
                cleanup
            );
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl ReportWriterPort for FileReportWriter {
    async fn write(&self, report: &Report) -> Result<WrittenReport> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let paths = self.free_paths(&timestamp).await?;

        let json = serde_json::to_string_pretty(report)?;
        let text = report.render_text();
        write_pair(&paths, &json, &text).await?;

        log::debug!("Wrote {}", paths.json_path.display());
        Ok(paths)
    }
}
