/// Report storage port trait
///
/// Persists a finished report. Implementation: file writer producing a JSON
/// document and a text report.
use crate::domain::models::Report;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Where a report ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub json_path: PathBuf,
    pub text_path: PathBuf,
}

/// Port trait for report persistence
#[async_trait]
pub trait ReportWriterPort: Send + Sync {
    /// Persist the report in every output format
    async fn write(&self, report: &Report) -> Result<WrittenReport>;
}
