//! File-backed record and transcript sources

pub mod catalog_text;
pub mod csv_records;
pub mod transcript_file;

pub use catalog_text::TextCatalogSource;
pub use csv_records::{CsvClientSource, CsvProductSource};
pub use transcript_file::FileTranscriptSource;

use crate::error::{AppError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Read a source file, reporting a missing file as `SourceUnavailable`
pub(crate) async fn read_source(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::SourceUnavailable(format!(
            "{} does not exist",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}
