/// Transcript source port trait
///
/// Supplies the meeting transcript. Audio sources need an external
/// transcription service, which is not implemented; adapters report them as
/// `AppError::Unsupported`.
use crate::domain::models::Transcript;
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for transcript sources
#[async_trait]
pub trait TranscriptSourcePort: Send + Sync {
    /// Load the transcript
    async fn load_transcript(&self) -> Result<Transcript>;

    /// Short description for log lines (usually the path)
    fn describe(&self) -> String;
}
