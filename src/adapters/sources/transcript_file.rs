//! Text transcript file
//!
//! Reads `Speaker: text` lines (see `Transcript::parse`). Audio recordings
//! would need a transcription service first and are rejected up front.

use crate::adapters::sources::read_source;
use crate::domain::models::Transcript;
use crate::error::{AppError, Result};
use crate::ports::transcription::TranscriptSourcePort;
use async_trait::async_trait;
use std::path::PathBuf;

const AUDIO_EXTENSIONS: [&str; 5] = ["m4a", "mp3", "wav", "ogg", "flac"];

pub struct FileTranscriptSource {
    path: PathBuf,
}

impl FileTranscriptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_audio(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
            })
    }
}

#[async_trait]
impl TranscriptSourcePort for FileTranscriptSource {
    async fn load_transcript(&self) -> Result<Transcript> {
        if self.is_audio() {
            return Err(AppError::Unsupported(format!(
                "audio transcription is not implemented; provide a text transcript instead of {}",
                self.path.display()
            )));
        }

        let text = read_source(&self.path).await?;
        let transcript = Transcript::parse(&text);
        log::info!(
            "Loaded transcript with {} utterances from {}",
            transcript.len(),
            self.path.display()
        );
        Ok(transcript)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_text_transcript() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meeting.txt");
        std::fs::write(
            &path,
            "Advisor: Let's discuss retirement\nClient: I'm worried about my pension\n",
        )
        .unwrap();

        let transcript = FileTranscriptSource::new(&path).load_transcript().await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.utterances()[1].speaker, "Client");
    }

    #[tokio::test]
    async fn test_audio_file_is_unsupported() {
        let source = FileTranscriptSource::new("recordings/meeting.M4A");
        let result = source.load_transcript().await;
        assert!(matches!(result, Err(AppError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = FileTranscriptSource::new(dir.path().join("nope.txt"));
        let result = source.load_transcript().await;
        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_blank_file_gives_empty_transcript() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "\n\n").unwrap();

        let transcript = FileTranscriptSource::new(&path).load_transcript().await.unwrap();
        assert!(transcript.is_empty());
    }
}
