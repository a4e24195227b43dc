/// Error types for Advisor Scribe
///
/// Uses thiserror for ergonomic error handling with proper Display implementations.
use crate::domain::models::SummarySection;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Transcript has no utterances")]
    EmptyTranscript,

    #[error("Summary is missing mandatory sections: {}", format_sections(.missing))]
    IncompleteSummary { missing: Vec<SummarySection> },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("LLM service error: {0}")]
    Llm(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

fn format_sections(sections: &[SummarySection]) -> String {
    sections
        .iter()
        .map(|s| s.heading())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_summary_lists_sections() {
        let err = AppError::IncompleteSummary {
            missing: vec![SummarySection::ClientGoals, SummarySection::AdvisorAnalysis],
        };
        assert_eq!(
            err.to_string(),
            "Summary is missing mandatory sections: CLIENT GOALS & QUESTIONS, \
             ADVISOR'S ANALYSIS & RECOMMENDATIONS"
        );
    }

    #[test]
    fn test_empty_transcript_message() {
        assert_eq!(
            AppError::EmptyTranscript.to_string(),
            "Transcript has no utterances"
        );
    }
}
