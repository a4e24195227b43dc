/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod llm;
pub mod sources;
pub mod storage;
pub mod transcription;

#[cfg(test)]
pub mod mocks;

pub use llm::{CompletionRequest, LlmConfig, LlmServicePort};
pub use sources::{ClientSourcePort, ProductSourcePort};
pub use storage::{ReportWriterPort, WrittenReport};
pub use transcription::TranscriptSourcePort;
