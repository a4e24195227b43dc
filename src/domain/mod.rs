/// Domain layer - core business models
///
/// These models are provider-agnostic and represent the records exchanged
/// between pipeline stages.
pub mod models;
pub mod prompts;
pub mod report;
pub mod simulated;

pub use models::{
    AnalysisStage, ClientRecord, DialogueAnnotation, EmotionalCue, MeetingSummary,
    NeedRecommendation, ProductMatch, ProductRecord, Recommendation, RecommendationGap,
    RecordKind, Report, SummaryPoint, SummarySection, Transcript, UnmetNeed, Utterance,
    UtteranceAnnotation,
};
pub use prompts::PromptTemplates;
