/// Analysis pipeline
///
/// Four stages run strictly in order by the orchestrator. Each model-backed
/// stage owns an `Agent` and turns one typed record into the next.
pub mod agent;
pub mod corpus;
pub mod dialogue;
pub mod indexer;
pub mod orchestrator;
pub mod recommender;
pub mod summarizer;

pub use corpus::{CorpusRecord, IndexedCorpus, SearchHit};
pub use dialogue::DialogueAnalyzer;
pub use indexer::DataIndexer;
pub use orchestrator::{Orchestrator, PipelineInputs, PipelineRun};
pub use recommender::Recommender;
pub use summarizer::Summarizer;
