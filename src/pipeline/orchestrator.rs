//! Orchestrator: runs the four stages in order and persists the report
//!
//! The first failing stage aborts the run with its error unchanged; nothing
//! is written unless every stage succeeded.

use crate::config::{PipelineSettings, SimulatedData};
use crate::domain::models::{Report, Transcript};
use crate::domain::simulated;
use crate::error::{AppError, Result};
use crate::pipeline::agent::Agent;
use crate::pipeline::dialogue::DialogueAnalyzer;
use crate::pipeline::indexer::DataIndexer;
use crate::pipeline::recommender::Recommender;
use crate::pipeline::summarizer::Summarizer;
use crate::ports::llm::{LlmConfig, LlmServicePort};
use crate::ports::sources::{ClientSourcePort, ProductSourcePort};
use crate::ports::storage::{ReportWriterPort, WrittenReport};
use crate::ports::transcription::TranscriptSourcePort;
use std::sync::Arc;

/// Sources for one run
pub struct PipelineInputs<'a> {
    pub transcript: &'a dyn TranscriptSourcePort,
    pub clients: Option<&'a dyn ClientSourcePort>,
    pub products: Option<&'a dyn ProductSourcePort>,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: Report,
    pub written: WrittenReport,
}

pub struct Orchestrator {
    simulated_data: SimulatedData,
    indexer: DataIndexer,
    analyzer: DialogueAnalyzer,
    summarizer: Summarizer,
    recommender: Recommender,
    writer: Arc<dyn ReportWriterPort>,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmServicePort>,
        llm_config: LlmConfig,
        settings: PipelineSettings,
        writer: Arc<dyn ReportWriterPort>,
    ) -> Self {
        log::info!(
            "Pipeline uses {} ({}), simulated data {:?}",
            llm.provider_name(),
            llm_config.model,
            settings.simulated_data
        );

        let agent = Agent::new(llm, llm_config);
        Self {
            simulated_data: settings.simulated_data,
            indexer: DataIndexer::new(settings.simulated_data),
            analyzer: DialogueAnalyzer::new(agent.clone()),
            summarizer: Summarizer::new(agent.clone()),
            recommender: Recommender::new(agent, settings.top_k, settings.similarity_threshold),
            writer,
        }
    }

    /// Index → analyze → summarize → recommend, then write the report
    pub async fn run(&self, inputs: &PipelineInputs<'_>) -> Result<PipelineRun> {
        let corpus = self.indexer.index(inputs.clients, inputs.products).await?;
        let transcript = self.load_transcript(inputs.transcript).await?;

        let annotation = self.analyzer.analyze(&transcript).await?;
        let summary = self.summarizer.summarize(&annotation).await?;
        let recommendation = self.recommender.recommend(&summary, &corpus).await?;

        let report = Report {
            transcript,
            annotation,
            summary,
            recommendation,
        };

        let written = self.writer.write(&report).await?;
        log::info!(
            "Report written to {} and {}",
            written.json_path.display(),
            written.text_path.display()
        );

        Ok(PipelineRun { report, written })
    }

    async fn load_transcript(&self, source: &dyn TranscriptSourcePort) -> Result<Transcript> {
        if self.simulated_data == SimulatedData::Always {
            log::info!("Simulated data mode: using built-in meeting transcript");
            return Ok(simulated::transcript());
        }

        log::info!("Loading transcript from {}", source.describe());
        match source.load_transcript().await {
            Err(AppError::SourceUnavailable(reason))
                if self.simulated_data == SimulatedData::Fallback =>
            {
                log::warn!(
                    "transcript unavailable ({}), substituting built-in simulated meeting",
                    reason
                );
                Ok(simulated::transcript())
            }
            other => other,
        }
    }
}
