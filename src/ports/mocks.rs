//! Mock implementations for testing

use crate::domain::models::{AnalysisStage, ClientRecord, ProductRecord, Report, Transcript};
use crate::error::{AppError, Result};
use crate::ports::llm::{CompletionRequest, LlmConfig, LlmServicePort};
use crate::ports::sources::{ClientSourcePort, ProductSourcePort};
use crate::ports::storage::{ReportWriterPort, WrittenReport};
use crate::ports::transcription::TranscriptSourcePort;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// In-memory client source
#[derive(Clone, Default)]
pub struct MockClientSource {
    clients: Option<Vec<ClientRecord>>,
}

impl MockClientSource {
    pub fn new(clients: Vec<ClientRecord>) -> Self {
        Self {
            clients: Some(clients),
        }
    }

    /// A source whose backing data does not exist
    pub fn unavailable() -> Self {
        Self { clients: None }
    }
}

#[async_trait]
impl ClientSourcePort for MockClientSource {
    async fn load_clients(&self) -> Result<Vec<ClientRecord>> {
        self.clients
            .clone()
            .ok_or_else(|| AppError::SourceUnavailable("mock client source".to_string()))
    }

    fn describe(&self) -> String {
        "mock clients".to_string()
    }
}

/// In-memory product source
#[derive(Clone, Default)]
pub struct MockProductSource {
    products: Option<Vec<ProductRecord>>,
}

impl MockProductSource {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products: Some(products),
        }
    }

    pub fn unavailable() -> Self {
        Self { products: None }
    }
}

#[async_trait]
impl ProductSourcePort for MockProductSource {
    async fn load_products(&self) -> Result<Vec<ProductRecord>> {
        self.products
            .clone()
            .ok_or_else(|| AppError::SourceUnavailable("mock product source".to_string()))
    }

    fn describe(&self) -> String {
        "mock products".to_string()
    }
}

/// In-memory transcript source
#[derive(Clone)]
pub struct MockTranscriptSource {
    transcript: Option<Transcript>,
}

impl MockTranscriptSource {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript: Some(transcript),
        }
    }

    pub fn unavailable() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl TranscriptSourcePort for MockTranscriptSource {
    async fn load_transcript(&self) -> Result<Transcript> {
        self.transcript
            .clone()
            .ok_or_else(|| AppError::SourceUnavailable("mock transcript source".to_string()))
    }

    fn describe(&self) -> String {
        "mock transcript".to_string()
    }
}

/// Report writer that keeps reports in memory
#[derive(Clone, Default)]
pub struct MockReportWriter {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MockReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportWriterPort for MockReportWriter {
    async fn write(&self, report: &Report) -> Result<WrittenReport> {
        let mut reports = self.reports.lock().unwrap();
        reports.push(report.clone());
        let n = reports.len();
        Ok(WrittenReport {
            json_path: PathBuf::from(format!("memory/report_{}.json", n)),
            text_path: PathBuf::from(format!("memory/report_{}.txt", n)),
        })
    }
}

/// Deterministic model that answers each stage with a canned response
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    responses: HashMap<AnalysisStage, String>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response for a stage (builder pattern)
    pub fn with_response(mut self, stage: AnalysisStage, response: impl Into<String>) -> Self {
        self.responses.insert(stage, response.into());
        self
    }

    /// Requests received so far, in call order
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmServicePort for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest, _config: &LlmConfig) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .get(&request.stage)
            .cloned()
            .ok_or_else(|| AppError::Llm(format!("no scripted response for {}", request.stage)))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        true
    }
}
