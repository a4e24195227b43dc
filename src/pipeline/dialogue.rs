//! Dialogue Analyzer stage
//!
//! Annotates every utterance with topics, a question flag and an emotional
//! cue. The model's answer must cover each utterance exactly once.

use crate::domain::models::{
    AnalysisStage, DialogueAnnotation, EmotionalCue, Transcript, UtteranceAnnotation,
};
use crate::error::{AppError, Result};
use crate::pipeline::agent::Agent;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct DialoguePayload<'a> {
    utterances: Vec<UtterancePayload<'a>>,
}

#[derive(Serialize)]
struct UtterancePayload<'a> {
    index: usize,
    speaker: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct DialogueResponse {
    annotations: Vec<AnnotationResponse>,
}

#[derive(Deserialize)]
struct AnnotationResponse {
    index: usize,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    is_question: bool,
    cue: String,
}

pub struct DialogueAnalyzer {
    agent: Agent,
}

impl DialogueAnalyzer {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub async fn analyze(&self, transcript: &Transcript) -> Result<DialogueAnnotation> {
        if transcript.is_empty() {
            return Err(AppError::EmptyTranscript);
        }

        log::info!("Analyzing dialogue of {} utterances", transcript.len());

        let payload = DialoguePayload {
            utterances: transcript
                .utterances()
                .iter()
                .enumerate()
                .map(|(index, u)| UtterancePayload {
                    index,
                    speaker: &u.speaker,
                    text: &u.text,
                })
                .collect(),
        };

        let response: DialogueResponse = self
            .agent
            .ask(AnalysisStage::DialogueAnalysis, &payload)
            .await?;

        let annotation = align(transcript, response.annotations)?;
        log::info!(
            "Found {} topics, {} questions, {} high-intensity cues",
            annotation.topics().len(),
            annotation.questions().count(),
            annotation.high_intensity().count()
        );
        Ok(annotation)
    }
}

/// Order the model's annotations by utterance and check one-to-one coverage
fn align(transcript: &Transcript, answers: Vec<AnnotationResponse>) -> Result<DialogueAnnotation> {
    let utterances = transcript.utterances();
    if answers.len() != utterances.len() {
        return Err(AppError::MalformedResponse(format!(
            "expected {} annotations, got {}",
            utterances.len(),
            answers.len()
        )));
    }

    let mut slots: Vec<Option<UtteranceAnnotation>> = vec![None; utterances.len()];
    for answer in answers {
        let utterance = utterances.get(answer.index).ok_or_else(|| {
            AppError::MalformedResponse(format!("annotation index {} out of range", answer.index))
        })?;
        let slot = &mut slots[answer.index];
        if slot.is_some() {
            return Err(AppError::MalformedResponse(format!(
                "duplicate annotation for utterance {}",
                answer.index
            )));
        }

        *slot = Some(UtteranceAnnotation {
            index: answer.index,
            speaker: utterance.speaker.clone(),
            text: utterance.text.clone(),
            topics: normalize_topics(answer.topics),
            is_question: answer.is_question,
            cue: answer.cue.parse::<EmotionalCue>()?,
        });
    }

    // Equal lengths plus no duplicates means every slot is filled
    Ok(DialogueAnnotation::new(slots.into_iter().flatten().collect()))
}

fn normalize_topics(topics: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for topic in topics {
        let topic = topic.trim().to_lowercase();
        if !topic.is_empty() && !out.contains(&topic) {
            out.push(topic);
        }
    }
    out
}
