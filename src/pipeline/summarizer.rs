//! Summarizer stage

use crate::domain::models::{
    AnalysisStage, DialogueAnnotation, MeetingSummary, SummaryPoint, UtteranceAnnotation,
};
use crate::error::{AppError, Result};
use crate::pipeline::agent::Agent;
use serde::Serialize;

#[derive(Serialize)]
struct SummaryPayload<'a> {
    annotations: &'a [UtteranceAnnotation],
}

pub struct Summarizer {
    agent: Agent,
}

impl Summarizer {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Build the four-section summary.
    ///
    /// Question topics and high-intensity cues the model left out are added
    /// back before the mandatory sections are checked.
    pub async fn summarize(&self, annotation: &DialogueAnnotation) -> Result<MeetingSummary> {
        log::info!("Summarizing {} annotated utterances", annotation.len());

        let payload = SummaryPayload {
            annotations: annotation.entries(),
        };
        let mut summary: MeetingSummary = self.agent.ask(AnalysisStage::Summary, &payload).await?;

        let added = cover_questions(&mut summary, annotation) + cover_concerns(&mut summary, annotation);
        if added > 0 {
            log::debug!("Added {} points the model left out", added);
        }

        let missing = summary.missing_mandatory();
        if !missing.is_empty() {
            return Err(AppError::IncompleteSummary { missing });
        }

        log::info!(
            "Summary has {} goals, {} analysis points, {} action items, {} concerns",
            summary.client_goals.len(),
            summary.advisor_analysis.len(),
            summary.action_items.len(),
            summary.client_concerns.len()
        );
        Ok(summary)
    }
}

fn cover_questions(summary: &mut MeetingSummary, annotation: &DialogueAnnotation) -> usize {
    let mut added = 0;
    for question in annotation.questions() {
        if question.topics.is_empty() {
            let covered = summary
                .client_goals
                .iter()
                .any(|p| p.text.contains(question.text.as_str()));
            if !covered {
                summary
                    .client_goals
                    .push(SummaryPoint::new(format!("Question: {}", question.text), vec![]));
                added += 1;
            }
            continue;
        }

        for topic in &question.topics {
            if !summary.client_goals.iter().any(|p| p.covers_topic(topic)) {
                summary.client_goals.push(SummaryPoint::new(
                    format!("Question about {}: {}", topic, question.text),
                    vec![topic.clone()],
                ));
                added += 1;
            }
        }
    }
    added
}

/// A cue counts as covered when a point quotes the utterance, or shares a
/// topic with it and names the same cue. A topic match alone may report a
/// different reaction.
fn cover_concerns(summary: &mut MeetingSummary, annotation: &DialogueAnnotation) -> usize {
    let mut added = 0;
    for entry in annotation.high_intensity() {
        let cue = entry.cue.to_string();
        let covered = summary.client_concerns.iter().any(|p| {
            p.text.contains(entry.text.as_str())
                || (p.text.to_lowercase().contains(cue.as_str())
                    && entry.topics.iter().any(|t| p.covers_topic(t)))
        });
        if !covered {
            summary.client_concerns.push(SummaryPoint::new(
                format!("{}: {}", entry.cue, entry.text),
                entry.topics.clone(),
            ));
            added += 1;
        }
    }
    added
}
