//! Prompt templates for the analysis stages
//!
//! Every template takes a single `{input}` placeholder that receives the
//! stage's structured payload as pretty-printed JSON, and asks for a JSON
//! object back so responses can be parsed into typed records.

use crate::domain::models::AnalysisStage;

/// Default prompt templates for each analysis stage
pub struct PromptTemplates;

impl PromptTemplates {
    /// Prompt for per-utterance dialogue annotation
    pub fn dialogue_analysis() -> &'static str {
        r#"You are analyzing a conversation between a financial advisor and a client.
For every utterance in the input, identify the financial topics it touches, whether it
is a question (explicit or implied), and the client's emotional cue.

Input utterances:
{input}

Allowed emotional cues: neutral, concern, satisfaction, confusion, urgency.
Use lowercase single-word topic names such as retirement, education, insurance,
investing, savings, tax, estate, debt.

Respond with a JSON object of the form:
{"annotations": [{"index": 0, "topics": ["retirement"], "is_question": false, "cue": "neutral"}]}
Return exactly one annotation per input utterance, using the same index."#
    }

    /// Prompt for the four-section structured summary
    pub fn summary() -> &'static str {
        r#"Create a structured summary of a conversation between a financial advisor and a client
from the annotated utterances below.

Annotated utterances:
{input}

Respond with a JSON object with exactly these keys, each a list of {"text": "...", "topics": [...]}:
- "client_goals": the main goals and questions the client had
- "advisor_analysis": the key analyses and specific recommendations the advisor provided
- "action_items": concrete next steps agreed upon, with any deadlines or timelines
- "client_concerns": how the client responded to the advice and any concerns raised
Keep each point concise. Use an empty list when a section has nothing to report."#
    }

    /// Prompt for unmet-need inference
    pub fn unmet_needs() -> &'static str {
        r#"Analyze the meeting summary and client profile below. Identify financial needs or gaps
in the client's portfolio that no existing holding satisfies, including needs that were not
adequately addressed in the conversation.

Input:
{input}

Respond with a JSON object of the form:
{"unmet_needs": [{"description": "...", "topics": ["retirement"]}]}
List the needs in order of priority."#
    }

    /// Prompt for product rationales
    pub fn product_rationale() -> &'static str {
        r#"For each pair of client need and candidate product below, explain in one or two
sentences how the product addresses the need and why it fits this client.

Candidate matches:
{input}

Respond with a JSON object of the form:
{"rationales": [{"need_index": 0, "product_id": "...", "rationale": "..."}]}"#
    }

    /// Prompt for advisor next steps
    pub fn next_steps() -> &'static str {
        r#"Based on the agreed action items and the product recommendations below, suggest a
prioritized list of next steps for the financial advisor.

Input:
{input}

Format each step as "ACTION: [description] - TIMEFRAME: [when] - PURPOSE: [why]".
Respond with a JSON object of the form: {"next_steps": ["..."]}"#
    }

    /// System message for a stage
    pub fn system(stage: &AnalysisStage) -> &'static str {
        match stage {
            AnalysisStage::DialogueAnalysis => {
                "You are a financial conversation analyst. You output JSON only."
            }
            AnalysisStage::Summary => {
                "You are a financial conversation analyst specializing in concise summaries. You output JSON only."
            }
            AnalysisStage::UnmetNeeds => {
                "You are a financial advisor specializing in identifying unmet client needs. You output JSON only."
            }
            AnalysisStage::ProductRationale => {
                "You are a financial advisor specializing in product recommendations. You output JSON only."
            }
            AnalysisStage::NextSteps => {
                "You are a financial advisor specializing in action planning. You output JSON only."
            }
        }
    }

    /// Get the default template for a stage
    pub fn for_stage(stage: &AnalysisStage) -> &'static str {
        match stage {
            AnalysisStage::DialogueAnalysis => Self::dialogue_analysis(),
            AnalysisStage::Summary => Self::summary(),
            AnalysisStage::UnmetNeeds => Self::unmet_needs(),
            AnalysisStage::ProductRationale => Self::product_rationale(),
            AnalysisStage::NextSteps => Self::next_steps(),
        }
    }

    /// Fill the `{input}` placeholder
    pub fn render(stage: &AnalysisStage, input: &str) -> String {
        Self::for_stage(stage).replace("{input}", input)
    }
}
