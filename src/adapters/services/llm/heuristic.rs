//! Rule-based LLM adapter
//!
//! Answers every analysis stage from the request's structured payload with a
//! fixed keyword lexicon. Output is a pure function of the input, so it is
//! used for offline runs and reproducible tests. No network, no API key.

use crate::domain::models::{
    is_advisor_label, AnalysisStage, EmotionalCue, MeetingSummary, SummaryPoint,
    UtteranceAnnotation,
};
use crate::error::{AppError, Result};
use crate::ports::llm::{CompletionRequest, LlmConfig, LlmServicePort};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Topic lexicon: a word starting with any stem marks the topic
const TOPICS: &[(&str, &[&str])] = &[
    ("retirement", &["retir", "pension", "401", "ira"]),
    ("education", &["college", "educat", "tuition", "universit", "529", "school"]),
    ("insurance", &["insur", "coverage"]),
    ("investing", &["invest", "market", "stock", "portfolio"]),
    ("savings", &["saving", "emergency"]),
    ("tax", &["tax"]),
    ("estate", &["estate", "inheritance"]),
    ("debt", &["debt", "loan", "mortgage"]),
];

/// Cue phrases, checked in this order
const CUES: &[(EmotionalCue, &[&str])] = &[
    (
        EmotionalCue::Urgency,
        &["urgent", "asap", "immediately", "as soon as", "deadline", "running out of time"],
    ),
    (
        EmotionalCue::Concern,
        &["worried", "worry", "concerned", "anxious", "nervous", "afraid", "scared"],
    ),
    (
        EmotionalCue::Confusion,
        &["confused", "don't understand", "not sure", "unclear", "what do you mean"],
    ),
    (
        EmotionalCue::Satisfaction,
        &["sounds reasonable", "sounds good", "perfect", "great", "thank", "feel better", "makes sense"],
    ),
];

const INTERROGATIVES: &[&str] = &[
    "how", "what", "when", "where", "why", "which", "who", "is", "are", "can", "could", "should",
    "would", "do", "does", "will",
];

const ACTION_PHRASES: &[&str] = &[
    "i'll", "i will", "we'll", "schedule", "send", "set up", "prepare", "paperwork", "follow-up",
    "follow up", "get started", "next step",
];

const ADVICE_PHRASES: &[&str] = &["recommend", "suggest", "should", "consider", "advise"];

/// Holdings wording that already covers a topic
const HELD: &[(&str, &[&str])] = &[
    ("retirement", &["401", "ira", "pension", "retirement"]),
    ("education", &["529", "college", "education"]),
    ("insurance", &["insurance"]),
    ("investing", &["brokerage", "fund", "stock"]),
    ("savings", &["savings"]),
];

/// Deterministic keyword-rule model
#[derive(Debug, Clone, Default)]
pub struct HeuristicService;

impl HeuristicService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmServicePort for HeuristicService {
    async fn complete(&self, request: &CompletionRequest, _config: &LlmConfig) -> Result<String> {
        log::debug!("Heuristic model answering {}", request.stage);

        let answer = match request.stage {
            AnalysisStage::DialogueAnalysis => annotate(read(request)?),
            AnalysisStage::Summary => summarize(read(request)?),
            AnalysisStage::UnmetNeeds => unmet_needs(read(request)?),
            AnalysisStage::ProductRationale => rationales(read(request)?),
            AnalysisStage::NextSteps => next_steps(read(request)?),
        };
        Ok(answer.to_string())
    }

    fn provider_name(&self) -> &str {
        "heuristic"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

fn read<T: DeserializeOwned>(request: &CompletionRequest) -> Result<T> {
    serde_json::from_value(request.payload.clone()).map_err(|e| {
        AppError::Llm(format!(
            "heuristic model cannot read {} payload: {}",
            request.stage, e
        ))
    })
}

#[derive(Deserialize)]
struct DialogueInput {
    utterances: Vec<UtteranceInput>,
}

#[derive(Deserialize)]
struct UtteranceInput {
    index: usize,
    speaker: String,
    text: String,
}

#[derive(Serialize)]
struct AnnotationOutput {
    index: usize,
    topics: Vec<String>,
    is_question: bool,
    cue: EmotionalCue,
}

fn annotate(input: DialogueInput) -> serde_json::Value {
    let annotations: Vec<AnnotationOutput> = input
        .utterances
        .iter()
        .map(|u| AnnotationOutput {
            index: u.index,
            topics: topics_in(&u.text),
            is_question: is_question(&u.text),
            // Cues describe the client's state only
            cue: if is_advisor_label(&u.speaker) {
                EmotionalCue::Neutral
            } else {
                cue_of(&u.text)
            },
        })
        .collect();
    json!({ "annotations": annotations })
}

#[derive(Deserialize)]
struct SummaryInput {
    annotations: Vec<UtteranceAnnotation>,
}

fn summarize(input: SummaryInput) -> serde_json::Value {
    let (advisor, client): (Vec<&UtteranceAnnotation>, Vec<&UtteranceAnnotation>) = input
        .annotations
        .iter()
        .partition(|a| is_advisor_label(&a.speaker));

    // One goal per client topic, quoting its first mention
    let mut client_goals: Vec<SummaryPoint> = Vec::new();
    for entry in &client {
        for topic in &entry.topics {
            if !client_goals.iter().any(|p| p.topics.contains(topic)) {
                client_goals.push(SummaryPoint::new(
                    format!("{}: {}", capitalize(topic), entry.text),
                    vec![topic.clone()],
                ));
            }
        }
    }

    let advisor_analysis = advisor
        .iter()
        .filter(|a| !a.topics.is_empty() || contains_any(&a.text, ADVICE_PHRASES))
        .map(|a| SummaryPoint::new(a.text.clone(), a.topics.clone()))
        .collect();

    let action_items = input
        .annotations
        .iter()
        .filter(|a| contains_any(&a.text, ACTION_PHRASES))
        .map(|a| SummaryPoint::new(a.text.clone(), a.topics.clone()))
        .collect();

    let client_concerns = client
        .iter()
        .filter(|a| a.cue != EmotionalCue::Neutral)
        .map(|a| SummaryPoint::new(format!("{}: {}", a.cue, a.text), a.topics.clone()))
        .collect();

    let summary = MeetingSummary {
        client_goals,
        advisor_analysis,
        action_items,
        client_concerns,
    };
    serde_json::to_value(summary).unwrap_or_else(|_| json!({}))
}

#[derive(Deserialize)]
struct NeedsInput {
    summary: MeetingSummary,
    #[serde(default)]
    client_profile: Vec<String>,
}

fn unmet_needs(input: NeedsInput) -> serde_json::Value {
    let holdings: String = input
        .client_profile
        .iter()
        .flat_map(|doc| doc.lines())
        .filter(|line| line.to_lowercase().starts_with("holdings"))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut needs: Vec<serde_json::Value> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    // A concern means the current holding is not enough
    for point in &input.summary.client_concerns {
        for topic in &point.topics {
            if !seen.contains(topic) {
                seen.push(topic.clone());
                needs.push(json!({
                    "description": format!("Address the client's concern about {}", topic),
                    "topics": [topic],
                }));
            }
        }
    }

    for point in &input.summary.client_goals {
        for topic in &point.topics {
            if seen.contains(topic) || is_held(topic, &holdings) {
                continue;
            }
            seen.push(topic.clone());
            needs.push(json!({
                "description": format!("Put a {} plan in place", topic),
                "topics": [topic],
            }));
        }
    }

    json!({ "unmet_needs": needs })
}

fn is_held(topic: &str, holdings: &str) -> bool {
    HELD.iter()
        .find(|(t, _)| *t == topic)
        .map_or(false, |(_, words)| words.iter().any(|w| holdings.contains(w)))
}

#[derive(Deserialize)]
struct RationaleInput {
    matches: Vec<MatchInput>,
}

#[derive(Deserialize)]
struct MatchInput {
    need_index: usize,
    need: String,
    product_id: String,
    product_name: String,
    category: String,
}

fn rationales(input: RationaleInput) -> serde_json::Value {
    let rationales: Vec<serde_json::Value> = input
        .matches
        .iter()
        .map(|m| {
            json!({
                "need_index": m.need_index,
                "product_id": m.product_id,
                "rationale": format!(
                    "{} is a {} product that directly supports the need to {}.",
                    m.product_name,
                    m.category,
                    lowercase_first(&m.need)
                ),
            })
        })
        .collect();
    json!({ "rationales": rationales })
}

#[derive(Deserialize)]
struct NextStepsInput {
    #[serde(default)]
    action_items: Vec<String>,
    #[serde(default)]
    recommendations: Vec<RecommendedInput>,
    #[serde(default)]
    gaps: Vec<String>,
}

#[derive(Deserialize)]
struct RecommendedInput {
    need: String,
    products: Vec<String>,
}

fn next_steps(input: NextStepsInput) -> serde_json::Value {
    let mut steps: Vec<String> = input
        .action_items
        .iter()
        .map(|item| {
            format!(
                "ACTION: {} - TIMEFRAME: within 2 weeks - PURPOSE: follow through on meeting commitments",
                item
            )
        })
        .collect();

    steps.extend(input.recommendations.iter().map(|r| {
        format!(
            "ACTION: Present {} - TIMEFRAME: next meeting - PURPOSE: {}",
            r.products.join(", "),
            r.need
        )
    }));

    steps.extend(input.gaps.iter().map(|gap| {
        format!(
            "ACTION: Research options outside the catalog - TIMEFRAME: within 30 days - PURPOSE: {}",
            gap
        )
    }));

    json!({ "next_steps": steps })
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn topics_in(text: &str) -> Vec<String> {
    let words = words(text);
    TOPICS
        .iter()
        .filter(|(_, stems)| {
            words
                .iter()
                .any(|w| stems.iter().any(|stem| w.starts_with(stem)))
        })
        .map(|(topic, _)| topic.to_string())
        .collect()
}

fn is_question(text: &str) -> bool {
    let text = text.trim();
    if text.contains('?') || text.to_lowercase().contains("wonder") {
        return true;
    }
    words(text)
        .first()
        .map_or(false, |first| INTERROGATIVES.contains(&first.as_str()))
}

fn cue_of(text: &str) -> EmotionalCue {
    CUES.iter()
        .find(|(_, phrases)| contains_any(text, phrases))
        .map_or(EmotionalCue::Neutral, |(cue, _)| *cue)
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let text = text.to_lowercase();
    phrases.iter().any(|p| text.contains(p))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(stage: AnalysisStage, payload: serde_json::Value) -> CompletionRequest {
        CompletionRequest {
            stage,
            system: String::new(),
            prompt: String::new(),
            payload,
        }
    }

    async fn ask(stage: AnalysisStage, payload: serde_json::Value) -> serde_json::Value {
        let raw = HeuristicService::new()
            .complete(&request(stage, payload), &LlmConfig::default())
            .await
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_topics_and_cues() {
        assert_eq!(topics_in("I'm worried about my pension"), vec!["retirement"]);
        assert_eq!(
            topics_in("saving for college and retirement"),
            vec!["retirement", "education", "savings"]
        );
        assert_eq!(cue_of("I'm worried about my pension"), EmotionalCue::Concern);
        assert_eq!(cue_of("We need this done ASAP, I'm worried"), EmotionalCue::Urgency);
        assert_eq!(cue_of("That sounds reasonable."), EmotionalCue::Satisfaction);
        assert_eq!(cue_of("Let's discuss retirement"), EmotionalCue::Neutral);
    }

    #[test]
    fn test_question_detection() {
        assert!(is_question("Is this a good time to be investing more?"));
        assert!(is_question("How much should I save"));
        assert!(is_question("I wonder whether a Roth makes sense"));
        assert!(!is_question("Let's discuss retirement"));
    }

    #[tokio::test]
    async fn test_advisor_utterances_stay_neutral() {
        let answer = ask(
            AnalysisStage::DialogueAnalysis,
            json!({"utterances": [
                {"index": 0, "speaker": "Advisor", "text": "Are you worried about the market?"},
                {"index": 1, "speaker": "Client", "text": "I'm worried about my pension"}
            ]}),
        )
        .await;

        assert_eq!(answer["annotations"][0]["cue"], "neutral");
        assert_eq!(answer["annotations"][0]["is_question"], true);
        assert_eq!(answer["annotations"][1]["cue"], "concern");
        assert_eq!(answer["annotations"][1]["topics"][0], "retirement");
    }

    #[tokio::test]
    async fn test_concern_topics_become_needs_even_when_held() {
        let answer = ask(
            AnalysisStage::UnmetNeeds,
            json!({
                "summary": {
                    "client_goals": [
                        {"text": "Retirement", "topics": ["retirement"]},
                        {"text": "Education", "topics": ["education"]}
                    ],
                    "client_concerns": [{"text": "concern: pension", "topics": ["retirement"]}]
                },
                "client_profile": ["Holdings: Employer 401(k); 529 plan"]
            }),
        )
        .await;

        let needs = answer["unmet_needs"].as_array().unwrap();
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0]["topics"][0], "retirement");
    }

    #[tokio::test]
    async fn test_next_steps_cover_actions_matches_and_gaps() {
        let answer = ask(
            AnalysisStage::NextSteps,
            json!({
                "action_items": ["Prepare the 529 paperwork"],
                "recommendations": [{"need": "College fund", "products": ["529 Plan"]}],
                "gaps": ["Estate planning"]
            }),
        )
        .await;

        let steps = answer["next_steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert!(steps[0].as_str().unwrap().starts_with("ACTION: Prepare the 529 paperwork"));
        assert!(steps[2].as_str().unwrap().ends_with("PURPOSE: Estate planning"));
    }

    #[tokio::test]
    async fn test_unreadable_payload_is_service_error() {
        let result = HeuristicService::new()
            .complete(
                &request(AnalysisStage::DialogueAnalysis, json!({"wrong": true})),
                &LlmConfig::default(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
