/// Domain models for Advisor Scribe
///
/// These models are the typed records exchanged between pipeline stages.
/// Every stage receives an immutable reference to its input and returns a
/// freshly built output.
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Kind of record held by the indexed corpus
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Client,
    Product,
}

/// Represents a client row from the client table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

impl ClientRecord {
    /// Creates a client record without attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute (builder pattern)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Text used for indexing and prompting, one `name: value` line per attribute
    pub fn document(&self) -> String {
        self.attributes
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Represents a product from the product catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub attributes: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Creates a product record without attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute (builder pattern)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Text used for indexing and prompting
    pub fn document(&self) -> String {
        let mut lines = vec![self.name.clone(), format!("category: {}", self.category)];
        lines.extend(self.attributes.iter().map(|(k, v)| format!("{}: {}", k, v)));
        lines.join("\n")
    }
}

/// A single turn of the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>, // "mm:ss" or "hh:mm:ss" as written in the source
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Returns true for speaker labels such as "Advisor" or "Financial Adviser"
pub fn is_advisor_label(speaker: &str) -> bool {
    let speaker = speaker.to_lowercase();
    speaker.contains("advisor") || speaker.contains("adviser")
}

/// Ordered meeting transcript, read-only after ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Transcript {
    utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    /// Parses `Speaker: text` lines.
    ///
    /// A line may start with a bracketed timestamp (`[01:15] Client: ...`).
    /// Lines without a speaker prefix continue the previous utterance; blank
    /// lines are ignored. Text before the first speaker line is dropped.
    pub fn parse(text: &str) -> Self {
        let mut utterances: Vec<Utterance> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (timestamp, rest) = split_timestamp(line);
            match split_speaker(rest) {
                Some((speaker, body)) => {
                    let mut utterance = Utterance::new(speaker, body);
                    if let Some(ts) = timestamp {
                        utterance = utterance.with_timestamp(ts);
                    }
                    utterances.push(utterance);
                }
                None => {
                    if let Some(last) = utterances.last_mut() {
                        if !last.text.is_empty() {
                            last.text.push(' ');
                        }
                        last.text.push_str(rest);
                    }
                }
            }
        }

        Self { utterances }
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }}

fn split_timestamp(line: &str) -> (Option<&str>, &str) {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let ts = &rest[..end];
            if !ts.is_empty() && ts.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '.') {
                return (Some(ts), rest[end + 1..].trim_start());
            }
        }
    }
    (None, line)
}

fn split_speaker(line: &str) -> Option<(&str, &str)> {
    let (speaker, body) = line.split_once(':')?;
    let speaker = speaker.trim();
    // Speaker labels are short names; anything longer is prose containing a colon
    if speaker.is_empty()
        || speaker.split_whitespace().count() > 3
        || !speaker.chars().any(|c| c.is_alphabetic())
    {
        return None;
    }
    Some((speaker, body.trim()))
}

/// Emotional cue attached to an utterance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalCue {
    Neutral,
    Concern,
    Satisfaction,
    Confusion,
    Urgency,
}

impl EmotionalCue {
    pub const ALL: [EmotionalCue; 5] = [
        EmotionalCue::Neutral,
        EmotionalCue::Concern,
        EmotionalCue::Satisfaction,
        EmotionalCue::Confusion,
        EmotionalCue::Urgency,
    ];

    /// Cues that must surface in the client concerns section
    pub fn is_high_intensity(&self) -> bool {
        matches!(
            self,
            EmotionalCue::Concern | EmotionalCue::Confusion | EmotionalCue::Urgency
        )
    }
}

impl std::fmt::Display for EmotionalCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmotionalCue::Neutral => write!(f, "neutral"),
            EmotionalCue::Concern => write!(f, "concern"),
            EmotionalCue::Satisfaction => write!(f, "satisfaction"),
            EmotionalCue::Confusion => write!(f, "confusion"),
            EmotionalCue::Urgency => write!(f, "urgency"),
        }
    }
}

impl FromStr for EmotionalCue {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        EmotionalCue::ALL
            .into_iter()
            .find(|cue| cue.to_string() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::MalformedResponse(format!("unknown emotional cue '{}'", s)))
    }
}

/// Annotation for one utterance, aligned by index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtteranceAnnotation {
    pub index: usize,
    pub speaker: String,
    pub text: String,
    pub topics: Vec<String>,
    pub is_question: bool,
    pub cue: EmotionalCue,
}

/// Ordered annotations, exactly one per transcript utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueAnnotation {
    entries: Vec<UtteranceAnnotation>,
}

impl DialogueAnnotation {
    pub fn new(entries: Vec<UtteranceAnnotation>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[UtteranceAnnotation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &UtteranceAnnotation> {
        self.entries.iter().filter(|e| e.is_question)
    }

    pub fn high_intensity(&self) -> impl Iterator<Item = &UtteranceAnnotation> {
        self.entries.iter().filter(|e| e.cue.is_high_intensity())
    }

    /// Distinct topics in order of first mention
    pub fn topics(&self) -> Vec<String> {
        dedup_topics(self.entries.iter().flat_map(|e| e.topics.iter()))
    }
}

/// The four fixed sections of a meeting summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SummarySection {
    ClientGoals,
    AdvisorAnalysis,
    ActionItems,
    ClientConcerns,
}

impl SummarySection {
    pub const ALL: [SummarySection; 4] = [
        SummarySection::ClientGoals,
        SummarySection::AdvisorAnalysis,
        SummarySection::ActionItems,
        SummarySection::ClientConcerns,
    ];

    /// Heading used in the text report
    pub fn heading(&self) -> &'static str {
        match self {
            SummarySection::ClientGoals => "CLIENT GOALS & QUESTIONS",
            SummarySection::AdvisorAnalysis => "ADVISOR'S ANALYSIS & RECOMMENDATIONS",
            SummarySection::ActionItems => "ACTION ITEMS & NEXT STEPS",
            SummarySection::ClientConcerns => "CLIENT'S REACTIONS & CONCERNS",
        }
    }

    /// Sections that must not be empty for a summary to be accepted
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            SummarySection::ClientGoals | SummarySection::AdvisorAnalysis
        )
    }
}

impl std::fmt::Display for SummarySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarySection::ClientGoals => write!(f, "client_goals"),
            SummarySection::AdvisorAnalysis => write!(f, "advisor_analysis"),
            SummarySection::ActionItems => write!(f, "action_items"),
            SummarySection::ClientConcerns => write!(f, "client_concerns"),
        }
    }
}

/// One bullet of a summary section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryPoint {
    pub text: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl SummaryPoint {
    pub fn new(text: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            text: text.into(),
            topics,
        }
    }

    /// True if the point mentions the topic, either as a tag or in its text
    pub fn covers_topic(&self, topic: &str) -> bool {
        let topic = topic.to_lowercase();
        self.topics.iter().any(|t| t.to_lowercase() == topic)
            || self.text.to_lowercase().contains(&topic)
    }
}

/// Structured meeting summary with four fixed sections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MeetingSummary {
    #[serde(default)]
    pub client_goals: Vec<SummaryPoint>,
    #[serde(default)]
    pub advisor_analysis: Vec<SummaryPoint>,
    #[serde(default)]
    pub action_items: Vec<SummaryPoint>,
    #[serde(default)]
    pub client_concerns: Vec<SummaryPoint>,
}

impl MeetingSummary {
    pub fn section(&self, section: SummarySection) -> &[SummaryPoint] {
        match section {
            SummarySection::ClientGoals => &self.client_goals,
            SummarySection::AdvisorAnalysis => &self.advisor_analysis,
            SummarySection::ActionItems => &self.action_items,
            SummarySection::ClientConcerns => &self.client_concerns,
        }
    }

    /// Mandatory sections that are currently empty
    pub fn missing_mandatory(&self) -> Vec<SummarySection> {
        SummarySection::ALL
            .into_iter()
            .filter(|s| s.is_mandatory() && self.section(*s).is_empty())
            .collect()
    }

    /// Distinct topics over all sections in section order
    pub fn topics(&self) -> Vec<String> {
        dedup_topics(
            SummarySection::ALL
                .into_iter()
                .flat_map(|s| self.section(s).iter())
                .flat_map(|p| p.topics.iter()),
        )
    }
}

/// A need inferred from the summary that no current holding covers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnmetNeed {
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl UnmetNeed {
    pub fn new(description: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            description: description.into(),
            topics,
        }
    }

    /// Free-text query used for the product search
    pub fn query(&self) -> String {
        let mut query = self.description.clone();
        for topic in &self.topics {
            query.push(' ');
            query.push_str(topic);
        }
        query
    }
}

/// A product matched to a need
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductMatch {
    pub product: ProductRecord,
    pub score: f32,
    pub rationale: String,
}

/// Recommended products for one need; empty when nothing cleared the threshold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeedRecommendation {
    pub need: UnmetNeed,
    pub products: Vec<ProductMatch>,
}

impl NeedRecommendation {
    pub fn is_gap(&self) -> bool {
        self.products.is_empty()
    }
}

/// A need for which no product in the catalog qualified. Recorded, never raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationGap {
    pub need: String,
}

/// Recommender output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Recommendation {
    pub needs: Vec<NeedRecommendation>,
    pub next_steps: Vec<String>,
}

impl Recommendation {
    pub fn gaps(&self) -> Vec<RecommendationGap> {
        self.needs
            .iter()
            .filter(|n| n.is_gap())
            .map(|n| RecommendationGap {
                need: n.need.description.clone(),
            })
            .collect()
    }

    pub fn product_count(&self) -> usize {
        self.needs.iter().map(|n| n.products.len()).sum()
    }
}

/// Final deliverable of a pipeline run
///
/// Deliberately free of wall-clock data: identical inputs serialize to
/// identical bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub transcript: Transcript,
    pub annotation: DialogueAnnotation,
    pub summary: MeetingSummary,
    pub recommendation: Recommendation,
}

/// Identifies the model call a completion request belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    DialogueAnalysis,
    Summary,
    UnmetNeeds,
    ProductRationale,
    NextSteps,
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStage::DialogueAnalysis => write!(f, "dialogue_analysis"),
            AnalysisStage::Summary => write!(f, "summary"),
            AnalysisStage::UnmetNeeds => write!(f, "unmet_needs"),
            AnalysisStage::ProductRationale => write!(f, "product_rationale"),
            AnalysisStage::NextSteps => write!(f, "next_steps"),
        }
    }
}

fn dedup_topics<'a>(topics: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for topic in topics {
        let topic = topic.trim().to_lowercase();
        if !topic.is_empty() && !seen.contains(&topic) {
            seen.push(topic);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_speakers_and_continuations() {
        let transcript = Transcript::parse(
            "Advisor: Good morning.\n\
             \n\
             Client: I've been thinking about retirement.\n\
             It keeps me up at night.\n\
             [01:15] Advisor: Let's look at your pension.",
        );

        assert_eq!(transcript.len(), 3);
        let utterances = transcript.utterances();
        assert_eq!(utterances[0].speaker, "Advisor");
        assert_eq!(
            utterances[1].text,
            "I've been thinking about retirement. It keeps me up at night."
        );
        assert_eq!(utterances[2].timestamp.as_deref(), Some("01:15"));
        assert_eq!(utterances[2].text, "Let's look at your pension.");
    }

    #[test]
    fn test_parse_ignores_prose_with_colons() {
        let transcript = Transcript::parse(
            "Client: We agreed on three things\nthe plan is simple: save more each month",
        );
        assert_eq!(transcript.len(), 1);
        assert!(transcript.utterances()[0]
            .text
            .ends_with("the plan is simple: save more each month"));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(Transcript::parse("   \n\n").is_empty());
    }

    #[test]
    fn test_emotional_cue_round_trip_labels() {
        for cue in EmotionalCue::ALL {
            assert_eq!(cue.to_string().parse::<EmotionalCue>().unwrap(), cue);
        }
        assert!(" Concern ".parse::<EmotionalCue>().is_ok());
        assert!(matches!(
            "anger".parse::<EmotionalCue>(),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_high_intensity_cues() {
        assert!(EmotionalCue::Concern.is_high_intensity());
        assert!(EmotionalCue::Urgency.is_high_intensity());
        assert!(EmotionalCue::Confusion.is_high_intensity());
        assert!(!EmotionalCue::Neutral.is_high_intensity());
        assert!(!EmotionalCue::Satisfaction.is_high_intensity());
    }

    #[test]
    fn test_missing_mandatory_sections() {
        let mut summary = MeetingSummary::default();
        assert_eq!(
            summary.missing_mandatory(),
            vec![SummarySection::ClientGoals, SummarySection::AdvisorAnalysis]
        );

        summary
            .client_goals
            .push(SummaryPoint::new("Retire at 65", vec!["retirement".into()]));
        summary
            .advisor_analysis
            .push(SummaryPoint::new("Raise contributions", vec![]));
        assert!(summary.missing_mandatory().is_empty());
    }

    #[test]
    fn test_summary_topics_are_distinct_and_ordered() {
        let summary = MeetingSummary {
            client_goals: vec![SummaryPoint::new("a", vec!["Retirement".into()])],
            advisor_analysis: vec![SummaryPoint::new(
                "b",
                vec!["education".into(), "retirement".into()],
            )],
            ..Default::default()
        };
        assert_eq!(summary.topics(), vec!["retirement", "education"]);
    }

    #[test]
    fn test_recommendation_gaps() {
        let recommendation = Recommendation {
            needs: vec![
                NeedRecommendation {
                    need: UnmetNeed::new("Estate planning", vec!["estate".into()]),
                    products: vec![],
                },
                NeedRecommendation {
                    need: UnmetNeed::new("College savings", vec!["education".into()]),
                    products: vec![ProductMatch {
                        product: ProductRecord::new("p1", "529 Plan", "education"),
                        score: 0.8,
                        rationale: "fits".into(),
                    }],
                },
            ],
            next_steps: vec![],
        };

        assert_eq!(
            recommendation.gaps(),
            vec![RecommendationGap {
                need: "Estate planning".into()
            }]
        );
        assert_eq!(recommendation.product_count(), 1);
    }

    #[test]
    fn test_client_document_lines() {
        let client = ClientRecord::new("c1")
            .with_attribute("Occupation", "Engineer")
            .with_attribute("Age", "38");
        assert_eq!(client.document(), "Age: 38\nOccupation: Engineer");
    }

    #[test]
    fn test_advisor_label_detection() {
        assert!(is_advisor_label("Advisor"));
        assert!(is_advisor_label("Financial Adviser"));
        assert!(!is_advisor_label("Client"));
    }
}
