//! Recommender stage
//!
//! Infers unmet needs from the summary, matches each need against the product
//! records of the corpus, and asks the model for rationales and next steps.
//! A need without a qualifying product is kept with an empty product list.

use crate::domain::models::{
    AnalysisStage, MeetingSummary, NeedRecommendation, ProductMatch, ProductRecord, Recommendation,
    RecordKind, UnmetNeed,
};
use crate::error::Result;
use crate::pipeline::agent::Agent;
use crate::pipeline::corpus::IndexedCorpus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize)]
struct NeedsPayload<'a> {
    summary: &'a MeetingSummary,
    client_profile: Vec<String>,
}

#[derive(Deserialize)]
struct NeedsResponse {
    unmet_needs: Vec<UnmetNeed>,
}

#[derive(Serialize)]
struct RationalePayload<'a> {
    client_profile: &'a [String],
    matches: Vec<CandidatePayload<'a>>,
}

#[derive(Serialize)]
struct CandidatePayload<'a> {
    need_index: usize,
    need: &'a str,
    product_id: &'a str,
    product_name: &'a str,
    category: &'a str,
    product_details: String,
}

#[derive(Deserialize)]
struct RationaleResponse {
    rationales: Vec<RationaleEntry>,
}

#[derive(Deserialize)]
struct RationaleEntry {
    need_index: usize,
    product_id: String,
    rationale: String,
}

#[derive(Serialize)]
struct NextStepsPayload<'a> {
    action_items: Vec<&'a str>,
    recommendations: Vec<RecommendedPayload<'a>>,
    gaps: Vec<&'a str>,
}

#[derive(Serialize)]
struct RecommendedPayload<'a> {
    need: &'a str,
    products: Vec<&'a str>,
}

#[derive(Deserialize)]
struct NextStepsResponse {
    next_steps: Vec<String>,
}

struct Candidate {
    need_index: usize,
    product: ProductRecord,
    score: f32,
}

pub struct Recommender {
    agent: Agent,
    top_k: usize,
    threshold: f32,
}

impl Recommender {
    pub fn new(agent: Agent, top_k: usize, threshold: f32) -> Self {
        Self {
            agent,
            top_k,
            threshold,
        }
    }

    pub async fn recommend(
        &self,
        summary: &MeetingSummary,
        corpus: &IndexedCorpus,
    ) -> Result<Recommendation> {
        let client_profile = client_profile(summary, corpus, self.top_k);

        let needs: NeedsResponse = self
            .agent
            .ask(
                AnalysisStage::UnmetNeeds,
                &NeedsPayload {
                    summary,
                    client_profile: client_profile.clone(),
                },
            )
            .await?;
        let needs = needs.unmet_needs;
        log::info!("Identified {} unmet needs", needs.len());

        let candidates = self.match_products(&needs, corpus);
        let mut rationales = if candidates.is_empty() {
            HashMap::new()
        } else {
            self.rationales(&needs, &candidates, &client_profile).await?
        };

        let mut recommended: Vec<NeedRecommendation> = needs
            .into_iter()
            .map(|need| NeedRecommendation {
                need,
                products: Vec::new(),
            })
            .collect();

        for candidate in candidates {
            let rec = &mut recommended[candidate.need_index];
            let rationale = rationales
                .remove(&(candidate.need_index, candidate.product.id.clone()))
                .unwrap_or_else(|| fallback_rationale(&candidate, &rec.need));
            rec.products.push(ProductMatch {
                product: candidate.product,
                score: candidate.score,
                rationale,
            });
        }

        for rec in recommended.iter().filter(|r| r.is_gap()) {
            log::warn!(
                "No product in the catalog clears similarity {:.2} for need: {}",
                self.threshold,
                rec.need.description
            );
        }

        let next_steps = self.next_steps(summary, &recommended).await?;

        let recommendation = Recommendation {
            needs: recommended,
            next_steps,
        };
        log::info!(
            "Recommended {} products, {} needs without a match, {} next steps",
            recommendation.product_count(),
            recommendation.gaps().len(),
            recommendation.next_steps.len()
        );
        Ok(recommendation)
    }

    /// Products scoring above the threshold, in need order then rank
    fn match_products(&self, needs: &[UnmetNeed], corpus: &IndexedCorpus) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for (need_index, need) in needs.iter().enumerate() {
            let hits = corpus.search_kind(&need.query(), self.top_k, RecordKind::Product);
            for hit in hits {
                if hit.score <= self.threshold {
                    continue;
                }
                if let Some(product) = hit.record.as_product() {
                    log::debug!(
                        "Need {} matches {} ({:.3})",
                        need_index,
                        product.id,
                        hit.score
                    );
                    candidates.push(Candidate {
                        need_index,
                        product: product.clone(),
                        score: hit.score,
                    });
                }
            }
        }
        candidates
    }

    async fn rationales(
        &self,
        needs: &[UnmetNeed],
        candidates: &[Candidate],
        client_profile: &[String],
    ) -> Result<HashMap<(usize, String), String>> {
        let payload = RationalePayload {
            client_profile,
            matches: candidates
                .iter()
                .map(|c| CandidatePayload {
                    need_index: c.need_index,
                    need: &needs[c.need_index].description,
                    product_id: &c.product.id,
                    product_name: &c.product.name,
                    category: &c.product.category,
                    product_details: c.product.document(),
                })
                .collect(),
        };

        let response: RationaleResponse = self
            .agent
            .ask(AnalysisStage::ProductRationale, &payload)
            .await?;

        Ok(response
            .rationales
            .into_iter()
            .filter(|r| !r.rationale.trim().is_empty())
            .map(|r| ((r.need_index, r.product_id), r.rationale))
            .collect())
    }

    async fn next_steps(
        &self,
        summary: &MeetingSummary,
        recommended: &[NeedRecommendation],
    ) -> Result<Vec<String>> {
        let payload = NextStepsPayload {
            action_items: summary.action_items.iter().map(|p| p.text.as_str()).collect(),
            recommendations: recommended
                .iter()
                .filter(|r| !r.is_gap())
                .map(|r| RecommendedPayload {
                    need: &r.need.description,
                    products: r.products.iter().map(|m| m.product.name.as_str()).collect(),
                })
                .collect(),
            gaps: recommended
                .iter()
                .filter(|r| r.is_gap())
                .map(|r| r.need.description.as_str())
                .collect(),
        };

        let response: NextStepsResponse =
            self.agent.ask(AnalysisStage::NextSteps, &payload).await?;
        Ok(response.next_steps)
    }
}

/// Client records most relevant to what was discussed, as documents
fn client_profile(summary: &MeetingSummary, corpus: &IndexedCorpus, k: usize) -> Vec<String> {
    let mut query = summary.topics().join(" ");
    for point in &summary.client_goals {
        query.push(' ');
        query.push_str(&point.text);
    }

    corpus
        .search_kind(&query, k, RecordKind::Client)
        .into_iter()
        .map(|hit| hit.record.document())
        .collect()
}

fn fallback_rationale(candidate: &Candidate, need: &UnmetNeed) -> String {
    format!(
        "{} is the closest {} product in the catalog for \"{}\" (similarity {:.2})",
        candidate.product.name, candidate.product.category, need.description, candidate.score
    )
}
