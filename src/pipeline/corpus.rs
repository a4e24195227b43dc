//! In-memory searchable corpus over client and product records
//!
//! Records are indexed as term-frequency vectors over lowercased keywords and
//! ranked by cosine similarity. Vectors use ordered maps so scores are
//! reproducible bit for bit across runs.

use crate::domain::models::{ClientRecord, ProductRecord, RecordKind};
use std::collections::BTreeMap;

type TermVector = BTreeMap<String, f32>;

/// A record stored in the corpus
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusRecord {
    Client(ClientRecord),
    Product(ProductRecord),
}

impl CorpusRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            CorpusRecord::Client(_) => RecordKind::Client,
            CorpusRecord::Product(_) => RecordKind::Product,
        }
    }

    pub fn document(&self) -> String {
        match self {
            CorpusRecord::Client(c) => c.document(),
            CorpusRecord::Product(p) => p.document(),
        }
    }

    pub fn as_product(&self) -> Option<&ProductRecord> {
        match self {
            CorpusRecord::Product(p) => Some(p),
            CorpusRecord::Client(_) => None,
        }
    }

    pub fn as_client(&self) -> Option<&ClientRecord> {
        match self {
            CorpusRecord::Client(c) => Some(c),
            CorpusRecord::Product(_) => None,
        }
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub record: &'a CorpusRecord,
    pub score: f32,
}

struct CorpusEntry {
    record: CorpusRecord,
    vector: TermVector,
}

/// Queryable collection built fresh for every run
pub struct IndexedCorpus {
    entries: Vec<CorpusEntry>,
}

impl IndexedCorpus {
    /// Index clients then products, preserving insertion order
    pub fn build(clients: Vec<ClientRecord>, products: Vec<ProductRecord>) -> Self {
        let entries = clients
            .into_iter()
            .map(CorpusRecord::Client)
            .chain(products.into_iter().map(CorpusRecord::Product))
            .map(|record| {
                let vector = term_vector(&record.document());
                CorpusEntry { record, vector }
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientRecord> {
        self.entries.iter().filter_map(|e| e.record.as_client())
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.entries.iter().filter_map(|e| e.record.as_product())
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.record.kind() == kind)
            .count()
    }

    /// Top `k` records by similarity to `query`, ties in insertion order
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit<'_>> {
        self.rank(query, k, None)
    }

    /// Like `search`, restricted to one record kind
    pub fn search_kind(&self, query: &str, k: usize, kind: RecordKind) -> Vec<SearchHit<'_>> {
        self.rank(query, k, Some(kind))
    }

    fn rank(&self, query: &str, k: usize, kind: Option<RecordKind>) -> Vec<SearchHit<'_>> {
        let query = term_vector(query);

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .filter(|e| kind.map_or(true, |k| e.record.kind() == k))
            .map(|e| SearchHit {
                record: &e.record,
                score: cosine_similarity(&query, &e.vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        hits
    }
}

/// Extract keywords from text
fn extract_keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2) // Skip very short words
        .map(|w| w.to_lowercase())
        .filter(|w| !is_stopword(w))
        .collect()
}

/// Check if word is a stopword
fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "the"
            | "and"
            | "for"
            | "that"
            | "this"
            | "with"
            | "from"
            | "have"
            | "has"
            | "are"
            | "was"
            | "were"
            | "been"
            | "about"
            | "your"
            | "you"
            | "not"
            | "but"
            | "can"
            | "will"
            | "would"
            | "could"
            | "should"
            | "what"
            | "when"
            | "how"
            | "our"
            | "their"
            | "they"
            | "into"
            | "more"
            | "some"
            | "any"
            | "other"
            | "its"
            | "also"
            | "category"
            | "description"
    )
}

/// Canonical finance term a word stands for, if any
fn canonical_term(word: &str) -> Option<&'static str> {
    let term = match word {
        w if w.starts_with("retir") || w.starts_with("pension") || w == "401" || w == "ira" => {
            "retirement"
        }
        w if w.starts_with("college")
            || w.starts_with("educat")
            || w.starts_with("tuition")
            || w.starts_with("universit")
            || w == "529" =>
        {
            "education"
        }
        w if w.starts_with("insur") || w == "coverage" => "insurance",
        w if w.starts_with("invest") || w.starts_with("stock") || w == "portfolio" => "investing",
        w if w.starts_with("saving") || w == "emergency" => "savings",
        _ => return None,
    };
    Some(term)
}

fn term_vector(text: &str) -> TermVector {
    let mut vector = TermVector::new();
    for word in extract_keywords(text) {
        if let Some(term) = canonical_term(&word) {
            if term != word {
                *vector.entry(term.to_string()).or_insert(0.0) += 1.0;
            }
        }
        *vector.entry(word).or_insert(0.0) += 1.0;
    }
    vector
}

/// Compute cosine similarity between two sparse vectors
fn cosine_similarity(a: &TermVector, b: &TermVector) -> f32 {
    let dot: f32 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let mag_a: f32 = a.values().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.values().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulated;

    fn corpus() -> IndexedCorpus {
        IndexedCorpus::build(simulated::clients(), simulated::products())
    }

    #[test]
    fn test_build_counts() {
        let corpus = corpus();
        assert_eq!(corpus.len(), 6);
        assert_eq!(corpus.count(RecordKind::Client), 1);
        assert_eq!(corpus.count(RecordKind::Product), 5);
    }

    #[test]
    fn test_search_ranks_matching_product_first() {
        let corpus = corpus();
        let hits = corpus.search_kind("worried about my pension", 3, RecordKind::Product);

        assert_eq!(hits.len(), 3);
        let top = hits[0].record.as_product().unwrap();
        assert_eq!(top.category, "retirement");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_search_kind_filters_records() {
        let corpus = corpus();
        let hits = corpus.search_kind("salary occupation", 5, RecordKind::Client);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.kind(), RecordKind::Client);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let corpus = IndexedCorpus::build(
            vec![],
            vec![
                ProductRecord::new("a", "Alpha", "misc"),
                ProductRecord::new("b", "Beta", "misc"),
                ProductRecord::new("c", "Gamma", "misc"),
            ],
        );

        let hits = corpus.search("unrelated words entirely", 3);
        let ids: Vec<_> = hits
            .iter()
            .map(|h| h.record.as_product().unwrap().id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_search_truncates_to_k() {
        assert_eq!(corpus().search("savings", 2).len(), 2);
        assert!(corpus().search("savings", 0).is_empty());
    }

    #[test]
    fn test_synonyms_link_query_and_category() {
        let a = term_vector("college fund for my daughter");
        let b = term_vector("529 Education Savings Plan\ncategory: education");
        assert!(cosine_similarity(&a, &b) > 0.0);
    }

    #[test]
    fn test_cosine_of_empty_vectors_is_zero() {
        assert_eq!(cosine_similarity(&TermVector::new(), &term_vector("pension")), 0.0);
    }
}
