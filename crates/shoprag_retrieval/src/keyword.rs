//! Lexical retriever.
//!
//! Passages are ranked with Okapi BM25 over prefix stems, so inflected forms
//! such as "оплатить" and "оплата" share the term "опла".

use crate::KnowledgeBase;
use async_trait::async_trait;
use shoprag_core::Passage;
use shoprag_error::ShopragResult;
use shoprag_interface::Retriever;
use std::collections::{HashMap, HashSet};

/// Characters kept from each word.
const STEM_LEN: usize = 4;
/// Term-frequency saturation.
const K1: f32 = 1.2;
/// Document-length normalisation.
const B: f32 = 0.75;

/// Splits text into stemmed terms, in order, repeats included.
///
/// Words are alphanumeric runs of at least two characters, lower-cased,
/// with `ё` folded to `е` and cut to their first four characters.
///
/// # Examples
///
/// ```
/// use shoprag_retrieval::tokenize;
///
/// assert_eq!(tokenize("Оплатить картой, а?"), vec!["опла", "карт"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= 2)
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .map(|c| if c == 'ё' { 'е' } else { c })
                .take(STEM_LEN)
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone)]
struct IndexedPassage {
    passage: Passage,
    term_counts: HashMap<String, usize>,
    len: usize,
}

/// Ranks passages against a query with BM25.
///
/// Scores are relative: the best passage scores `1.0` and the rest are
/// scaled by the same factor. Passages sharing no term with the query are
/// left out.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    index: Vec<IndexedPassage>,
    doc_freq: HashMap<String, usize>,
    avg_len: f32,
}

impl KeywordRetriever {
    pub fn new(knowledge_base: KnowledgeBase) -> Self {
        let index: Vec<IndexedPassage> = knowledge_base
            .passages()
            .iter()
            .map(|p| {
                let terms = tokenize(p.text());
                let len = terms.len();
                let mut term_counts = HashMap::new();
                for term in terms {
                    *term_counts.entry(term).or_insert(0) += 1;
                }
                IndexedPassage {
                    passage: p.clone(),
                    term_counts,
                    len,
                }
            })
            .collect();

        let mut doc_freq = HashMap::new();
        for entry in &index {
            for term in entry.term_counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let total_len: usize = index.iter().map(|e| e.len).sum();
        let avg_len = if index.is_empty() {
            0.0
        } else {
            total_len as f32 / index.len() as f32
        };

        Self {
            index,
            doc_freq,
            avg_len,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn idf(&self, term: &str) -> f32 {
        let n = self.index.len() as f32;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    fn bm25(&self, entry: &IndexedPassage, terms: &[String]) -> f32 {
        let len_ratio = if self.avg_len > 0.0 {
            entry.len as f32 / self.avg_len
        } else {
            0.0
        };
        terms
            .iter()
            .filter_map(|term| {
                let tf = *entry.term_counts.get(term)? as f32;
                let saturation = tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * len_ratio));
                Some(self.idf(term) * saturation)
            })
            .sum()
    }

    /// Scores passages against `query`, best first.
    pub fn score(&self, query: &str) -> Vec<Passage> {
        let mut seen = HashSet::new();
        let terms: Vec<String> = tokenize(query)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let raw: Vec<(&Passage, f32)> = self
            .index
            .iter()
            .map(|entry| (&entry.passage, self.bm25(entry, &terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        let best = raw.iter().map(|(_, s)| *s).fold(0.0_f32, f32::max);
        if best <= 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<Passage> = raw
            .into_iter()
            .map(|(passage, score)| passage.with_score(score / best))
            .collect();
        scored.sort_by(|a, b| b.score().total_cmp(a.score()));
        scored
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    #[tracing::instrument(skip(self, query), fields(passages = self.index.len()))]
    async fn retrieve(&self, query: &str) -> ShopragResult<Vec<Passage>> {
        let scored = self.score(query);
        tracing::debug!(matched = scored.len(), "Scored passages");
        Ok(scored)
    }
}
