//! TF-IDF vectorization and cosine similarity over a two-document corpus

use crate::error::{Result, ResumeMatcherError};
use crate::processing::text_processor::TextProcessor;
use std::collections::{BTreeMap, BTreeSet};

/// A term-weight vector keyed by term, L2-normalized.
pub type TfIdfVector = BTreeMap<String, f64>;

/// TF-IDF model fit over a closed corpus.
///
/// Weighting follows scikit-learn's `TfidfVectorizer` defaults: raw term
/// counts, smoothed idf `ln((1 + n) / (1 + df)) + 1`, L2 normalization.
/// The idf only knows the documents it was fit on, so scores are relative
/// to that corpus and not comparable across different pairs.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    idf: BTreeMap<String, f64>,
    vectors: Vec<TfIdfVector>,
}

impl TfIdfModel {
    pub fn fit(processor: &TextProcessor, documents: &[&str]) -> Result<Self> {
        let term_counts: Vec<BTreeMap<String, f64>> = documents
            .iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for term in processor.terms(doc) {
                    *counts.entry(term).or_insert(0.0) += 1.0;
                }
                counts
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ResumeMatcherError::EmptyCorpus(
                "no terms in any document; the vocabulary is empty".to_string(),
            ));
        }

        let n = documents.len() as f64;
        let idf: BTreeMap<String, f64> = document_frequency
            .into_iter()
            .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        let vectors = term_counts
            .into_iter()
            .map(|counts| {
                let weighted: TfIdfVector = counts
                    .into_iter()
                    .map(|(term, tf)| {
                        let weight = tf * idf[&term];
                        (term, weight)
                    })
                    .collect();
                l2_normalize(weighted)
            })
            .collect();

        Ok(Self { idf, vectors })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn vector(&self, index: usize) -> Option<&TfIdfVector> {
        self.vectors.get(index)
    }
}

fn l2_normalize(mut vector: TfIdfVector) -> TfIdfVector {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Cosine similarity in [0, 1]. Zero vectors have similarity 0.
pub fn cosine_similarity(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Iterate the shared terms in sorted order so the sum is the same
    // whichever argument comes first.
    let shared: BTreeSet<&String> = a.keys().filter(|k| b.contains_key(*k)).collect();
    let dot: f64 = shared.iter().map(|term| a[*term] * b[*term]).sum();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Textual similarity between two documents as a percentage.
pub struct SimilarityScorer<'a> {
    processor: &'a TextProcessor,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(processor: &'a TextProcessor) -> Self {
        Self { processor }
    }

    /// Score in [0, 100], rounded to two decimals.
    pub fn score(&self, text_a: &str, text_b: &str) -> Result<f64> {
        let model = TfIdfModel::fit(self.processor, &[text_a, text_b])?;
        let (a, b) = match (model.vector(0), model.vector(1)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ResumeMatcherError::EmptyCorpus(
                    "expected two document vectors".to_string(),
                ))
            }
        };

        let similarity = cosine_similarity(a, b);
        log::debug!(
            "TF-IDF vocabulary: {} terms, cosine similarity {:.4}",
            model.vocabulary_size(),
            similarity
        );

        Ok(round_percentage(similarity))
    }
}

fn round_percentage(similarity: f64) -> f64 {
    ((similarity * 100.0 * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: &str, b: &str) -> Result<f64> {
        let processor = TextProcessor::new();
        SimilarityScorer::new(&processor).score(a, b)
    }

    #[test]
    fn test_identical_documents_score_100() {
        let text = "Senior Python developer with SQL and leadership experience";
        assert_eq!(score(text, text).unwrap(), 100.0);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        assert_eq!(score("python developer", "java engineer").unwrap(), 0.0);
    }

    #[test]
    fn test_score_is_symmetric() {
        let a = "I know Python and SQL and have leadership experience";
        let b = "Looking for Python, Java, and teamwork skills";
        assert_eq!(score(a, b).unwrap(), score(b, a).unwrap());
    }

    #[test]
    fn test_partial_overlap_is_strictly_between() {
        let s = score(
            "I know Python and SQL and have leadership experience",
            "Looking for Python, Java, and teamwork skills",
        )
        .unwrap();
        assert!(s > 0.0 && s < 100.0, "score was {}", s);
    }

    #[test]
    fn test_one_empty_document_scores_zero() {
        assert_eq!(score("", "python developer").unwrap(), 0.0);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        assert!(matches!(score("", "  "), Err(ResumeMatcherError::EmptyCorpus(_))));
        assert!(matches!(score("a b c", "? !"), Err(ResumeMatcherError::EmptyCorpus(_))));
    }

    #[test]
    fn test_smoothed_idf_weights() {
        let processor = TextProcessor::new();
        let model = TfIdfModel::fit(&processor, &["python sql", "python java"]).unwrap();

        assert_eq!(model.vocabulary_size(), 3);
        assert!((model.idf("python").unwrap() - 1.0).abs() < 1e-12);
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((model.idf("sql").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_known_pair_value() {
        // shared term weight 1, unique term weight w = ln(1.5) + 1 in each doc
        let w = (1.5f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + w * w);
        let s = score("python sql", "python java").unwrap();
        assert!((s - (expected * 100.0 * 100.0).round() / 100.0).abs() < 1e-9);
    }
}
