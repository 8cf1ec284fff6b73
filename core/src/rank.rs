//! Naive TF-IDF: `score(d) = Σ tf(t, d) · log10(N / df(t))` over every query term,
//! with no length normalization and no smoothing.

use crate::{Document, Error, InvertedIndex, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

impl InvertedIndex {
    /// `log10(N / df(term))` against the current postings.
    ///
    /// Fails with [`Error::EmptyIndex`] when there are no documents and with
    /// [`Error::ZeroDocumentFrequency`] when no document contains `term`.
    pub fn inverse_document_frequency(&self, term: &str) -> Result<f64> {
        let total = self.len();
        if total == 0 {
            return Err(Error::EmptyIndex);
        }
        let df = self.document_frequency(term);
        if df == 0 {
            return Err(Error::ZeroDocumentFrequency { term: term.to_string() });
        }
        Ok((total as f64 / df as f64).log10())
    }

    /// Score `documents` against the normalized query `terms`, highest first.
    ///
    /// The sort is stable: equal scores keep their input order.
    pub fn rank<'a>(&self, terms: &[String], documents: Vec<&'a Document>) -> Result<Vec<ScoredDocument<'a>>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let idf: Vec<f64> = terms
            .iter()
            .map(|t| self.inverse_document_frequency(t))
            .collect::<Result<_>>()?;

        let mut scored: Vec<ScoredDocument<'a>> = documents
            .into_iter()
            .map(|document| {
                let score: f64 = terms
                    .iter()
                    .zip(&idf)
                    .map(|(t, w)| document.term_frequency(t) as f64 * w)
                    .sum();
                ScoredDocument { document, score }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchMode;
    use crate::query::Hits;

    fn corpus() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.index_text("a", "rust rust rust systems");
        index.index_text("b", "rust systems");
        index.index_text("c", "python scripting");
        index.index_text("d", "go systems");
        index
    }

    #[test]
    fn idf_matches_log10_ratio() {
        let index = corpus();
        let idf = index.inverse_document_frequency("rust").unwrap();
        assert!((idf - 2f64.log10()).abs() < 1e-12);
        assert_eq!(index.inverse_document_frequency("python").unwrap(), 4f64.log10());
    }

    #[test]
    fn higher_tf_ranks_first() {
        let index = corpus();
        let Hits::Ranked(scored) = index.search("rust systems", SearchMode::And, true).unwrap() else {
            panic!("expected ranked hits");
        };
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].document.path(), "a");
        assert_eq!(scored[1].document.path(), "b");
        let expected = 3.0 * 2f64.log10() + (4.0f64 / 3.0).log10();
        assert!((scored[0].score - expected).abs() < 1e-12);
        assert!(scored[0].score >= scored[1].score);
    }

    #[test]
    fn ties_keep_identifier_order() {
        let mut index = InvertedIndex::new();
        index.index_text("y", "alpha");
        index.index_text("x", "alpha");
        index.index_text("z", "beta");
        let hits = index.search("alpha", SearchMode::Or, true).unwrap();
        assert_eq!(hits.paths(), vec!["x", "y"]);
    }

    #[test]
    fn absent_term_is_a_domain_error() {
        let index = corpus();
        let err = index.search("rust haskell", SearchMode::Or, true).unwrap_err();
        assert!(matches!(err, Error::ZeroDocumentFrequency { ref term } if term == "haskell"));
    }

    #[test]
    fn empty_candidates_and_empty_index() {
        let index = corpus();
        assert!(index.search("haskell", SearchMode::And, true).unwrap().is_empty());
        let empty = InvertedIndex::new();
        assert!(matches!(empty.inverse_document_frequency("x"), Err(Error::EmptyIndex)));
        assert!(empty.rank(&["x".to_string()], Vec::new()).unwrap().is_empty());
    }
}
