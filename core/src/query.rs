use crate::rank::ScoredDocument;
use crate::tokenizer::normalize;
use crate::{Document, InvertedIndex, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the posting sets of the query terms are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every term must be present.
    And,
    /// Any term suffices.
    Or,
    /// Documents containing none of the terms.
    Not,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(SearchMode::And),
            "OR" => Ok(SearchMode::Or),
            "NOT" => Ok(SearchMode::Not),
            _ => Err(format!("unknown search mode '{s}'")),
        }
    }
}

impl SearchMode {
    /// Exact-case mode name as accepted by [`InvertedIndex::search_by_name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AND" => Some(SearchMode::And),
            "OR" => Some(SearchMode::Or),
            "NOT" => Some(SearchMode::Not),
            _ => None,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchMode::And => "AND",
            SearchMode::Or => "OR",
            SearchMode::Not => "NOT",
        };
        f.write_str(s)
    }
}

/// Result of [`InvertedIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub enum Hits<'a> {
    /// Matching documents in ascending identifier order.
    Unranked(Vec<&'a Document>),
    /// Matching documents by descending TF-IDF score.
    Ranked(Vec<ScoredDocument<'a>>),
}

impl<'a> Hits<'a> {
    pub fn len(&self) -> usize {
        match self {
            Hits::Unranked(docs) => docs.len(),
            Hits::Ranked(scored) => scored.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers in result order.
    pub fn paths(&self) -> Vec<&'a str> {
        match self {
            Hits::Unranked(docs) => docs.iter().map(|d| d.path()).collect(),
            Hits::Ranked(scored) => scored.iter().map(|s| s.document.path()).collect(),
        }
    }

    /// `(identifier, score)` pairs; scores are `None` for unranked hits.
    pub fn entries(&self) -> Vec<(&'a str, Option<f64>)> {
        match self {
            Hits::Unranked(docs) => docs.iter().map(|d| (d.path(), None)).collect(),
            Hits::Ranked(scored) => scored
                .iter()
                .map(|s| (s.document.path(), Some(s.score)))
                .collect(),
        }
    }
}

impl InvertedIndex {
    /// Boolean retrieval, optionally ranked by TF-IDF.
    ///
    /// Unknown query terms contribute an empty posting set. An AND query with no
    /// terms matches nothing. Ranking fails with a domain error when a query term
    /// occurs in no document.
    pub fn search(&self, query: &str, mode: SearchMode, rank: bool) -> Result<Hits<'_>> {
        let terms = normalize(query);
        let documents = self.matching(&terms, mode);
        if rank {
            Ok(Hits::Ranked(self.rank(&terms, documents)?))
        } else {
            Ok(Hits::Unranked(documents))
        }
    }

    /// Like [`InvertedIndex::search`] with the mode given by name: exactly `AND`, `OR`
    /// or `NOT`. Any other name yields an empty result rather than an error.
    pub fn search_by_name(&self, query: &str, mode: &str, rank: bool) -> Result<Hits<'_>> {
        match SearchMode::from_name(mode) {
            Some(mode) => self.search(query, mode, rank),
            None => {
                tracing::debug!(mode, "unknown search mode; returning empty result");
                Ok(if rank { Hits::Ranked(Vec::new()) } else { Hits::Unranked(Vec::new()) })
            }
        }
    }

    fn matching(&self, terms: &[String], mode: SearchMode) -> Vec<&Document> {
        let empty = HashSet::new();
        let sets: Vec<&HashSet<String>> = terms
            .iter()
            .map(|t| self.postings.get(t).unwrap_or(&empty))
            .collect();

        match mode {
            SearchMode::And => {
                let Some((first, rest)) = sets.split_first() else {
                    return Vec::new();
                };
                self.resolve(
                    first
                        .iter()
                        .filter(|p| rest.iter().all(|s| s.contains(*p)))
                        .map(String::as_str),
                )
            }
            SearchMode::Or => {
                let union: HashSet<&str> = sets
                    .iter()
                    .flat_map(|s| s.iter().map(String::as_str))
                    .collect();
                self.resolve(union)
            }
            SearchMode::Not => {
                let union: HashSet<&str> = sets
                    .iter()
                    .flat_map(|s| s.iter().map(String::as_str))
                    .collect();
                self.resolve(
                    self.documents
                        .keys()
                        .map(String::as_str)
                        .filter(|p| !union.contains(p)),
                )
            }
        }
    }
}
