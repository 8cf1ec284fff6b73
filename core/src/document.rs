use crate::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One corpus entry. Immutable once built; updates replace the whole document.
///
/// Deserialization reads only `path` and `text` and recomputes the term table,
/// so a serialized document can never disagree with its own text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentSource")]
pub struct Document {
    path: String,
    text: String,
    term_frequencies: HashMap<String, u32>,
    len: usize,
}

#[derive(Deserialize)]
struct DocumentSource {
    path: String,
    text: String,
}

impl From<DocumentSource> for Document {
    fn from(src: DocumentSource) -> Self {
        Document::new(src.path, src.text)
    }
}

impl Document {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        let text = text.into();
        let terms = normalize(&text);
        let len = terms.len();
        let mut term_frequencies: HashMap<String, u32> = HashMap::new();
        for term in terms {
            *term_frequencies.entry(term).or_insert(0) += 1;
        }
        Self { path, text, term_frequencies, len }
    }

    /// Identifier of the document (its canonical source path for file-backed documents).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fulltext(&self) -> &str {
        &self.text
    }

    /// Occurrences of `term` in this document, 0 when absent.
    pub fn term_frequency(&self, term: &str) -> u32 {
        self.term_frequencies.get(term).copied().unwrap_or(0)
    }

    pub fn term_frequencies(&self) -> &HashMap<String, u32> {
        &self.term_frequencies
    }

    /// Number of normalized tokens.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
