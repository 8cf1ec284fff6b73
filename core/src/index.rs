use crate::tokenizer::tokenize;
use crate::{Document, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

pub type Term = String;
pub type DocPath = String;

/// Token offsets of one term inside one document.
pub type PositionSet = BTreeSet<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub tokens: usize,
}

/// In-memory inverted index with positional postings.
///
/// `postings` answers boolean queries and document frequencies, `positions` answers
/// phrase queries. Every identifier present in either map has an entry in `documents`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvertedIndex {
    pub(crate) documents: HashMap<DocPath, Document>,
    pub(crate) postings: HashMap<Term, HashSet<DocPath>>,
    pub(crate) positions: HashMap<Term, HashMap<DocPath, PositionSet>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Store `document` and add its terms to the postings.
    ///
    /// A document already indexed under the same identifier is purged first,
    /// so none of its old postings survive.
    pub fn index_document(&mut self, document: Document) {
        let path = document.path().to_string();
        self.remove(&path);
        for (term, pos) in tokenize(document.fulltext()) {
            self.postings.entry(term.clone()).or_default().insert(path.clone());
            self.positions
                .entry(term)
                .or_default()
                .entry(path.clone())
                .or_default()
                .insert(pos);
        }
        tracing::debug!(path = %path, tokens = document.len(), "indexed document");
        self.documents.insert(path, document);
    }

    /// Index `text` under `path`, replacing any previous version of that identifier.
    pub fn index_text(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.index_document(Document::new(path, text));
    }

    /// Remove a document and purge it from every posting and position list.
    pub fn delete_document(&mut self, path: &str) -> Result<Document> {
        self.remove(path).ok_or_else(|| {
            tracing::info!(path, "document not indexed; nothing to delete");
            Error::NotFound { path: PathBuf::from(path) }
        })
    }

    fn remove(&mut self, path: &str) -> Option<Document> {
        let document = self.documents.remove(path)?;
        // Terms of the removed document are exactly the keys it touched.
        for term in document.term_frequencies().keys() {
            if let Some(docs) = self.postings.get_mut(term) {
                docs.remove(path);
                if docs.is_empty() {
                    self.postings.remove(term);
                }
            }
            if let Some(per_doc) = self.positions.get_mut(term) {
                per_doc.remove(path);
                if per_doc.is_empty() {
                    self.positions.remove(term);
                }
            }
        }
        tracing::debug!(path, "removed document");
        Some(document)
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Identifiers of every indexed document, ascending.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Documents containing `term`; `None` when the term is unknown.
    pub fn postings(&self, term: &str) -> Option<&HashSet<DocPath>> {
        self.postings.get(term)
    }

    /// Offsets of `term` in the document `path`.
    pub fn positions(&self, term: &str, path: &str) -> Option<&PositionSet> {
        self.positions.get(term).and_then(|per_doc| per_doc.get(path))
    }

    /// Number of documents currently containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashSet::len)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.values().filter(|docs| !docs.is_empty()).count()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.len(),
            terms: self.num_terms(),
            tokens: self.documents.values().map(Document::len).sum(),
        }
    }

    pub(crate) fn resolve<'a, I>(&self, paths: I) -> Vec<&Document>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut docs: Vec<&Document> = paths
            .into_iter()
            .filter_map(|p| self.documents.get(p))
            .collect();
        docs.sort_by(|a, b| a.path().cmp(b.path()));
        docs
    }
}
