//! In-memory full-text search over plain-text documents: boolean retrieval,
//! TF-IDF ranking and positional phrase search.
//!
//! The index is a plain owned value. Callers sharing it across threads wrap it
//! themselves (the server uses a single `RwLock`).

pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod phrase;
pub mod query;
pub mod rank;
pub mod tokenizer;

pub use document::Document;
pub use error::{Error, Result};
pub use index::{DocPath, IndexStats, InvertedIndex, PositionSet, Term};
pub use loader::{normalize_path, FolderReport};
pub use query::{Hits, SearchMode};
pub use rank::ScoredDocument;
