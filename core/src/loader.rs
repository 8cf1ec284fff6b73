//! File-backed corpus mutations. Identifiers are lexically normalized source paths.

use crate::{Document, Error, InvertedIndex, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a batch add. Per-file failures are collected, never propagated.
#[derive(Debug, Default)]
pub struct FolderReport {
    pub indexed: Vec<String>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl FolderReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into a preceding normal component,
/// collapse repeated separators. The filesystem is not consulted.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.as_ref().components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::from_io(path.to_path_buf(), e))
}

fn is_text_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("txt")
}

impl InvertedIndex {
    /// Build a fresh index from every `.txt` file directly inside `folder`.
    pub fn build_index<P: AsRef<Path>>(folder: P) -> (Self, FolderReport) {
        let mut index = Self::new();
        let report = index.add_folder(folder);
        (index, report)
    }

    /// Read `path` and index it under its normalized form. Returns the identifier used.
    ///
    /// An already-indexed identifier is replaced, so its old postings never survive.
    pub fn add_document<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let doc_path = normalize_path(path);
        let text = match read_source(&doc_path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "could not add document");
                return Err(e);
            }
        };
        let key = path_key(&doc_path);
        self.index_document(Document::new(key.clone(), text));
        Ok(key)
    }

    /// Add every `.txt` file directly inside `folder`. One failing file does not stop the others.
    pub fn add_folder<P: AsRef<Path>>(&mut self, folder: P) -> FolderReport {
        let folder = folder.as_ref();
        let mut report = FolderReport::default();
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
            match entry {
                Ok(entry) => {
                    let p = entry.path();
                    if is_text_file(p) && !entry.file_type().is_dir() {
                        files.push(p.to_path_buf());
                    }
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| folder.to_path_buf());
                    let err = match e.into_io_error() {
                        Some(io) => Error::from_io(path.clone(), io),
                        None => Error::Io {
                            path: path.clone(),
                            source: std::io::Error::other("filesystem loop"),
                        },
                    };
                    tracing::warn!(error = %err, "skipping entry");
                    report.failed.push((path, err));
                }
            }
        }
        files.sort();

        for file in files {
            match self.add_document(&file) {
                Ok(key) => report.indexed.push(key),
                Err(e) => report.failed.push((file, e)),
            }
        }
        tracing::info!(
            folder = %folder.display(),
            indexed = report.indexed.len(),
            failed = report.failed.len(),
            "added folder"
        );
        report
    }

    /// Re-read `path`, replacing whatever version of it is indexed.
    /// Behaves like [`InvertedIndex::add_document`] when the path was never indexed.
    pub fn update_document<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let doc_path = normalize_path(path);
        let key = path_key(&doc_path);
        if self.contains(&key) {
            self.delete_document(&key)?;
        }
        self.add_document(&doc_path)
    }

    /// Remove the document indexed under the normalized form of `path`.
    pub fn delete_path<P: AsRef<Path>>(&mut self, path: P) -> Result<Document> {
        let key = path_key(&normalize_path(path));
        self.delete_document(&key)
    }
}
