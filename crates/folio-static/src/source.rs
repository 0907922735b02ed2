//! Document discovery.
//!
//! A [`DocumentSource`] lists and reads markdown documents. Two providers
//! exist: [`LocalDocs`] reads a directory on disk, [`BundledDocs`] serves the
//! default documents compiled into the binary. [`select_source`] picks one
//! at startup and the builder receives it explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::bundled::BUNDLED_DOCS;
use crate::templates::NavEntry;

/// File extension of markdown sources.
pub const MARKDOWN_EXT: &str = "md";

/// File extension of generated pages.
pub const HTML_EXT: &str = "html";

/// Errors that can occur while discovering or reading documents.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to list documents in {path}: {message}")]
    ListError { path: String, message: String },

    #[error("Failed to read document {name}: {message}")]
    ReadError { name: String, message: String },

    #[error("Document not found: {0}")]
    NotFound(String),
}

/// A provider of markdown documents.
pub trait DocumentSource: Send + Sync {
    /// Short name used in log output.
    fn kind(&self) -> &'static str;

    /// List markdown file names (e.g. `getting-started.md`), sorted by name.
    fn list(&self) -> Result<Vec<String>, DiscoveryError>;

    /// Read the raw bytes of a listed document.
    fn read(&self, name: &str) -> Result<Vec<u8>, DiscoveryError>;
}

/// Documents in a directory on disk.
///
/// Only regular files directly inside the directory are considered;
/// subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct LocalDocs {
    dir: PathBuf,
}

impl LocalDocs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for LocalDocs {
    fn kind(&self) -> &'static str {
        "local"
    }

    fn list(&self) -> Result<Vec<String>, DiscoveryError> {
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| DiscoveryError::ListError {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::debug!("Skipping non UTF-8 file name in {}", self.dir.display());
                continue;
            };

            if is_markdown(name) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, DiscoveryError> {
        fs::read(self.dir.join(name)).map_err(|e| DiscoveryError::ReadError {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Default documents compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDocs;

impl DocumentSource for BundledDocs {
    fn kind(&self) -> &'static str {
        "bundled"
    }

    fn list(&self) -> Result<Vec<String>, DiscoveryError> {
        let mut names: Vec<String> = BUNDLED_DOCS
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| is_markdown(name))
            .collect();
        names.sort();

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, DiscoveryError> {
        BUNDLED_DOCS
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, content)| content.as_bytes().to_vec())
            .ok_or_else(|| DiscoveryError::NotFound(name.to_string()))
    }
}

/// Choose the document source for this process.
///
/// Uses `docs_dir` when it exists and falls back to the bundled documents
/// otherwise.
pub fn select_source(docs_dir: &Path) -> Box<dyn DocumentSource> {
    if docs_dir.exists() {
        tracing::debug!("Using local docs from {}", docs_dir.display());
        Box::new(LocalDocs::new(docs_dir))
    } else {
        tracing::info!(
            "Docs directory {} not found, using bundled docs",
            docs_dir.display()
        );
        Box::new(BundledDocs)
    }
}

fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == MARKDOWN_EXT)
}

/// A discovered markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name without the markdown extension
    pub stem: String,

    /// Source file name, e.g. `getting-started.md`
    pub source_name: String,

    /// Display title derived from the stem
    pub title: String,
}

impl Document {
    /// Build a document from a markdown file name.
    ///
    /// Returns `None` when the name has no markdown extension.
    pub fn from_source_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(&format!(".{}", MARKDOWN_EXT))?;
        Some(Self::from_stem(stem, name.to_string()))
    }

    /// Build a document from a generated page file name (`<stem>.html`).
    pub fn from_output_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(&format!(".{}", HTML_EXT))?;
        Some(Self::from_stem(stem, format!("{}.{}", stem, MARKDOWN_EXT)))
    }

    fn from_stem(stem: &str, source_name: String) -> Self {
        Self {
            stem: stem.to_string(),
            source_name,
            title: folio_md::derive_title(stem),
        }
    }

    /// Output file name, relative to the site root.
    pub fn output_name(&self) -> String {
        format!("{}.{}", self.stem, HTML_EXT)
    }

    /// URL path of the generated page.
    pub fn url_path(&self) -> String {
        format!("/{}", self.output_name())
    }

    /// Sidebar entry for this document.
    pub fn nav_entry(&self) -> NavEntry {
        NavEntry {
            title: self.title.clone(),
            path: self.url_path(),
        }
    }
}
