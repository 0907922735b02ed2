//! Static site builder.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use folio_md::render_markdown;

use crate::source::{DiscoveryError, Document, DocumentSource};
use crate::templates::{NavEntry, Page, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildReport {
    /// Number of pages generated
    pub pages: usize,

    /// Which document source was used
    pub source: &'static str,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to render template for {name}: {message}")]
    TemplateError { name: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
///
/// One call to [`StaticBuilder::build`] is one full pass: nothing is carried
/// over between passes and every page is rewritten.
pub struct StaticBuilder {
    config: BuildConfig,
    source: Box<dyn DocumentSource>,
    templates: Arc<TemplateEngine>,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(
        config: BuildConfig,
        source: Box<dyn DocumentSource>,
        templates: Arc<TemplateEngine>,
    ) -> Self {
        Self {
            config,
            source,
            templates,
        }
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", self.config.output_dir.display(), e))
        })?;

        let documents = self.discover_documents()?;

        if documents.is_empty() {
            tracing::warn!("No markdown files found in {} docs", self.source.kind());
        } else {
            tracing::info!(
                "Converting {} markdown files from {} docs...",
                documents.len(),
                self.source.kind()
            );
        }

        // Every page gets the full list, its own entry included.
        let nav = build_navigation(&documents);

        for document in &documents {
            self.build_page(document, &nav)?;
        }

        Ok(BuildReport {
            pages: documents.len(),
            source: self.source.kind(),
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all markdown documents in the configured source.
    fn discover_documents(&self) -> Result<Vec<Document>, BuildError> {
        let names = self.source.list()?;

        Ok(names
            .iter()
            .filter_map(|name| Document::from_source_name(name))
            .collect())
    }

    /// Build a single page.
    fn build_page(&self, document: &Document, nav: &[NavEntry]) -> Result<PathBuf, BuildError> {
        let source = self.source.read(&document.source_name)?;
        let content = render_markdown(&String::from_utf8_lossy(&source));

        let page = Page {
            title: document.title.clone(),
            content,
            pages: nav.to_vec(),
        };

        let html = self
            .templates
            .render_page(&page)
            .map_err(|e| BuildError::TemplateError {
                name: document.output_name(),
                message: e.to_string(),
            })?;

        let output_path = self.config.output_dir.join(document.output_name());
        fs::write(&output_path, html)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_path.display(), e)))?;

        tracing::info!(
            "Converted {} -> {}",
            document.source_name,
            document.output_name()
        );

        Ok(output_path)
    }
}

/// Build the sidebar entries for a set of documents, in discovery order.
pub fn build_navigation(documents: &[Document]) -> Vec<NavEntry> {
    documents.iter().map(Document::nav_entry).collect()
}
