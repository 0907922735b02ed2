//! Static site generator for folio documentation.
//!
//! Discovers markdown documents, renders them into a shared page template with
//! a sidebar listing every page, and writes the result to an output directory.

pub mod assets;
pub mod builder;
mod bundled;
pub mod source;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildReport, StaticBuilder};
pub use source::{select_source, BundledDocs, DiscoveryError, Document, DocumentSource, LocalDocs};
pub use templates::{NavEntry, Page, TemplateEngine};
