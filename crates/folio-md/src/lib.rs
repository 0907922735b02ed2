//! Markdown rendering for folio documentation sites.
//!
//! This crate turns markdown source into HTML fragments using a fixed set of
//! extensions, and derives display titles from document file names.

pub mod render;
pub mod title;

pub use render::{render_markdown, slugify};
pub use title::derive_title;
