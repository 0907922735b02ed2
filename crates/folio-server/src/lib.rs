//! HTTP server for built folio documentation sites.
//!
//! Serves pages from the build output directory, falls back to a generated
//! listing of every page when a path has no file, and serves static assets
//! under `/static/`.

pub mod server;

pub use server::{router, RequestError, Served, ServerConfig, ServerError, SiteServer, SiteState};
