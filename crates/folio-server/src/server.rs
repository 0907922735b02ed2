//! HTTP server for a built documentation site.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;

use folio_static::assets::STATIC_DIR;
use folio_static::{Document, NavEntry, Page, TemplateEngine};

/// Title of the synthetic listing page.
pub const LISTING_TITLE: &str = "Documentation";

/// Body of the synthetic listing page.
pub const LISTING_CONTENT: &str = "<p>Available documentation pages:</p>";

/// Page served for `/`.
const INDEX_FILE: &str = "index.html";

/// Configuration for the site server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory produced by the build
    pub output_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            port: 3005,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    AddressError(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Errors that end a single request with a 500.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Failed to read file: {0}")]
    ReadFile(String),

    #[error("Failed to read directory: {0}")]
    ReadDir(String),

    #[error("Failed to render listing: {0}")]
    Template(String),
}

impl RequestError {
    /// Message sent to the client. Details stay in the server log.
    fn public_message(&self) -> &'static str {
        match self {
            Self::ReadFile(_) => "Failed to read file",
            Self::ReadDir(_) => "Failed to read directory",
            Self::Template(_) => "Failed to render page",
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}

/// What a page request resolved to.
#[derive(Debug)]
pub enum Served {
    /// A built page, served byte for byte
    Artifact(Vec<u8>),

    /// The generated listing of every built page
    Listing(String),
}

impl IntoResponse for Served {
    fn into_response(self) -> Response {
        match self {
            Self::Artifact(bytes) => (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                bytes,
            )
                .into_response(),
            Self::Listing(html) => Html(html).into_response(),
        }
    }
}

/// State shared by every request. Read-only.
pub struct SiteState {
    output_dir: PathBuf,
    templates: Arc<TemplateEngine>,
}

impl SiteState {
    pub fn new(output_dir: impl Into<PathBuf>, templates: Arc<TemplateEngine>) -> Self {
        Self {
            output_dir: output_dir.into(),
            templates,
        }
    }

    /// Resolve a request path to a built page or the listing.
    pub async fn resolve(&self, path: &str) -> Result<Served, RequestError> {
        if let Some(file) = lookup_path(&self.output_dir, path) {
            if tokio::fs::metadata(&file)
                .await
                .is_ok_and(|meta| meta.is_file())
            {
                let bytes = tokio::fs::read(&file)
                    .await
                    .map_err(|e| RequestError::ReadFile(format!("{}: {}", file.display(), e)))?;
                return Ok(Served::Artifact(bytes));
            }
        }

        tracing::debug!("No page for {}, serving listing", path);
        self.listing().await.map(Served::Listing)
    }

    /// Render the listing page from the pages currently on disk.
    async fn listing(&self) -> Result<String, RequestError> {
        let pages = self.current_navigation().await?;

        let page = Page {
            title: LISTING_TITLE.to_string(),
            content: LISTING_CONTENT.to_string(),
            pages,
        };

        self.templates
            .render_page(&page)
            .map_err(|e| RequestError::Template(e.to_string()))
    }

    /// Navigation built from the `.html` files in the output directory.
    async fn current_navigation(&self) -> Result<Vec<NavEntry>, RequestError> {
        let read_dir_error =
            |e: std::io::Error| RequestError::ReadDir(format!("{}: {}", self.output_dir.display(), e));

        let mut entries = tokio::fs::read_dir(&self.output_dir)
            .await
            .map_err(read_dir_error)?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names
            .iter()
            .filter_map(|name| Document::from_output_name(name))
            .map(|doc| doc.nav_entry())
            .collect())
    }
}

/// Map a percent-encoded request path to a file inside `output_dir`.
///
/// `/` maps to `index.html`. Returns `None` for paths that are not valid
/// UTF-8 once decoded, or that would leave the output directory.
fn lookup_path(output_dir: &Path, path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let key = match decoded.as_ref() {
        "" | "/" => INDEX_FILE,
        other => other.trim_start_matches('/'),
    };

    let relative = Path::new(key);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    Some(output_dir.join(relative))
}

/// Site server.
pub struct SiteServer {
    config: ServerConfig,
    templates: Arc<TemplateEngine>,
}

impl SiteServer {
    /// Create a new site server.
    pub fn new(config: ServerConfig, templates: Arc<TemplateEngine>) -> Self {
        Self { config, templates }
    }

    /// Build the router for this site.
    pub fn router(&self) -> Router {
        router(SiteState::new(
            &self.config.output_dir,
            Arc::clone(&self.templates),
        ))
    }

    /// Start serving. Runs until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::AddressError(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Starting server on http://localhost:{}", self.config.port);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }
}

/// Routes: `/static/<file>` from the static asset directory, everything else
/// through the page handler.
///
/// The wildcard needs a non-empty file part, so `/static` and `/static/` reach
/// the page handler and get the listing like any other directory.
pub fn router(state: SiteState) -> Router {
    // ServeDir sees the full request path, so it is rooted at the output
    // directory rather than at the static subdirectory.
    let assets = ServeDir::new(&state.output_dir);

    Router::new()
        .route_service(&format!("/{}/{{*file}}", STATIC_DIR), assets)
        .fallback(page_handler)
        .with_state(Arc::new(state))
}

/// Handler for every non-asset path.
async fn page_handler(
    State(state): State<Arc<SiteState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match state.resolve(uri.path()).await {
        Ok(served) => served.into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use folio_static::AssetPipeline;
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn state(dir: &Path) -> SiteState {
        SiteState::new(dir, Arc::new(TemplateEngine::new().unwrap()))
    }

    fn listing_html(served: Served) -> String {
        match served {
            Served::Listing(html) => html,
            Served::Artifact(_) => panic!("expected listing"),
        }
    }

    #[test]
    fn creates_server_with_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 3005);
        assert_eq!(config.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn maps_request_paths() {
        let root = Path::new("dist");

        assert_eq!(lookup_path(root, "/"), Some(root.join("index.html")));
        assert_eq!(lookup_path(root, "/a.html"), Some(root.join("a.html")));
        assert_eq!(lookup_path(root, "/../secret"), None);
        assert_eq!(lookup_path(root, "/a/../../b"), None);
    }

    #[test]
    fn decodes_request_paths() {
        let root = Path::new("dist");

        assert_eq!(
            lookup_path(root, "/my%20doc.html"),
            Some(root.join("my doc.html"))
        );
        assert_eq!(
            lookup_path(root, "/%C3%BCber-config.html"),
            Some(root.join("über-config.html"))
        );
        assert_eq!(lookup_path(root, "/%2e%2e/secret.html"), None);
        assert_eq!(lookup_path(root, "/a%2F..%2F..%2Fsecret.html"), None);
        assert_eq!(lookup_path(root, "/%FF.html"), None);
    }

    #[tokio::test]
    async fn serves_pages_with_encoded_names() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("über-config.html"), "umlaut").unwrap();
        fs::write(temp.path().join("my doc.html"), "space").unwrap();
        let state = state(temp.path());

        let umlaut = state.resolve("/%C3%BCber-config.html").await.unwrap();
        let space = state.resolve("/my%20doc.html").await.unwrap();

        assert!(matches!(umlaut, Served::Artifact(bytes) if bytes == b"umlaut"));
        assert!(matches!(space, Served::Artifact(bytes) if bytes == b"space"));
    }

    #[tokio::test]
    async fn encoded_traversal_gets_listing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir(&out).unwrap();
        fs::write(temp.path().join("secret.html"), "secret").unwrap();

        let served = state(&out).resolve("/%2e%2e/secret.html").await.unwrap();

        assert!(matches!(served, Served::Listing(html) if !html.contains("secret")));
    }

    async fn get(app: Router, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8_lossy(&body).into_owned())
    }

    fn staged_router(dir: &Path) -> Router {
        AssetPipeline::stage(dir).unwrap();
        fs::write(dir.join("a.html"), "<p>A</p>").unwrap();
        router(state(dir))
    }

    #[tokio::test]
    async fn router_serves_static_assets() {
        let temp = tempdir().unwrap();
        let app = staged_router(temp.path());

        let (status, body) = get(app.clone(), "/static/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(":root"));

        let (status, _) = get(app, "/static/nope.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_lists_pages_for_bare_static_dir() {
        let temp = tempdir().unwrap();
        let app = staged_router(temp.path());

        for path in ["/static", "/static/"] {
            let (status, body) = get(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert!(body.contains("<title>Documentation</title>"), "{path}");
            assert!(body.contains(r#"<a href="/a.html">A</a>"#), "{path}");
        }
    }

    #[tokio::test]
    async fn router_serves_pages_and_listing() {
        let temp = tempdir().unwrap();
        let app = staged_router(temp.path());

        let (status, body) = get(app.clone(), "/a.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>A</p>");

        let (status, body) = get(app, "/nope").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(LISTING_CONTENT));
    }

    #[tokio::test]
    async fn serves_existing_page_verbatim() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.html"), "<html>A</html>").unwrap();

        let served = state(temp.path()).resolve("/a.html").await.unwrap();

        match served {
            Served::Artifact(bytes) => assert_eq!(bytes, b"<html>A</html>"),
            Served::Listing(_) => panic!("expected artifact"),
        }
    }

    #[tokio::test]
    async fn root_serves_index_when_present() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "home").unwrap();

        let served = state(temp.path()).resolve("/").await.unwrap();

        assert!(matches!(served, Served::Artifact(bytes) if bytes == b"home"));
    }

    #[tokio::test]
    async fn root_without_index_lists_every_page() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("getting-started.html"), "").unwrap();
        fs::write(temp.path().join("faq.html"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp.path().join("static")).unwrap();

        let html = listing_html(state(temp.path()).resolve("/").await.unwrap());

        assert!(html.contains("<title>Documentation</title>"));
        assert!(html.contains(LISTING_CONTENT));
        assert!(html.contains(r#"<a href="/faq.html">Faq</a>"#));
        assert!(html.contains(r#"<a href="/getting-started.html">Getting Started</a>"#));
        assert!(!html.contains("notes"));
        assert!(!html.contains(r#"href="/static""#));
    }

    #[tokio::test]
    async fn missing_page_falls_back_to_listing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.html"), "").unwrap();

        let from_missing = listing_html(state(temp.path()).resolve("/missing.html").await.unwrap());
        let from_root = listing_html(state(temp.path()).resolve("/").await.unwrap());

        assert_eq!(from_missing, from_root);
        assert!(from_missing.contains(r#"<a href="/a.html">A</a>"#));
    }

    #[tokio::test]
    async fn listing_reflects_current_directory() {
        let temp = tempdir().unwrap();
        let state = state(temp.path());

        let before = listing_html(state.resolve("/").await.unwrap());
        fs::write(temp.path().join("later.html"), "").unwrap();
        let after = listing_html(state.resolve("/").await.unwrap());

        assert!(!before.contains("/later.html"));
        assert!(after.contains(r#"<a href="/later.html">Later</a>"#));
    }

    #[tokio::test]
    async fn directory_lookup_falls_back_to_listing() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("static")).unwrap();

        let served = state(temp.path()).resolve("/static").await.unwrap();

        assert!(matches!(served, Served::Listing(_)));
    }

    #[tokio::test]
    async fn traversal_never_leaves_output_dir() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir(&out).unwrap();
        fs::write(temp.path().join("secret.html"), "secret").unwrap();

        let served = state(&out).resolve("/../secret.html").await.unwrap();

        assert!(matches!(served, Served::Listing(html) if !html.contains("secret")));
    }

    #[tokio::test]
    async fn missing_output_dir_is_a_server_error() {
        let temp = tempdir().unwrap();

        let result = state(&temp.path().join("gone")).resolve("/").await;

        assert!(matches!(result, Err(RequestError::ReadDir(_))));
    }

    #[tokio::test]
    async fn listing_template_failure_is_a_server_error() {
        let temp = tempdir().unwrap();
        let templates = TemplateEngine::from_source("{{ title|no_such_filter }}".to_string()).unwrap();
        let state = SiteState::new(temp.path(), Arc::new(templates));

        let result = state.resolve("/").await;

        assert!(matches!(result, Err(RequestError::Template(_))));
    }

    #[tokio::test]
    async fn handler_sets_status_and_content_type() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.html"), "<p>A</p>").unwrap();
        let state = Arc::new(state(temp.path()));

        let found = page_handler(
            State(Arc::clone(&state)),
            Method::GET,
            Uri::from_static("/a.html"),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(
            found.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = axum::body::to_bytes(found.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<p>A</p>");

        let missing = page_handler(
            State(Arc::clone(&state)),
            Method::GET,
            Uri::from_static("/missing.html"),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::OK);

        let post = page_handler(State(state), Method::POST, Uri::from_static("/a.html")).await;
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn handler_reports_internal_errors() {
        let temp = tempdir().unwrap();
        let state = Arc::new(state(&temp.path().join("gone")));

        let response = page_handler(State(state), Method::GET, Uri::from_static("/")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
