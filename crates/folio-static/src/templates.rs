//! Template engine for rendering documentation pages.
//!
//! Every page, built or synthetic, goes through one template with three
//! placeholders: `title`, `content` and `pages`.

use minijinja::{context, Environment, Value};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Name the page template is registered under. The `.html` suffix turns on
/// HTML auto-escaping.
const THEME_NAME: &str = "theme.html";

/// A sidebar link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NavEntry {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
}

/// Everything the template needs to render one page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page {
    /// Page title
    pub title: String,
    /// Rendered content HTML, inserted without escaping
    pub content: String,
    /// Sidebar entries, one per page of the site
    pub pages: Vec<NavEntry>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the bundled theme.
    pub fn new() -> Result<Self, minijinja::Error> {
        Self::from_source(THEME_TEMPLATE.to_string())
    }

    /// Create a template engine from custom template source.
    ///
    /// Fails if the template does not parse.
    pub fn from_source(source: String) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("href", href);
        env.add_template_owned(THEME_NAME, source)?;

        Ok(Self { env })
    }

    /// Render a page.
    pub fn render_page(&self, page: &Page) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(THEME_NAME)?;

        tmpl.render(context! {
            title => &page.title,
            content => &page.content,
            pages => &page.pages,
        })
    }
}

/// Bytes percent-encoded in a URL path. `/` is kept.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turn a URL path into a value for a quoted attribute.
///
/// The path is percent-encoded (so `my doc.html` links to `my%20doc.html`),
/// then what is left of `&` and `'` is entity-escaped. Auto-escaping would
/// also turn `/` into `&#x2f;`; this keeps paths readable in the markup.
fn href(value: String) -> Value {
    let encoded = utf8_percent_encode(&value, PATH_ENCODE_SET).to_string();
    let escaped = encoded.replace('&', "&amp;").replace('\'', "&#39;");
    Value::from_safe_string(escaped)
}

const THEME_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      <div class="nav-header">
        <a href="/" class="nav-logo">Documentation</a>
      </div>
      <ul class="nav-list">
      {% for page in pages %}
        <li class="nav-item"><a href="{{ page.path|href }}">{{ page.title }}</a></li>
      {% endfor %}
      </ul>
    </nav>
    <main class="main">
      <article class="content">
        {{ content | safe }}
      </article>
    </main>
  </div>
  <button class="menu-btn" type="button" aria-label="Menu">&#9776;</button>
  <script src="/static/site.js"></script>
</body>
</html>
"##;
