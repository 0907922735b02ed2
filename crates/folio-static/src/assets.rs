//! Static assets shared by every page.
//!
//! The stylesheet and script referenced by the page template are compiled
//! into the binary and staged into `<output>/static/` on startup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::BuildError;

/// Subdirectory of the output root holding static assets.
pub const STATIC_DIR: &str = "static";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Bundled `(file name, content)` assets.
    pub fn files() -> [(&'static str, &'static str); 2] {
        [("style.css", DEFAULT_CSS), ("site.js", DEFAULT_JS)]
    }

    /// Write the bundled assets into `<output_dir>/static/`.
    ///
    /// Existing files are overwritten. Returns the written paths.
    pub fn stage(output_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let static_dir = output_dir.join(STATIC_DIR);
        fs::create_dir_all(&static_dir)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", static_dir.display(), e)))?;

        let mut written = Vec::new();
        for (name, content) in Self::files() {
            let path = static_dir.join(name);
            fs::write(&path, content)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))?;
            tracing::info!("Wrote static file: {}", name);
            written.push(path);
        }

        Ok(written)
    }
}

const DEFAULT_CSS: &str = r#"/* folio default theme */

:root {
  --sidebar-width: 260px;
  --content-max-width: 820px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --primary-foreground: #ffffff;
  --radius: 0.375rem;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0d1117;
    --foreground: #e6edf3;
    --muted: #161b22;
    --muted-foreground: #9198a1;
    --border: #30363d;
    --primary: #4493f8;
    --primary-foreground: #0d1117;
  }
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem 1rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-header {
  margin-bottom: 1.25rem;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.2rem;
  color: var(--foreground);
  text-decoration: none;
}

.nav-list {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-item a {
  display: block;
  padding: 0.4rem 0.75rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-item a:hover {
  color: var(--foreground);
  background: var(--background);
}

.nav-item.active > a {
  background: var(--primary);
  color: var(--primary-foreground);
}

/* Content */
.main {
  padding: 2rem 3rem;
}

.content {
  max-width: var(--content-max-width);
}

.content h2 {
  padding-bottom: 0.3rem;
  border-bottom: 1px solid var(--border);
}

.content a {
  color: var(--primary);
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
}

.content table {
  border-collapse: collapse;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.4rem 0.75rem;
}

.menu-btn {
  display: none;
  position: fixed;
  top: 1rem;
  right: 1rem;
  padding: 0.4rem 0.6rem;
  background: var(--primary);
  color: var(--primary-foreground);
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}

@media (max-width: 900px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    width: var(--sidebar-width);
    z-index: 50;
    transition: left 0.2s;
  }

  .sidebar.open {
    left: 0;
  }

  .main {
    padding: 1.5rem;
  }

  .menu-btn {
    display: block;
  }
}
"#;

const DEFAULT_JS: &str = r#"// folio - page runtime
(function() {
  'use strict';

  // Every page ships the same sidebar; mark the current page here.
  var current = window.location.pathname === '/' ? '/index.html' : window.location.pathname;
  document.querySelectorAll('.nav-item a').forEach(function(link) {
    if (link.getAttribute('href') === current) {
      link.parentElement.classList.add('active');
    }
  });

  var menuBtn = document.querySelector('.menu-btn');
  var sidebar = document.querySelector('.sidebar');
  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', function() {
      sidebar.classList.toggle('open');
    });
  }
})();
"#;
