//! Default documents shipped with the binary.
//!
//! Used when the configured docs directory does not exist, so a fresh
//! checkout still serves a working site.

/// `(file name, markdown)` pairs.
pub(crate) const BUNDLED_DOCS: &[(&str, &str)] = &[
    ("index.md", DEFAULT_INDEX),
    ("getting-started.md", DEFAULT_GETTING_STARTED),
    ("writing-docs.md", DEFAULT_WRITING_DOCS),
];

const DEFAULT_INDEX: &str = r#"# Welcome

This site was generated by **folio** from a directory of markdown files.

No `docs/` directory was found, so you are looking at the bundled pages.
Create one next to the binary and restart to publish your own documentation.

## Next steps

- Read [Getting Started](/getting-started.html) to set up a project.
- Read [Writing Docs](/writing-docs.html) for the supported markdown.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"# Getting Started

## Project layout

```
your-project/
├── docs/              # Markdown sources, one page per file
│   ├── index.md       # Served at /
│   └── setup-guide.md # Served at /setup-guide.html
├── folio.toml         # Optional configuration
└── .env               # Optional, e.g. PORT=8080
```

## Running

```bash
folio
```

On startup folio converts every `docs/*.md` file into `dist/<name>.html`,
then serves `dist/` on port 3005. Set `PORT` to listen elsewhere.

## Page titles

Titles come from file names: `setup-guide.md` is listed as *Setup Guide*.
"#;

const DEFAULT_WRITING_DOCS: &str = r#"# Writing Docs

Pages are plain markdown with a few common extensions enabled.

## Tables

| Feature       | Syntax            |
|---------------|-------------------|
| Strikethrough | `~~text~~`        |
| Task list     | `- [x] done`      |
| Heading id    | `## Title {#id}`  |

## Headings

Every heading gets an anchor id, so `## Tables` above can be linked as
[#tables](#tables).

## Links

Links to other pages stay in the same tab: [Welcome](/index.html).
Links that leave the site, like https://commonmark.org, open in a new tab.
"#;
