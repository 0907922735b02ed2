//! Markdown to HTML renderer.
//!
//! Wraps [`pulldown_cmark::Parser`] and [`pulldown_cmark::html::push_html`]
//! with three event passes applied between parsing and output:
//!
//! - bare `http(s)://` URLs in text become links,
//! - headings without an explicit `{#id}` get a generated anchor id,
//! - links that leave the site open in a new browsing context.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>]+").expect("url pattern is valid"));

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Strip sentence punctuation from the end of a URL match.
///
/// A closing `)` is kept while it balances an opening `(` inside the URL, as
/// in `https://en.wikipedia.org/wiki/Rust_(language)`.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;

    while let Some(last) = url.chars().next_back() {
        if !TRAILING_PUNCTUATION.contains(&last) {
            break;
        }
        if last == ')' && url.matches('(').count() >= url.matches(')').count() {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }

    url
}

/// Parser options shared by every document.
fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Render markdown source to an HTML fragment.
///
/// The output is not sanitized. Raw HTML in the source passes through
/// unchanged, so callers must only feed documents they trust.
///
/// Rendering has no failure mode: malformed markdown is rendered best-effort.
pub fn render_markdown(source: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(source, options()));

    let events = autolink_urls(parser);
    let events = assign_heading_ids(events);

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter().map(open_external_links));

    html_output
}

/// Split text events around literal URLs and wrap each URL in a link.
fn autolink_urls<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut output = Vec::new();
    let mut in_code_block = false;
    let mut link_depth = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
            }
            Event::Text(text)
                if !in_code_block && link_depth == 0 && URL_PATTERN.is_match(text) =>
            {
                push_linked_text(&mut output, text);
                continue;
            }
            _ => {}
        }

        output.push(event);
    }

    output
}

fn push_linked_text<'a>(output: &mut Vec<Event<'a>>, text: &str) {
    let mut last = 0;

    for found in URL_PATTERN.find_iter(text) {
        let url = trim_url(found.as_str());
        if !matches!(url.split_once("://"), Some((_, rest)) if !rest.is_empty()) {
            continue;
        }

        if found.start() > last {
            output.push(Event::Text(text[last..found.start()].to_string().into()));
        }

        output.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: url.to_string().into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        output.push(Event::Text(url.to_string().into()));
        output.push(Event::End(TagEnd::Link));

        last = found.start() + url.len();
    }

    if last < text.len() {
        output.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Give every heading an anchor id, keeping ids unique within the document.
fn assign_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut open_heading: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                open_heading = Some((output.len(), String::new()));
            }
            Event::Start(Tag::Heading { id: Some(id), .. }) => {
                seen.entry(id.to_string()).or_insert(0);
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, heading_text)) = open_heading.as_mut() {
                    heading_text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((index, heading_text)) = open_heading.take() {
                    let id = unique_id(&mut seen, slugify(&heading_text));
                    if let Some(Event::Start(Tag::Heading { id: slot, .. })) = output.get_mut(index)
                    {
                        *slot = Some(id.into());
                    }
                }
            }
            _ => {}
        }

        output.push(event);
    }

    output
}

fn unique_id(seen: &mut HashMap<String, usize>, base: String) -> String {
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };

    let mut count = match seen.get(&base) {
        Some(count) => *count,
        None => {
            seen.insert(base.clone(), 0);
            return base;
        }
    };

    loop {
        count += 1;
        let candidate = format!("{}-{}", base, count);
        if !seen.contains_key(&candidate) {
            seen.insert(candidate.clone(), 0);
            seen.insert(base, count);
            return candidate;
        }
    }
}

/// Rewrite the opening tag of off-site links to open in a new tab.
fn open_external_links(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) if link_type != LinkType::Email && is_external(&dest_url) => {
            let mut tag = format!(r#"<a href="{}""#, escape_attr(&dest_url));
            if !title.is_empty() {
                let _ = write!(tag, r#" title="{}""#, escape_attr(&title));
            }
            tag.push_str(r#" target="_blank" rel="noopener">"#);

            Event::InlineHtml(tag.into())
        }
        other => other,
    }
}

/// Whether a link target leaves the current site.
///
/// Fragments, root-relative paths and `./` or `../` paths stay on site;
/// everything else, protocol-relative `//host` links included, does not.
fn is_external(url: &str) -> bool {
    if url.is_empty() || url.starts_with('#') {
        return false;
    }
    if url.starts_with('/') && !url.starts_with("//") {
        return false;
    }
    !(url.starts_with("./") || url.starts_with("../"))
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Convert heading text to an anchor slug.
///
/// Letters and digits are kept (lowercased); any run of other characters
/// between them becomes a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
