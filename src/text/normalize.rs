//! Markup-to-plain-text normalization for item bodies
//!
//! Forum bodies are HTML fragments: paragraphs separated by bare `<p>` tags,
//! inline `<a>`, `<i>` and `<pre><code>` blocks, and entity-escaped
//! punctuation. Entities are decoded before any tag is removed, so markup
//! that arrives escaped (`&lt;b&gt;`) is stripped like real markup. Two
//! extraction strategies are provided; both place a line break at every tag
//! boundary and then share the same tidying pass.

use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

/// How tags are removed from a body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Parse with html5ever and join the text nodes
    #[default]
    Markup,
    /// Decode entities, then strip anything tag-shaped with a regex
    Fallback,
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

fn blank_run_regex() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("blank-run pattern is valid"))
}

/// Normalizes a markup body to readable plain text
///
/// # Normalization Steps
///
/// 1. Decode HTML entities (`&#x27;`, `&amp;`, `&lt;` ...)
/// 2. Remove tags, leaving a line break where each one stood
/// 3. Collapse runs of three or more newlines into one blank line
/// 4. Trim leading and trailing whitespace
///
/// Text without markup or entities comes back unchanged apart from the trim.
///
/// # Examples
///
/// ```
/// use hn_sieve::text::normalize;
///
/// let text = normalize("Acme | Remote<p>We&#x27;re hiring");
/// assert_eq!(text, "Acme | Remote\nWe're hiring");
/// ```
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, NormalizeMode::Markup)
}

/// Normalizes a markup body using the given strategy
pub fn normalize_with(raw: &str, mode: NormalizeMode) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(raw);
    let extracted = match mode {
        NormalizeMode::Markup => extract_text_nodes(&decoded),
        NormalizeMode::Fallback => strip_tags(&decoded),
    };

    tidy(&extracted)
}

/// Joins every text node of the parsed fragment with a newline
fn extract_text_nodes(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces each tag with a newline
fn strip_tags(decoded: &str) -> String {
    tag_regex().replace_all(decoded, "\n").into_owned()
}

fn tidy(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    blank_run_regex()
        .replace_all(&unified, "\n\n")
        .trim()
        .to_string()
}
