//! Keyword matching against normalized posting text
//!
//! A matcher combines the built-in signal phrases for part-time and flexible
//! work with caller-supplied literal keywords. Every pattern is searched
//! case-insensitively and reports its first hit with a short context snippet.

use crate::state::Item;
use crate::text::first_line;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Phrases that signal part-time or otherwise flexible work
pub const BUILTIN_PATTERNS: &[&str] = &[
    r"\bpart[\s-]?time\b",
    r"\bcontract\b",
    r"\bfreelance\b",
    r"\bconsulting\b",
    r"\bfractional\b",
    r"\bflexible hours\b",
    r"\bflexible schedule\b",
    // "20 hours/week", "10-20 hours / week"
    r"\b\d{1,2}[\s-]?hours?\s*/\s*week\b",
    r"\bproject[\s-]?based\b",
    r"\bhourly\b",
];

/// Characters of context kept on each side of a match
pub const SNIPPET_RADIUS: usize = 30;

/// Where a pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSource {
    BuiltIn,
    Extra,
}

#[derive(Debug, Clone)]
struct KeywordPattern {
    label: String,
    source: PatternSource,
    regex: Regex,
}

/// One pattern hit inside a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    /// Pattern source text (the keyword itself for extras)
    pub pattern: String,
    pub source: PatternSource,
    /// Exact substring that matched
    pub matched: String,
    /// Matched text with up to `SNIPPET_RADIUS` characters either side
    pub snippet: String,
}

/// An item that passed the keyword filter, with its evidence
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub item: Item,
    /// Normalized body
    pub text: String,
    /// First non-empty line of `text`
    pub title: String,
    pub matches: Vec<KeywordMatch>,
}

/// Compiled keyword policy
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<KeywordPattern>,
    require_extra: bool,
}

impl KeywordMatcher {
    /// Builds a matcher from the built-in set only
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::new(&[])
    }

    /// Builds a matcher from the built-in set plus literal extra keywords
    ///
    /// Extra keywords are escaped, so `c++` or `node.js` match literally.
    pub fn new(extra: &[String]) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(BUILTIN_PATTERNS.len() + extra.len());

        for source in BUILTIN_PATTERNS {
            patterns.push(KeywordPattern {
                label: source.to_string(),
                source: PatternSource::BuiltIn,
                regex: compile(source)?,
            });
        }

        for keyword in extra {
            let keyword = keyword.trim();
            patterns.push(KeywordPattern {
                label: keyword.to_string(),
                source: PatternSource::Extra,
                regex: compile(&regex::escape(keyword))?,
            });
        }

        Ok(Self {
            patterns,
            require_extra: false,
        })
    }

    /// When set and extra keywords exist, only texts that hit an extra keyword pass
    pub fn require_extra(mut self, require: bool) -> Self {
        self.require_extra = require;
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn has_extra(&self) -> bool {
        self.patterns
            .iter()
            .any(|p| p.source == PatternSource::Extra)
    }

    /// Searches `text` with every pattern, in pattern order
    pub fn find(&self, text: &str) -> Vec<KeywordMatch> {
        self.patterns
            .iter()
            .filter_map(|pattern| {
                let hit = pattern.regex.find(text)?;
                Some(KeywordMatch {
                    pattern: pattern.label.clone(),
                    source: pattern.source,
                    matched: hit.as_str().to_string(),
                    snippet: snippet(text, hit.start(), hit.end()),
                })
            })
            .collect()
    }

    /// Applies the full filter policy to one item's normalized text
    ///
    /// Returns `None` if nothing matched, or if extra keywords are required
    /// and none of them matched.
    pub fn evaluate(&self, item: Item, text: String) -> Option<MatchResult> {
        let matches = self.find(&text);
        if matches.is_empty() {
            return None;
        }

        if self.require_extra
            && self.has_extra()
            && !matches.iter().any(|m| m.source == PatternSource::Extra)
        {
            return None;
        }

        Some(MatchResult {
            item,
            title: first_line(&text),
            text,
            matches,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Extracts the context window around the byte span `start..end`
///
/// The window is measured in characters and clipped to the text; newlines
/// inside it become spaces.
pub fn snippet(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(SNIPPET_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let to = text[end..]
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[from..to].replace('\n', " ").trim().to_string()
}
