//! SearchManager - search text state and match highlighting
//!
//! The search text is always escaped before it becomes a pattern, so any
//! user input yields a valid, literal, case-insensitive matcher.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;

/// A run of text within a cell, highlighted or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Holds the active search text and its compiled matcher
#[derive(Debug, Clone, Default)]
pub struct SearchManager {
    pattern: String,
    regex: Option<Regex>,
}

impl SearchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text. Empty text disables highlighting.
    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
        self.regex = if pattern.is_empty() {
            None
        } else {
            match RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => Some(regex),
                Err(e) => {
                    // Only reachable if the escaped pattern exceeds regex size limits
                    warn!(target: "search", "Search pattern rejected: {}", e);
                    None
                }
            }
        };
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    /// Split text into segments, marking every case-insensitive occurrence
    /// of the search text
    pub fn highlight(&self, text: &str) -> Vec<Segment> {
        let Some(regex) = &self.regex else {
            return vec![Segment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in regex.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::marked(m.as_str()));
            last = m.end();
        }
        if last < text.len() || segments.is_empty() {
            segments.push(Segment::plain(&text[last..]));
        }
        segments
    }

    /// Count of matched occurrences in text
    pub fn match_count(&self, text: &str) -> usize {
        self.regex
            .as_ref()
            .map(|r| r.find_iter(text).count())
            .unwrap_or(0)
    }
}

/// Join segments, wrapping highlighted runs in the given markers
pub fn wrap_segments(segments: &[Segment], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.highlighted {
            out.push_str(open);
            out.push_str(&segment.text);
            out.push_str(close);
        } else {
            out.push_str(&segment.text);
        }
    }
    out
}
