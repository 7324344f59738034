use crate::utils::{find_ignore_case, rfind_ignore_case};
use serde::Serialize;
use std::ops::Range;

/// A literal match, in byte offsets of the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A line that contains at least one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    /// 1-based line number.
    pub line_number: usize,
    pub line: String,
}

/// First match starting at or after `from`. Does not wrap.
pub fn find_next(text: &str, query: &str, from: usize, case_sensitive: bool) -> Option<Match> {
    if query.is_empty() || from > text.len() {
        return None;
    }
    let from = ceil_boundary(text, from);
    let haystack = &text[from..];
    let offset = if case_sensitive {
        haystack.find(query)
    } else {
        find_ignore_case(haystack, query)
    }?;
    Some(Match {
        start: from + offset,
        end: from + offset + query.len(),
    })
}

/// Last match starting before `before`. Does not wrap.
pub fn find_previous(
    text: &str,
    query: &str,
    before: usize,
    case_sensitive: bool,
) -> Option<Match> {
    if query.is_empty() || before == 0 {
        return None;
    }
    // A match may extend past `before`, only its start has to lie before it.
    let limit = (before - 1 + query.len()).min(text.len());
    let limit = floor_boundary(text, limit);
    let haystack = &text[..limit];
    let start = if case_sensitive {
        haystack.rfind(query)
    } else {
        rfind_ignore_case(haystack, query)
    }?;
    (start < before).then_some(Match {
        start,
        end: start + query.len(),
    })
}

/// Every line containing `query`, in document order.
///
/// Recomputed from scratch on every call.
pub fn find_all(text: &str, query: &str, case_sensitive: bool) -> Vec<LineMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            if case_sensitive {
                line.contains(query)
            } else {
                find_ignore_case(line, query).is_some()
            }
        })
        .map(|(index, line)| LineMatch {
            line_number: index + 1,
            line: line.to_string(),
        })
        .collect()
}

/// Search session state of the primary pane.
///
/// Case sensitivity is sticky; the current match is the selection that the
/// next search continues from.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    case_sensitive: bool,
    current: Option<Match>,
}

impl SearchState {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            current: None,
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub fn toggle_case_sensitive(&mut self) {
        self.case_sensitive = !self.case_sensitive;
    }

    /// Currently selected match, if any.
    pub fn current(&self) -> Option<Match> {
        self.current
    }

    /// Moves the search cursor, e.g. after the user clicks into the text.
    pub fn set_cursor(&mut self, position: usize) {
        self.current = Some(Match {
            start: position,
            end: position,
        });
    }

    /// Forgets the cursor; the next search starts at the document boundary.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Searches forward from the end of the current match. The cursor stays
    /// where it was when nothing is found.
    pub fn next(&mut self, text: &str, query: &str) -> Option<Match> {
        let from = self.current.map_or(0, |m| m.end);
        let found = find_next(text, query, from, self.case_sensitive)?;
        self.current = Some(found);
        Some(found)
    }

    /// Searches backward from the start of the current match.
    pub fn previous(&mut self, text: &str, query: &str) -> Option<Match> {
        let before = self.current.map_or(text.len(), |m| m.start);
        let found = find_previous(text, query, before, self.case_sensitive)?;
        self.current = Some(found);
        Some(found)
    }

    pub fn find_all(&self, text: &str, query: &str) -> Vec<LineMatch> {
        find_all(text, query, self.case_sensitive)
    }
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
