use crate::color::Color;
use std::ops::Range;

/// Character formatting for a span of text.
///
/// `None` means "not set"; merging only overrides the attributes that are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextFormat {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl TextFormat {
    pub fn foreground(color: Color) -> Self {
        Self {
            foreground: Some(color),
            background: None,
        }
    }

    pub fn background(color: Color) -> Self {
        Self {
            foreground: None,
            background: Some(color),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }

    /// Returns `self` with every attribute set in `other` taking precedence.
    pub fn merged_with(self, other: TextFormat) -> TextFormat {
        TextFormat {
            foreground: other.foreground.or(self.foreground),
            background: other.background.or(self.background),
        }
    }
}

/// A formatted span of a line, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatRun {
    pub start: usize,
    pub len: usize,
    pub format: TextFormat,
}

impl FormatRun {
    pub fn new(start: usize, len: usize, format: TextFormat) -> Self {
        Self { start, len, format }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// One line of text and its inline formatting.
///
/// Runs never overlap, are sorted by start offset, never carry an empty
/// format and always start and end on character boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RichLine {
    text: String,
    runs: Vec<FormatRun>,
}

impl RichLine {
    /// A line without formatting. Line breaks are not allowed inside a line
    /// and are replaced by spaces.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.contains(['\n', '\r']) {
            text = text.replace(['\n', '\r'], " ");
        }
        Self {
            text,
            runs: Vec::new(),
        }
    }

    /// Builds a line from possibly unordered or overlapping runs. Later runs
    /// are merged over earlier ones; out-of-range runs are clipped.
    pub fn with_runs(text: impl Into<String>, runs: impl IntoIterator<Item = FormatRun>) -> Self {
        let mut line = Self::new(text);
        for run in runs {
            line.apply_format(run.range(), run.format);
        }
        line
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[FormatRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_formatted(&self) -> bool {
        !self.runs.is_empty()
    }

    /// Effective format of the character starting at byte `offset`.
    pub fn format_at(&self, offset: usize) -> TextFormat {
        self.runs
            .iter()
            .find(|run| run.range().contains(&offset))
            .map(|run| run.format)
            .unwrap_or_default()
    }

    /// Merges `format` into the byte range `range`.
    ///
    /// The range is clipped to the line and widened to character boundaries.
    /// Applying the same format twice gives the same result as applying it once.
    pub fn apply_format(&mut self, range: Range<usize>, format: TextFormat) {
        let start = floor_char_boundary(&self.text, range.start.min(self.text.len()));
        let end = ceil_char_boundary(&self.text, range.end.min(self.text.len()));
        if start >= end || format.is_empty() {
            return;
        }

        let mut per_byte = self.expand();
        for slot in &mut per_byte[start..end] {
            *slot = slot.merged_with(format);
        }
        self.runs = compress(&per_byte);
    }

    /// Removes all formatting from the line.
    pub fn clear_formatting(&mut self) {
        self.runs.clear();
    }

    /// Pieces of the line with their formats, covering the whole text.
    pub fn segments(&self) -> Vec<(&str, TextFormat)> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for run in &self.runs {
            if run.start > cursor {
                segments.push((&self.text[cursor..run.start], TextFormat::default()));
            }
            segments.push((&self.text[run.range()], run.format));
            cursor = run.end();
        }
        if cursor < self.text.len() {
            segments.push((&self.text[cursor..], TextFormat::default()));
        }
        segments
    }

    /// Rebuilds a line from consecutive formatted pieces.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = (&'a str, TextFormat)>) -> Self {
        let mut text = String::new();
        let mut runs = Vec::new();
        for (piece, format) in segments {
            if !format.is_empty() && !piece.is_empty() {
                runs.push(FormatRun::new(text.len(), piece.len(), format));
            }
            text.push_str(piece);
        }
        Self::with_runs(text, runs)
    }

    fn expand(&self) -> Vec<TextFormat> {
        let mut per_byte = vec![TextFormat::default(); self.text.len()];
        for run in &self.runs {
            for slot in &mut per_byte[run.range()] {
                *slot = run.format;
            }
        }
        per_byte
    }
}

fn compress(per_byte: &[TextFormat]) -> Vec<FormatRun> {
    let mut runs: Vec<FormatRun> = Vec::new();
    for (offset, format) in per_byte.iter().enumerate() {
        if format.is_empty() {
            continue;
        }
        match runs.last_mut() {
            Some(last) if last.end() == offset && last.format == *format => last.len += 1,
            _ => runs.push(FormatRun::new(offset, 1, *format)),
        }
    }
    runs
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
