use crate::document::Document;
use crate::rich_line::TextFormat;
use crate::utils::match_offsets;
use std::ops::Range;
use tracing::debug;

/// Merges `format` into `selection` (byte offsets of the pane text).
///
/// An empty selection is widened to the word under the caret. Returns the
/// range that was formatted, or `None` if there was nothing to format.
pub fn apply_format(
    document: &mut Document,
    selection: Range<usize>,
    format: TextFormat,
) -> Option<Range<usize>> {
    let range = if selection.is_empty() {
        word_under_caret(document, selection.start)?
    } else {
        selection
    };

    // Resolve the affected line slices before borrowing the lines mutably.
    let mut targets = Vec::new();
    let mut line_start = 0;
    for (index, line) in document.lines().iter().enumerate() {
        let line_end = line_start + line.len();
        let start = range.start.max(line_start);
        let end = range.end.min(line_end);
        if start < end {
            targets.push((index, start - line_start..end - line_start));
        }
        line_start = line_end + 1;
    }
    if targets.is_empty() {
        return None;
    }

    document.edit_formatting(|lines| {
        for (index, local) in targets {
            lines[index].apply_format(local, format);
        }
    });
    Some(range)
}

/// Merges `format` into every occurrence of `needle`, scanning each line once
/// from the start. Returns the number of occurrences formatted.
///
/// The caller's selection is not touched.
pub fn apply_format_to_all_occurrences(
    document: &mut Document,
    needle: &str,
    format: TextFormat,
    case_sensitive: bool,
) -> usize {
    if needle.is_empty() || needle.contains('\n') {
        return 0;
    }

    let hits: Vec<(usize, Vec<usize>)> = document
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| (index, match_offsets(line.text(), needle, case_sensitive)))
        .filter(|(_, offsets)| !offsets.is_empty())
        .collect();
    let count = hits.iter().map(|(_, offsets)| offsets.len()).sum();
    if count == 0 {
        return 0;
    }

    document.edit_formatting(|lines| {
        for (index, offsets) in hits {
            for offset in offsets {
                lines[index].apply_format(offset..offset + needle.len(), format);
            }
        }
    });
    debug!("Formatted {count} occurrence(s) of {needle:?}");
    count
}

/// Range of the word touching `caret`, in pane text offsets.
///
/// Words are runs of alphanumeric characters and underscores.
pub fn word_under_caret(document: &Document, caret: usize) -> Option<Range<usize>> {
    let (index, offset) = document.locate(caret)?;
    let text = document.line(index)?.text();
    let line_start = caret - offset;
    // A caret inside a multi-byte character belongs to that character.
    let mut offset = offset;
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(offset, |(i, _)| i);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map_or(text.len(), |(i, _)| offset + i);

    (start < end).then(|| line_start + start..line_start + end)
}
