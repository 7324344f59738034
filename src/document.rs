use crate::html;
use crate::rich_line::RichLine;
use crate::sorter::{SortKey, SortOrder, sort_lines};
use tracing::{debug, info};

/// Editing state of the curated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Clean,
    Formatted,
    Sorted,
}

/// Change notifications for the curated pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    LineAppended { index: usize },
    LineRemoved { index: usize },
    LineMoved { from: usize, to: usize },
    Formatted,
    Sorted { order: SortOrder, key: SortKey },
    /// Content was restored from the undo snapshot.
    Restored,
    /// Content was replaced wholesale, e.g. by loading a saved log.
    Replaced,
}

#[derive(Debug, Clone)]
struct Snapshot {
    body: String,
    state: EditState,
}

type DocumentListener = Box<dyn FnMut(&DocumentEvent)>;

/// The editable pane where excerpts are collected.
///
/// Lines are identified only by position. The content before the most recent
/// sort is kept so that one sort can be undone.
#[derive(Default)]
pub struct Document {
    lines: Vec<RichLine>,
    state: EditState,
    undo: Option<Snapshot>,
    listeners: Vec<DocumentListener>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.lines)
            .field("state", &self.state)
            .field("can_undo", &self.undo.is_some())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<RichLine>) -> Self {
        let state = if lines.iter().any(RichLine::is_formatted) {
            EditState::Formatted
        } else {
            EditState::Clean
        };
        Self {
            lines,
            state,
            ..Self::default()
        }
    }

    /// Registers a callback invoked after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn lines(&self) -> &[RichLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&RichLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Text of the pane, lines joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RichLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Byte offset in [`plain_text`](Self::plain_text) where line `index` starts.
    pub fn line_start(&self, index: usize) -> Option<usize> {
        if index >= self.lines.len() {
            return None;
        }
        Some(self.lines[..index].iter().map(|l| l.len() + 1).sum())
    }

    /// Line containing byte `position` of the pane text, and the offset within
    /// that line. The position just past a line's last character belongs to it.
    pub fn locate(&self, position: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, line) in self.lines.iter().enumerate() {
            let end = start + line.len();
            if position <= end {
                return Some((index, position - start));
            }
            start = end + 1;
        }
        None
    }

    pub fn line_at_position(&self, position: usize) -> Option<usize> {
        self.locate(position).map(|(index, _)| index)
    }

    pub fn append(&mut self, line: RichLine) {
        self.lines.push(line);
        let index = self.lines.len() - 1;
        self.notify(DocumentEvent::LineAppended { index });
    }

    pub fn append_text(&mut self, text: &str) {
        self.append(RichLine::new(text));
    }

    pub fn delete_line(&mut self, index: usize) -> Option<RichLine> {
        if index >= self.lines.len() {
            return None;
        }
        let removed = self.lines.remove(index);
        self.notify(DocumentEvent::LineRemoved { index });
        Some(removed)
    }

    /// Deletes the line under a ctrl-click at byte `position` of the pane text.
    pub fn delete_line_at_position(&mut self, position: usize) -> Option<RichLine> {
        let index = self.line_at_position(position)?;
        self.delete_line(index)
    }

    /// Swaps line `index` with the one above. Returns the line's new index.
    pub fn move_line_up(&mut self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.lines.len() {
            return None;
        }
        self.lines.swap(index, index - 1);
        self.notify(DocumentEvent::LineMoved {
            from: index,
            to: index - 1,
        });
        Some(index - 1)
    }

    /// Swaps line `index` with the one below. Returns the line's new index.
    pub fn move_line_down(&mut self, index: usize) -> Option<usize> {
        if index + 1 >= self.lines.len() {
            return None;
        }
        self.lines.swap(index, index + 1);
        self.notify(DocumentEvent::LineMoved {
            from: index,
            to: index + 1,
        });
        Some(index + 1)
    }

    /// Reorders all lines, keeping the previous content for [`undo`](Self::undo).
    ///
    /// Only the content before the latest sort is kept.
    pub fn sort(&mut self, order: SortOrder, key: SortKey) {
        self.undo = Some(Snapshot {
            body: html::serialize_body(&self.lines),
            state: self.state,
        });
        self.lines = sort_lines(&self.lines, order, key);
        self.state = EditState::Sorted;
        info!("Sorted {} curated lines by {:?}", self.lines.len(), key);
        self.notify(DocumentEvent::Sorted { order, key });
    }

    /// Restores the content captured by the last sort. A second call without
    /// an intervening sort does nothing and returns `false`.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.take() else {
            debug!("Nothing to undo");
            return false;
        };
        self.lines = html::deserialize(&snapshot.body);
        self.state = snapshot.state;
        info!("Restored {} curated lines", self.lines.len());
        self.notify(DocumentEvent::Restored);
        true
    }

    /// Replaces the content, dropping the undo snapshot.
    pub fn replace(&mut self, lines: Vec<RichLine>) {
        let listeners = std::mem::take(&mut self.listeners);
        *self = Self::from_lines(lines);
        self.listeners = listeners;
        self.notify(DocumentEvent::Replaced);
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Applies `edit` to the lines and records a formatting change.
    pub(crate) fn edit_formatting<R>(&mut self, edit: impl FnOnce(&mut [RichLine]) -> R) -> R {
        let result = edit(&mut self.lines);
        if self.state == EditState::Clean {
            self.state = EditState::Formatted;
        }
        self.notify(DocumentEvent::Formatted);
        result
    }

    /// HTML page for saving.
    pub fn to_html(&self, style: &html::HtmlStyle) -> String {
        html::serialize_document(&self.lines, style)
    }

    pub fn from_html(source: &str) -> Self {
        Self::from_lines(html::deserialize(source))
    }

    fn notify(&mut self, event: DocumentEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
