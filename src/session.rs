use crate::archive::ArchiveReader;
use crate::chunked_loader::{ChunkedFileLoader, FilePart, display_file_name};
use crate::color::Color;
use crate::config::Config;
use crate::document::Document;
use crate::error::{LogNoteError, Result};
use crate::formatter;
use crate::group::{GroupRegistry, Removal};
use crate::html::{self, HtmlStyle};
use crate::rich_line::TextFormat;
use crate::search::{LineMatch, Match, SearchState};
use crate::temp_store::TempStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The file shown in the read-only pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryView {
    pub group: String,
    pub display_name: String,
    pub path: PathBuf,
    pub text: String,
}

/// Everything one window works with: opened groups, the file on display,
/// search state and the curated document.
#[derive(Debug)]
pub struct Session {
    store: TempStore,
    loader: ChunkedFileLoader,
    registry: GroupRegistry,
    primary: Option<PrimaryView>,
    search: SearchState,
    find_results: Option<Vec<LineMatch>>,
    document: Document,
    default_color: Color,
    html_style: HtmlStyle,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            store: TempStore::new()?,
            loader: ChunkedFileLoader::new(config.chunk_lines),
            registry: GroupRegistry::new(),
            primary: None,
            search: SearchState::new(config.case_sensitive),
            find_results: None,
            document: Document::new(),
            default_color: config.default_group_color,
            html_style: config.appearance.html_style(),
        })
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Mutable access, e.g. to subscribe a tree view.
    pub fn registry_mut(&mut self) -> &mut GroupRegistry {
        &mut self.registry
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn primary(&self) -> Option<&PrimaryView> {
        self.primary.as_ref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn temp_dir(&self) -> &Path {
        self.store.path()
    }

    /// Splits `path` into parts, files them under `group` and shows the first
    /// part. `color` only matters when the group is new.
    pub fn open_file(
        &mut self,
        path: &Path,
        group: &str,
        color: Option<Color>,
    ) -> Result<Vec<FilePart>> {
        let parts = self.loader.load(path, &mut self.store)?;
        self.file_parts(group, color, &parts)?;
        Ok(parts)
    }

    /// Extracts the given entries from a ZIP archive and opens each of them
    /// like a regular file. Nothing is filed unless every entry could be
    /// extracted and split.
    pub fn open_archive_entries(
        &mut self,
        archive_path: &Path,
        entries: &[&str],
        group: &str,
        color: Option<Color>,
    ) -> Result<Vec<FilePart>> {
        let mut reader = ArchiveReader::open(archive_path)?;
        let mut parts = Vec::new();
        for entry in entries {
            let extracted = reader.extract(entry, &mut self.store)?;
            parts.extend(self.loader.load(&extracted, &mut self.store)?);
        }
        self.file_parts(group, color, &parts)?;
        Ok(parts)
    }

    /// Adds `parts` to `group` and shows the first of them.
    fn file_parts(&mut self, group: &str, color: Option<Color>, parts: &[FilePart]) -> Result<()> {
        let color = color.unwrap_or(self.default_color);
        let first_index = self.registry.list_files(group).len();
        for part in parts {
            self.registry
                .add_to_group(group, &part.display_name, part.path.clone(), color);
        }
        if !parts.is_empty() {
            self.show_entry(group, first_index)?;
        }
        Ok(())
    }

    /// Loads the first file named `display_name` of a group into the primary
    /// pane.
    pub fn show_file(&mut self, group: &str, display_name: &str) -> Result<&PrimaryView> {
        let index = self
            .registry
            .list_files(group)
            .iter()
            .position(|f| f.display_name == display_name)
            .ok_or_else(|| not_open(group, display_name))?;
        self.show_entry(group, index)
    }

    /// Loads the file at `index` of a group into the primary pane. Search
    /// state starts over for the new text.
    pub fn show_entry(&mut self, group: &str, index: usize) -> Result<&PrimaryView> {
        let entry = self
            .registry
            .list_files(group)
            .get(index)
            .cloned()
            .ok_or_else(|| not_open(group, &format!("#{index}")))?;
        let text = read_text(entry.get_path())?;

        self.search.reset();
        self.find_results = None;
        info!("Showing {:?} from group '{group}'", entry.path);
        Ok(self.primary.insert(PrimaryView {
            group: group.to_string(),
            display_name: entry.display_name,
            path: entry.path,
            text,
        }))
    }

    /// Closes the first file named `display_name`. When it was on display,
    /// the pane moves to a neighbouring file.
    pub fn close_file(&mut self, group: &str, display_name: &str) -> Option<Removal> {
        let index = self
            .registry
            .list_files(group)
            .iter()
            .position(|f| f.display_name == display_name)?;
        self.close_entry(group, index)
    }

    /// Closes the file at `index` of a group.
    pub fn close_entry(&mut self, group: &str, index: usize) -> Option<Removal> {
        let removal = self.registry.remove_file_at(group, index)?;
        let removed = match &removal {
            Removal::File(entry) | Removal::FileAndGroup(entry) => entry,
        };

        let was_shown = self
            .primary
            .as_ref()
            .is_some_and(|p| p.group == group && p.path == removed.path);
        if was_shown {
            let remaining = self.registry.list_files(group).len();
            let next = if index < remaining {
                Some(index)
            } else {
                index.checked_sub(1).filter(|i| *i < remaining)
            };
            self.show_next_valid(next.map(|i| (group.to_string(), i)));
        }
        Some(removal)
    }

    /// Closes a whole group, moving the pane elsewhere if it showed one of
    /// the group's files.
    pub fn close_group(&mut self, group: &str) -> bool {
        if self.registry.remove_group(group).is_none() {
            return false;
        }
        if self.primary.as_ref().is_some_and(|p| p.group == group) {
            self.show_next_valid(None);
        }
        true
    }

    fn show_next_valid(&mut self, preferred: Option<(String, usize)>) {
        let fallback = || {
            self.registry
                .list_groups()
                .iter()
                .find(|g| !g.files().is_empty())
                .map(|g| (g.name().to_string(), 0))
        };
        let target = preferred.or_else(fallback);

        self.primary = None;
        self.search.reset();
        self.find_results = None;
        if let Some((group, index)) = target
            && let Err(e) = self.show_entry(&group, index)
        {
            warn!("Could not show file #{index} of '{group}' after closing: {e}");
        }
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.search.set_case_sensitive(case_sensitive);
    }

    /// Moves the search cursor to a byte position of the primary text.
    pub fn set_search_cursor(&mut self, position: usize) {
        self.search.set_cursor(position);
    }

    pub fn find_next(&mut self, query: &str) -> Option<Match> {
        let text = &self.primary.as_ref()?.text;
        self.search.next(text, query)
    }

    pub fn find_previous(&mut self, query: &str) -> Option<Match> {
        let text = &self.primary.as_ref()?.text;
        self.search.previous(text, query)
    }

    /// Lists every matching line of the primary pane and keeps the result for
    /// the find-results view.
    pub fn find_all(&mut self, query: &str) -> &[LineMatch] {
        let results = match &self.primary {
            Some(view) => self.search.find_all(&view.text, query),
            None => Vec::new(),
        };
        self.find_results.insert(results)
    }

    /// Results of the last find-all on the current file, if any.
    pub fn find_results(&self) -> Option<&[LineMatch]> {
        self.find_results.as_deref()
    }

    /// Copies line `line_number` (1-based) of the primary pane into the
    /// curated document.
    pub fn curate_line(&mut self, line_number: usize) -> bool {
        let Some(line) = self
            .primary
            .as_ref()
            .and_then(|p| p.text.lines().nth(line_number.checked_sub(1)?))
        else {
            return false;
        };
        let line = line.to_string();
        self.document.append_text(&line);
        true
    }

    /// Lists matching lines across all parts of a split file. Line numbers
    /// count from the start of the first part.
    pub fn find_all_in_parts(&self, parts: &[FilePart], query: &str) -> Result<Vec<LineMatch>> {
        let mut results = Vec::new();
        let mut lines_before = 0;
        for part in parts {
            let text = read_text(&part.path)?;
            results.extend(
                self.search
                    .find_all(&text, query)
                    .into_iter()
                    .map(|m| LineMatch {
                        line_number: m.line_number + lines_before,
                        ..m
                    }),
            );
            lines_before += part.line_count;
        }
        Ok(results)
    }

    /// Copies line `line_number` (1-based, counted across all parts of a
    /// split file) into the curated document.
    pub fn curate_part_line(&mut self, parts: &[FilePart], line_number: usize) -> Result<bool> {
        let Some(mut index) = line_number.checked_sub(1) else {
            return Ok(false);
        };
        for part in parts {
            if index < part.line_count {
                let text = read_text(&part.path)?;
                let Some(line) = text.lines().nth(index) else {
                    return Ok(false);
                };
                self.document.append_text(line);
                return Ok(true);
            }
            index -= part.line_count;
        }
        Ok(false)
    }

    /// Formats the selection of the curated pane.
    pub fn format_selection(
        &mut self,
        selection: std::ops::Range<usize>,
        format: TextFormat,
    ) -> Option<std::ops::Range<usize>> {
        formatter::apply_format(&mut self.document, selection, format)
    }

    /// Formats every occurrence of `text` in the curated pane, honouring the
    /// session's case sensitivity.
    pub fn format_all_occurrences(&mut self, text: &str, format: TextFormat) -> usize {
        formatter::apply_format_to_all_occurrences(
            &mut self.document,
            text,
            format,
            self.search.is_case_sensitive(),
        )
    }

    pub fn save_curated(&self, path: &Path) -> Result<()> {
        let html = self.document.to_html(&self.html_style);
        fs::write(path, html).map_err(|source| LogNoteError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Saved {} curated lines to {:?}",
            self.document.len(),
            path
        );
        Ok(())
    }

    /// Replaces the curated pane with a saved log. On error the current
    /// content stays as it was.
    pub fn load_curated(&mut self, path: &Path) -> Result<()> {
        let source = fs::read_to_string(path).map_err(|e| LogNoteError::file_open(path, e))?;
        self.document.replace(html::deserialize(&source));
        info!(
            "Loaded {} curated lines from {:?}",
            self.document.len(),
            path
        );
        Ok(())
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| LogNoteError::file_open(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn not_open(group: &str, name: &str) -> LogNoteError {
    LogNoteError::file_open(
        PathBuf::from(name),
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("'{name}' is not open in group '{group}'"),
        ),
    )
}

/// Default group name for a file opened without one.
pub fn default_group_name(path: &Path) -> String {
    display_file_name(path)
}
