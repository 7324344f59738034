use crate::error::{LogNoteError, Result};
use crate::temp_store::TempStore;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Maximum number of lines stored in a single part.
pub const DEFAULT_CHUNK_LINES: usize = 100_000;

/// One bounded-size piece of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// `"{n}-{file name}"` for split files, the plain file name otherwise.
    pub display_name: String,
    pub path: PathBuf,
    pub line_count: usize,
}

/// Splits text files into parts of at most `chunk_lines` lines.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedFileLoader {
    chunk_lines: usize,
}

impl Default for ChunkedFileLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_LINES)
    }
}

impl ChunkedFileLoader {
    pub fn new(chunk_lines: usize) -> Self {
        Self {
            chunk_lines: chunk_lines.max(1),
        }
    }

    pub fn chunk_lines(&self) -> usize {
        self.chunk_lines
    }

    /// Reads `path` line by line and writes its parts into `store`.
    ///
    /// A file that fits in one part keeps its plain name. An empty file yields
    /// no parts.
    pub fn load(&self, path: &Path, store: &mut TempStore) -> Result<Vec<FilePart>> {
        let file = File::open(path).map_err(|e| LogNoteError::file_open(path, e))?;
        let mut reader = BufReader::new(file);
        let file_name = display_file_name(path);

        let mut parts = Vec::new();
        let mut buffer: Vec<String> = Vec::with_capacity(self.chunk_lines.min(4096));
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let read = reader
                .read_until(b'\n', &mut raw)
                .map_err(|e| LogNoteError::file_open(path, e))?;
            if read == 0 {
                break;
            }

            // Flush only once a further line shows the file does not end here,
            // so a file of exactly `chunk_lines` lines keeps its plain name.
            if buffer.len() >= self.chunk_lines {
                let part_name = format!("{}-{}", parts.len() + 1, file_name);
                parts.push(flush_part(&buffer, part_name, store)?);
                buffer.clear();
            }
            buffer.push(decode_line(&raw));
        }

        if !buffer.is_empty() {
            let part_name = if parts.is_empty() {
                file_name.clone()
            } else {
                format!("{}-{}", parts.len() + 1, file_name)
            };
            parts.push(flush_part(&buffer, part_name, store)?);
        }

        info!("Loaded {:?} as {} part(s)", path, parts.len());
        Ok(parts)
    }
}

/// Final path component, used as the base of every part name.
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn decode_line(raw: &[u8]) -> String {
    let mut line = raw;
    if let Some(stripped) = line.strip_suffix(b"\n") {
        line = stripped;
    }
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }
    String::from_utf8_lossy(line).into_owned()
}

fn flush_part(lines: &[String], display_name: String, store: &mut TempStore) -> Result<FilePart> {
    let (file, path) = store.create(&display_name)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| LogNoteError::temp_write(&path, e))?;
    }
    writer
        .flush()
        .map_err(|e| LogNoteError::temp_write(&path, e))?;

    debug!("Flushed {} lines to {:?}", lines.len(), path);
    Ok(FilePart {
        display_name,
        path,
        line_count: lines.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_lines(dir: &Path, name: &str, count: usize) -> PathBuf {
        let path = dir.join(name);
        let content: String = (1..=count).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_small_file_keeps_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "app.log", 7);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::new(10).load(&source, &mut store).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].display_name, "app.log");
        assert_eq!(parts[0].line_count, 7);
        assert_eq!(
            fs::read_to_string(&parts[0].path).unwrap(),
            fs::read_to_string(&source).unwrap()
        );
    }

    #[test]
    fn test_exactly_threshold_lines_is_one_unprefixed_part() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "app.log", 10);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::new(10).load(&source, &mut store).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].display_name, "app.log");
        assert_eq!(parts[0].line_count, 10);
    }

    #[test]
    fn test_one_line_over_threshold_makes_two_parts() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "app.log", 11);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::new(10).load(&source, &mut store).unwrap();

        let names: Vec<_> = parts.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["1-app.log", "2-app.log"]);
        assert_eq!(fs::read_to_string(&parts[1].path).unwrap(), "line 11\n");
    }

    #[test]
    fn test_default_threshold_is_one_hundred_thousand_lines() {
        assert_eq!(DEFAULT_CHUNK_LINES, 100_000);
        assert_eq!(ChunkedFileLoader::default().chunk_lines(), 100_000);
        assert_eq!(
            crate::config::Config::default().chunk_lines,
            DEFAULT_CHUNK_LINES
        );
    }

    #[test]
    fn test_default_loader_keeps_full_chunk_in_one_part() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "x.log", 100_000);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::default()
            .load(&source, &mut store)
            .unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].display_name, "x.log");
        assert_eq!(parts[0].line_count, 100_000);
    }

    #[test]
    fn test_default_loader_splits_one_line_past_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "x.log", 100_001);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::default()
            .load(&source, &mut store)
            .unwrap();

        let names: Vec<_> = parts.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["1-x.log", "2-x.log"]);
        let counts: Vec<_> = parts.iter().map(|p| p.line_count).collect();
        assert_eq!(counts, [100_000, 1]);
        assert_eq!(fs::read_to_string(&parts[1].path).unwrap(), "line 100001\n");
    }

    #[test]
    fn test_large_file_is_split_with_numbered_names() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_lines(dir.path(), "big.log", 25);
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::new(10).load(&source, &mut store).unwrap();

        let names: Vec<_> = parts.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["1-big.log", "2-big.log", "3-big.log"]);
        let counts: Vec<_> = parts.iter().map(|p| p.line_count).collect();
        assert_eq!(counts, [10, 10, 5]);

        let third = fs::read_to_string(&parts[2].path).unwrap();
        assert!(third.starts_with("line 21\n"));
        assert!(third.ends_with("line 25\n"));
    }

    #[test]
    fn test_empty_file_yields_no_parts() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.log");
        fs::write(&source, "").unwrap();
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::default().load(&source, &mut store).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn test_crlf_and_missing_trailing_newline_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("win.log");
        fs::write(&source, "a\r\nb\r\nc").unwrap();
        let mut store = TempStore::new().unwrap();

        let parts = ChunkedFileLoader::default().load(&source, &mut store).unwrap();
        assert_eq!(fs::read_to_string(&parts[0].path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_missing_file_is_file_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TempStore::new().unwrap();

        let err = ChunkedFileLoader::default()
            .load(&dir.path().join("nope.log"), &mut store)
            .unwrap_err();
        assert!(matches!(err, LogNoteError::FileOpen { .. }));
    }
}
