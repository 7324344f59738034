use crate::error::{LogNoteError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Process-scoped home for file parts and extracted archive entries.
///
/// Files keep their suggested base name and live in a numbered subdirectory, so
/// two entries called `app.log` from different archives never clash. Everything
/// is removed when the store is dropped.
#[derive(Debug)]
pub struct TempStore {
    dir: TempDir,
    next_slot: usize,
}

impl TempStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("lognote-")
            .tempdir()
            .map_err(|e| LogNoteError::temp_write(std::env::temp_dir(), e))?;
        debug!("Temporary files go to {:?}", dir.path());
        Ok(Self { dir, next_slot: 0 })
    }

    /// Root directory of the store.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates a new writable file named `suggested_name`.
    ///
    /// Returns the open handle together with its final path.
    pub fn create(&mut self, suggested_name: &str) -> Result<(File, PathBuf)> {
        let slot_dir = self.dir.path().join(format!("{:04}", self.next_slot));
        self.next_slot += 1;

        fs::create_dir_all(&slot_dir).map_err(|e| LogNoteError::temp_write(&slot_dir, e))?;

        let path = slot_dir.join(sanitize_file_name(suggested_name));
        let file = File::create(&path).map_err(|e| LogNoteError::temp_write(&path, e))?;
        Ok((file, path))
    }
}

/// Keeps only the last path component so entry names like `logs/app.log`
/// cannot escape the slot directory.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("unnamed");
    base.to_string()
}
