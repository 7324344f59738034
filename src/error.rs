use std::io;
use std::path::PathBuf;

/// Failure conditions reported by the core.
///
/// Every variant leaves previously opened groups and documents untouched; the
/// caller decides how to tell the user.
#[derive(Debug, thiserror::Error)]
pub enum LogNoteError {
    /// A source file could not be opened or read.
    #[error("Unable to open file {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The archive is missing, corrupt or not a ZIP file.
    #[error("Failed to open ZIP file {}: {source}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    /// The entry does not exist in the archive or names a directory.
    #[error("The file '{entry}' does not exist within the ZIP archive {}", .archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },
    /// A temporary file could not be created or written.
    #[error("Unable to create temporary file {}: {source}", .path.display())]
    TempWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Saving a document to its destination failed.
    #[error("Unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LogNoteError {
    pub(crate) fn file_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogNoteError::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn temp_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogNoteError::TempWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogNoteError>;
