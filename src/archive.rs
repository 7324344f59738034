use crate::error::{LogNoteError, Result};
use crate::temp_store::TempStore;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

/// A file or directory in an archive's directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveNode {
    /// Last path component.
    pub name: String,
    /// Full entry path inside the archive, without a trailing slash.
    pub path: String,
    pub is_dir: bool,
    pub children: Vec<ArchiveNode>,
}

impl ArchiveNode {
    /// Paths of every file below this node, depth first.
    pub fn file_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_files(&mut paths);
        paths
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_dir {
            for child in &self.children {
                child.collect_files(out);
            }
        } else {
            out.push(&self.path);
        }
    }
}

/// Read-only access to a ZIP archive.
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl ArchiveReader {
    pub fn open(path: &Path) -> Result<Self> {
        let archive_open = |source| LogNoteError::ArchiveOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|e| archive_open(ZipError::Io(e)))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(archive_open)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level nodes of the archive's directory tree.
    ///
    /// Directories implied only by file paths are included. Directories come
    /// first, then files, each sorted by name.
    pub fn entries(&self) -> Vec<ArchiveNode> {
        let mut root = DirBuilder::default();
        for name in self.archive.file_names() {
            let is_dir = name.ends_with('/');
            let components: Vec<&str> = name.split('/').filter(|c| !c.is_empty()).collect();
            if !components.is_empty() {
                root.insert(&components, is_dir);
            }
        }
        root.into_nodes("")
    }

    /// Extracts `entry_path` into a fresh temporary file named after the
    /// entry's base name and returns that file's path.
    pub fn extract(&mut self, entry_path: &str, store: &mut TempStore) -> Result<PathBuf> {
        let not_found = || LogNoteError::EntryNotFound {
            archive: self.path.clone(),
            entry: entry_path.to_string(),
        };

        let data = {
            let mut entry = match self.archive.by_name(entry_path) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => return Err(not_found()),
                Err(source) => {
                    return Err(LogNoteError::ArchiveOpen {
                        path: self.path.clone(),
                        source,
                    });
                }
            };
            if entry.is_dir() {
                return Err(not_found());
            }

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| LogNoteError::ArchiveOpen {
                    path: self.path.clone(),
                    source: ZipError::Io(e),
                })?;
            data
        };

        let base_name = entry_path.rsplit('/').next().unwrap_or(entry_path);
        let (mut file, temp_path) = store.create(base_name)?;
        if let Err(e) = file.write_all(&data).and_then(|_| file.flush()) {
            warn!("Extraction of {entry_path} to {:?} failed", temp_path);
            return Err(LogNoteError::temp_write(temp_path, e));
        }

        info!(
            "Extracted {entry_path} ({} bytes) from {:?}",
            data.len(),
            self.path
        );
        Ok(temp_path)
    }
}

/// One-shot helper: open `archive_path` and extract a single entry.
pub fn extract_entry(
    archive_path: &Path,
    entry_path: &str,
    store: &mut TempStore,
) -> Result<PathBuf> {
    ArchiveReader::open(archive_path)?.extract(entry_path, store)
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, ()>,
}

impl DirBuilder {
    fn insert(&mut self, components: &[&str], is_dir: bool) {
        match components {
            [] => {}
            [last] if !is_dir => {
                self.files.insert(last.to_string(), ());
            }
            [first, rest @ ..] => {
                self.dirs
                    .entry(first.to_string())
                    .or_default()
                    .insert(rest, is_dir);
            }
        }
    }

    fn into_nodes(self, prefix: &str) -> Vec<ArchiveNode> {
        let join = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            }
        };

        let mut nodes = Vec::with_capacity(self.dirs.len() + self.files.len());
        for (name, dir) in self.dirs {
            let path = join(&name);
            let children = dir.into_nodes(&path);
            nodes.push(ArchiveNode {
                name,
                path,
                is_dir: true,
                children,
            });
        }
        for name in self.files.into_keys() {
            nodes.push(ArchiveNode {
                path: join(&name),
                name,
                is_dir: false,
                children: Vec::new(),
            });
        }
        nodes
    }
}
