//! Directory-tree storage: one folder per mailbox, one file per message.
//!
//! The storage layer knows nothing about message structure; it hands out
//! folder and entry handles and moves text in and out of files. All paths
//! in errors point at the file or directory that failed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MailError, Result};

/// Width of the zero-padded numeric entry file names.
const ENTRY_NAME_WIDTH: usize = 4;

/// A message store rooted at a base directory.
pub struct Storage {
    base_dir: PathBuf,
}

impl Storage {
    /// Open a store over an existing base directory.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        if base_dir.as_os_str().is_empty() {
            return Err(MailError::EmptyInput("base directory"));
        }
        let meta = fs::metadata(&base_dir).map_err(|e| MailError::io(&base_dir, e))?;
        if !meta.is_dir() {
            return Err(MailError::io(
                &base_dir,
                std::io::Error::other("not a directory"),
            ));
        }
        Ok(Self { base_dir })
    }

    /// The base directory this store reads and writes.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// List the store's folders, ascending by name.
    pub fn folders(&self) -> Result<Vec<Folder>> {
        let mut folders = Vec::new();
        let dir = fs::read_dir(&self.base_dir).map_err(|e| MailError::io(&self.base_dir, e))?;
        for item in dir {
            let item = item.map_err(|e| MailError::io(&self.base_dir, e))?;
            let path = item.path();
            if path.is_dir() {
                folders.push(Folder::new(path));
            }
        }
        folders.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(folders)
    }

    /// Find the folder with the given name, if present.
    pub fn folder(&self, name: &str) -> Result<Option<Folder>> {
        Ok(self.folders()?.into_iter().find(|f| f.name() == name))
    }
}

/// One mailbox directory inside a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    path: PathBuf,
    name: String,
}

impl Folder {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    /// The folder's displayable name (its directory name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List the folder's entries, ordered by file name.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let dir = fs::read_dir(&self.path).map_err(|e| MailError::io(&self.path, e))?;
        for item in dir {
            let item = item.map_err(|e| MailError::io(&self.path, e))?;
            let path = item.path();
            if path.is_file() {
                entries.push(Entry { path });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Persist a new entry with the given content and return its handle.
    ///
    /// Entry files take the smallest unused zero-padded numeric name so
    /// listing order stays deterministic.
    pub fn add_entry(&self, content: &str) -> Result<Entry> {
        let path = self.next_entry_path()?;
        debug!(path = %path.display(), bytes = content.len(), "Writing entry");
        fs::write(&path, content).map_err(|e| MailError::io(&path, e))?;
        Ok(Entry { path })
    }

    /// Pick the smallest unused numeric entry name.
    fn next_entry_path(&self) -> Result<PathBuf> {
        let taken: Vec<String> = self
            .entries()?
            .iter()
            .map(|e| e.file_name().to_string())
            .collect();
        let mut n: u64 = 1;
        loop {
            let candidate = format!("{n:0width$}", width = ENTRY_NAME_WIDTH);
            if !taken.contains(&candidate) {
                return Ok(self.path.join(candidate));
            }
            n += 1;
        }
    }
}

/// One stored message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
}

impl Entry {
    /// The entry's file name.
    pub fn file_name(&self) -> std::borrow::Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    /// Read the entry's full content.
    pub fn content(&self) -> Result<String> {
        debug!(path = %self.path.display(), "Reading entry");
        fs::read_to_string(&self.path).map_err(|e| MailError::io(&self.path, e))
    }

    /// Delete the entry's file.
    pub fn delete(&self) -> Result<()> {
        debug!(path = %self.path.display(), "Deleting entry");
        fs::remove_file(&self.path).map_err(|e| MailError::io(&self.path, e))
    }
}
