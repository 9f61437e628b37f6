//! Filesystem port.
//!
//! The kernel never touches `std::fs` directly: scanning, settings and the bootstrap pipeline
//! all go through [`FileSystem`], so tests can swap in fakes that fail on demand.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
}

impl FileError {
    pub fn is_not_found(&self) -> bool {
        match self {
            FileError::NotFound(_) => true,
            FileError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
    pub modified: Option<SystemTime>,
    pub readonly: bool,
}

impl FileMetadata {
    pub fn from_std(meta: std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            modified: meta.modified().ok(),
            readonly: meta.permissions().readonly(),
        }
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    async fn read_text_file(&self, path: &Path) -> Result<String>;

    async fn write_text_file(&self, path: &Path, content: &str) -> Result<()>;

    async fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and any missing parents.
    async fn mkdir(&self, path: &Path) -> Result<()>;

    async fn stat(&self, path: &Path) -> Result<FileMetadata>;

    async fn remove(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Fails with [`FileError::AlreadyExists`] when `to` exists and `overwrite` is false.
    async fn rename(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()>;
}

/// Walks from `start` towards the filesystem root and returns the first `<dir>/<file_name>`
/// that exists.
pub async fn find_up(fs: &dyn FileSystem, file_name: &str, start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(file_name);
        if fs.exists(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/fs.rs"]
mod tests;
