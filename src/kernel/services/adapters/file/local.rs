//! Local filesystem backed by `tokio::fs`.

use crate::kernel::services::ports::fs::{DirEntry, FileError, FileMetadata, FileSystem, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn not_found_as(path: &Path, e: std::io::Error) -> FileError {
    if e.kind() == std::io::ErrorKind::NotFound {
        FileError::NotFound(path.to_path_buf())
    } else {
        FileError::Io(e)
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut reader = fs::read_dir(path).await.map_err(|e| not_found_as(path, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            // Links are never reported as directories, so walks cannot cycle.
            let is_dir = entry.file_type().await?.is_dir();
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir,
            });
        }
        Ok(entries)
    }

    async fn read_text_file(&self, path: &Path) -> Result<String> {
        let meta = fs::metadata(path).await.map_err(|e| not_found_as(path, e))?;
        if !meta.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn write_text_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(fs::write(path, content).await?)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn mkdir(&self, path: &Path) -> Result<()> {
        Ok(fs::create_dir_all(path).await?)
    }

    async fn stat(&self, path: &Path) -> Result<FileMetadata> {
        let meta = fs::metadata(path).await.map_err(|e| not_found_as(path, e))?;
        Ok(FileMetadata::from_std(meta))
    }

    async fn remove(&self, path: &Path, recursive: bool) -> Result<()> {
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(|e| not_found_as(path, e))?;
        if !meta.is_dir() {
            return Ok(fs::remove_file(path).await?);
        }
        if recursive {
            Ok(fs::remove_dir_all(path).await?)
        } else {
            Ok(fs::remove_dir(path).await?)
        }
    }

    async fn rename(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        if !self.exists(from).await {
            return Err(FileError::NotFound(from.to_path_buf()));
        }
        if !overwrite && self.exists(to).await {
            return Err(FileError::AlreadyExists(to.to_path_buf()));
        }
        Ok(fs::rename(from, to).await?)
    }
}
