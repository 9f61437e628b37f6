//! Recursive directory walk honoring layered `.gitignore` files.

use crate::kernel::ignore::{is_base_ignored, IgnoreError, IgnoreRules};
use crate::kernel::services::ports::fs::{FileError, FileSystem};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

const GITIGNORE: &str = ".gitignore";

type ScanFuture<'a> = Pin<Box<dyn Future<Output = Result<ScanOutput, ScanError>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanFailurePolicy {
    /// Any unreadable directory or `.gitignore` fails the whole scan.
    #[default]
    Abort,
    /// Unreadable subtrees are dropped and reported as warnings.
    SkipWithWarning,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub failure_policy: ScanFailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Root-relative paths found by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutput {
    fn merge(&mut self, other: ScanOutput) {
        self.files.extend(other.files);
        self.dirs.extend(other.dirs);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: FileError,
    },
    #[error("cannot read {}: {source}", path.display())]
    ReadIgnoreFile {
        path: PathBuf,
        #[source]
        source: FileError,
    },
    #[error(transparent)]
    Rules(#[from] IgnoreError),
}

impl ScanError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadDir { path, .. } | Self::ReadIgnoreFile { path, .. } => Some(path),
            Self::Rules(_) => None,
        }
    }
}

/// Walks `current` (inside `root`) depth-first, starting from the rule blocks in `rules`.
///
/// Files are dropped when their name is in the base list or when the accumulated
/// rules ignore them; ignored directories are not descended into. A failure reading
/// `current` itself is always an error.
pub async fn scan(
    fs: &dyn FileSystem,
    root: &Path,
    current: &Path,
    rules: &[String],
    options: &ScanOptions,
) -> Result<ScanOutput, ScanError> {
    let output = scan_dir(fs, root, current.to_path_buf(), rules.to_vec(), *options).await?;
    tracing::debug!(
        root = %root.display(),
        files = output.files.len(),
        dirs = output.dirs.len(),
        warnings = output.warnings.len(),
        "scan finished"
    );
    Ok(output)
}

fn scan_dir<'a>(
    fs: &'a dyn FileSystem,
    root: &'a Path,
    current: PathBuf,
    mut rules: Vec<String>,
    options: ScanOptions,
) -> ScanFuture<'a> {
    Box::pin(async move {
        let entries = fs
            .read_dir(&current)
            .await
            .map_err(|source| ScanError::ReadDir {
                path: current.clone(),
                source,
            })?;

        if entries.iter().any(|e| !e.is_dir && e.name == GITIGNORE) {
            let path = current.join(GITIGNORE);
            let block = fs
                .read_text_file(&path)
                .await
                .map_err(|source| ScanError::ReadIgnoreFile { path, source })?;
            rules.push(block);
        }
        let matcher = IgnoreRules::from_blocks(&rules)?;

        let relative = current.strip_prefix(root).unwrap_or(&current).to_path_buf();
        let mut output = ScanOutput::default();

        for entry in entries {
            if entry.is_dir {
                if matcher.is_ignored(&entry.name, true) {
                    continue;
                }
                output.dirs.push(relative.join(&entry.name));

                let child = current.join(&entry.name);
                match scan_dir(fs, root, child, rules.clone(), options).await {
                    Ok(partial) => output.merge(partial),
                    Err(e) if options.failure_policy == ScanFailurePolicy::SkipWithWarning => {
                        let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| {
                            current.join(&entry.name)
                        });
                        tracing::warn!(path = %path.display(), error = %e, "skipping subtree");
                        output.warnings.push(ScanWarning {
                            path,
                            message: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            } else {
                if is_base_ignored(&entry.name) || matcher.is_ignored(&entry.name, false) {
                    continue;
                }
                output.files.push(relative.join(&entry.name));
            }
        }

        Ok(output)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/scanner.rs"]
mod tests;
