use super::typedefs::NODE_MODULES;
use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::editor::EditorHost;
use crate::kernel::services::ports::fs::{FileError, FileSystem};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PreloadError {
    #[error("cannot read workspace root {}: {source}", path.display())]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: FileError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    pub created: usize,
    pub already_open: usize,
    pub unreadable: usize,
}

pub fn file_uri(path: &Path) -> Option<String> {
    url::Url::from_file_path(path).ok().map(String::from)
}

fn skipped(name: &str) -> bool {
    name.starts_with('.') || name == NODE_MODULES
}

/// Creates a read-only model for every source file under `root` the host does not have yet.
pub async fn load(
    fs: &dyn FileSystem,
    host: &dyn EditorHost,
    root: &Path,
) -> Result<PreloadSummary, PreloadError> {
    let mut summary = PreloadSummary::default();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs.read_dir(&dir).await {
            Ok(entries) => entries,
            Err(source) if dir == root => {
                return Err(PreloadError::ReadRoot { path: dir, source });
            }
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "preload skipping directory");
                continue;
            }
        };

        for entry in entries {
            if skipped(&entry.name) {
                continue;
            }
            let path = dir.join(&entry.name);
            if entry.is_dir {
                pending.push(path);
                continue;
            }

            let Some(language) = LanguageId::from_path(&path) else {
                continue;
            };
            let Some(uri) = file_uri(&path) else {
                continue;
            };
            if host.has_model(&uri) {
                summary.already_open += 1;
                continue;
            }
            match fs.read_text_file(&path).await {
                Ok(content) => {
                    if host.create_model(content, Some(language), uri, true) {
                        summary.created += 1;
                    } else {
                        summary.already_open += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "preload cannot read file");
                    summary.unreadable += 1;
                }
            }
        }
    }

    tracing::info!(
        created = summary.created,
        already_open = summary.already_open,
        unreadable = summary.unreadable,
        "workspace models preloaded"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/bootstrap/preload.rs"]
mod tests;
