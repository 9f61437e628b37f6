//! Loads `.d.ts` files from the workspace's `node_modules` into the editor host.

use crate::kernel::services::ports::editor::EditorHost;
use crate::kernel::services::ports::fs::{FileError, FileSystem};
use std::path::{Path, PathBuf};

pub const NODE_MODULES: &str = "node_modules";
const DECLARATION_SUFFIX: &str = ".d.ts";
const URI_PREFIX: &str = "file:///node_modules/";

#[derive(Debug, thiserror::Error)]
pub enum TypeDefsError {
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: FileError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefsSummary {
    pub loaded: usize,
    /// Declaration files that could not be read.
    pub unreadable: usize,
    /// The cap stopped the walk before everything was loaded.
    pub truncated: bool,
}

/// Host URI for a file under `node_modules`, given its path relative to that directory.
pub fn extra_lib_uri(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("{URI_PREFIX}{}", parts.join("/"))
}

/// Registers up to `max` declaration files found under `<root>/node_modules`.
///
/// Package directories (`pkg`, `@scope/pkg`, `@types/pkg`) are walked in name order;
/// nested `node_modules` and dot-directories are skipped. `Ok(None)` when there is no
/// `node_modules` directory.
pub async fn load(
    fs: &dyn FileSystem,
    host: &dyn EditorHost,
    root: &Path,
    max: usize,
) -> Result<Option<TypeDefsSummary>, TypeDefsError> {
    let base = root.join(NODE_MODULES);
    if !fs.exists(&base).await {
        return Ok(None);
    }

    let mut summary = TypeDefsSummary::default();
    let mut pending = vec![base.clone()];

    while let Some(dir) = pending.pop() {
        let mut entries = match fs.read_dir(&dir).await {
            Ok(entries) => entries,
            Err(source) if dir == base => {
                return Err(TypeDefsError::ReadDir { path: dir, source });
            }
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "skipping unreadable package dir");
                continue;
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut subdirs = Vec::new();
        for entry in entries {
            if entry.is_dir {
                if entry.name.starts_with('.') || (entry.name == NODE_MODULES && dir != base) {
                    continue;
                }
                subdirs.push(dir.join(&entry.name));
                continue;
            }
            if !entry.name.ends_with(DECLARATION_SUFFIX) {
                continue;
            }
            if summary.loaded >= max {
                summary.truncated = true;
                break;
            }

            let path = dir.join(&entry.name);
            match fs.read_text_file(&path).await {
                Ok(content) => {
                    let relative = path.strip_prefix(&base).unwrap_or(&path);
                    host.add_extra_lib(content, extra_lib_uri(relative));
                    summary.loaded += 1;
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "unreadable declaration file");
                    summary.unreadable += 1;
                }
            }
        }
        if summary.truncated {
            break;
        }
        // Reverse so the stack pops in name order.
        pending.extend(subdirs.into_iter().rev());
    }

    tracing::info!(
        loaded = summary.loaded,
        unreadable = summary.unreadable,
        truncated = summary.truncated,
        "type definitions loaded"
    );
    Ok(Some(summary))
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/bootstrap/typedefs.rs"]
mod tests;
