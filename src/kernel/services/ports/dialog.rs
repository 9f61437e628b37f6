use async_trait::async_trait;
use std::path::PathBuf;

/// Native "choose a folder" prompt. `None` means the user cancelled.
#[async_trait]
pub trait DirectoryDialog: Send + Sync {
    async fn pick_directory(&self) -> Option<PathBuf>;
}
