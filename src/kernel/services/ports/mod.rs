//! Service ports: traits + data contracts.

pub mod completion;
pub mod dialog;
pub mod editor;
pub mod fs;
pub mod search;
pub mod settings;

pub use completion::{CompletionClient, CompletionError, CompletionRequest};
pub use dialog::DirectoryDialog;
pub use editor::{
    CompilerOptions, EditOpener, EditorHost, EditorOpenRequest, LinkOpener, ModelInfo, Position,
    TokenProvider, TokenSpan, DOM_LIB_URI,
};
pub use fs::{find_up, DirEntry, FileError, FileMetadata, FileSystem, Result as FileResult};
pub use search::{Match, SearchHit};
pub use settings::{ConfigGateway, Settings, SettingsError, ThemeMode};
