//! Headless workspace core: layout, scanning, and editor-host bootstrap.

pub mod bootstrap;
pub mod completion;
pub mod ignore;
pub mod language;
pub mod scanner;
pub mod services;
pub mod workspace;

pub use bootstrap::{
    BootstrapContext, BootstrapError, BootstrapOptions, BootstrapReport, BootstrapState,
    EditorBootstrap, SearchError, StageOutcome,
};
pub use completion::{complete, CompletionPrompt};
pub use ignore::{IgnoreError, IgnoreRules, BASE_IGNORE_LIST};
pub use language::LanguageId;
pub use scanner::{scan, ScanError, ScanFailurePolicy, ScanOptions, ScanOutput, ScanWarning};
pub use workspace::{RowId, TabId, TabLayout, Workspace, WorkspaceEvent, WorkspaceOptions};
