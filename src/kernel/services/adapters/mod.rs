//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod agent;
pub mod editor_host;
pub mod file;
pub mod file_watcher;
pub mod paths;
pub mod searcher;
pub mod settings;

pub use agent::{run_agent, AgentError, AgentEvent, DEFAULT_AGENT_PROGRAM};
pub use editor_host::InMemoryEditorHost;
pub use file::LocalFileSystem;
pub use file_watcher::{FileChange, FileChangeKind, FileWatcher};
pub use paths::{ensure_log_dir, get_config_dir, get_log_dir};
pub use searcher::LiteralSearcher;
pub use settings::SettingsStore;
