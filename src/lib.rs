//! xide: workspace and editor-bootstrap core for a desktop code editor.
//!
//! Modules:
//! - kernel: tab/row layout, directory scanning, editor bootstrap, completion
//! - kernel::services: ports (contracts) and adapters (filesystem, settings, watcher, agent)
//! - models: text buffers held by the headless editor host

pub mod kernel;
pub mod models;
