//! Workspace state: rows of tabs, the opened folder and its file list.

pub mod controller;
pub mod event;
pub mod layout;

pub use controller::{ScanJob, ScanOutcome, Workspace, WorkspaceOptions};
pub use event::{EventSink, WorkspaceEvent};
pub use layout::{
    LayoutInvariantError, NewTab, Row, RowId, RowNavigation, SingleRowNavigation, Tab, TabId,
    TabLayout,
};
