use super::event::{EventSink, WorkspaceEvent};
use super::layout::{NewTab, RowId, RowNavigation, SingleRowNavigation, TabId, TabLayout};
use crate::kernel::ignore::base_ignore_block;
use crate::kernel::scanner::{scan, ScanError, ScanOptions, ScanOutput, ScanWarning};
use crate::kernel::services::bus::{KernelBusReceiver, KernelMessage};
use crate::kernel::services::ports::dialog::DirectoryDialog;
use crate::kernel::services::ports::editor::{EditorOpenRequest, Position};
use crate::kernel::services::ports::fs::FileSystem;
use crate::kernel::services::ports::settings::{ConfigGateway, SettingsError};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceOptions {
    pub single_row: SingleRowNavigation,
    pub scan: ScanOptions,
}

/// A scan detached from the workspace borrow. Apply its outcome with [`Workspace::apply_scan`].
#[derive(Debug, Clone)]
pub struct ScanJob {
    generation: u64,
    root: PathBuf,
    options: ScanOptions,
}

impl ScanJob {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn run(self, fs: &dyn FileSystem) -> ScanOutcome {
        let rules = [base_ignore_block()];
        let result = scan(fs, &self.root, &self.root, &rules, &self.options).await;
        ScanOutcome {
            generation: self.generation,
            root: self.root,
            result,
        }
    }
}

#[derive(Debug)]
pub struct ScanOutcome {
    generation: u64,
    root: PathBuf,
    result: Result<ScanOutput, ScanError>,
}

/// Owns the tab layout and everything shown around it for one opened folder.
pub struct Workspace {
    layout: TabLayout,
    root_dir: Option<PathBuf>,
    file_list: Vec<PathBuf>,
    dir_list: Vec<PathBuf>,
    scan_warnings: Vec<ScanWarning>,
    explorer_visible: bool,
    chat_visible: bool,
    scan_generation: u64,
    options: WorkspaceOptions,
    events: EventSink,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceOptions::default())
    }
}

impl Workspace {
    pub fn new(options: WorkspaceOptions) -> Self {
        Self {
            layout: TabLayout::with_single_row_navigation(options.single_row),
            root_dir: None,
            file_list: Vec::new(),
            dir_list: Vec::new(),
            scan_warnings: Vec::new(),
            explorer_visible: true,
            chat_visible: false,
            scan_generation: 0,
            options,
            events: EventSink::default(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    pub fn layout(&self) -> &TabLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut TabLayout {
        &mut self.layout
    }

    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }

    pub fn file_list(&self) -> &[PathBuf] {
        &self.file_list
    }

    pub fn dir_list(&self) -> &[PathBuf] {
        &self.dir_list
    }

    pub fn scan_warnings(&self) -> &[ScanWarning] {
        &self.scan_warnings
    }

    pub fn scan_generation(&self) -> u64 {
        self.scan_generation
    }

    pub fn explorer_visible(&self) -> bool {
        self.explorer_visible
    }

    pub fn chat_visible(&self) -> bool {
        self.chat_visible
    }

    /// Fresh single-row state with no root. In-flight scans become stale.
    pub fn reset(&mut self) {
        self.layout = TabLayout::with_single_row_navigation(self.options.single_row);
        self.root_dir = None;
        self.file_list.clear();
        self.dir_list.clear();
        self.scan_warnings.clear();
        self.scan_generation = self.scan_generation.wrapping_add(1);
    }

    pub fn set_root_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.reset();
        tracing::info!(root = %path.display(), "workspace root set");
        self.root_dir = Some(path);
        self.events.emit(WorkspaceEvent::RootChanged);
    }

    /// Prompts for a folder. Cancelling leaves the workspace untouched.
    pub async fn select_root_dir(&mut self, dialog: &dyn DirectoryDialog) -> Option<PathBuf> {
        let path = dialog.pick_directory().await?;
        self.set_root_dir(path.clone());
        Some(path)
    }

    pub fn begin_scan(&self) -> Option<ScanJob> {
        let root = self.root_dir.clone()?;
        Some(ScanJob {
            generation: self.scan_generation,
            root,
            options: self.options.scan,
        })
    }

    /// Stores a finished scan. Outcomes from before the last root change are dropped,
    /// errors included, and yield `Ok(false)`.
    pub fn apply_scan(&mut self, outcome: ScanOutcome) -> Result<bool, ScanError> {
        if outcome.generation != self.scan_generation {
            tracing::debug!(
                root = %outcome.root.display(),
                generation = outcome.generation,
                current = self.scan_generation,
                "discarding stale scan"
            );
            return Ok(false);
        }
        let output = outcome.result?;
        self.file_list = output.files;
        self.dir_list = output.dirs;
        self.scan_warnings = output.warnings;
        tracing::info!(
            files = self.file_list.len(),
            dirs = self.dir_list.len(),
            "file list rebuilt"
        );
        self.events.emit(WorkspaceEvent::FileListChanged);
        Ok(true)
    }

    /// Rescans the root. `Ok(false)` when no root is set.
    pub async fn build_file_list(&mut self, fs: &dyn FileSystem) -> Result<bool, ScanError> {
        let Some(job) = self.begin_scan() else {
            return Ok(false);
        };
        let outcome = job.run(fs).await;
        self.apply_scan(outcome)
    }

    fn target_row(&self) -> RowId {
        self.layout
            .current_row_id()
            .filter(|id| self.layout.row(*id).is_some())
            .unwrap_or_else(|| self.layout.rows()[0].id)
    }

    fn focus(&mut self, tab_id: TabId) {
        self.layout.set_current_tab(tab_id);
        self.events.emit(WorkspaceEvent::FocusTab(tab_id));
        if let Some(row) = self.layout.tab(tab_id).map(|tab| tab.row_id) {
            self.events.emit(WorkspaceEvent::NavigateRow(row));
        }
    }

    /// Focuses the settings file, opening it as an external tab when needed.
    pub async fn open_settings(
        &mut self,
        gateway: &dyn ConfigGateway,
    ) -> Result<TabId, SettingsError> {
        let path = gateway.settings_path().await?;
        let existing = self.layout.find_tab_by_path(&path).map(|tab| tab.id);
        let tab_id = match existing {
            Some(id) => id,
            None => {
                let row = self.target_row();
                self.layout.add_tab(row, path, true)
            }
        };
        self.focus(tab_id);
        Ok(tab_id)
    }

    /// Focuses the tab showing `path`, or opens one in the current row.
    pub fn open_file(&mut self, path: impl Into<PathBuf>, position: Option<Position>) -> TabId {
        let path = path.into();
        let existing = self.layout.find_tab_by_path(&path).map(|tab| tab.id);
        let tab_id = match existing {
            Some(id) => id,
            None => {
                let external = self
                    .root_dir
                    .as_ref()
                    .is_some_and(|root| !path.starts_with(root));
                let mut new = NewTab::new(self.target_row(), path).external(external);
                new.initial_position = position;
                self.layout.add_tab_with(new)
            }
        };
        self.focus(tab_id);
        tab_id
    }

    /// Opens the location an editor-host callback asked for. Non-file URIs are ignored.
    pub fn open_code_reference(&mut self, request: EditorOpenRequest) -> Option<TabId> {
        let Some(path) = uri_to_path(&request.uri) else {
            tracing::warn!(uri = %request.uri, "cannot open non-file reference");
            return None;
        };
        let position = request.position.unwrap_or(Position::START);
        Some(self.open_file(path, Some(position)))
    }

    pub fn close_tab(&mut self, tab_id: TabId) -> bool {
        if !self.layout.remove_tab(tab_id) {
            return false;
        }
        if let Some(current) = self.layout.current_tab_id() {
            self.events.emit(WorkspaceEvent::FocusTab(current));
        }
        true
    }

    pub fn handle_message(&mut self, msg: KernelMessage) {
        match msg {
            KernelMessage::OpenCodeReference(request) => {
                self.open_code_reference(request);
            }
        }
    }

    /// Applies everything queued on the kernel bus. Returns how many messages were handled.
    pub fn pump_bus(&mut self, rx: &mut KernelBusReceiver) -> usize {
        let messages = rx.drain();
        let count = messages.len();
        for msg in messages {
            self.handle_message(msg);
        }
        count
    }

    pub fn next_tab(&mut self, tab_id: TabId) -> Option<TabId> {
        let target = self.layout.next_tab(tab_id)?;
        self.focus(target);
        Some(target)
    }

    pub fn prev_tab(&mut self, tab_id: TabId) -> Option<TabId> {
        let target = self.layout.prev_tab(tab_id)?;
        self.focus(target);
        Some(target)
    }

    pub fn next_row(&mut self, from: RowId) -> RowNavigation {
        let nav = self.layout.next_row(from);
        self.emit_navigation(nav);
        nav
    }

    pub fn prev_row(&mut self, from: RowId) -> RowNavigation {
        let nav = self.layout.prev_row(from);
        self.emit_navigation(nav);
        nav
    }

    fn emit_navigation(&mut self, nav: RowNavigation) {
        match nav {
            RowNavigation::Row { row, focus } => {
                self.events.emit(WorkspaceEvent::NavigateRow(row));
                if let Some(tab) = focus {
                    self.events.emit(WorkspaceEvent::FocusTab(tab));
                }
            }
            RowNavigation::Overview => self.events.emit(WorkspaceEvent::NavigateOverview),
            RowNavigation::None => {}
        }
    }

    pub fn set_chat_visible(&mut self, visible: bool) {
        self.chat_visible = visible;
        if visible {
            self.events.emit(WorkspaceEvent::FocusChat);
        }
    }

    pub fn toggle_chat(&mut self) -> bool {
        self.set_chat_visible(!self.chat_visible);
        self.chat_visible
    }

    pub fn set_explorer_visible(&mut self, visible: bool) {
        self.explorer_visible = visible;
    }

    pub fn toggle_explorer(&mut self) -> bool {
        self.explorer_visible = !self.explorer_visible;
        self.explorer_visible
    }
}

fn uri_to_path(uri: &str) -> Option<PathBuf> {
    match url::Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Ok(_) => None,
        Err(_) => Some(PathBuf::from(uri)),
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/controller.rs"]
mod tests;
