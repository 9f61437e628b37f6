//! Workspace change notifications on top of `notify`.

use crate::kernel::ignore::is_base_ignored;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeKind {
    Added,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub kind: FileChangeKind,
    pub path: PathBuf,
}

pub struct FileWatcher {
    watcher: RecommendedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(root: &Path) -> Result<Self, notify::Error> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (tx, rx) = mpsc::channel();
        let watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                let _ = tx.send(event);
            },
            Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
        )?;
        Ok(Self {
            watcher,
            raw_event_rx: rx,
            root,
        })
    }

    pub fn watch(&mut self, path: &Path, recursive: bool) -> Result<(), notify::Error> {
        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        self.watcher.watch(path, mode)?;
        tracing::debug!(path = %path.display(), recursive, "watching");
        Ok(())
    }

    pub fn unwatch(&mut self, path: &Path) -> Result<(), notify::Error> {
        self.watcher.unwatch(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pending changes, one per path, sorted by path. The last event for a path wins.
    pub fn drain_changes(&mut self) -> Vec<FileChange> {
        let mut latest: FxHashMap<PathBuf, FileChangeKind> = FxHashMap::default();
        while let Ok(event) = self.raw_event_rx.try_recv() {
            for change in normalize_notify_event(event) {
                if contains_ignored_component(&change.path, &self.root) {
                    continue;
                }
                latest.insert(change.path, change.kind);
            }
        }

        let mut changes: Vec<_> = latest
            .into_iter()
            .map(|(path, kind)| FileChange { kind, path })
            .collect();
        changes.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        changes
    }
}

fn contains_ignored_component(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => is_base_ignored(&name.to_string_lossy()),
        _ => false,
    })
}

fn changes(kind: FileChangeKind, paths: Vec<PathBuf>) -> Vec<FileChange> {
    paths
        .into_iter()
        .map(|path| FileChange { kind, path })
        .collect()
}

fn normalize_notify_event(event: notify::Event) -> Vec<FileChange> {
    match event.kind {
        EventKind::Create(_) => changes(FileChangeKind::Added, event.paths),
        EventKind::Remove(_) => changes(FileChangeKind::Deleted, event.paths),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() >= 2 => {
            let mut paths = event.paths.into_iter();
            let mut out = Vec::new();
            if let Some(from) = paths.next() {
                out.push(FileChange {
                    kind: FileChangeKind::Deleted,
                    path: from,
                });
            }
            out.extend(changes(FileChangeKind::Added, paths.collect()));
            out
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            changes(FileChangeKind::Deleted, event.paths)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            changes(FileChangeKind::Added, event.paths)
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => changes(FileChangeKind::Updated, event.paths),
        _ => Vec::new(),
    }
}
