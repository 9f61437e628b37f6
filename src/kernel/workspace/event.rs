//! Change notifications for views observing the workspace.

use super::layout::{RowId, TabId};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceEvent {
    FocusTab(TabId),
    NavigateRow(RowId),
    NavigateOverview,
    FocusChat,
    FileListChanged,
    RootChanged,
}

/// Fan-out to every live subscriber. Disconnected receivers are pruned on send.
#[derive(Debug, Default)]
pub struct EventSink {
    subscribers: Vec<Sender<WorkspaceEvent>>,
}

impl EventSink {
    pub fn subscribe(&mut self) -> Receiver<WorkspaceEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: WorkspaceEvent) {
        tracing::trace!(?event, "workspace event");
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
