use crate::kernel::services::ports::editor::EditorOpenRequest;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Requests posted back to the workspace from editor-host callbacks and background tasks.
#[derive(Debug)]
pub enum KernelMessage {
    OpenCodeReference(EditorOpenRequest),
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    pub fn send_open_request(
        &self,
        request: EditorOpenRequest,
    ) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.send(KernelMessage::OpenCodeReference(request))
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    /// Everything queued so far, without blocking.
    pub fn drain(&mut self) -> Vec<KernelMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }
}
