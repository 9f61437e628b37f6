//! Callbacks the bootstrap installs on the editor host.

use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::services::ports::editor::{EditOpener, EditorOpenRequest, LinkOpener, Position};
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Hands links to the operating system's default handler.
#[derive(Debug, Clone)]
pub struct SystemLinkOpener {
    program: String,
    leading_args: Vec<String>,
}

impl Default for SystemLinkOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemLinkOpener {
    pub fn new() -> Self {
        let (program, leading_args): (&str, &[&str]) = if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("cmd", &["/C", "start", ""])
        } else {
            ("xdg-open", &[])
        };
        Self::with_command(program, leading_args)
    }

    pub fn with_command(program: impl Into<String>, leading_args: &[&str]) -> Self {
        Self {
            program: program.into(),
            leading_args: leading_args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SystemLinkOpener {
    /// Spawns the opener for `url`. The returned thread reaps the child.
    fn launch(&self, url: &str) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(thread::spawn(move || child.wait()))
    }
}

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> bool {
        match self.launch(url) {
            Ok(_) => {
                tracing::debug!(url, program = %self.program, "link handed to system");
                true
            }
            Err(e) => {
                tracing::warn!(url, program = %self.program, error = %e, "cannot open link");
                false
            }
        }
    }
}

/// Routes host "go to definition" style requests back to the workspace over the kernel bus.
#[derive(Clone)]
pub struct WorkspaceEditOpener {
    tx: KernelBusSender,
}

impl WorkspaceEditOpener {
    pub fn new(tx: KernelBusSender) -> Self {
        Self { tx }
    }
}

impl EditOpener for WorkspaceEditOpener {
    fn open_code_editor(&self, uri: &str, position: Option<Position>) -> bool {
        let request = EditorOpenRequest {
            uri: uri.to_string(),
            position: Some(position.unwrap_or(Position::START)),
        };
        match self.tx.send_open_request(request) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(uri, "workspace is gone, dropping open request");
                false
            }
        }
    }
}
