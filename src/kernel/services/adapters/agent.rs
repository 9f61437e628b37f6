//! Runs the external coding agent CLI and streams its output.

use serde::Serialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

pub const DEFAULT_AGENT_PROGRAM: &str = "opencode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum AgentEvent {
    Stdout { line: String },
    Stderr { line: String },
    Finished { success: bool },
    Error { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("failed to execute `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for agent process: {0}")]
    Wait(#[source] std::io::Error),
}

async fn forward_lines<R, F>(reader: R, tx: UnboundedSender<AgentEvent>, wrap: F)
where
    R: AsyncRead + Unpin,
    F: Fn(String) -> AgentEvent,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(wrap(line)).is_err() {
            break;
        }
    }
}

/// Spawns `<program> run -m <model> <prompt>` and streams stdout/stderr lines to `tx`,
/// followed by `Finished`. A spawn failure is reported as `Error` and returned.
pub async fn run_agent(
    program: &str,
    model: &str,
    prompt: &str,
    tx: UnboundedSender<AgentEvent>,
) -> Result<(), AgentError> {
    let spawned = Command::new(program)
        .arg("run")
        .arg("-m")
        .arg(model)
        .arg(prompt)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(source) => {
            let err = AgentError::Spawn {
                program: program.to_string(),
                source,
            };
            tracing::warn!(error = %err, "agent spawn failed");
            let _ = tx.send(AgentEvent::Error {
                message: err.to_string(),
            });
            return Err(err);
        }
    };
    tracing::info!(program, model, "agent started");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_task = async {
        if let Some(stdout) = stdout {
            forward_lines(stdout, tx.clone(), |line| AgentEvent::Stdout { line }).await;
        }
    };
    let err_task = async {
        if let Some(stderr) = stderr {
            forward_lines(stderr, tx.clone(), |line| AgentEvent::Stderr { line }).await;
        }
    };
    tokio::join!(out_task, err_task);

    let status = child.wait().await.map_err(AgentError::Wait)?;
    tracing::info!(success = status.success(), "agent finished");
    let _ = tx.send(AgentEvent::Finished {
        success: status.success(),
    });
    Ok(())
}
