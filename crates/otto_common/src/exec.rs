//! Shell and script execution, gated by the safety filter.
//!
//! Every invocation walks one state machine:
//! Pending -> { Blocked | Running -> { Succeeded | Failed | TimedOut } }.
//! Blocked commands are never spawned. Running commands get a modified
//! search path (managed tool dir first), a hard wall-clock timeout, and
//! captured stdout/stderr.

use crate::config::OttoConfig;
use crate::safety::{check_command, Verdict};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{error, info, warn};

/// Wall-clock limit for spawned commands.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Terminal classification of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// Vetoed by the safety filter; no process was spawned.
    Blocked,
    /// Process exited zero.
    Succeeded,
    /// Process exited non-zero or could not be spawned.
    Failed,
    /// Process exceeded the wall-clock limit and was killed.
    TimedOut,
}

/// Captured result of one invocation. Not persisted anywhere.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub status: ExecStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    pub fn ok(&self) -> bool {
        self.status == ExecStatus::Succeeded
    }

    fn blocked() -> Self {
        Self {
            status: ExecStatus::Blocked,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Run a shell command through `sh -c` with the safety filter applied first.
pub async fn run_shell(command: &str, config: &OttoConfig) -> ExecResult {
    run_shell_with_timeout(command, config, COMMAND_TIMEOUT).await
}

pub async fn run_shell_with_timeout(
    command: &str,
    config: &OttoConfig,
    timeout: Duration,
) -> ExecResult {
    if let Verdict::Blocked { rule } = check_command(command) {
        warn!("Blocked dangerous command ({}): {}", rule, command);
        return ExecResult::blocked();
    }

    info!("Executing: {}", command);

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .env("PATH", config.search_path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to spawn shell: {}", e);
            return ExecResult {
                status: ExecStatus::Failed,
                stdout: String::new(),
                stderr: e.to_string(),
            };
        }
    };

    collect_output(child, timeout).await
}

/// Run interpreter code written to a scratch file. The interpreter is
/// resolved from the search path (`python3`, then `python`).
pub async fn run_python_script(code: &str, config: &OttoConfig) -> ExecResult {
    let interpreter = match which::which("python3").or_else(|_| which::which("python")) {
        Ok(p) => p,
        Err(_) => {
            error!("No Python interpreter found on PATH");
            return ExecResult {
                status: ExecStatus::Failed,
                stdout: String::new(),
                stderr: "No Python interpreter found".to_string(),
            };
        }
    };
    run_script_with(&interpreter, code, config, COMMAND_TIMEOUT).await
}

pub async fn run_script_with(
    interpreter: &Path,
    code: &str,
    config: &OttoConfig,
    timeout: Duration,
) -> ExecResult {
    let mut scratch = match tempfile::Builder::new().suffix(".py").tempfile() {
        Ok(f) => f,
        Err(e) => {
            return ExecResult {
                status: ExecStatus::Failed,
                stdout: String::new(),
                stderr: format!("Failed to create scratch file: {}", e),
            };
        }
    };
    if let Err(e) = scratch.write_all(code.as_bytes()) {
        return ExecResult {
            status: ExecStatus::Failed,
            stdout: String::new(),
            stderr: format!("Failed to write scratch file: {}", e),
        };
    }

    info!("Executing script via {}", interpreter.display());

    let child = Command::new(interpreter)
        .arg(scratch.path())
        .env("PATH", config.search_path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to spawn {}: {}", interpreter.display(), e);
            return ExecResult {
                status: ExecStatus::Failed,
                stdout: String::new(),
                stderr: e.to_string(),
            };
        }
    };

    // Scratch file lives until we drop it, after the child has finished.
    let result = collect_output(child, timeout).await;
    drop(scratch);
    result
}

async fn collect_output(child: tokio::process::Child, timeout: Duration) -> ExecResult {
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if output.status.success() {
                ExecResult {
                    status: ExecStatus::Succeeded,
                    stdout,
                    stderr,
                }
            } else {
                error!("Command failed: {}", stderr.trim_end());
                ExecResult {
                    status: ExecStatus::Failed,
                    stdout,
                    stderr,
                }
            }
        }
        Ok(Err(e)) => {
            error!("Failed to collect command output: {}", e);
            ExecResult {
                status: ExecStatus::Failed,
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
        Err(_) => {
            // kill_on_drop reaps the child when the future is dropped.
            warn!("Command timed out after {:?}", timeout);
            ExecResult {
                status: ExecStatus::TimedOut,
                stdout: String::new(),
                stderr: String::new(),
            }
        }
    }
}
