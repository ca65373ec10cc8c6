//! Synchronous child-process execution with exit-status translation.
//!
//! The launcher runs exactly one child per invocation and mirrors its
//! fate: normal exit codes pass through unchanged, signal deaths become
//! `128 + signal` in the Unix convention, and a spawn that never got off
//! the ground maps to exit 1.

use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// How the child ended.
#[derive(Debug)]
pub enum ExecOutcome {
    /// Child exited on its own with this code.
    Exited(i32),
    /// Child was terminated by this signal (Unix only).
    Signaled(i32),
    /// The child never started.
    SpawnFailed(std::io::Error),
}

impl ExecOutcome {
    /// The exit status this process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecOutcome::Exited(code) => *code,
            ExecOutcome::Signaled(signal) => 128 + signal,
            ExecOutcome::SpawnFailed(_) => 1,
        }
    }
}

/// Run `binary` with `args`, inheriting stdin/stdout/stderr verbatim, and
/// block until it finishes. No timeout: run duration is the wrapped
/// tool's concern.
#[tracing::instrument(skip(args))]
pub fn run_and_wait(binary: &Path, args: &[OsString]) -> ExecOutcome {
    debug!("Running {} with {} argument(s)", binary.display(), args.len());

    let status = Command::new(binary)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(status) => {
            if let Some(code) = status.code() {
                ExecOutcome::Exited(code)
            } else {
                #[cfg(unix)]
                {
                    use std::os::unix::process::ExitStatusExt;
                    match status.signal() {
                        Some(signal) => ExecOutcome::Signaled(signal),
                        None => ExecOutcome::Exited(1),
                    }
                }
                #[cfg(not(unix))]
                {
                    ExecOutcome::Exited(1)
                }
            }
        }
        Err(e) => ExecOutcome::SpawnFailed(e),
    }
}
