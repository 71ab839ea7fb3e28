#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Subprocess plumbing for running submissions under a wall-clock limit.

use std::{
    ffi::OsString,
    path::Path,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, Command},
    time::timeout,
};
use tracing::debug;

/// Wall-clock limit applied to each run when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of running one submission against one simulated input.
#[derive(Debug)]
pub enum RunOutcome {
    /// The process ran to completion before the deadline. The exit status may
    /// still be non-zero; callers decide what that means.
    Completed {
        /// Contents written to stdout.
        stdout: String,
        /// Contents written to stderr.
        stderr: String,
        /// Exit status returned by the process.
        status: ExitStatus,
    },
    /// The process outlived the wall-clock limit and was killed along with
    /// everything it spawned.
    TimedOut {
        /// The limit that was exceeded.
        limit: Duration,
    },
    /// The process could not be started at all.
    LaunchFailed {
        /// Why the spawn failed.
        reason: String,
    },
}

/// Runs submission files under an interpreter, one fresh process per
/// invocation.
///
/// Clones are cheap and can run concurrently; every invocation spawns and
/// reaps its own child and touches no shared state.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Interpreter used to execute submissions.
    interpreter: OsString,
    /// Wall-clock limit per invocation.
    limit:       Duration,
}

impl Runner {
    /// Creates a runner for the given interpreter and wall-clock limit.
    pub fn new(interpreter: impl Into<OsString>, limit: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            limit,
        }
    }

    /// Returns the configured wall-clock limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Runs `script` with `input` written to its stdin, which is then closed
    /// so programs that read past the provided input see end-of-stream
    /// instead of blocking.
    ///
    /// The working directory is the script's parent when it has one, so
    /// submissions that open sibling files keep working without any global
    /// chdir; a bare file name runs from the inherited directory. The
    /// wall-clock limit covers the wait and both output reads, and on expiry
    /// the whole process group is killed before [`RunOutcome::TimedOut`] is
    /// returned.
    pub async fn run(&self, script: &Path, input: &str) -> RunOutcome {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // A bare file name has an empty parent, which is not a usable
        // working directory.
        if let Some(dir) = script.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }
        // Own process group, so a timeout can take down children too.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunOutcome::LaunchFailed {
                    reason: e.to_string(),
                };
            }
        };
        // The group id equals the child's pid; taken now because a reaped
        // child no longer reports one.
        let pgid = child.id();

        if let Some(mut handle) = child.stdin.take() {
            let bytes = input.as_bytes().to_vec();
            tokio::spawn(async move {
                if !bytes.is_empty() {
                    let _ = handle.write_all(&bytes).await;
                }
                let _ = handle.shutdown().await;
            });
        }

        let stdout = child.stdout.take();
        let mut out_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(out) = stdout {
                let mut reader = BufReader::new(out);
                let _ = reader.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr = child.stderr.take();
        let mut err_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(err) = stderr {
                let mut reader = BufReader::new(err);
                let _ = reader.read_to_end(&mut buf).await;
            }
            buf
        });

        // One limit bounds the wait and both stream reads. The streams stay
        // open for as long as anything the child spawned holds them, not
        // just until the child itself exits.
        let collected = timeout(self.limit, async {
            let status = child.wait().await;
            let stdout = (&mut out_task).await.unwrap_or_default();
            let stderr = (&mut err_task).await.unwrap_or_default();
            (status, stdout, stderr)
        })
        .await;

        match collected {
            Ok((Ok(status), stdout, stderr)) => RunOutcome::Completed {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                status,
            },
            Ok((Err(e), _, _)) => RunOutcome::LaunchFailed {
                reason: format!("could not wait on process: {e}"),
            },
            Err(_) => {
                debug!("Run of {} exceeded {:?}", script.display(), self.limit);
                kill_tree(&mut child, pgid).await;
                out_task.abort();
                err_task.abort();
                RunOutcome::TimedOut { limit: self.limit }
            }
        }
    }
}

/// Forcibly terminates the child's process group, then reaps the child if it
/// is still running.
#[cfg(unix)]
async fn kill_tree(child: &mut Child, pgid: Option<u32>) {
    if let Some(pgid) = pgid {
        // A negative pid addresses the whole process group.
        let _ = unsafe { libc::kill(-(pgid as i32), libc::SIGKILL) };
    }
    let _ = child.kill().await;
}

/// Forcibly terminates the child, then reaps it.
#[cfg(not(unix))]
async fn kill_tree(child: &mut Child, _pgid: Option<u32>) {
    let _ = child.kill().await;
}
