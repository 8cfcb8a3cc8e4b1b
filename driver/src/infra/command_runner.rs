//! Infrastructure implementation of the `CommandRunner` port.
//!
//! Every `multipass` invocation goes through `TokioCommandRunner`. A command
//! that outlives its deadline is killed and reported as
//! `TransportError::Timeout`.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::CommandRunner;
use crate::domain::TransportError;

/// Production `CommandRunner` backed by `tokio::process`.
///
/// The deadline is raced against the child with `tokio::select!` and the
/// child is killed explicitly when it loses. Dropping a timed-out
/// `.output()` future does not terminate the process on every platform.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    /// Runner whose `run` uses `timeout` as the deadline.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Drain a captured pipe. Read errors leave whatever was read so far.
async fn drain(pipe: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::trace!(program, ?args, ?timeout, "spawning");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        tokio::select! {
            (status, stdout, stderr) = async {
                tokio::join!(child.wait(), drain(stdout), drain(stderr))
            } => Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            }),
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::warn!(program, ?timeout, "command timed out, killed");
                Err(TransportError::Timeout {
                    program: program.to_string(),
                    timeout,
                }
                .into())
            }
        }
    }
}
