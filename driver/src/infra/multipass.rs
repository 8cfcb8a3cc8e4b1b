//! Multipass implementation of the remote execution channel.
//!
//! `MultipassHost<R>` routes every `multipass` CLI call through a
//! `CommandRunner`, so tests can inject a mock runner without spawning real
//! processes. A nonzero exit status is always surfaced as a `TransportError`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, FileTransfer, HostIdentity, RemoteShell};
use crate::domain::{DriverConfig, TransportError};
use crate::infra::command_runner::TokioCommandRunner;

const MULTIPASS: &str = "multipass";

/// A Multipass instance addressed through the `multipass` CLI.
pub struct MultipassHost<R: CommandRunner> {
    runner: R,
    instance: String,
    address: String,
    transfer_timeout: Duration,
}

impl<R: CommandRunner> MultipassHost<R> {
    /// Bind to `instance` using a known address.
    pub fn with_address(
        runner: R,
        instance: impl Into<String>,
        address: impl Into<String>,
        transfer_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            instance: instance.into(),
            address: address.into(),
            transfer_timeout,
        }
    }

    /// Bind to `instance`, resolving its address from `multipass info`.
    ///
    /// # Errors
    ///
    /// Returns an error if `multipass info` fails or reports no IPv4 address.
    pub async fn connect(
        runner: R,
        instance: impl Into<String>,
        transfer_timeout: Duration,
    ) -> Result<Self> {
        let instance = instance.into();
        let address = resolve_address(&runner, &instance).await?;
        Ok(Self::with_address(
            runner,
            instance,
            address,
            transfer_timeout,
        ))
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    async fn transfer(&self, from: &str, to: &str) -> Result<()> {
        let output = self
            .runner
            .run_with_timeout(MULTIPASS, &["transfer", from, to], self.transfer_timeout)
            .await
            .context("multipass transfer")?;
        if !output.status.success() {
            return Err(TransportError::TransferFailed {
                from: from.to_string(),
                to: to.to_string(),
                status: output.status.to_string(),
                stderr: stderr_text(&output),
            }
            .into());
        }
        Ok(())
    }
}

impl MultipassHost<TokioCommandRunner> {
    /// Production host for `config.instance`.
    ///
    /// Uses `config.address` when set instead of querying the VM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be resolved.
    pub async fn from_config(config: &DriverConfig) -> Result<Self> {
        let runner = TokioCommandRunner::new(config.timeouts.command());
        let transfer_timeout = config.timeouts.transfer();
        match &config.address {
            Some(address) => Ok(Self::with_address(
                runner,
                config.instance.clone(),
                address.clone(),
                transfer_timeout,
            )),
            None => Self::connect(runner, config.instance.clone(), transfer_timeout).await,
        }
    }
}

/// Resolve the primary IPv4 address of `instance`.
///
/// Parses `multipass info <instance> --format json` and takes the first entry
/// of `info.<instance>.ipv4`.
///
/// # Errors
///
/// Returns an error if `info` fails, its JSON is invalid, or no IPv4 address
/// is listed.
pub async fn resolve_address(runner: &impl CommandRunner, instance: &str) -> Result<String> {
    let output = runner
        .run(MULTIPASS, &["info", instance, "--format", "json"])
        .await
        .context("multipass info")?;
    anyhow::ensure!(
        output.status.success(),
        "multipass info {instance} failed: {}",
        stderr_text(&output)
    );

    let info: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("invalid JSON from multipass info")?;

    info.get("info")
        .and_then(|i| i.get(instance))
        .and_then(|p| p.get("ipv4"))
        .and_then(|arr| arr.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| {
            TransportError::NoAddress {
                instance: instance.to_string(),
            }
            .into()
        })
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

impl<R: CommandRunner> RemoteShell for MultipassHost<R> {
    async fn execute(&self, command: &str) -> Result<String> {
        let output = self
            .runner
            .run(
                MULTIPASS,
                &["exec", &self.instance, "--", "bash", "-c", command],
            )
            .await
            .context("multipass exec")?;
        if !output.status.success() {
            return Err(TransportError::CommandFailed {
                host: self.address.clone(),
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: stderr_text(&output),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl<R: CommandRunner> FileTransfer for MultipassHost<R> {
    async fn copy_to_remote(&self, local: &Path, remote: &str) -> Result<()> {
        let local = local
            .to_str()
            .with_context(|| format!("local path is not valid UTF-8: {}", local.display()))?;
        let dest = format!("{}:{remote}", self.instance);
        self.transfer(local, &dest).await
    }

    async fn copy_from_remote(&self, remote: &str, local: &Path) -> Result<()> {
        let local = local
            .to_str()
            .with_context(|| format!("local path is not valid UTF-8: {}", local.display()))?;
        let source = format!("{}:{remote}", self.instance);
        self.transfer(&source, local).await
    }
}

impl<R: CommandRunner> HostIdentity for MultipassHost<R> {
    fn address(&self) -> &str {
        &self.address
    }
}
