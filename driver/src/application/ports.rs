//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::DriverConfig;

// ── Remote Execution Ports ────────────────────────────────────────────────────

/// Command execution on the remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Run `command` through a shell on the VM and return its stdout.
    ///
    /// # Errors
    ///
    /// Implementations must fail on a nonzero exit status rather than return
    /// the output; drivers rely on this to surface transport failures.
    async fn execute(&self, command: &str) -> Result<String>;
}

/// File transfer between the local machine and the VM.
#[allow(async_fn_in_trait)]
pub trait FileTransfer {
    /// Upload a local file to `remote`.
    async fn copy_to_remote(&self, local: &Path, remote: &str) -> Result<()>;
    /// Download `remote` to a local file.
    async fn copy_from_remote(&self, remote: &str, local: &Path) -> Result<()>;
}

/// Identity of the VM, used in error messages and diagnostic file names.
pub trait HostIdentity {
    /// Network address of the VM.
    fn address(&self) -> &str;
}

/// Composite trait — the remote execution channel a driver is bound to.
pub trait RemoteHost: RemoteShell + FileTransfer + HostIdentity {}

/// Blanket implementation: any type implementing all three sub-traits is a `RemoteHost`.
impl<T> RemoteHost for T where T: RemoteShell + FileTransfer + HostIdentity {}

// ── Lifecycle Contract ────────────────────────────────────────────────────────

/// Install, start, stop, and uninstall one deployment on one VM.
///
/// Drivers keep no state between calls. Each call assumes the precondition
/// state documented on `LifecycleStep`; the caller sequences calls. Every
/// remote command is attempted once and nothing is rolled back.
#[allow(async_fn_in_trait)]
pub trait LifecycleDriver {
    /// Stage, unpack, register, and fix up ownership. Absent → Installed.
    ///
    /// Only transport failures are detected here.
    async fn install(&self) -> Result<()>;
    /// Remove the service registration and delete the install directory.
    async fn uninstall(&self) -> Result<()>;
    /// Start the service. Installed/Stopped → Running.
    ///
    /// # Errors
    ///
    /// Fails with `LifecycleError::StartFailed` when the output carries the
    /// service manager's failure marker.
    async fn start(&self) -> Result<()>;
    /// Stop the service. Running → Stopped.
    ///
    /// # Errors
    ///
    /// Fails with `LifecycleError::StopFailed` when the output does not
    /// satisfy the service manager's stop predicate.
    async fn stop(&self) -> Result<()>;
    /// The fixed install directory of this driver.
    fn install_dir(&self) -> &str;
    /// Materialize every known diagnostic artifact under `destination`.
    ///
    /// Returns exactly one local path per artifact.
    async fn collect_diagnostics(&self, destination: &Path) -> Result<Vec<PathBuf>>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Local Filesystem and Config Ports ─────────────────────────────────────────

/// Local filesystem access: the artifact check before install and the writes
/// performed by diagnostics collection.
pub trait LocalFiles {
    /// `true` if `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
    /// Create `dir` and its parents if missing.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;
    /// Create or truncate `path` with `contents`.
    fn write_text(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Loads the driver configuration.
pub trait ConfigStore {
    /// Load the config, falling back to defaults when no file exists.
    fn load(&self) -> Result<DriverConfig>;
    /// Path of the config file consulted by `load`.
    fn path(&self) -> Result<PathBuf>;
}
