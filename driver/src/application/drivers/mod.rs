//! Package drivers — one `LifecycleDriver` per OS/package-format pair.
//!
//! Each driver is a stateless strategy: fixed command templates, a service
//! manager with its output markers, and a list of diagnostic artifacts. The
//! remote host is borrowed, never owned.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{LifecycleDriver, LocalFiles, RemoteHost};
use crate::domain::{
    Artifact, ConfigError, DriverConfig, InitScript, InstallationDescriptor, LifecycleError,
    PackageVariant, ServiceMarkers,
};

pub mod debian;
pub mod tarball;

pub use debian::DebianDriver;
pub use tarball::TarballDriver;

/// Log and config files collected from a Neo4j install layout, relative to
/// the install directory.
pub const NEO4J_DIAGNOSTIC_FILES: &[&str] = &[
    "data/graph.db/messages.log",
    "data/log/neo4j.0.0.log",
    "conf/neo4j-server.properties",
    "conf/neo4j.properties",
];

/// Absolute remote paths of the diagnostic artifacts under `descriptor`.
#[must_use]
pub fn neo4j_diagnostic_paths(descriptor: &InstallationDescriptor) -> Vec<String> {
    NEO4J_DIAGNOSTIC_FILES
        .iter()
        .map(|relative| descriptor.path(relative))
        .collect()
}

/// The configured artifact, provided it exists locally.
///
/// Checked before the first remote command so a bad path leaves the VM
/// untouched.
pub(crate) fn local_artifact<'d>(
    descriptor: &'d InstallationDescriptor,
    files: &impl LocalFiles,
) -> Result<&'d Artifact, ConfigError> {
    let artifact = descriptor.artifact()?;
    if !files.is_file(artifact.local_path()) {
        return Err(ConfigError::ArtifactNotFound(
            artifact.local_path().display().to_string(),
        ));
    }
    Ok(artifact)
}

/// Run one remote command, tracing it and its output.
pub(crate) async fn sh(host: &impl RemoteHost, command: &str) -> Result<String> {
    tracing::debug!(host = host.address(), command, "remote exec");
    let output = host.execute(command).await?;
    tracing::trace!(host = host.address(), %output, "remote output");
    Ok(output)
}

/// Start `script` and fail if its output carries the failure marker.
pub(crate) async fn start_service(host: &impl RemoteHost, script: &InitScript) -> Result<()> {
    let output = sh(host, &script.start_command()).await?;
    if script.is_start_failure(&output) {
        return Err(LifecycleError::StartFailed {
            service: script.name().to_string(),
            host: host.address().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Stop `script` and fail unless its output satisfies the stop predicate.
pub(crate) async fn stop_service(host: &impl RemoteHost, script: &InitScript) -> Result<()> {
    let output = sh(host, &script.stop_command()).await?;
    tracing::debug!(host = host.address(), %output, "service stop output");
    if !script.is_stop_success(&output) {
        return Err(LifecycleError::StopFailed {
            service: script.name().to_string(),
            host: host.address().to_string(),
        }
        .into());
    }
    Ok(())
}

// ── VariantDriver ─────────────────────────────────────────────────────────────

/// A driver chosen at runtime from `DriverConfig::variant`.
pub enum VariantDriver<'h, H, F> {
    Tarball(TarballDriver<'h, H, F>),
    Debian(DebianDriver<'h, H, F>),
}

impl<'h, H: RemoteHost, F: LocalFiles> VariantDriver<'h, H, F> {
    /// Build the driver for `config.variant`, bound to `host`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn from_config(
        host: &'h H,
        files: &'h F,
        config: &DriverConfig,
    ) -> Result<Self, ConfigError> {
        let descriptor = config.descriptor()?;
        let service = config.init_script();
        Ok(match config.variant {
            PackageVariant::Tarball => Self::Tarball(TarballDriver::new(
                host,
                files,
                descriptor,
                config.tarball_layout(),
                service,
            )),
            PackageVariant::Debian => Self::Debian(DebianDriver::new(
                host,
                files,
                descriptor,
                config.debian_layout(),
                service,
            )),
        })
    }

    #[must_use]
    pub fn variant(&self) -> PackageVariant {
        match self {
            Self::Tarball(_) => PackageVariant::Tarball,
            Self::Debian(_) => PackageVariant::Debian,
        }
    }
}

impl<H: RemoteHost, F: LocalFiles> LifecycleDriver for VariantDriver<'_, H, F> {
    async fn install(&self) -> Result<()> {
        match self {
            Self::Tarball(d) => d.install().await,
            Self::Debian(d) => d.install().await,
        }
    }

    async fn uninstall(&self) -> Result<()> {
        match self {
            Self::Tarball(d) => d.uninstall().await,
            Self::Debian(d) => d.uninstall().await,
        }
    }

    async fn start(&self) -> Result<()> {
        match self {
            Self::Tarball(d) => d.start().await,
            Self::Debian(d) => d.start().await,
        }
    }

    async fn stop(&self) -> Result<()> {
        match self {
            Self::Tarball(d) => d.stop().await,
            Self::Debian(d) => d.stop().await,
        }
    }

    fn install_dir(&self) -> &str {
        match self {
            Self::Tarball(d) => d.install_dir(),
            Self::Debian(d) => d.install_dir(),
        }
    }

    async fn collect_diagnostics(&self, destination: &Path) -> Result<Vec<PathBuf>> {
        match self {
            Self::Tarball(d) => d.collect_diagnostics(destination).await,
            Self::Debian(d) => d.collect_diagnostics(destination).await,
        }
    }
}
